use std::sync::Arc;

use axum::{http::Request, middleware::Next, response::Response};

use projectguard_auth::{Action, AuthzError, User, extract_scope};

use crate::app::errors::ApiError;
use crate::context::RequestContext;

/// Build the per-request authorization context.
///
/// Expects the authentication layer to have inserted the verified `User`
/// snapshot (bare or as `Arc<User>`) into the request extensions. Missing or
/// inactive snapshots are rejected before any authorization check runs.
pub async fn authorization_context(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = take_user(&mut req).ok_or(ApiError(AuthzError::Unauthenticated))?;

    if !user.is_active {
        tracing::debug!(user_id = %user.id, "inactive user snapshot rejected");
        return Err(ApiError(AuthzError::Unauthenticated));
    }

    let action = Action::from_http_method(req.method().as_str());
    let scope = extract_scope(&user);

    req.extensions_mut()
        .insert(RequestContext::new(user, action, scope));

    Ok(next.run(req).await)
}

fn take_user(req: &mut Request<axum::body::Body>) -> Option<Arc<User>> {
    let extensions = req.extensions_mut();
    extensions
        .remove::<Arc<User>>()
        .or_else(|| extensions.remove::<User>().map(Arc::new))
}
