use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use projectguard_auth::{AuthzError, CollectionKind, Resource};

/// Authorization failure carried to the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub AuthzError);

impl From<AuthzError> for ApiError {
    fn from(value: AuthzError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        authz_error_to_response(self.0)
    }
}

pub fn authz_error_to_response(err: AuthzError) -> Response {
    match err {
        AuthzError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required")
        }
        e @ AuthzError::Forbidden { .. } => json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()),
        AuthzError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        AuthzError::Misconfigured(msg) => {
            tracing::error!(error = %msg, "authorization misconfigured");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "misconfigured", msg)
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Resource names arriving in a path are caller input, not registrations.
pub fn parse_resource(s: &str) -> Result<Resource, Response> {
    s.parse().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_resource",
            "resource must be one of: projects, invoices, orders, suppliers, files",
        )
    })
}

pub fn parse_collection(s: &str) -> Result<CollectionKind, Response> {
    match s {
        "projects" => Ok(CollectionKind::Project),
        "orders" => Ok(CollectionKind::Order),
        "suppliers" => Ok(CollectionKind::Supplier),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_collection",
            "collection must be one of: projects, orders, suppliers",
        )),
    }
}
