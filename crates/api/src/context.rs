use std::sync::Arc;

use projectguard_auth::{Action, Scope, User};

/// Authorization context for one request.
///
/// Built once by the middleware and attached to the request extensions; it is
/// dropped with the request and never shared across requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    user: Arc<User>,
    action: Action,
    scope: Arc<Scope>,
}

impl RequestContext {
    pub fn new(user: Arc<User>, action: Action, scope: Scope) -> Self {
        Self {
            user,
            action,
            scope: Arc::new(scope),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Action derived from the HTTP method.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Aggregated scope of the user, computed at the start of the request.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}
