//! Coarse operation guard: "can this user ever perform this action on this
//! resource kind" given the request's scope.

use crate::{Action, AuthzError, Resource, Scope, User, allow_by_op};

pub fn require_op(
    user: &User,
    scope: &Scope,
    resource: Resource,
    action: Action,
) -> Result<(), AuthzError> {
    if user.is_admin() || scope.is_unrestricted() {
        return Ok(());
    }

    let level = scope.level(resource);
    if allow_by_op(level, action) {
        Ok(())
    } else {
        tracing::debug!(user_id = %user.id, %resource, %action, %level, "operation denied");
        Err(AuthzError::forbidden(resource, action))
    }
}
