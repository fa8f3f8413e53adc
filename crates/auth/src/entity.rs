//! Per-record guard.
//!
//! Resolves which project owns a record through the persistence side, then
//! hands the decision to [`can_user`](crate::can_user). The lookup is the only
//! suspension point in this crate; any failure or timeout resolves to
//! `NotFound`, never to allow.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use projectguard_core::{EntityId, ProjectId};

use crate::{Action, AuthzConfig, AuthzError, Resource, User, can_user, extract_scope, require_op};

/// Who owns a stored record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ownership {
    Project(ProjectId),
    /// The record kind has no project reference (suppliers).
    Unowned,
    /// The record should reference a project but the reference is missing or malformed.
    Unresolved,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("lookup backend error: {0}")]
    Backend(String),
}

/// Single-record read answering "who owns `id`" for `resource`.
///
/// `Ok(None)` means the record does not exist.
#[async_trait]
pub trait OwnerLookup: Send + Sync {
    async fn owner_of(
        &self,
        resource: Resource,
        id: EntityId,
    ) -> Result<Option<Ownership>, LookupError>;
}

#[async_trait]
impl<L> OwnerLookup for Arc<L>
where
    L: OwnerLookup + ?Sized,
{
    async fn owner_of(
        &self,
        resource: Resource,
        id: EntityId,
    ) -> Result<Option<Ownership>, LookupError> {
        (**self).owner_of(resource, id).await
    }
}

#[derive(Debug, Clone)]
pub struct EntityAccessGuard<L> {
    lookup: L,
    config: AuthzConfig,
}

impl<L: OwnerLookup> EntityAccessGuard<L> {
    pub fn new(lookup: L, config: AuthzConfig) -> Self {
        Self { lookup, config }
    }

    pub fn config(&self) -> &AuthzConfig {
        &self.config
    }

    pub async fn ensure_entity_access(
        &self,
        user: &User,
        entity_id: EntityId,
        resource: Resource,
        action: Action,
    ) -> Result<(), AuthzError> {
        let ownership = self.resolve_owner(resource, entity_id).await?;

        let allowed = match ownership {
            Ownership::Project(project) => can_user(user, project, resource, action),
            Ownership::Unowned => require_op(user, &extract_scope(user), resource, action).is_ok(),
            Ownership::Unresolved => user.is_admin(),
        };

        if allowed {
            Ok(())
        } else {
            Err(AuthzError::forbidden(resource, action))
        }
    }

    async fn resolve_owner(
        &self,
        resource: Resource,
        entity_id: EntityId,
    ) -> Result<Ownership, AuthzError> {
        let lookup = self.lookup.owner_of(resource, entity_id);
        match tokio::time::timeout(self.config.lookup_timeout, lookup).await {
            Ok(Ok(Some(ownership))) => Ok(ownership),
            Ok(Ok(None)) => Err(AuthzError::NotFound),
            Ok(Err(e)) => {
                tracing::warn!(%resource, %entity_id, error = %e, "owner lookup failed");
                Err(AuthzError::NotFound)
            }
            Err(_) => {
                tracing::warn!(
                    %resource,
                    %entity_id,
                    timeout_ms = self.config.lookup_timeout.as_millis() as u64,
                    "owner lookup timed out"
                );
                Err(AuthzError::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::{AccessLevel, ModuleName, ProjectPermission, Role};
    use projectguard_core::UserId;

    #[derive(Default)]
    struct FixedLookup {
        owners: HashMap<EntityId, Ownership>,
        fail: bool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl OwnerLookup for FixedLookup {
        async fn owner_of(
            &self,
            _resource: Resource,
            id: EntityId,
        ) -> Result<Option<Ownership>, LookupError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(LookupError::Backend("connection reset".to_string()));
            }
            Ok(self.owners.get(&id).copied())
        }
    }

    fn guard(lookup: FixedLookup) -> EntityAccessGuard<FixedLookup> {
        EntityAccessGuard::new(lookup, AuthzConfig::default())
    }

    fn user(role: Role, permissions: Vec<ProjectPermission>) -> User {
        User {
            permissions,
            ..User::new(UserId::new(), role)
        }
    }

    #[tokio::test]
    async fn entity_in_other_project_is_denied() {
        let p1 = ProjectId::new();
        let p2 = ProjectId::new();
        let order = EntityId::new();
        let lookup = FixedLookup {
            owners: HashMap::from([(order, Ownership::Project(p2))]),
            ..Default::default()
        };
        let u = user(Role::User, vec![ProjectPermission::new(p1, AccessLevel::Edit)]);

        let err = guard(lookup)
            .ensure_entity_access(&u, order, Resource::ORDERS, Action::Read)
            .await
            .unwrap_err();
        assert_eq!(err, AuthzError::forbidden(Resource::ORDERS, Action::Read));
    }

    #[tokio::test]
    async fn project_record_owns_itself() {
        let p1 = ProjectId::new();
        let lookup = FixedLookup {
            owners: HashMap::from([(EntityId::from(p1), Ownership::Project(p1))]),
            ..Default::default()
        };
        let u = user(Role::User, vec![ProjectPermission::new(p1, AccessLevel::Edit)]);

        let guard = guard(lookup);
        assert!(
            guard
                .ensure_entity_access(&u, p1.into(), Resource::Projects, Action::Write)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn missing_record_is_not_found_even_for_admin() {
        let admin = user(Role::Admin, vec![]);
        let err = guard(FixedLookup::default())
            .ensure_entity_access(&admin, EntityId::new(), Resource::ORDERS, Action::Read)
            .await
            .unwrap_err();
        assert_eq!(err, AuthzError::NotFound);
    }

    #[tokio::test]
    async fn backend_failure_resolves_to_not_found() {
        let lookup = FixedLookup {
            fail: true,
            ..Default::default()
        };
        let admin = user(Role::Admin, vec![]);
        let err = guard(lookup)
            .ensure_entity_access(&admin, EntityId::new(), Resource::FILES, Action::Read)
            .await
            .unwrap_err();
        assert_eq!(err, AuthzError::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_lookup_times_out_as_not_found() {
        let order = EntityId::new();
        let lookup = FixedLookup {
            owners: HashMap::from([(order, Ownership::Project(ProjectId::new()))]),
            delay: Some(Duration::from_secs(30)),
            ..Default::default()
        };
        let admin = user(Role::Admin, vec![]);
        let err = guard(lookup)
            .ensure_entity_access(&admin, order, Resource::ORDERS, Action::Read)
            .await
            .unwrap_err();
        assert_eq!(err, AuthzError::NotFound);
    }

    #[tokio::test]
    async fn unowned_supplier_uses_module_gate() {
        let supplier = EntityId::new();
        let lookup = FixedLookup {
            owners: HashMap::from([(supplier, Ownership::Unowned)]),
            ..Default::default()
        };
        let p1 = ProjectId::new();
        let reader = user(
            Role::User,
            vec![ProjectPermission::new(p1, AccessLevel::View)],
        );
        let blocked = user(
            Role::User,
            vec![
                ProjectPermission::new(p1, AccessLevel::View)
                    .with_module(ModuleName::Suppliers, AccessLevel::None),
            ],
        );

        let guard = guard(lookup);
        assert!(
            guard
                .ensure_entity_access(&reader, supplier, Resource::SUPPLIERS, Action::Read)
                .await
                .is_ok()
        );
        assert!(
            guard
                .ensure_entity_access(&reader, supplier, Resource::SUPPLIERS, Action::Write)
                .await
                .is_err()
        );
        // The aggregate floor is `view`, so an explicit `none` override still reads.
        assert!(
            guard
                .ensure_entity_access(&blocked, supplier, Resource::SUPPLIERS, Action::Read)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn unresolved_owner_fails_closed() {
        let order = EntityId::new();
        let lookup = FixedLookup {
            owners: HashMap::from([(order, Ownership::Unresolved)]),
            ..Default::default()
        };
        let u = user(
            Role::User,
            vec![ProjectPermission::new(ProjectId::new(), AccessLevel::Edit)],
        );

        let guard = guard(lookup);
        assert!(
            guard
                .ensure_entity_access(&u, order, Resource::ORDERS, Action::Read)
                .await
                .is_err()
        );
        let admin = user(Role::Admin, vec![]);
        assert!(
            guard
                .ensure_entity_access(&admin, order, Resource::ORDERS, Action::Read)
                .await
                .is_ok()
        );
    }
}
