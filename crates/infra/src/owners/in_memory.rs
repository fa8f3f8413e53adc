use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use projectguard_auth::{
    CollectionKind, ListFilter, LookupError, OwnerLookup, Ownership, Resource,
};
use projectguard_core::{EntityId, ProjectId};

/// In-memory record owner index for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOwnerStore {
    inner: RwLock<HashMap<(Resource, EntityId), Ownership>>,
}

impl InMemoryOwnerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, resource: Resource, id: EntityId, ownership: Ownership) {
        if let Ok(mut map) = self.inner.write() {
            map.insert((resource, id), ownership);
        }
    }

    pub fn insert_project(&self, project: ProjectId) {
        self.insert(Resource::Projects, project.into(), Ownership::Project(project));
    }

    /// Orders, invoices and files: `project = None` models a dangling reference.
    pub fn insert_owned(&self, resource: Resource, id: EntityId, project: Option<ProjectId>) {
        let ownership = project.map_or(Ownership::Unresolved, Ownership::Project);
        self.insert(resource, id, ownership);
    }

    pub fn insert_supplier(&self, id: EntityId) {
        self.insert(Resource::SUPPLIERS, id, Ownership::Unowned);
    }

    /// Ids in `kind` that pass `filter`. `DenyAll` yields nothing.
    pub fn list(&self, kind: CollectionKind, filter: &ListFilter) -> Vec<EntityId> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let resource = kind.resource();

        let mut ids: Vec<EntityId> = map
            .iter()
            .filter(|((r, _), _)| *r == resource)
            .filter(|(_, ownership)| {
                let project = match ownership {
                    Ownership::Project(p) => Some(*p),
                    Ownership::Unowned | Ownership::Unresolved => None,
                };
                match (kind, filter) {
                    // Suppliers are never filtered row by row.
                    (CollectionKind::Supplier, ListFilter::All) => true,
                    (CollectionKind::Supplier, _) => false,
                    _ => filter.matches(project),
                }
            })
            .map(|((_, id), _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl OwnerLookup for InMemoryOwnerStore {
    async fn owner_of(
        &self,
        resource: Resource,
        id: EntityId,
    ) -> Result<Option<Ownership>, LookupError> {
        let map = self
            .inner
            .read()
            .map_err(|_| LookupError::Backend("owner index lock poisoned".to_string()))?;
        Ok(map.get(&(resource, id)).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use projectguard_auth::FilterField;

    #[tokio::test]
    async fn resolves_owners_per_resource() {
        let store = InMemoryOwnerStore::new();
        let project = ProjectId::new();
        let order = EntityId::new();
        store.insert_project(project);
        store.insert_owned(Resource::ORDERS, order, Some(project));

        assert_eq!(
            store.owner_of(Resource::ORDERS, order).await.unwrap(),
            Some(Ownership::Project(project))
        );
        assert_eq!(
            store.owner_of(Resource::Projects, project.into()).await.unwrap(),
            Some(Ownership::Project(project))
        );
        // Same id under a different resource is a different record.
        assert_eq!(store.owner_of(Resource::INVOICES, order).await.unwrap(), None);
    }

    #[test]
    fn list_applies_row_filter() {
        let store = InMemoryOwnerStore::new();
        let p1 = ProjectId::new();
        let p2 = ProjectId::new();
        let in_p1 = EntityId::new();
        let in_p2 = EntityId::new();
        let dangling = EntityId::new();
        store.insert_owned(Resource::ORDERS, in_p1, Some(p1));
        store.insert_owned(Resource::ORDERS, in_p2, Some(p2));
        store.insert_owned(Resource::ORDERS, dangling, None);

        let filter = ListFilter::ProjectIn {
            field: FilterField::ProjectId,
            project_ids: BTreeSet::from([p1]),
        };
        assert_eq!(store.list(CollectionKind::Order, &filter), vec![in_p1]);
        assert_eq!(store.list(CollectionKind::Order, &ListFilter::All).len(), 3);
        assert!(store.list(CollectionKind::Order, &ListFilter::DenyAll).is_empty());
    }

    #[test]
    fn suppliers_list_all_or_nothing() {
        let store = InMemoryOwnerStore::new();
        store.insert_supplier(EntityId::new());
        store.insert_supplier(EntityId::new());

        assert_eq!(store.list(CollectionKind::Supplier, &ListFilter::All).len(), 2);
        assert!(store.list(CollectionKind::Supplier, &ListFilter::DenyAll).is_empty());
    }
}
