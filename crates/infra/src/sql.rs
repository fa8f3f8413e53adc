//! Rendering of `ListFilter` into Postgres `WHERE` fragments.

use sqlx::{Postgres, QueryBuilder};

use projectguard_auth::{Action, AuthzError, CollectionKind, ListFilter};

/// Push a boolean expression for `filter` onto `builder`.
///
/// The caller places it after `WHERE` or `AND`. `DenyAll` pushes nothing and
/// returns `Forbidden`, so the listing is refused instead of run.
pub fn push_list_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    kind: CollectionKind,
    filter: &ListFilter,
) -> Result<(), AuthzError> {
    match filter {
        ListFilter::All => {
            builder.push("TRUE");
        }
        ListFilter::ProjectIn { project_ids, .. } if project_ids.is_empty() => {
            builder.push("FALSE");
        }
        ListFilter::ProjectIn { field, project_ids } => {
            builder.push(field.column()).push(" IN (");
            let mut separated = builder.separated(", ");
            for id in project_ids {
                separated.push_bind(*id.as_uuid());
            }
            separated.push_unseparated(")");
        }
        ListFilter::DenyAll => {
            return Err(AuthzError::forbidden(kind.resource(), Action::Read));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use projectguard_auth::{FilterField, Resource};
    use projectguard_core::ProjectId;

    fn orders_query() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new("SELECT id FROM orders WHERE ")
    }

    #[test]
    fn renders_id_list_with_bind_parameters() {
        let mut qb = orders_query();
        let filter = ListFilter::ProjectIn {
            field: FilterField::ProjectId,
            project_ids: BTreeSet::from([ProjectId::new(), ProjectId::new()]),
        };

        push_list_filter(&mut qb, CollectionKind::Order, &filter).unwrap();
        assert_eq!(qb.sql(), "SELECT id FROM orders WHERE project_id IN ($1, $2)");
    }

    #[test]
    fn empty_id_list_matches_nothing() {
        let mut qb = QueryBuilder::new("SELECT id FROM projects WHERE ");
        let filter = ListFilter::ProjectIn {
            field: FilterField::Id,
            project_ids: BTreeSet::new(),
        };

        push_list_filter(&mut qb, CollectionKind::Project, &filter).unwrap();
        assert_eq!(qb.sql(), "SELECT id FROM projects WHERE FALSE");
    }

    #[test]
    fn deny_all_refuses_the_listing() {
        let mut qb = QueryBuilder::new("SELECT id FROM suppliers WHERE ");
        let err = push_list_filter(&mut qb, CollectionKind::Supplier, &ListFilter::DenyAll)
            .unwrap_err();

        assert_eq!(err, AuthzError::forbidden(Resource::SUPPLIERS, Action::Read));
        assert_eq!(qb.sql(), "SELECT id FROM suppliers WHERE ");
    }
}
