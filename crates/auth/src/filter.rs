//! Query restrictions for list endpoints.
//!
//! Projects and orders are filtered row by row. Suppliers carry no project
//! reference, so they can only be gated as a whole: a restricted scope yields
//! either "no restriction" or "deny all", never a partial id list.

use std::collections::BTreeSet;

use serde::Serialize;

use projectguard_core::ProjectId;

use crate::{Action, AuthzError, Resource, Scope, allow_by_op};

/// Collections that support listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Project,
    Order,
    Supplier,
}

impl CollectionKind {
    pub fn resource(&self) -> Resource {
        match self {
            CollectionKind::Project => Resource::Projects,
            CollectionKind::Order => Resource::ORDERS,
            CollectionKind::Supplier => Resource::SUPPLIERS,
        }
    }
}

/// Field a row-level restriction applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    /// The record's own id (projects).
    Id,
    /// The record's owning project (orders).
    ProjectId,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Id => "id",
            FilterField::ProjectId => "project_id",
        }
    }
}

/// Fragment to AND into a list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListFilter {
    /// No restriction.
    All,
    /// `field IN project_ids`.
    ProjectIn {
        field: FilterField,
        project_ids: BTreeSet<ProjectId>,
    },
    /// The caller must refuse the whole listing.
    DenyAll,
}

impl ListFilter {
    pub fn is_deny_all(&self) -> bool {
        matches!(self, ListFilter::DenyAll)
    }

    /// Whether a record whose filtered field holds `value` passes the filter.
    pub fn matches(&self, value: Option<ProjectId>) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::ProjectIn { project_ids, .. } => {
                value.is_some_and(|id| project_ids.contains(&id))
            }
            ListFilter::DenyAll => false,
        }
    }

    /// Turn `DenyAll` into a `Forbidden` error for callers that refuse the listing.
    pub fn into_result(self, kind: CollectionKind) -> Result<ListFilter, AuthzError> {
        match self {
            ListFilter::DenyAll => Err(AuthzError::forbidden(kind.resource(), Action::Read)),
            other => Ok(other),
        }
    }
}

pub fn build_list_filter(scope: &Scope, kind: CollectionKind) -> ListFilter {
    let restricted = match scope {
        Scope::Unrestricted => return ListFilter::All,
        Scope::Restricted(r) => r,
    };

    match kind {
        CollectionKind::Project => ListFilter::ProjectIn {
            field: FilterField::Id,
            project_ids: restricted.project_ids.clone(),
        },
        CollectionKind::Order => ListFilter::ProjectIn {
            field: FilterField::ProjectId,
            project_ids: restricted.project_ids.clone(),
        },
        CollectionKind::Supplier => {
            if allow_by_op(restricted.level(Resource::SUPPLIERS), Action::Read) {
                ListFilter::All
            } else {
                ListFilter::DenyAll
            }
        }
    }
}
