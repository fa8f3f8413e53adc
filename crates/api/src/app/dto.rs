use serde::{Deserialize, Serialize};

use projectguard_auth::{Action, CollectionKind, ListFilter, Role, Scope};
use projectguard_core::UserId;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub resource: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    /// Defaults to `read`.
    pub action: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ScopeResponse<'a> {
    pub user_id: UserId,
    pub role: Role,
    pub action: Action,
    pub scope: &'a Scope,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub collection: CollectionKind,
    pub filter: ListFilter,
}
