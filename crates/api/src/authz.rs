//! API-side authorization guards.
//!
//! Thin adapters from the request context to the checks in
//! `projectguard-auth`; every handler goes through these so the coarse and
//! the per-entity paths see the same `Action`.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{extract::State, http::Request, middleware::Next, response::Response};
use serde_json::Value as JsonValue;

use projectguard_auth::{
    AuthzError, CollectionKind, EntityAccessGuard, ListFilter, OwnerLookup, Resource,
    build_list_filter, extract_project_scope, require_op,
};
use projectguard_core::{EntityId, ProjectId};

use crate::app::errors::ApiError;
use crate::context::RequestContext;

/// Guard bound to one resource, resolved when routes are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceGuard {
    resource: Resource,
}

impl ResourceGuard {
    /// Fails with `Misconfigured` for names outside the known resource set,
    /// so a bad registration stops router construction.
    pub fn new(name: &str) -> Result<Self, AuthzError> {
        Ok(Self {
            resource: name.parse()?,
        })
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Coarse check against the request's aggregated scope.
    pub fn require_op(&self, ctx: &RequestContext) -> Result<(), AuthzError> {
        require_op(ctx.user(), ctx.scope(), self.resource, ctx.action())
    }

    /// Coarse check once the target project is known.
    pub fn require_op_in(&self, ctx: &RequestContext, project: ProjectId) -> Result<(), AuthzError> {
        let scope = extract_project_scope(ctx.user(), project);
        require_op(ctx.user(), &scope, self.resource, ctx.action())
    }

    pub async fn ensure_entity<L: OwnerLookup>(
        &self,
        ctx: &RequestContext,
        guard: &EntityAccessGuard<L>,
        id: EntityId,
    ) -> Result<(), AuthzError> {
        guard
            .ensure_entity_access(ctx.user(), id, self.resource, ctx.action())
            .await
    }
}

impl From<Resource> for ResourceGuard {
    fn from(resource: Resource) -> Self {
        Self { resource }
    }
}

/// Filter for a list endpoint; a deny-all outcome is returned as `Forbidden`.
pub fn list_filter(ctx: &RequestContext, kind: CollectionKind) -> Result<ListFilter, AuthzError> {
    build_list_filter(ctx.scope(), kind).into_result(kind)
}

/// Middleware form of [`ResourceGuard::require_op`] for whole routers.
pub async fn require_operation(
    State(guard): State<ResourceGuard>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .ok_or(ApiError(AuthzError::Unauthenticated))?;
    guard.require_op(ctx)?;
    Ok(next.run(req).await)
}

// ─────────────────────────────────────────────────────────────────────────────
// Identifier resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of looking an identifier up in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Missing,
    Present(String),
    /// The key was sent but its value is not a string, or the body could
    /// not be read. Never falls through to a lower-precedence source.
    Malformed,
}

/// Request body as seen by identifier resolution.
#[derive(Debug, Clone, Copy)]
pub enum BodyJson<'a> {
    Empty,
    Json(&'a JsonValue),
    Invalid,
}

impl<'a> From<Option<&'a JsonValue>> for BodyJson<'a> {
    fn from(body: Option<&'a JsonValue>) -> Self {
        body.map_or(BodyJson::Empty, BodyJson::Json)
    }
}

/// Parse a raw request body; blank bytes are no body, anything else must be JSON.
pub fn parse_body(bytes: &[u8]) -> Result<Option<JsonValue>, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes).map(Some)
}

/// Pick `key` from route params, then the JSON body, then the query string.
pub fn resolve_identifier<'a>(
    route: &HashMap<String, String>,
    body: impl Into<BodyJson<'a>>,
    query: &HashMap<String, String>,
    key: &str,
) -> Identifier {
    if let Some(v) = route.get(key) {
        return Identifier::Present(v.clone());
    }
    match body.into() {
        BodyJson::Invalid => return Identifier::Malformed,
        BodyJson::Json(b) => match b.get(key) {
            Some(JsonValue::String(v)) => return Identifier::Present(v.clone()),
            Some(_) => return Identifier::Malformed,
            None => {}
        },
        BodyJson::Empty => {}
    }
    match query.get(key) {
        Some(v) => Identifier::Present(v.clone()),
        None => Identifier::Missing,
    }
}

/// Parse a required identifier; absent or malformed values deny.
pub fn require_identifier<T: FromStr>(
    raw: Identifier,
    resource: Resource,
    ctx: &RequestContext,
) -> Result<T, AuthzError> {
    let parsed = match raw {
        Identifier::Present(s) => s.parse().ok(),
        Identifier::Missing | Identifier::Malformed => None,
    };
    parsed.ok_or_else(|| AuthzError::forbidden(resource, ctx.action()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn route_params_take_precedence_over_body_and_query() {
        let body = json!({ "projectId": "from-body" });
        let route = map(&[("projectId", "from-route")]);
        let query = map(&[("projectId", "from-query")]);

        assert_eq!(
            resolve_identifier(&route, Some(&body), &query, "projectId"),
            Identifier::Present("from-route".into())
        );
        assert_eq!(
            resolve_identifier(&HashMap::new(), Some(&body), &query, "projectId"),
            Identifier::Present("from-body".into())
        );
        assert_eq!(
            resolve_identifier(&HashMap::new(), BodyJson::Empty, &query, "projectId"),
            Identifier::Present("from-query".into())
        );
        assert_eq!(
            resolve_identifier(&HashMap::new(), BodyJson::Empty, &HashMap::new(), "projectId"),
            Identifier::Missing
        );
    }

    #[test]
    fn non_string_body_values_are_malformed() {
        let query = map(&[("projectId", "from-query")]);
        for body in [json!({ "projectId": 42 }), json!({ "projectId": ["x"] }), json!({ "projectId": null })] {
            assert_eq!(
                resolve_identifier(&HashMap::new(), Some(&body), &query, "projectId"),
                Identifier::Malformed
            );
        }
    }

    #[test]
    fn unreadable_body_is_malformed() {
        let query = map(&[("projectId", "from-query")]);
        assert_eq!(
            resolve_identifier(&HashMap::new(), BodyJson::Invalid, &query, "projectId"),
            Identifier::Malformed
        );
    }

    #[test]
    fn body_without_the_key_falls_through_to_query() {
        let body = json!({ "name": "x" });
        let query = map(&[("projectId", "from-query")]);
        assert_eq!(
            resolve_identifier(&HashMap::new(), Some(&body), &query, "projectId"),
            Identifier::Present("from-query".into())
        );
    }

    #[test]
    fn parse_body_distinguishes_empty_and_invalid() {
        assert_eq!(parse_body(b"").unwrap(), None);
        assert_eq!(parse_body(b"  \n").unwrap(), None);
        assert_eq!(parse_body(br#"{"a":1}"#).unwrap(), Some(json!({ "a": 1 })));
        assert!(parse_body(b"projectId=1").is_err());
    }

    #[test]
    fn unknown_resource_fails_registration() {
        assert!(ResourceGuard::new("orders").is_ok());
        assert!(matches!(
            ResourceGuard::new("timesheets"),
            Err(AuthzError::Misconfigured(_))
        ));
    }
}
