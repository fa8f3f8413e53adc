//! Decision endpoints consulted by the services that own the records.
//!
//! Each handler answers with `204` (allowed), `403` (denied) or `404` (record
//! missing), or returns the requested scope/filter/explanation as JSON.

use std::collections::HashMap;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, get},
};
use projectguard_auth::{Action, explain_decision};
use projectguard_core::{EntityId, ProjectId};

use crate::app::{AppState, dto, errors};
use crate::authz::{self, BodyJson, Identifier, ResourceGuard};
use crate::context::RequestContext;

const PROJECT_ID_KEY: &str = "projectId";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scope", get(current_scope))
        .route("/explain", get(explain))
        .route("/filters/:collection", get(list_filter))
        .route("/operations/:resource", any(check_operation))
        .route("/entities/:resource/:id", any(check_entity))
}

/// GET /authz/scope - the caller's aggregated scope for this request
pub async fn current_scope(Extension(ctx): Extension<RequestContext>) -> Response {
    let body = dto::ScopeResponse {
        user_id: ctx.user().id,
        role: ctx.user().role,
        action: ctx.action(),
        scope: ctx.scope(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// GET /authz/explain?resource=&projectId=&action= - why a decision comes out the way it does
pub async fn explain(
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<dto::ExplainQuery>,
) -> Response {
    let resource = match errors::parse_resource(&q.resource) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let action = match q.action.as_deref().map(str::parse::<Action>) {
        None => Action::Read,
        Some(Ok(a)) => a,
        Some(Err(_)) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_action",
                "action must be one of: read, write, delete",
            );
        }
    };
    let project: ProjectId = match q.project_id.parse() {
        Ok(p) => p,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_project_id", "invalid project id");
        }
    };

    let explanation = explain_decision(ctx.user(), project, resource, action);
    (StatusCode::OK, Json(explanation)).into_response()
}

/// GET /authz/filters/:collection - restriction to AND into a list query
pub async fn list_filter(
    Extension(ctx): Extension<RequestContext>,
    Path(collection): Path<String>,
) -> Response {
    let kind = match errors::parse_collection(&collection) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match authz::list_filter(&ctx, kind) {
        Ok(filter) => (
            StatusCode::OK,
            Json(dto::FilterResponse {
                collection: kind,
                filter,
            }),
        )
            .into_response(),
        Err(e) => errors::authz_error_to_response(e),
    }
}

/// ANY /authz/operations/:resource - coarse check for the request's method,
/// narrowed to a project when `projectId` is sent in the body or query.
pub async fn check_operation(
    Extension(ctx): Extension<RequestContext>,
    Path(resource): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let guard = match errors::parse_resource(&resource).map(ResourceGuard::from) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    let body = authz::parse_body(&body);
    let body = match &body {
        Ok(json) => BodyJson::from(json.as_ref()),
        Err(_) => BodyJson::Invalid,
    };

    let result = match authz::resolve_identifier(&HashMap::new(), body, &query, PROJECT_ID_KEY) {
        Identifier::Missing => guard.require_op(&ctx),
        raw => authz::require_identifier::<ProjectId>(raw, guard.resource(), &ctx)
            .and_then(|project| guard.require_op_in(&ctx, project)),
    };

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::authz_error_to_response(e),
    }
}

/// ANY /authz/entities/:resource/:id - per-record check for the request's method
pub async fn check_entity(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    let guard = match errors::parse_resource(&resource).map(ResourceGuard::from) {
        Ok(g) => g,
        Err(resp) => return resp,
    };

    let result = async {
        let id: EntityId = authz::require_identifier(Identifier::Present(id), guard.resource(), &ctx)?;
        guard.ensure_entity(&ctx, &state.entities, id).await
    }
    .await;

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::authz_error_to_response(e),
    }
}
