//! HTTP API application wiring (Axum router + state).
//!
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Router, routing::get};

use projectguard_auth::{AuthzConfig, EntityAccessGuard, OwnerLookup};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Owner lookup as seen by the handlers.
pub type SharedLookup = Arc<dyn OwnerLookup>;

#[derive(Clone)]
pub struct AppState {
    pub entities: Arc<EntityAccessGuard<SharedLookup>>,
}

impl AppState {
    pub fn new(lookup: SharedLookup, config: AuthzConfig) -> Self {
        Self {
            entities: Arc::new(EntityAccessGuard::new(lookup, config)),
        }
    }

    /// State configured from the environment (`AUTHZ_LOOKUP_TIMEOUT_MS`).
    pub fn from_env(lookup: SharedLookup) -> Self {
        Self::new(lookup, AuthzConfig::from_env())
    }
}

/// Build the full HTTP router.
///
/// The authentication layer wrapping this router must insert the verified
/// `User` snapshot into the request extensions.
pub fn build_app(state: AppState) -> Router {
    let protected = routes::router()
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::authorization_context));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
