use axum::Router;

use crate::app::AppState;

pub mod decisions;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router<AppState> {
    Router::new().nest("/authz", decisions::router())
}
