pub mod health;
pub mod migration;

use axum::Router;

use crate::state::AppState;

/// Build the root route tree.
///
/// ```text
/// GET /health      liveness probe, never touches the execution gate
/// GET /run         run the migration command (serialized)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(migration::router())
}
