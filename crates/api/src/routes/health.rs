use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Liveness response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub alive: bool,
}

/// GET /health -- always alive; no shared state is touched.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { alive: true })
}

/// Mount the liveness route.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
