//! Migration run endpoint.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Successful run payload.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    /// Combined stdout/stderr of the migration command.
    pub output: String,
}

/// GET /run
///
/// Waits for the execution gate, runs the configured command and returns its
/// combined output. Failures are reported to this caller only.
async fn run_migration(State(state): State<AppState>) -> AppResult<Json<RunResponse>> {
    let result = state.migration.run().await?;
    Ok(Json(RunResponse {
        output: result.output_lossy(),
    }))
}

/// Mount the run route.
pub fn router() -> Router<AppState> {
    Router::new().route("/run", get(run_migration))
}
