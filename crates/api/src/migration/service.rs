//! Central migration service.
//!
//! Coordinates a single run of the configured migration command for one HTTP
//! request. Held in [`AppState`](crate::state::AppState) as an
//! `Arc<MigrationService>`.

use std::time::Duration;

use migrator_core::execution::executor::{ExecutionRequest, ExecutionResult, GatedExecutor};
use migrator_core::execution::gate::ExecutionGate;

use crate::error::{AppError, AppResult};

/// Runs the migration command for HTTP callers, one at a time.
///
/// Lifecycle of a run:
/// 1. Resolve the command on `PATH` (fails fast, gate untouched).
/// 2. Wait for the process-wide [`ExecutionGate`].
/// 3. Execute the fixed command line, capturing combined output.
/// 4. Release the gate.
/// 5. Map a non-zero exit to an error for this caller only.
pub struct MigrationService {
    executor: GatedExecutor,
}

impl MigrationService {
    pub fn new(request: ExecutionRequest, timeout: Option<Duration>) -> Self {
        Self::with_gate(request, ExecutionGate::new(), timeout)
    }

    /// Build a service around an existing gate.
    pub fn with_gate(request: ExecutionRequest, gate: ExecutionGate, timeout: Option<Duration>) -> Self {
        Self {
            executor: GatedExecutor::new(request, gate, timeout),
        }
    }

    pub fn request(&self) -> &ExecutionRequest {
        self.executor.request()
    }

    pub fn gate(&self) -> &ExecutionGate {
        self.executor.gate()
    }

    /// Execute one gated run.
    ///
    /// The run is detached onto its own task: if the HTTP client goes away the
    /// subprocess still finishes and releases the gate normally.
    pub async fn run(&self) -> AppResult<ExecutionResult> {
        let executor = self.executor.clone();
        let handle = tokio::spawn(async move { executor.run().await });

        match handle.await {
            Ok(result) => {
                if let Err(e) = &result {
                    tracing::warn!(
                        command = %self.request().command,
                        error = %e,
                        "Migration run failed",
                    );
                }
                Ok(result?)
            }
            Err(join_err) => Err(AppError::InternalError(format!(
                "Migration task failed: {join_err}"
            ))),
        }
    }
}
