//! Gated execution of the configured migration command.
//!
//! Defines [`ExecutionRequest`], [`ExecutionResult`] and [`ExecutionError`],
//! plus [`GatedExecutor`], which resolves the command, holds the
//! [`ExecutionGate`] for the lifetime of the subprocess, and turns a non-zero
//! exit into an error.

use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;

use super::gate::ExecutionGate;
use super::subprocess;

/// The fixed command line run on every invocation. Set once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Command name looked up on `PATH` (or an explicit path).
    pub command: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
}

impl ExecutionRequest {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Locate the executable, like a shell would.
    pub fn resolve(&self) -> Result<PathBuf, ExecutionError> {
        which::which(&self.command).map_err(|source| ExecutionError::CommandNotFound {
            command: self.command.clone(),
            source,
        })
    }
}

/// Output of a finished subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Interleaved stdout and stderr.
    pub output: Vec<u8>,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Output as text; invalid UTF-8 is replaced.
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Errors scoped to a single run. None of them affect other runs.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The command could not be found on `PATH`.
    #[error("Command not found: {command}")]
    CommandNotFound {
        command: String,
        #[source]
        source: which::Error,
    },

    /// The command exceeded its timeout and was killed.
    #[error("Command timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The command ran and exited non-zero.
    #[error("Command failed with exit code {exit_code}")]
    Failed {
        exit_code: i32,
        /// Combined output, kept for diagnostics.
        output: String,
    },

    /// Spawning or waiting on the process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs one [`ExecutionRequest`] at a time behind an [`ExecutionGate`].
#[derive(Debug, Clone)]
pub struct GatedExecutor {
    request: ExecutionRequest,
    gate: ExecutionGate,
    timeout: Option<Duration>,
}

impl GatedExecutor {
    pub fn new(request: ExecutionRequest, gate: ExecutionGate, timeout: Option<Duration>) -> Self {
        Self {
            request,
            gate,
            timeout,
        }
    }

    pub fn request(&self) -> &ExecutionRequest {
        &self.request
    }

    pub fn gate(&self) -> &ExecutionGate {
        &self.gate
    }

    /// Resolve, wait for the gate, run, release.
    ///
    /// Resolution happens before the gate is touched, so a missing binary
    /// fails fast without queueing. The permit is dropped as soon as the
    /// subprocess finishes, on success and on every error path.
    pub async fn run(&self) -> Result<ExecutionResult, ExecutionError> {
        let binary = self.request.resolve()?;

        let result = {
            let _permit = self.gate.acquire().await;
            tracing::info!(
                command = %binary.display(),
                args = ?self.request.args,
                "Running migration command",
            );
            let mut cmd = Command::new(&binary);
            cmd.args(&self.request.args);
            subprocess::run_command(&mut cmd, self.timeout).await
        }?;

        tracing::info!(
            command = %self.request.command,
            exit_code = result.exit_code,
            duration_ms = result.duration_ms,
            "Migration command finished",
        );

        if !result.success() {
            return Err(ExecutionError::Failed {
                exit_code: result.exit_code,
                output: result.output_lossy(),
            });
        }

        Ok(result)
    }
}
