use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use migrator_core::execution::executor::ExecutionError;
use serde::Serialize;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`ExecutionError`] for run failures and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A run-scoped error from `migrator_core`.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// JSON error envelope. `output` and `exit_code` are present only when the
/// command actually ran.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl ErrorBody {
    fn new(code: &'static str, error: String) -> Self {
        Self {
            error,
            code,
            output: None,
            exit_code: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Execution(err) => match err {
                ExecutionError::CommandNotFound { .. } => {
                    tracing::error!(error = %err, "Migration command not found");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorBody::new("COMMAND_NOT_FOUND", err.to_string()),
                    )
                }
                ExecutionError::Timeout { .. } => (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorBody::new("COMMAND_TIMEOUT", err.to_string()),
                ),
                ExecutionError::Failed {
                    exit_code,
                    ref output,
                } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: err.to_string(),
                        code: "COMMAND_FAILED",
                        output: Some(output.clone()),
                        exit_code: Some(exit_code),
                    },
                ),
                ExecutionError::Io(ref io) => {
                    tracing::error!(error = %io, "Migration command I/O error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorBody::new("INTERNAL_ERROR", "An internal error occurred".to_string()),
                    )
                }
            },

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", "An internal error occurred".to_string()),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
