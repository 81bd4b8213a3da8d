use std::sync::Arc;

use crate::config::ServerConfig;
use crate::migration::service::MigrationService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Single-flight migration runner (owns the execution gate).
    pub migration: Arc<MigrationService>,
}

impl AppState {
    /// Build state from configuration, creating a fresh execution gate.
    pub fn from_config(config: ServerConfig) -> Self {
        let migration = MigrationService::new(config.execution_request(), config.run_timeout());
        Self {
            config: Arc::new(config),
            migration: Arc::new(migration),
        }
    }
}
