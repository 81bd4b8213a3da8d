use std::path::PathBuf;
use std::time::Duration;

use migrator_core::execution::executor::ExecutionRequest;
use migrator_core::interpolate::substitute::DEFAULT_TEMPLATE_PATTERN;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables (or a `.env` file).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `7777`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `900`).
    pub request_timeout_secs: u64,
    /// Migration command name (default: `cassandra-migrate`).
    pub migration_command: String,
    /// Fixed arguments for the migration command (default: `migrate`).
    pub migration_args: Vec<String>,
    /// Subprocess timeout in seconds; `0` disables it (default: `600`).
    pub run_timeout_secs: u64,
    /// Template tree to interpolate at startup. Skipped when unset.
    pub template_root: Option<PathBuf>,
    /// Glob selecting template files (default: `*.cql`).
    pub template_pattern: String,
    /// URL of the JSON credentials document. Skipped when unset.
    pub config_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default             |
    /// |------------------------|---------------------|
    /// | `HOST`                 | `0.0.0.0`           |
    /// | `PORT`                 | `7777`              |
    /// | `REQUEST_TIMEOUT_SECS` | `900`               |
    /// | `MIGRATION_COMMAND`    | `cassandra-migrate` |
    /// | `MIGRATION_ARGS`       | `migrate`           |
    /// | `RUN_TIMEOUT_SECS`     | `600`               |
    /// | `TEMPLATE_ROOT`        | unset               |
    /// | `TEMPLATE_PATTERN`     | `*.cql`             |
    /// | `CONFIG_URL`           | unset               |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "7777".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let migration_command =
            std::env::var("MIGRATION_COMMAND").unwrap_or_else(|_| "cassandra-migrate".into());

        let migration_args = split_args(
            &std::env::var("MIGRATION_ARGS").unwrap_or_else(|_| "migrate".into()),
        );

        let run_timeout_secs: u64 = std::env::var("RUN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("RUN_TIMEOUT_SECS must be a valid u64");

        let template_root = non_empty_var("TEMPLATE_ROOT").map(PathBuf::from);

        let template_pattern = std::env::var("TEMPLATE_PATTERN")
            .unwrap_or_else(|_| DEFAULT_TEMPLATE_PATTERN.into());

        let config_url = non_empty_var("CONFIG_URL");

        Self {
            host,
            port,
            request_timeout_secs,
            migration_command,
            migration_args,
            run_timeout_secs,
            template_root,
            template_pattern,
            config_url,
        }
    }

    /// The fixed command line every run executes.
    pub fn execution_request(&self) -> ExecutionRequest {
        ExecutionRequest::new(self.migration_command.clone(), self.migration_args.clone())
    }

    /// Subprocess timeout, `None` when disabled.
    pub fn run_timeout(&self) -> Option<Duration> {
        (self.run_timeout_secs > 0).then(|| Duration::from_secs(self.run_timeout_secs))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a whitespace-separated argument list. No quoting support.
fn split_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
