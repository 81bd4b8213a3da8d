//! Startup bootstrap: credential fetch and template interpolation.
//!
//! Runs before the listener is bound, so no `/run` request can observe a
//! template mid-rewrite.

use std::path::Path;

use migrator_core::error::InterpolateError;
use migrator_core::interpolate::driver::{interpolate_all, InterpolationReport};
use migrator_core::interpolate::substitute::{ExtensionFilter, TemplateSubstitutor};
use migrator_core::interpolate::PlaceholderBinding;
use serde::Deserialize;

use crate::config::ServerConfig;

/// Placeholder key for the database user name.
pub const USER_NAME_KEY: &str = "userName";
/// Placeholder key for the database password.
pub const PASSWORD_KEY: &str = "password";

/// Credentials document served by the remote configuration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationCredentials {
    pub user_name: String,
    pub password: String,
}

impl MigrationCredentials {
    /// Bindings for the `${userName}` and `${password}` placeholders.
    pub fn bindings(&self) -> Vec<PlaceholderBinding> {
        vec![
            PlaceholderBinding::new(USER_NAME_KEY, self.user_name.clone()),
            PlaceholderBinding::new(PASSWORD_KEY, self.password.clone()),
        ]
    }
}

/// Startup failures. Each one aborts the process before serving.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Failed to fetch credentials from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Template interpolation failed: {0}")]
    Interpolate(#[from] InterpolateError),

    #[error("Interpolation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// GET `url` and decode a `{"userName": .., "password": ..}` document.
///
/// Non-2xx responses and malformed bodies are errors.
pub async fn fetch_credentials(
    client: &reqwest::Client,
    url: &str,
) -> Result<MigrationCredentials, BootstrapError> {
    let fetch_err = |source: reqwest::Error| BootstrapError::Fetch {
        url: url.to_string(),
        source,
    };

    client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_err)?
        .json::<MigrationCredentials>()
        .await
        .map_err(fetch_err)
}

/// Stamp `bindings` into every template under `root`.
///
/// The walk is blocking filesystem work, so it runs on the blocking pool.
pub async fn interpolate_templates(
    root: &Path,
    filter: ExtensionFilter,
    bindings: Vec<PlaceholderBinding>,
) -> Result<InterpolationReport, BootstrapError> {
    let root = root.to_path_buf();
    let substitutor = TemplateSubstitutor::new(filter);

    let report =
        tokio::task::spawn_blocking(move || interpolate_all(&root, &bindings, &substitutor))
            .await??;

    Ok(report)
}

/// Run the configured startup steps.
///
/// Does nothing unless both `TEMPLATE_ROOT` and `CONFIG_URL` are set: the
/// credentials fetched from `CONFIG_URL` are stamped into the template tree.
pub async fn run(config: &ServerConfig) -> Result<Option<InterpolationReport>, BootstrapError> {
    let Some(root) = config.template_root.as_deref() else {
        tracing::info!("TEMPLATE_ROOT not set, skipping template interpolation");
        return Ok(None);
    };

    let Some(url) = config.config_url.as_deref() else {
        tracing::warn!(
            root = %root.display(),
            "CONFIG_URL not set, templates left uninterpolated"
        );
        return Ok(None);
    };

    // Validate the pattern before any network round-trip.
    let filter = ExtensionFilter::new(&config.template_pattern)?;

    tracing::info!(%url, pattern = filter.as_str(), "Fetching migration credentials");
    let credentials = fetch_credentials(&reqwest::Client::new(), url).await?;

    let report = interpolate_templates(root, filter, credentials.bindings()).await?;
    tracing::info!(
        root = %root.display(),
        files_visited = report.files_visited,
        "Templates interpolated",
    );
    Ok(Some(report))
}
