#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use migrator_api::config::ServerConfig;
use migrator_api::router::build_app_router;
use migrator_api::state::AppState;

/// Build a test `ServerConfig` running `command` with `args`.
///
/// No template root, no credentials URL, a 30-second request timeout and a
/// 10-second subprocess timeout.
pub fn test_config(command: &str, args: &[&str]) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        migration_command: command.to_string(),
        migration_args: args.iter().map(|a| a.to_string()).collect(),
        run_timeout_secs: 10,
        template_root: None,
        template_pattern: "*.cql".to_string(),
        config_url: None,
    }
}

/// Build the full application router for `command args...`.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack (request ID, timeout, tracing, panic
/// recovery).
pub fn build_test_app(command: &str, args: &[&str]) -> Router {
    build_app_router(AppState::from_config(test_config(command, args)))
}

/// Issue a GET against `app`.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}
