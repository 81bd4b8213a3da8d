//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, get};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with {"alive": true}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_alive() {
    let app = common::build_test_app("echo", &["-n", "test"]);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({ "alive": true }));
}

// ---------------------------------------------------------------------------
// Test: health does not depend on the migration command existing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_ignores_missing_command() {
    let app = common::build_test_app("definitely-not-a-migrator-xyz", &[]);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app("echo", &[]);
    let response = get(app, "/non-existent").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app("echo", &[]);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}
