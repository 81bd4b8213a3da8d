//! Integration tests for the serialized `/run` endpoint.
//!
//! Covers successful output capture, JSON escaping of raw output, per-request
//! failure isolation, and mutual exclusion across concurrent runs while the
//! health probe stays responsive.

mod common;

use std::time::{Duration, Instant};

use axum::http::{header, StatusCode};
use common::{body_json, get};

// ---------------------------------------------------------------------------
// Test: GET /run returns the command output
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_returns_command_output() {
    let app = common::build_test_app("echo", &["-n", "test"]);
    let response = get(app, "/run").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({ "output": "test" }));
}

// ---------------------------------------------------------------------------
// Test: quotes, backslashes and newlines in output stay valid JSON
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_output_is_json_escaped() {
    let app = common::build_test_app("printf", &[r#"say "hi"\n\tback\\slash"#]);
    let response = get(app, "/run").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["output"], "say \"hi\"\n\tback\\slash");
}

// ---------------------------------------------------------------------------
// Test: stderr is part of the combined output
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_output_includes_stderr() {
    let app = common::build_test_app("sh", &["-c", "echo applied; echo warning >&2"]);
    let response = get(app, "/run").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let output = json["output"].as_str().unwrap();
    assert!(output.contains("applied\n"), "got {output:?}");
    assert!(output.contains("warning\n"), "got {output:?}");
}

// ---------------------------------------------------------------------------
// Test: a missing command fails the request but not the service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_command_fails_request_and_service_survives() {
    let app = common::build_test_app("definitely-not-a-migrator-xyz", &[]);

    let response = get(app.clone(), "/run").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "COMMAND_NOT_FOUND");

    let response = get(app.clone(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "alive": true }));

    // The gate was never taken, so a second run fails the same way, promptly.
    let response = tokio::time::timeout(Duration::from_secs(2), get(app, "/run"))
        .await
        .expect("second run must not block");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ---------------------------------------------------------------------------
// Test: a non-zero exit is reported with its output
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failing_command_reports_output_and_exit_code() {
    let app = common::build_test_app("sh", &["-c", "echo 'keyspace missing'; exit 3"]);

    let response = get(app.clone(), "/run").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "COMMAND_FAILED");
    assert_eq!(json["exit_code"], 3);
    assert_eq!(json["output"], "keyspace missing\n");

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: concurrent runs serialize; health stays immediate
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_are_serialized_while_health_stays_responsive() {
    let sleep = Duration::from_secs(1);
    let app = common::build_test_app("sleep", &["1"]);
    let start = Instant::now();

    let run_a = tokio::spawn(get(app.clone(), "/run"));
    let run_b = tokio::spawn(get(app.clone(), "/run"));

    // Probe health while at least one run holds the gate.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let probe_start = Instant::now();
    let health = get(app.clone(), "/health").await;
    let probe_elapsed = probe_start.elapsed();

    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(body_json(health).await, serde_json::json!({ "alive": true }));
    assert!(
        probe_elapsed < Duration::from_millis(500),
        "health blocked behind a run: {probe_elapsed:?}"
    );

    let a = run_a.await.unwrap();
    let a_done = start.elapsed();
    let b = run_b.await.unwrap();
    let b_done = start.elapsed();

    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);

    let total = a_done.max(b_done);
    assert!(
        total >= sleep * 2,
        "concurrent runs overlapped: finished after {total:?}"
    );
}
