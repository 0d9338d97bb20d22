//! HTTP-level tests: drive the router with oneshot requests against the mock
//! generator, one block per mode.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use stepflow_server::llm::MockGenerator;
use stepflow_server::{build_app, Mode};

fn app(mode: Mode) -> Router {
    // db_path is only touched in durable mode.
    let path = std::env::temp_dir().join(format!(
        "stepflow-api-test-{}-{}.db",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    build_app(mode, Arc::new(MockGenerator::new()), &path).expect("app builds")
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");
    let response = app.clone().oneshot(request).await.expect("handler runs");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (status, value)
}

/// **Scenario**: ephemeral mode happy path. /start generates the joke and
/// suspends; /continue completes with the explanation; /status reflects the
/// completed thread.
#[tokio::test]
async fn ephemeral_start_continue_status() {
    let app = app(Mode::Ephemeral);

    let (code, body) = post_json(
        &app,
        "/start",
        json!({ "topic": "cats", "thread_id": "t-1" }),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["completed"], json!(false));
    assert_eq!(body["pending_node"], json!("generate_explanation"));
    assert!(body["state"]["joke"].as_str().unwrap().contains("cats"));
    assert!(body["state"]["explanation"].is_null());

    let (code, body) = post_json(&app, "/continue", json!({ "thread_id": "t-1" })).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["completed"], json!(true));
    assert!(body["state"]["explanation"].is_string());
    assert_eq!(body["state"]["status"], json!("completed"));

    let (code, body) = post_json(&app, "/status", json!({ "thread_id": "t-1" })).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["exists"], json!(true));
    assert_eq!(body["has_joke"], json!(true));
    assert_eq!(body["has_explanation"], json!(true));
    assert_eq!(body["pending_node"], json!("__end__"));
}

/// **Scenario**: status on a never-created thread is a normal 200 with
/// exists=false; continue on it is a 404.
#[tokio::test]
async fn unknown_thread_status_and_continue() {
    let app = app(Mode::Ephemeral);

    let (code, body) = post_json(&app, "/status", json!({ "thread_id": "nope" })).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["exists"], json!(false));

    let (code, body) = post_json(&app, "/continue", json!({ "thread_id": "nope" })).await;
    assert_eq!(code, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("nope"));
}

/// **Scenario**: durable mode rejects /start without a thread id; an empty
/// topic is a 400 in any mode.
#[tokio::test]
async fn malformed_start_requests() {
    let app = app(Mode::Ephemeral);

    let (code, _) = post_json(&app, "/start", json!({ "topic": "cats" })).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    let (code, _) = post_json(
        &app,
        "/start",
        json!({ "topic": "  ", "thread_id": "t-1" }),
    )
    .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
}

/// **Scenario**: stateless mode round trip. Each /continue posts back exactly
/// what the previous response returned; the workflow advances one worker per
/// call and completes after the bare router pass.
#[tokio::test]
async fn stateless_round_trip_to_completion() {
    let app = app(Mode::Stateless);

    let (code, mut body) = post_json(&app, "/start", json!({ "topic": "owls" })).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["pending_node"], json!("router"));
    assert!(body["state"]["joke"].is_string());

    let mut hops = 0;
    while body["completed"] == json!(false) {
        let (code, next) = post_json(
            &app,
            "/continue",
            json!({ "state": body["state"], "pending_node": body["pending_node"] }),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        body = next;
        hops += 1;
        assert!(hops <= 8, "stateless round trip failed to complete");
    }
    assert_eq!(hops, 4);
    assert_eq!(body["state"]["status"], json!("completed"));
    assert!(body["state"]["alternative"].is_string());
    assert!(body["state"]["rating"].is_string());

    // /status holds nothing to report in this mode.
    let (code, _) = post_json(&app, "/status", json!({ "thread_id": "any" })).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
}

/// **Scenario**: stateless /continue with a state that shows no evidence the
/// first worker ran is a 422 Precondition, distinct from 404.
#[tokio::test]
async fn stateless_incomplete_state_is_unprocessable() {
    let app = app(Mode::Stateless);

    let bogus_state = json!({
        "topic": "owls",
        "joke": null,
        "explanation": null,
        "rating": null,
        "alternative": null,
        "next_node": "generate_explanation",
        "status": "started"
    });
    let (code, body) = post_json(
        &app,
        "/continue",
        json!({ "state": bogus_state, "pending_node": "router" }),
    )
    .await;
    assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("joke"));
}

/// **Scenario**: health endpoint reports the running mode.
#[tokio::test]
async fn health_reports_mode() {
    let app = app(Mode::Ephemeral);
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["mode"], json!("Ephemeral"));
}
