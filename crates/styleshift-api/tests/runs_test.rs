//! Run dispatch and status endpoint integration tests.

mod helpers;

use helpers::{api_path, setup_test_app};
use mockito::Matcher;
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn test_dispatch_missing_inputs_returns_400_without_gateway_call() {
    let mut app = setup_test_app().await;
    let queue_mock = app
        .gateway
        .mock("POST", "/run/deployment/queue")
        .expect(0)
        .create_async()
        .await;

    for body in [
        json!({}),
        json!({ "input_image": "http://localhost:3000/media/user_uploads/photo.jpg" }),
        json!({ "input_image_style": "https://cdn.example/style.jpg" }),
        json!({ "input_image": "", "input_image_style": "" }),
    ] {
        let res = app.client().post(&api_path("/runs")).json(&body).await;
        assert_eq!(res.status_code(), 400, "body: {}", body);
    }

    queue_mock.assert_async().await;
}

#[tokio::test]
async fn test_dispatch_returns_run_id_and_watcher_tracks_to_terminal() {
    let mut app = setup_test_app().await;

    app.gateway
        .mock("POST", "/run/deployment/queue")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"runId": "run-9"}"#)
        .expect(1)
        .create_async()
        .await;
    app.gateway
        .mock("GET", Matcher::Regex(r"^/run/run-9$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run-9", "status": "success", "progress": 1.0, "outputs": []}"#)
        .create_async()
        .await;

    let res = app
        .client()
        .post(&api_path("/runs"))
        .json(&json!({
            "input_image": "http://localhost:3000/media/user_uploads/photo.jpg",
            "input_image_style": "https://cdn.example/style.jpg"
        }))
        .await;
    assert_eq!(res.status_code(), 200);
    let body: Value = res.json();
    assert_eq!(body.get("runId").and_then(|v| v.as_str()), Some("run-9"));

    // The watcher polls on a 10ms period in tests; give it a few ticks.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(app.state.runs.is_terminal("run-9"));
}

#[tokio::test]
async fn test_status_requires_run_id() {
    let app = setup_test_app().await;
    let res = app.client().get(&api_path("/runs/status")).await;
    assert_eq!(res.status_code(), 400);
}

#[tokio::test]
async fn test_status_proxies_gateway_and_publishes_to_tracker() {
    let mut app = setup_test_app().await;
    app.gateway
        .mock("GET", Matcher::Regex(r"^/run/run-5$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id": "run-5", "status": "running", "liveStatus": "KSampler 9/20", "progress": 0.45, "outputs": []}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let res = app
        .client()
        .get(&api_path("/runs/status"))
        .add_query_param("runId", "run-5")
        .await;
    assert_eq!(res.status_code(), 200);

    let body: Value = res.json();
    assert_eq!(body.get("id").and_then(|v| v.as_str()), Some("run-5"));
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("running"));
    assert_eq!(
        body.get("liveStatus").and_then(|v| v.as_str()),
        Some("KSampler 9/20")
    );

    // The polled snapshot landed in the unified store.
    let snapshot = app.state.runs.latest("run-5").expect("published snapshot");
    assert_eq!(snapshot.progress_percent(), 45);
}

#[tokio::test]
async fn test_status_gateway_failure_maps_to_500() {
    let mut app = setup_test_app().await;
    app.gateway
        .mock("GET", Matcher::Regex(r"^/run/run-6$".to_string()))
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let res = app
        .client()
        .get(&api_path("/runs/status"))
        .add_query_param("runId", "run-6")
        .await;
    assert_eq!(res.status_code(), 500);
    let body: Value = res.json();
    assert_eq!(
        body.get("code").and_then(|v| v.as_str()),
        Some("GATEWAY_ERROR")
    );
    // The upstream body must not leak into the client-facing message.
    assert_eq!(
        body.get("error").and_then(|v| v.as_str()),
        Some("Generation gateway request failed")
    );
}
