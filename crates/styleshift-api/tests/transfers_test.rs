//! Style-selection fan-out integration tests.

mod helpers;

use helpers::{api_path, setup_test_app};
use mockito::Matcher;
use serde_json::{json, Value};
use styleshift_core::models::find_style;

#[tokio::test]
async fn test_fan_out_dispatches_every_style_despite_failures() {
    let mut app = setup_test_app().await;

    let pop_art = find_style("pop_art").unwrap();
    let van_gogh = find_style("van_gogh").unwrap();

    // pop_art dispatch succeeds...
    let ok_mock = app
        .gateway
        .mock("POST", "/run/deployment/queue")
        .match_body(Matcher::PartialJson(json!({
            "inputs": { "input_image_style": pop_art.image_url }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"runId": "run-pop"}"#)
        .expect(1)
        .create_async()
        .await;
    // ...van_gogh fails, and must not stop the loop.
    let failed_mock = app
        .gateway
        .mock("POST", "/run/deployment/queue")
        .match_body(Matcher::PartialJson(json!({
            "inputs": { "input_image_style": van_gogh.image_url }
        })))
        .with_status(503)
        .with_body("deployment unavailable")
        .expect(1)
        .create_async()
        .await;
    // Watcher polls for the successful run.
    app.gateway
        .mock("GET", Matcher::Regex(r"^/run/run-pop$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run-pop", "status": "success", "progress": 1.0, "outputs": []}"#)
        .create_async()
        .await;

    let res = app
        .client()
        .post(&api_path("/transfers"))
        .json(&json!({
            "input_image": "http://localhost:3000/media/user_uploads/photo.jpg",
            "styles": ["pop_art", "van_gogh"]
        }))
        .await;
    assert_eq!(res.status_code(), 200);

    let body: Value = res.json();
    let dispatches = body.get("dispatches").and_then(|v| v.as_array()).unwrap();
    assert_eq!(dispatches.len(), 2);
    assert_eq!(
        dispatches[0].get("run_id").and_then(|v| v.as_str()),
        Some("run-pop")
    );
    assert!(dispatches[1].get("error").and_then(|v| v.as_str()).is_some());
    assert_eq!(
        body.get("run_ids").and_then(|v| v.as_array()).map(Vec::len),
        Some(1)
    );

    ok_mock.assert_async().await;
    failed_mock.assert_async().await;
}

#[tokio::test]
async fn test_zero_styles_rejected_before_any_dispatch() {
    let mut app = setup_test_app().await;
    let queue_mock = app
        .gateway
        .mock("POST", "/run/deployment/queue")
        .expect(0)
        .create_async()
        .await;

    let res = app
        .client()
        .post(&api_path("/transfers"))
        .json(&json!({
            "input_image": "http://localhost:3000/media/user_uploads/photo.jpg",
            "styles": []
        }))
        .await;
    assert_eq!(res.status_code(), 400);
    queue_mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_input_image_rejected() {
    let app = setup_test_app().await;
    let res = app
        .client()
        .post(&api_path("/transfers"))
        .json(&json!({ "input_image": "", "styles": ["pop_art"] }))
        .await;
    assert_eq!(res.status_code(), 400);
}

#[tokio::test]
async fn test_resubmission_reuses_run_ids() {
    let mut app = setup_test_app().await;

    let queue_mock = app
        .gateway
        .mock("POST", "/run/deployment/queue")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"runId": "run-1"}"#)
        .expect(1)
        .create_async()
        .await;
    app.gateway
        .mock("GET", Matcher::Regex(r"^/run/run-1$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run-1", "status": "success", "progress": 1.0, "outputs": []}"#)
        .create_async()
        .await;

    let body = json!({
        "input_image": "http://localhost:3000/media/user_uploads/photo.jpg",
        "styles": ["pop_art"]
    });

    let first: Value = app.client().post(&api_path("/transfers")).json(&body).await.json();
    let second: Value = app.client().post(&api_path("/transfers")).json(&body).await.json();

    let first_dispatch = &first.get("dispatches").unwrap().as_array().unwrap()[0];
    let second_dispatch = &second.get("dispatches").unwrap().as_array().unwrap()[0];

    assert_eq!(
        first_dispatch.get("deduplicated").and_then(|v| v.as_bool()),
        Some(false)
    );
    assert_eq!(
        second_dispatch.get("deduplicated").and_then(|v| v.as_bool()),
        Some(true)
    );
    assert_eq!(
        first_dispatch.get("run_id"),
        second_dispatch.get("run_id")
    );

    // The gateway saw exactly one dispatch for the pair.
    queue_mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_style_reported_and_rest_proceed() {
    let mut app = setup_test_app().await;

    let queue_mock = app
        .gateway
        .mock("POST", "/run/deployment/queue")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"runId": "run-2"}"#)
        .expect(1)
        .create_async()
        .await;
    app.gateway
        .mock("GET", Matcher::Regex(r"^/run/run-2$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run-2", "status": "success", "progress": 1.0, "outputs": []}"#)
        .create_async()
        .await;

    let res = app
        .client()
        .post(&api_path("/transfers"))
        .json(&json!({
            "input_image": "http://localhost:3000/media/user_uploads/photo.jpg",
            "styles": ["banksy", "pop_art"]
        }))
        .await;
    assert_eq!(res.status_code(), 200);

    let body: Value = res.json();
    let dispatches = body.get("dispatches").and_then(|v| v.as_array()).unwrap();
    assert!(dispatches[0]
        .get("error")
        .and_then(|v| v.as_str())
        .is_some_and(|e| e.contains("Unknown style")));
    assert!(dispatches[1].get("run_id").is_some());

    queue_mock.assert_async().await;
}
