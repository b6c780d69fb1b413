use std::time::Duration;

use serde_json::{Value, json};

use crate::fixtures::test_app::{RecordingNotifier, TestApp, created_event};

#[tokio::test]
async fn health_check() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/trigger"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn wrong_envelope_shape_is_bad_request() {
    let app = TestApp::spawn().await;

    let resp = app.post_event(&json!({ "value": "not a document" })).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn unrelated_document_is_ignored() {
    let app = TestApp::spawn().await;

    let outcome = app
        .trigger(&created_event("users/u1", json!({ "displayName": "New" })))
        .await;
    assert_eq!(outcome, json!({ "outcome": "ignored", "document": "users/u1" }));
}

#[tokio::test]
async fn update_event_is_ignored() {
    let app = TestApp::spawn().await;
    app.seed_user("B", Some("Bob"), None, Some("tokB"));

    let mut event = created_event("requests/r1", json!({ "senderId": "A", "receiverId": "B" }));
    event["oldValue"] = event["value"].clone();

    let outcome = app.trigger(&event).await;
    assert_eq!(outcome["outcome"], "ignored");
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn undecodable_document_is_reported_as_failed() {
    let app = TestApp::spawn().await;

    let outcome = app
        .trigger(&created_event("requests/r1", json!({ "senderId": { "nested": true } })))
        .await;
    assert_eq!(outcome["outcome"], "failed");
    assert!(outcome["error"].as_str().unwrap().contains("requests/r1"));
}

#[tokio::test]
async fn concurrent_invocations_are_capped() {
    let app = TestApp::spawn_with(RecordingNotifier::with_delay(Duration::from_millis(100)), 2).await;
    app.seed_user("A", Some("Alice"), None, Some("tokA"));
    app.seed_user("B", Some("Bob"), None, Some("tokB"));

    let requests = (0..6).map(|i| {
        let event = created_event(
            &format!("requests/r{i}"),
            json!({ "senderId": "A", "receiverId": "B" }),
        );
        let client = app.client.clone();
        let url = app.url("/trigger");
        tokio::spawn(async move { client.post(url).json(&event).send().await.unwrap().status() })
    });
    let handles: Vec<_> = requests.collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().as_u16(), 200);
    }

    assert_eq!(app.notifier.sent().len(), 6);
    assert!(app.notifier.peak_concurrency() <= 2);
}
