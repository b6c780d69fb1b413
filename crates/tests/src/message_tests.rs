use campus_crush_api::{build_router, state::AppState};
use serde_json::json;

use crate::fixtures::fake_google::FakeGoogle;
use crate::fixtures::test_app::{TestApp, created_event, serve};

fn seed_pair(app: &TestApp) {
    app.seed_chat("c1", &["A", "B"]);
    app.seed_user("A", Some("Alice"), Some("https://cdn/alice.jpg"), Some("tokA"));
    app.seed_user("B", Some("Bob"), None, Some("tokB"));
}

#[tokio::test]
async fn text_message_notifies_recipient() {
    let app = TestApp::spawn().await;
    seed_pair(&app);

    let outcome = app
        .trigger(&created_event(
            "chats/c1/messages/m1",
            json!({ "senderId": "A", "content": "hi", "timestamp": "2025-01-01T00:00:00Z" }),
        ))
        .await;

    assert_eq!(outcome["outcome"], "sent");
    assert_eq!(outcome["recipient_id"], "B");

    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 1);
    let payload = &sent[0];
    assert_eq!(payload.token, "tokB");
    assert_eq!(payload.notification.title, "Alice");
    assert_eq!(payload.notification.body, "hi");
    assert_eq!(payload.image(), Some("https://cdn/alice.jpg"));

    let data = serde_json::to_value(&payload.data).unwrap();
    assert_eq!(data["type"], "chat_message");
    assert_eq!(data["chatId"], "c1");
    assert_eq!(data["messageId"], "m1");
    assert_eq!(data["senderProfilePic"], "https://cdn/alice.jpg");
}

#[tokio::test]
async fn long_message_is_truncated() {
    let app = TestApp::spawn().await;
    seed_pair(&app);

    let content = "a".repeat(80);
    app.trigger(&created_event(
        "chats/c1/messages/m1",
        json!({ "senderId": "A", "content": content }),
    ))
    .await;

    let sent = app.notifier.sent();
    assert_eq!(sent[0].notification.body, format!("{}...", "a".repeat(50)));
}

#[tokio::test]
async fn voice_message_from_second_participant() {
    let app = TestApp::spawn().await;
    seed_pair(&app);

    let outcome = app
        .trigger(&created_event(
            "chats/c1/messages/m2",
            json!({ "senderId": "B", "audioUrl": "https://cdn/voice.m4a" }),
        ))
        .await;

    assert_eq!(outcome["recipient_id"], "A");
    let sent = app.notifier.sent();
    assert_eq!(sent[0].token, "tokA");
    assert_eq!(sent[0].notification.body, "🎤 Voice message");
    assert_eq!(sent[0].notification.title, "Bob");
    assert_eq!(sent[0].image(), None);
}

#[tokio::test]
async fn missing_chat_sends_nothing() {
    let app = TestApp::spawn().await;
    app.seed_user("B", Some("Bob"), None, Some("tokB"));

    let outcome = app
        .trigger(&created_event(
            "chats/c1/messages/m1",
            json!({ "senderId": "A", "content": "hi" }),
        ))
        .await;

    assert_eq!(outcome, json!({ "outcome": "skipped", "reason": "chat_not_found" }));
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn chat_with_only_the_sender_sends_nothing() {
    let app = TestApp::spawn().await;
    app.seed_chat("c1", &["A", "A"]);
    app.seed_user("A", Some("Alice"), None, Some("tokA"));

    let outcome = app
        .trigger(&created_event(
            "chats/c1/messages/m1",
            json!({ "senderId": "A", "content": "hi" }),
        ))
        .await;

    assert_eq!(outcome, json!({ "outcome": "skipped", "reason": "no_recipient" }));
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn recipient_without_token_sends_nothing() {
    let app = TestApp::spawn().await;
    app.seed_chat("c1", &["A", "B"]);
    app.seed_user("B", Some("Bob"), None, None);

    let outcome = app
        .trigger(&created_event(
            "chats/c1/messages/m1",
            json!({ "senderId": "A", "content": "hi" }),
        ))
        .await;

    assert_eq!(outcome, json!({ "outcome": "skipped", "reason": "missing_token" }));
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn message_delivered_through_google_apis() {
    let google = FakeGoogle::spawn().await;
    google.put_document("chats/c1", json!({ "participants": ["A", "B"] }));
    google.put_document(
        "users/A",
        json!({ "displayName": "Alice", "profilePhotos": ["https://cdn/alice.jpg"] }),
    );
    google.put_document("users/B", json!({ "displayName": "Bob", "fcmToken": "tokB" }));

    let state = AppState::from_settings(&google.settings()).unwrap();
    let addr = serve(build_router(state, 10)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/trigger"))
        .json(&created_event(
            "chats/c1/messages/m1",
            json!({ "senderId": "A", "imageUrl": "https://cdn/pic.jpg" }),
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let outcome: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(outcome["outcome"], "sent");
    assert_eq!(outcome["message_id"], "projects/campus-crush-test/messages/1");

    let sent = google.sent();
    assert_eq!(sent.len(), 1);
    let message = &sent[0]["message"];
    assert_eq!(message["token"], "tokB");
    assert_eq!(message["notification"]["title"], "Alice");
    assert_eq!(message["notification"]["body"], "📷 Photo");
    assert_eq!(message["android"]["notification"]["image"], "https://cdn/alice.jpg");
}
