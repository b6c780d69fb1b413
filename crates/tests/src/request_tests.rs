use serde_json::json;

use crate::fixtures::test_app::{TestApp, created_event};

#[tokio::test]
async fn friend_request_notifies_receiver() {
    let app = TestApp::spawn().await;
    app.seed_user("A", Some("Alice"), Some("https://cdn/alice.jpg"), Some("tokA"));
    app.seed_user("B", Some("Bob"), None, Some("tokB"));

    let outcome = app
        .trigger(&created_event(
            "requests/r1",
            json!({ "senderId": "A", "receiverId": "B", "status": "pending" }),
        ))
        .await;

    assert_eq!(outcome["outcome"], "sent");
    assert_eq!(outcome["recipient_id"], "B");

    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 1);
    let payload = &sent[0];
    assert_eq!(payload.token, "tokB");
    assert_eq!(payload.notification.title, "New Request");
    assert_eq!(payload.notification.body, "Alice sent you a friend request");
    assert_eq!(payload.image(), None);
    assert_eq!(payload.android.notification.channel_id, "friend_requests");

    let data = serde_json::to_value(&payload.data).unwrap();
    assert_eq!(
        data,
        json!({
            "type": "friend_request",
            "requestId": "r1",
            "senderId": "A",
            "senderName": "Alice",
            "click_action": "FLUTTER_NOTIFICATION_CLICK",
        })
    );
}

#[tokio::test]
async fn unknown_sender_is_someone() {
    let app = TestApp::spawn().await;
    app.seed_user("B", Some("Bob"), None, Some("tokB"));

    app.trigger(&created_event(
        "requests/r1",
        json!({ "senderId": "ghost", "receiverId": "B" }),
    ))
    .await;

    let sent = app.notifier.sent();
    assert_eq!(sent[0].notification.body, "Someone sent you a friend request");
}

#[tokio::test]
async fn missing_receiver_sends_nothing() {
    let app = TestApp::spawn().await;
    app.seed_user("A", Some("Alice"), None, Some("tokA"));

    let outcome = app
        .trigger(&created_event(
            "requests/r1",
            json!({ "senderId": "A", "receiverId": "B" }),
        ))
        .await;

    assert_eq!(outcome, json!({ "outcome": "skipped", "reason": "recipient_not_found" }));
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn receiver_with_empty_token_sends_nothing() {
    let app = TestApp::spawn().await;
    app.seed_user("A", Some("Alice"), None, Some("tokA"));
    app.seed_user("B", Some("Bob"), None, Some(""));

    let outcome = app
        .trigger(&created_event(
            "requests/r1",
            json!({ "senderId": "A", "receiverId": "B" }),
        ))
        .await;

    assert_eq!(outcome, json!({ "outcome": "skipped", "reason": "missing_token" }));
    assert!(app.notifier.sent().is_empty());
}
