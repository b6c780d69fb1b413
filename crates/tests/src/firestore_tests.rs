use std::sync::Arc;

use campus_crush_config::GoogleSettings;
use campus_crush_db::models::{Chat, UserProfile};
use campus_crush_services::auth::{AccessTokenSource, StaticToken, token_source_from_settings};
use campus_crush_services::directory::{self, Directory, DirectoryError, FirestoreDirectory};
use serde_json::json;

use crate::fixtures::fake_google::{FakeGoogle, PROJECT_ID};

fn firestore(google: &FakeGoogle, tokens: Arc<dyn AccessTokenSource>) -> FirestoreDirectory {
    FirestoreDirectory::new(reqwest::Client::new(), &google.url, PROJECT_ID, "(default)", tokens)
}

#[tokio::test]
async fn reads_and_decodes_documents() {
    let google = FakeGoogle::spawn().await;
    google.put_document(
        "users/B",
        json!({
            "displayName": "Bob",
            "profilePhotos": ["https://cdn/bob.jpg", "https://cdn/bob2.jpg"],
            "fcmToken": "tokB",
            "age": 21,
            "verified": true,
        }),
    );
    google.put_document("chats/c1", json!({ "participants": ["A", "B"], "lastMessage": null }));

    let directory = firestore(&google, Arc::new(StaticToken::new("test-token")));

    let user: UserProfile = directory::fetch_user(&directory, "B").await.unwrap().unwrap();
    assert_eq!(user.display_name_or("Someone"), "Bob");
    assert_eq!(user.primary_photo(), Some("https://cdn/bob.jpg"));
    assert_eq!(user.push_token(), Some("tokB"));

    let chat: Chat = directory::fetch_chat(&directory, "c1").await.unwrap().unwrap();
    assert_eq!(chat.recipient_for("A"), Some("B"));

    assert_eq!(google.bearer_tokens(), vec!["test-token", "test-token"]);
}

#[tokio::test]
async fn missing_document_is_none() {
    let google = FakeGoogle::spawn().await;
    let directory = firestore(&google, Arc::new(StaticToken::new("test-token")));

    assert!(directory.get("users", "nobody").await.unwrap().is_none());
    assert!(directory::fetch_user(&directory, "nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn server_errors_are_reported() {
    let google = FakeGoogle::spawn().await;
    google.put_document("users/B", json!({ "displayName": "Bob" }));
    google.fail_reads(503);

    let directory = firestore(&google, Arc::new(StaticToken::new("test-token")));
    let err = directory.get("users", "B").await.unwrap_err();
    assert!(matches!(err, DirectoryError::Status { status: 503, .. }), "{err}");
}

#[tokio::test]
async fn mistyped_document_is_a_shape_error() {
    let google = FakeGoogle::spawn().await;
    google.put_document("chats/c1", json!({ "participants": "A,B" }));

    let directory = firestore(&google, Arc::new(StaticToken::new("test-token")));
    let err = directory::fetch_chat(&directory, "c1").await.unwrap_err();
    assert!(
        matches!(err, DirectoryError::Shape { ref collection, ref id, .. } if collection == "chats" && id == "c1"),
        "{err}"
    );
}

#[tokio::test]
async fn service_account_token_is_exchanged_once() {
    let google = FakeGoogle::spawn().await;
    google.put_document("users/B", json!({ "displayName": "Bob" }));

    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("service-account.json");
    std::fs::write(&key_path, google.service_account_json().to_string()).unwrap();

    let settings = GoogleSettings {
        access_token: None,
        credentials_path: Some(key_path.to_string_lossy().into_owned()),
        ..google.settings().google
    };
    let tokens = token_source_from_settings(&settings, reqwest::Client::new()).unwrap();
    let directory = firestore(&google, tokens);

    for _ in 0..3 {
        assert!(directory.get("users", "B").await.unwrap().is_some());
    }

    assert_eq!(google.token_requests(), 1);
    assert_eq!(google.bearer_tokens(), vec!["ya29.fake-1"; 3]);
}
