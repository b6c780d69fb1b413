pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDirectory;
pub use memory::InMemoryDirectory;

use async_trait::async_trait;
use campus_crush_db::CodecError;
use campus_crush_db::models::{Chat, UserProfile};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Document request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Document store returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Undecodable document: {0}")]
    Codec(#[from] CodecError),
    #[error("Document {collection}/{id} does not fit the model: {source}")]
    Shape {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Cannot load seed data: {0}")]
    Seed(String),
}

/// Read-only lookup of documents by collection and id.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Returns the document's fields as plain JSON, or `None` when it does
    /// not exist.
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<serde_json::Value>, DirectoryError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

/// Fetches and deserializes one document. An empty id is never a valid
/// document reference and yields `None` without a lookup.
pub async fn fetch<T: DeserializeOwned>(
    directory: &dyn Directory,
    collection: &str,
    id: &str,
) -> Result<Option<T>, DirectoryError> {
    if id.is_empty() {
        return Ok(None);
    }

    match directory.get(collection, id).await? {
        Some(json) => serde_json::from_value(json)
            .map(Some)
            .map_err(|source| DirectoryError::Shape {
                collection: collection.to_string(),
                id: id.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub async fn fetch_chat(directory: &dyn Directory, id: &str) -> Result<Option<Chat>, DirectoryError> {
    fetch(directory, Chat::COLLECTION, id).await
}

pub async fn fetch_user(
    directory: &dyn Directory,
    id: &str,
) -> Result<Option<UserProfile>, DirectoryError> {
    fetch(directory, UserProfile::COLLECTION, id).await
}
