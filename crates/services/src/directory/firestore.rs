use std::sync::Arc;

use async_trait::async_trait;
use campus_crush_db::Document;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::{Directory, DirectoryError};
use crate::auth::AccessTokenSource;

/// Reads documents through the Firestore REST API.
pub struct FirestoreDirectory {
    client: reqwest::Client,
    documents_url: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl FirestoreDirectory {
    /// `base_url` is the API origin (`https://firestore.googleapis.com` or an
    /// emulator such as `http://localhost:8080`).
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        project_id: &str,
        database_id: &str,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Self {
        Self {
            client,
            documents_url: documents_url(base_url, project_id, database_id),
            tokens,
        }
    }

    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.documents_url,
            urlencoding::encode(collection),
            urlencoding::encode(id)
        )
    }
}

fn documents_url(base_url: &str, project_id: &str, database_id: &str) -> String {
    format!(
        "{}/v1/projects/{}/databases/{}/documents",
        base_url.trim_end_matches('/'),
        project_id,
        database_id
    )
}

#[async_trait]
impl Directory for FirestoreDirectory {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DirectoryError> {
        let url = self.document_url(collection, id);
        let token = self.tokens.access_token().await?;

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(%collection, %id, "Document not found");
            return Ok(None);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let document: Document = response.json().await?;
        debug!(name = %document.name, "Document fetched");
        Ok(Some(document.into_json()?))
    }

    fn name(&self) -> &str {
        "firestore"
    }
}
