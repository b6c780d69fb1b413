use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{NotificationPayload, Notifier, PushError};
use crate::auth::AccessTokenSource;

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

/// Firebase Cloud Messaging over the HTTP v1 API.
pub struct FcmNotifier {
    client: reqwest::Client,
    send_url: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl FcmNotifier {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        project_id: &str,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Self {
        Self {
            client,
            send_url: format!(
                "{}/v1/projects/{}/messages:send",
                base_url.trim_end_matches('/'),
                project_id
            ),
            tokens,
        }
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }
}

#[async_trait]
impl Notifier for FcmNotifier {
    async fn send(&self, payload: &NotificationPayload) -> Result<String, PushError> {
        let body = serde_json::json!({ "message": payload.to_fcm_v1()? });
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PushError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SendResponse = response.json().await?;
        debug!(name = %sent.name, "FCM accepted message");
        Ok(sent.name)
    }
}
