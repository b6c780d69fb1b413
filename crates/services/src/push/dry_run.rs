use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::{NotificationPayload, Notifier, PushError};

/// Dry-run notifier: logs the payload instead of delivering it.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, payload: &NotificationPayload) -> Result<String, PushError> {
        let receipt = format!("dry-run/{}", Uuid::new_v4());
        info!(
            receipt = %receipt,
            kind = payload.data.kind(),
            payload = %serde_json::to_string(payload)?,
            "Push notification (dry run)"
        );
        Ok(receipt)
    }
}
