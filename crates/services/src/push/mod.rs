pub mod dry_run;
pub mod fcm;
pub mod payload;

pub use dry_run::LogNotifier;
pub use fcm::FcmNotifier;
pub use payload::{NotificationData, NotificationPayload, NotificationPayloadBuilder};

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("Push request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Push service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Cannot encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Delivers one push notification per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the delivery receipt (the message name assigned by the
    /// push service).
    async fn send(&self, payload: &NotificationPayload) -> Result<String, PushError>;
}
