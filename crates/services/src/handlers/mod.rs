//! Trigger handlers. Each one turns a document-creation event into at most
//! one push notification and reports what happened as an [`Outcome`].
//!
//! Handlers never fail from the caller's point of view: missing documents,
//! missing push tokens and delivery errors are logged and folded into the
//! outcome.

pub mod body;
pub mod message;
pub mod request;

pub use message::MessageNotifier;
pub use request::RequestNotifier;

use serde::Serialize;
use thiserror::Error;

use crate::directory::DirectoryError;
use crate::push::PushError;

/// Display name used when the sender's profile is missing or unnamed.
pub const UNKNOWN_SENDER: &str = "Someone";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// One push was accepted by the push service.
    Sent {
        message_id: String,
        recipient_id: String,
    },
    /// A guard condition ended the invocation before sending.
    Skipped { reason: SkipReason },
    /// A remote call failed; nothing was retried.
    Failed { error: String },
    /// The event does not map to any handler.
    Ignored { document: String },
}

impl Outcome {
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ChatNotFound,
    NoRecipient,
    RecipientNotFound,
    MissingToken,
}

#[derive(Debug, Error)]
pub(crate) enum HandlerError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Push(#[from] PushError),
}

impl From<HandlerError> for Outcome {
    fn from(err: HandlerError) -> Self {
        Self::Failed {
            error: err.to_string(),
        }
    }
}
