//! Firestore document trigger envelopes and routing to handlers.

use campus_crush_db::models::{Chat, ChatMessage, FriendRequest};
use campus_crush_db::{CodecError, Document};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Cannot decode document {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: CodecError,
    },
}

/// Envelope delivered for a document write: the new state and, for updates,
/// the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEvent {
    #[serde(default)]
    pub value: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Document>,
}

impl DocumentEvent {
    pub fn created(document: Document) -> Self {
        Self {
            value: document,
            old_value: None,
        }
    }

    /// True unless the envelope carries an existing previous document.
    pub fn is_create(&self) -> bool {
        !self.old_value.as_ref().is_some_and(Document::exists)
    }
}

/// A message was added to `chats/{chat_id}/messages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCreated {
    pub chat_id: String,
    pub message_id: String,
    pub message: ChatMessage,
}

/// A friend request was added to `requests`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCreated {
    pub request_id: String,
    pub request: FriendRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    MessageCreated(MessageCreated),
    RequestCreated(RequestCreated),
}

impl Trigger {
    /// Maps an event to the handler input it is registered for. Returns
    /// `Ok(None)` for updates and for documents outside the watched paths.
    pub fn from_event(event: DocumentEvent) -> Result<Option<Self>, TriggerError> {
        if !event.is_create() {
            return Ok(None);
        }

        let document = event.value;
        let path = document.relative_path().to_string();
        let segments: Vec<&str> = path.split('/').collect();

        let trigger = match segments.as_slice() {
            [Chat::COLLECTION, chat_id, ChatMessage::COLLECTION, message_id]
                if !chat_id.is_empty() && !message_id.is_empty() =>
            {
                let (chat_id, message_id) = (chat_id.to_string(), message_id.to_string());
                Trigger::MessageCreated(MessageCreated {
                    chat_id,
                    message_id,
                    message: decode(document, &path)?,
                })
            }
            [FriendRequest::COLLECTION, request_id] if !request_id.is_empty() => {
                let request_id = request_id.to_string();
                Trigger::RequestCreated(RequestCreated {
                    request_id,
                    request: decode(document, &path)?,
                })
            }
            _ => return Ok(None),
        };

        Ok(Some(trigger))
    }
}

fn decode<T: serde::de::DeserializeOwned>(document: Document, path: &str) -> Result<T, TriggerError> {
    document.decode().map_err(|source| TriggerError::Decode {
        path: path.to_string(),
        source,
    })
}
