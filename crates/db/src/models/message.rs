use serde::{Deserialize, Serialize};

use super::non_empty;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub sender_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl ChatMessage {
    /// Messages live in a subcollection: `chats/{chatId}/messages/{messageId}`.
    pub const COLLECTION: &'static str = "messages";

    pub fn text(sender_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn content(&self) -> Option<&str> {
        non_empty(self.content.as_ref())
    }

    pub fn image(&self) -> Option<&str> {
        non_empty(self.image_url.as_ref())
    }

    pub fn audio(&self) -> Option<&str> {
        non_empty(self.audio_url.as_ref())
    }
}
