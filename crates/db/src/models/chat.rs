use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub participants: Vec<String>,
}

impl Chat {
    pub const COLLECTION: &'static str = "chats";

    pub fn new<I, S>(participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }

    /// The participant that a message from `sender_id` is delivered to.
    ///
    /// Requires at least two distinct non-empty participants. Returns the
    /// first one that differs from the sender, so a chat whose members all
    /// equal the sender yields `None` rather than being repaired.
    pub fn recipient_for(&self, sender_id: &str) -> Option<&str> {
        let distinct: HashSet<&str> = self
            .participants
            .iter()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
            .collect();
        if distinct.len() < 2 {
            return None;
        }

        self.participants
            .iter()
            .map(String::as_str)
            .find(|id| !id.is_empty() && *id != sender_id)
    }
}
