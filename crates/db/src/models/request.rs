use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub sender_id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub receiver_id: String,
}

impl FriendRequest {
    pub const COLLECTION: &'static str = "requests";

    pub fn new(sender_id: impl Into<String>, receiver_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
        }
    }
}
