use serde::{Deserialize, Serialize};

use super::non_empty;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(
        default,
        deserialize_with = "super::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_strings")]
    pub profile_photos: Vec<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub fcm_token: Option<String>,
}

impl UserProfile {
    pub const COLLECTION: &'static str = "users";

    pub fn display_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_empty(self.display_name.as_ref()).unwrap_or(fallback)
    }

    /// First profile photo, if it is a non-empty URL.
    pub fn primary_photo(&self) -> Option<&str> {
        non_empty(self.profile_photos.first())
    }

    pub fn push_token(&self) -> Option<&str> {
        non_empty(self.fcm_token.as_ref())
    }
}
