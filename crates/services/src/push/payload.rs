//! Push payload sent for a single trigger invocation.
//!
//! The serialized form of [`NotificationPayload`] is the contract the mobile
//! client is built against. It is assembled only through
//! [`NotificationPayloadBuilder`], which sets the optional rich-media fields
//! together or not at all.

use serde::Serialize;
use serde_json::json;

pub const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";
pub const CHAT_MESSAGES_CHANNEL: &str = "chat_messages";
pub const FRIEND_REQUESTS_CHANNEL: &str = "friend_requests";
pub const ICON: &str = "ic_notification";
pub const ACCENT_COLOR: &str = "#8B5CF6";
pub const PRIORITY_HIGH: &str = "high";
pub const DEFAULT_SOUND: &str = "default";
pub const BIG_PICTURE_STYLE: &str = "bigPicture";
pub const BADGE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub token: String,
    pub notification: Notification,
    pub data: NotificationData,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Flat string map delivered to the client app. `type` selects the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationData {
    ChatMessage {
        #[serde(rename = "chatId")]
        chat_id: String,
        #[serde(rename = "senderId")]
        sender_id: String,
        #[serde(rename = "senderName")]
        sender_name: String,
        /// Empty string when the sender has no photo.
        #[serde(rename = "senderProfilePic")]
        sender_profile_pic: String,
        #[serde(rename = "messageId")]
        message_id: String,
        click_action: &'static str,
    },
    FriendRequest {
        #[serde(rename = "requestId")]
        request_id: String,
        #[serde(rename = "senderId")]
        sender_id: String,
        #[serde(rename = "senderName")]
        sender_name: String,
        click_action: &'static str,
    },
}

impl NotificationData {
    pub fn chat_message(
        chat_id: &str,
        sender_id: &str,
        sender_name: &str,
        sender_profile_pic: Option<&str>,
        message_id: &str,
    ) -> Self {
        Self::ChatMessage {
            chat_id: chat_id.to_string(),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            sender_profile_pic: sender_profile_pic.unwrap_or_default().to_string(),
            message_id: message_id.to_string(),
            click_action: CLICK_ACTION,
        }
    }

    pub fn friend_request(request_id: &str, sender_id: &str, sender_name: &str) -> Self {
        Self::FriendRequest {
            request_id: request_id.to_string(),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            click_action: CLICK_ACTION,
        }
    }

    /// Value of the `type` discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChatMessage { .. } => "chat_message",
            Self::FriendRequest { .. } => "friend_request",
        }
    }

    pub fn channel_id(&self) -> &'static str {
        match self {
            Self::ChatMessage { .. } => CHAT_MESSAGES_CHANNEL,
            Self::FriendRequest { .. } => FRIEND_REQUESTS_CHANNEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidConfig {
    pub priority: String,
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidNotification {
    pub channel_id: String,
    pub priority: String,
    pub default_sound: bool,
    pub default_vibrate_timings: bool,
    pub icon: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aps {
    pub sound: String,
    pub badge: u32,
    pub alert: ApsAlert,
    #[serde(rename = "mutable-content", skip_serializing_if = "Option::is_none")]
    pub mutable_content: Option<u8>,
    #[serde(rename = "attachment-url", skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApsAlert {
    pub title: String,
    pub body: String,
}

impl NotificationPayload {
    pub fn builder(token: impl Into<String>, data: NotificationData) -> NotificationPayloadBuilder {
        NotificationPayloadBuilder {
            token: token.into(),
            data,
            title: String::new(),
            body: String::new(),
            image: None,
        }
    }

    pub fn image(&self) -> Option<&str> {
        self.android.notification.image_url.as_deref()
    }

    /// Message object for the FCM HTTP v1 `messages:send` endpoint.
    ///
    /// Android options use the v1 field names; the APNs payload is passed
    /// through untouched since APNs accepts arbitrary keys under `aps`.
    /// `style` has no v1 counterpart and is dropped.
    pub fn to_fcm_v1(&self) -> Result<serde_json::Value, serde_json::Error> {
        let android = &self.android.notification;
        let mut android_notification = json!({
            "channel_id": android.channel_id,
            "notification_priority": format!("PRIORITY_{}", android.priority.to_uppercase()),
            "default_sound": android.default_sound,
            "default_vibrate_timings": android.default_vibrate_timings,
            "icon": android.icon,
            "color": android.color,
        });
        if let Some(image) = &android.image_url {
            android_notification["image"] = json!(image);
        }

        Ok(json!({
            "token": self.token,
            "notification": {
                "title": self.notification.title,
                "body": self.notification.body,
            },
            "data": serde_json::to_value(&self.data)?,
            "android": {
                "priority": self.android.priority.to_uppercase(),
                "notification": android_notification,
            },
            "apns": {
                "payload": serde_json::to_value(&self.apns.payload)?,
            },
        }))
    }
}

#[derive(Debug, Clone)]
pub struct NotificationPayloadBuilder {
    token: String,
    data: NotificationData,
    title: String,
    body: String,
    image: Option<String>,
}

impl NotificationPayloadBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Rich-media image shown on both platforms. Empty URLs are ignored.
    pub fn image(mut self, url: Option<&str>) -> Self {
        self.image = url.filter(|u| !u.is_empty()).map(str::to_string);
        self
    }

    pub fn build(self) -> NotificationPayload {
        let channel_id = self.data.channel_id().to_string();
        let has_image = self.image.is_some();

        NotificationPayload {
            token: self.token,
            notification: Notification {
                title: self.title.clone(),
                body: self.body.clone(),
            },
            data: self.data,
            android: AndroidConfig {
                priority: PRIORITY_HIGH.to_string(),
                notification: AndroidNotification {
                    channel_id,
                    priority: PRIORITY_HIGH.to_string(),
                    default_sound: true,
                    default_vibrate_timings: true,
                    icon: ICON.to_string(),
                    color: ACCENT_COLOR.to_string(),
                    image_url: self.image.clone(),
                    style: has_image.then(|| BIG_PICTURE_STYLE.to_string()),
                },
            },
            apns: ApnsConfig {
                payload: ApnsPayload {
                    aps: Aps {
                        sound: DEFAULT_SOUND.to_string(),
                        badge: BADGE,
                        alert: ApsAlert {
                            title: self.title,
                            body: self.body,
                        },
                        mutable_content: has_image.then_some(1),
                        attachment_url: self.image,
                    },
                },
            },
        }
    }
}
