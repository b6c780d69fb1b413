use std::sync::Arc;

use tracing::{error, info, warn};

use super::body::message_body;
use super::{HandlerError, Outcome, SkipReason, UNKNOWN_SENDER};
use crate::directory::{self, Directory};
use crate::push::{NotificationData, NotificationPayload, Notifier};
use crate::trigger::MessageCreated;

/// Notifies the other participant of a chat when a message is posted.
pub struct MessageNotifier {
    directory: Arc<dyn Directory>,
    notifier: Arc<dyn Notifier>,
}

impl MessageNotifier {
    pub fn new(directory: Arc<dyn Directory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            directory,
            notifier,
        }
    }

    pub async fn handle(&self, event: MessageCreated) -> Outcome {
        info!(
            chat_id = %event.chat_id,
            message_id = %event.message_id,
            sender_id = %event.message.sender_id,
            "New message created"
        );

        match self.notify(&event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                match &e {
                    HandlerError::Push(err) => error!(
                        chat_id = %event.chat_id,
                        message_id = %event.message_id,
                        error = %err,
                        "Error sending push notification"
                    ),
                    HandlerError::Directory(err) => error!(
                        chat_id = %event.chat_id,
                        message_id = %event.message_id,
                        error = %err,
                        "Error looking up chat participants"
                    ),
                }
                e.into()
            }
        }
    }

    async fn notify(&self, event: &MessageCreated) -> Result<Outcome, HandlerError> {
        let directory = self.directory.as_ref();
        let sender_id = event.message.sender_id.as_str();

        let Some(chat) = directory::fetch_chat(directory, &event.chat_id).await? else {
            error!(chat_id = %event.chat_id, "Chat document not found");
            return Ok(Outcome::skipped(SkipReason::ChatNotFound));
        };

        let Some(recipient_id) = chat.recipient_for(sender_id) else {
            warn!(chat_id = %event.chat_id, %sender_id, "No recipient found");
            return Ok(Outcome::skipped(SkipReason::NoRecipient));
        };

        let Some(recipient) = directory::fetch_user(directory, recipient_id).await? else {
            error!(%recipient_id, "Recipient user not found");
            return Ok(Outcome::skipped(SkipReason::RecipientNotFound));
        };

        let Some(token) = recipient.push_token() else {
            warn!(%recipient_id, "Recipient has no FCM token");
            return Ok(Outcome::skipped(SkipReason::MissingToken));
        };

        let sender = directory::fetch_user(directory, sender_id)
            .await?
            .unwrap_or_default();
        let sender_name = sender.display_name_or(UNKNOWN_SENDER);
        let sender_photo = sender.primary_photo();

        let payload = NotificationPayload::builder(
            token,
            NotificationData::chat_message(
                &event.chat_id,
                sender_id,
                sender_name,
                sender_photo,
                &event.message_id,
            ),
        )
        .title(sender_name)
        .body(message_body(&event.message))
        .image(sender_photo)
        .build();

        let message_id = self.notifier.send(&payload).await?;
        info!(%recipient_id, %message_id, "Push notification sent successfully");

        Ok(Outcome::Sent {
            message_id,
            recipient_id: recipient_id.to_string(),
        })
    }
}
