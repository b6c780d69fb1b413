use std::sync::Arc;

use tracing::{error, info, warn};

use super::body::request_body;
use super::{HandlerError, Outcome, SkipReason, UNKNOWN_SENDER};
use crate::directory::{self, Directory};
use crate::push::{NotificationData, NotificationPayload, Notifier};
use crate::trigger::RequestCreated;

pub const REQUEST_TITLE: &str = "New Request";

/// Notifies the receiver of a new friend request.
pub struct RequestNotifier {
    directory: Arc<dyn Directory>,
    notifier: Arc<dyn Notifier>,
}

impl RequestNotifier {
    pub fn new(directory: Arc<dyn Directory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            directory,
            notifier,
        }
    }

    pub async fn handle(&self, event: RequestCreated) -> Outcome {
        info!(
            request_id = %event.request_id,
            sender_id = %event.request.sender_id,
            receiver_id = %event.request.receiver_id,
            "New request created"
        );

        match self.notify(&event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                match &e {
                    HandlerError::Push(err) => error!(
                        request_id = %event.request_id,
                        error = %err,
                        "Error sending friend request notification"
                    ),
                    HandlerError::Directory(err) => error!(
                        request_id = %event.request_id,
                        error = %err,
                        "Error looking up friend request users"
                    ),
                }
                e.into()
            }
        }
    }

    async fn notify(&self, event: &RequestCreated) -> Result<Outcome, HandlerError> {
        let directory = self.directory.as_ref();
        let sender_id = event.request.sender_id.as_str();
        let receiver_id = event.request.receiver_id.as_str();

        let Some(receiver) = directory::fetch_user(directory, receiver_id).await? else {
            error!(%receiver_id, "Receiver user not found");
            return Ok(Outcome::skipped(SkipReason::RecipientNotFound));
        };

        let Some(token) = receiver.push_token() else {
            warn!(%receiver_id, "Receiver has no FCM token");
            return Ok(Outcome::skipped(SkipReason::MissingToken));
        };

        let sender = directory::fetch_user(directory, sender_id)
            .await?
            .unwrap_or_default();
        let sender_name = sender.display_name_or(UNKNOWN_SENDER);

        let payload = NotificationPayload::builder(
            token,
            NotificationData::friend_request(&event.request_id, sender_id, sender_name),
        )
        .title(REQUEST_TITLE)
        .body(request_body(sender_name))
        .build();

        let message_id = self.notifier.send(&payload).await?;
        info!(%receiver_id, %message_id, "Friend request notification sent successfully");

        Ok(Outcome::Sent {
            message_id,
            recipient_id: receiver_id.to_string(),
        })
    }
}
