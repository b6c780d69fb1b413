use std::sync::Arc;

use tracing::{Instrument, debug, error, info_span};
use uuid::Uuid;

use crate::directory::Directory;
use crate::handlers::{MessageNotifier, Outcome, RequestNotifier};
use crate::push::Notifier;
use crate::trigger::{DocumentEvent, Trigger};

/// Routes document events to the handler registered for their path.
pub struct Dispatcher {
    messages: MessageNotifier,
    requests: RequestNotifier,
}

impl Dispatcher {
    pub fn new(directory: Arc<dyn Directory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            messages: MessageNotifier::new(directory.clone(), notifier.clone()),
            requests: RequestNotifier::new(directory, notifier),
        }
    }

    /// Handles one invocation. Every event yields an outcome; nothing is
    /// raised back to the caller.
    pub async fn dispatch(&self, event: DocumentEvent) -> Outcome {
        let document = event.value.relative_path().to_string();
        let span = info_span!("invocation", id = %Uuid::new_v4(), %document);

        async move {
            match Trigger::from_event(event) {
                Ok(Some(Trigger::MessageCreated(created))) => self.messages.handle(created).await,
                Ok(Some(Trigger::RequestCreated(created))) => self.requests.handle(created).await,
                Ok(None) => {
                    debug!("No handler for event");
                    Outcome::Ignored { document }
                }
                Err(e) => {
                    error!(error = %e, "Cannot decode trigger event");
                    Outcome::Failed {
                        error: e.to_string(),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}
