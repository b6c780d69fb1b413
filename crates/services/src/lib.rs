pub mod auth;
pub mod directory;
pub mod dispatcher;
pub mod handlers;
pub mod push;
pub mod trigger;

pub use directory::{Directory, DirectoryError};
pub use dispatcher::Dispatcher;
pub use handlers::{MessageNotifier, Outcome, RequestNotifier, SkipReason};
pub use push::{NotificationData, NotificationPayload, Notifier, PushError};
pub use trigger::{DocumentEvent, Trigger, TriggerError};
