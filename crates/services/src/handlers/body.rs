use campus_crush_db::models::ChatMessage;

pub const PHOTO_LABEL: &str = "📷 Photo";
pub const VOICE_LABEL: &str = "🎤 Voice message";
pub const EMPTY_MESSAGE_LABEL: &str = "New message";
/// Longest text preview, in characters, before it is cut.
pub const PREVIEW_CHARS: usize = 50;
pub const ELLIPSIS: &str = "...";

/// Notification body for a chat message. Attachments take precedence over
/// text, image before audio.
pub fn message_body(message: &ChatMessage) -> String {
    if message.image().is_some() {
        return PHOTO_LABEL.to_string();
    }
    if message.audio().is_some() {
        return VOICE_LABEL.to_string();
    }
    match message.content() {
        Some(text) => preview(text),
        None => EMPTY_MESSAGE_LABEL.to_string(),
    }
}

pub fn request_body(sender_name: &str) -> String {
    format!("{sender_name} sent you a friend request")
}

// Counts Unicode scalar values rather than UTF-16 units, so a 30-emoji
// message is 30 long and a cut never lands inside a surrogate pair.
fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
