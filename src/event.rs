//! Transient inbound events, independent of the wire format they arrived in.

/// A chat message as seen by the bot.
///
/// At most one of `text`, `caption` and `poll_question` is populated by the
/// platform, but nothing here relies on that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub from_user_id: Option<i64>,
    pub message_id: i64,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub poll_question: Option<String>,
    pub is_sticker: bool,
    pub is_photo: bool,
    pub is_video: bool,
    pub is_document: bool,
    pub is_poll: bool,
    /// An attached file exceeds the configured size limit.
    pub is_large_file: bool,
}

impl InboundMessage {
    /// Creates a plain text message.
    #[must_use]
    pub fn text(chat_id: i64, from_user_id: i64, message_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            from_user_id: Some(from_user_id),
            message_id,
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// A button press on one of the bot's inline keyboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    pub chat_id: i64,
    /// Message carrying the pressed keyboard.
    pub message_id: i64,
    pub from_user_id: Option<i64>,
    /// Opaque button payload.
    pub data: String,
}

/// Anything the bot reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message(InboundMessage),
    Callback(CallbackEvent),
}

impl InboundEvent {
    /// Chat the event originated from.
    #[must_use]
    pub const fn chat_id(&self) -> i64 {
        match self {
            Self::Message(message) => message.chat_id,
            Self::Callback(callback) => callback.chat_id,
        }
    }
}
