//! The chat transport port and the inline keyboard model.

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during chat transport operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("Failed to decode API response: {0}")]
    Decode(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// A single inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InlineButton {
    /// Button that sends `data` back as a callback query.
    #[must_use]
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            url: None,
        }
    }

    /// Button that opens `url`.
    #[must_use]
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: Some(url.into()),
        }
    }
}

/// Inline keyboard markup, serialized in Bot API `reply_markup` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// Keyboard with one button per row.
    #[must_use]
    pub fn single_column(buttons: impl IntoIterator<Item = InlineButton>) -> Self {
        Self {
            inline_keyboard: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    /// All buttons, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.inline_keyboard.iter().flatten()
    }
}

/// Outbound operations against the chat platform.
///
/// Implementations own rate limiting: every call may pause before it is sent.
pub trait ChatTransport: Send + Sync {
    /// Sends a text message and returns its message id.
    fn send_text(
        &self,
        chat_id: i64,
        text: &str,
    ) -> impl Future<Output = Result<i64, TelegramError>> + Send;

    /// Uploads an in-memory document.
    fn send_document(
        &self,
        chat_id: i64,
        content: Vec<u8>,
        filename: &str,
    ) -> impl Future<Output = Result<(), TelegramError>> + Send;

    /// Sends a message carrying an inline keyboard and returns its message id.
    fn send_inline_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> impl Future<Output = Result<i64, TelegramError>> + Send;

    /// Replaces the keyboard of an existing message.
    fn edit_markup(
        &self,
        chat_id: i64,
        message_id: i64,
        keyboard: &InlineKeyboard,
    ) -> impl Future<Output = Result<(), TelegramError>> + Send;

    /// Deletes a message previously sent by the bot.
    fn delete_message(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> impl Future<Output = Result<(), TelegramError>> + Send;

    /// Makes the bot leave a chat.
    fn leave_chat(&self, chat_id: i64) -> impl Future<Output = Result<(), TelegramError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_serializes_to_bot_api_shape() {
        let keyboard = InlineKeyboard::single_column([
            InlineButton::callback("Stickers: ON", "toggle_stickers"),
            InlineButton::url("Wake up", "https://example.com"),
        ]);

        let json = serde_json::to_value(&keyboard).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "inline_keyboard": [
                    [{"text": "Stickers: ON", "callback_data": "toggle_stickers"}],
                    [{"text": "Wake up", "url": "https://example.com"}]
                ]
            })
        );
    }

    #[test]
    fn test_buttons_iterates_rows_in_order() {
        let keyboard = InlineKeyboard::single_column([
            InlineButton::callback("a", "1"),
            InlineButton::callback("b", "2"),
        ]);
        let texts: Vec<&str> = keyboard.buttons().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, ["a", "b"]);
    }
}
