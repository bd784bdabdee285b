//! Offline replay of recorded updates through the real handler.
//!
//! Updates are flat JSON records rather than Bot API payloads, so scenarios
//! are easy to write by hand:
//!
//! ```json
//! [
//!   {"chat_id": -1001234567890, "from_user_id": 12345678, "message_id": 102, "text": "/settings"},
//!   {"chat_id": -1001234567890, "from_user_id": 12345678, "is_callback_query": true, "data": "toggle_photo_video"}
//! ]
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::commands::CommandHandler;
use crate::event::{CallbackEvent, InboundEvent, InboundMessage};
use crate::store::Store;
use crate::telegram::{ChatTransport, RateLimiter};

/// Message a simulated button press refers to when the record names none.
const DEFAULT_MENU_MESSAGE_ID: i64 = 102;

/// Errors loading a scenario file.
#[derive(Debug, Error)]
pub enum SimulateError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One recorded update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimulatedUpdate {
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
    pub is_large_file: bool,
    pub is_callback_query: bool,
    /// Button payload, for callback records.
    pub data: String,
    /// Message carrying the pressed keyboard, for callback records.
    pub menu_message_id: Option<i64>,
}

impl From<SimulatedUpdate> for InboundEvent {
    fn from(update: SimulatedUpdate) -> Self {
        if update.is_callback_query {
            return Self::Callback(CallbackEvent {
                chat_id: update.chat_id,
                message_id: update.menu_message_id.unwrap_or(DEFAULT_MENU_MESSAGE_ID),
                from_user_id: update.from_user_id,
                data: update.data,
            });
        }

        Self::Message(InboundMessage {
            chat_id: update.chat_id,
            from_user_id: update.from_user_id,
            message_id: update.message_id,
            text: update.text,
            caption: update.caption,
            poll_question: update.poll_question,
            is_sticker: update.is_sticker,
            is_photo: update.is_photo,
            is_video: update.is_video,
            is_document: update.is_document,
            is_poll: update.is_poll,
            is_large_file: update.is_large_file,
        })
    }
}

/// Parses a scenario from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not a JSON list of update records.
pub fn parse_updates(json: &str, origin: &str) -> Result<Vec<SimulatedUpdate>, SimulateError> {
    serde_json::from_str(json).map_err(|source| SimulateError::Parse {
        path: origin.to_owned(),
        source,
    })
}

/// Loads a scenario file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_updates(path: &Path) -> Result<Vec<SimulatedUpdate>, SimulateError> {
    let origin = path.display().to_string();
    let json = std::fs::read_to_string(path).map_err(|source| SimulateError::Io {
        path: origin.clone(),
        source,
    })?;
    parse_updates(&json, &origin)
}

/// Feeds every update to `handler` in order, spaced by `interval`.
pub async fn replay<T: ChatTransport, S: Store>(
    handler: &CommandHandler<T, S>,
    updates: Vec<SimulatedUpdate>,
    interval: Duration,
) {
    let pacing = RateLimiter::new(interval);
    let total = updates.len();

    for (i, update) in updates.into_iter().enumerate() {
        pacing.acquire().await;
        info!("Simulated update {}/{}", i + 1, total);
        handler.handle_event(&update.into()).await;
    }

    info!("Simulated update queue processed");
}
