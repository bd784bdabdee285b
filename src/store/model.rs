//! Persisted documents: the configuration singleton and failed-task records.

use serde::{Deserialize, Serialize};

/// Phrase stripped from relayed content out of the box.
const DEFAULT_CLEANUP_PHRASE: &str = "Shared via Telegram";

/// Persisted bot configuration.
///
/// Every field falls back to its default when absent from the stored
/// document, so a partial or empty file never produces a lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Reject sticker content.
    #[serde(rename = "STICKER_BLOCK_ENABLED")]
    pub sticker_block_enabled: bool,

    /// Accept only photo/video content.
    #[serde(rename = "PHOTO_VIDEO_ONLY_ENABLED")]
    pub photo_video_only_enabled: bool,

    /// Phrases stripped from processed text, applied in list order.
    #[serde(rename = "CLEANUP_STRINGS")]
    pub cleanup_strings: Vec<String>,

    /// Message id of the most recent wake-up link.
    #[serde(rename = "LAST_LINK_MESSAGE_ID")]
    pub last_link_message_id: Option<i64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            sticker_block_enabled: true,
            photo_video_only_enabled: false,
            cleanup_strings: vec![DEFAULT_CLEANUP_PHRASE.to_owned()],
            last_link_message_id: None,
        }
    }
}

impl BotConfig {
    /// Reads a toggle.
    #[must_use]
    pub const fn flag(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::StickerBlock => self.sticker_block_enabled,
            Toggle::PhotoVideoOnly => self.photo_video_only_enabled,
        }
    }

    /// Writes a toggle.
    pub const fn set_flag(&mut self, toggle: Toggle, value: bool) {
        match toggle {
            Toggle::StickerBlock => self.sticker_block_enabled = value,
            Toggle::PhotoVideoOnly => self.photo_video_only_enabled = value,
        }
    }
}

/// The two boolean settings exposed on the settings keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    StickerBlock,
    PhotoVideoOnly,
}

impl Toggle {
    /// All toggles in keyboard order.
    pub const ALL: [Self; 2] = [Self::StickerBlock, Self::PhotoVideoOnly];

    /// Looks a toggle up by its button payload.
    #[must_use]
    pub fn from_callback_data(data: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.callback_data() == data)
    }

    /// Button payload identifying this toggle.
    #[must_use]
    pub const fn callback_data(self) -> &'static str {
        match self {
            Self::StickerBlock => "toggle_stickers",
            Self::PhotoVideoOnly => "toggle_photo_video",
        }
    }

    /// Human label used on buttons and confirmations.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StickerBlock => "Stickers",
            Self::PhotoVideoOnly => "Photo/Video Only",
        }
    }

    /// Name of the persisted key backing this toggle.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::StickerBlock => "STICKER_BLOCK_ENABLED",
            Self::PhotoVideoOnly => "PHOTO_VIDEO_ONLY_ENABLED",
        }
    }
}

/// Renders a boolean the way status texts and buttons show it.
#[must_use]
pub const fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

/// A task that could not be completed automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTask {
    /// Local time of the failure, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub chat_id: i64,
    /// Source message, `0` for manual entries.
    pub message_id: i64,
    pub reason: String,
    pub content_preview: String,
}

impl FailedTask {
    /// Creates a record stamped with the current local time.
    #[must_use]
    pub fn now(
        chat_id: i64,
        message_id: i64,
        reason: impl Into<String>,
        content_preview: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            chat_id,
            message_id,
            reason: reason.into(),
            content_preview: content_preview.into(),
        }
    }
}

/// Builds the preview stored with a failed task: the first 30 characters
/// followed by an ellipsis.
#[must_use]
pub fn content_preview(content: &str) -> String {
    format!("{}...", content.chars().take(30).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: BotConfig = serde_json::from_str(r#"{"PHOTO_VIDEO_ONLY_ENABLED": true}"#)
            .expect("partial document should parse");
        assert!(config.photo_video_only_enabled);
        assert!(config.sticker_block_enabled);
        assert_eq!(config.cleanup_strings, vec!["Shared via Telegram".to_owned()]);
        assert_eq!(config.last_link_message_id, None);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(BotConfig::default()).expect("serializes");
        assert_eq!(json["STICKER_BLOCK_ENABLED"], true);
        assert_eq!(json["PHOTO_VIDEO_ONLY_ENABLED"], false);
        assert!(json["LAST_LINK_MESSAGE_ID"].is_null());
    }

    #[test]
    fn test_toggle_lookup() {
        assert_eq!(
            Toggle::from_callback_data("toggle_stickers"),
            Some(Toggle::StickerBlock)
        );
        assert_eq!(
            Toggle::from_callback_data("toggle_photo_video"),
            Some(Toggle::PhotoVideoOnly)
        );
        assert_eq!(Toggle::from_callback_data("toggle_polls"), None);
    }

    #[test]
    fn test_set_flag_only_touches_one_key() {
        let mut config = BotConfig::default();
        config.set_flag(Toggle::PhotoVideoOnly, true);
        assert!(config.flag(Toggle::PhotoVideoOnly));
        assert!(config.flag(Toggle::StickerBlock));
    }

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short"), "short...");
        let long = "x".repeat(50);
        assert_eq!(content_preview(&long), format!("{}...", "x".repeat(30)));
        assert_eq!(content_preview("Привет мир"), "Привет мир...");
    }
}
