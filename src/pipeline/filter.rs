//! Content-type filter driven by the persisted toggles.

use tracing::debug;

use super::ExtractedContent;
use crate::store::BotConfig;

/// Notice sent when a sticker is blocked.
pub const STICKER_BLOCKED_NOTICE: &str =
    "🚫 Sticker processing is currently OFF. Please disable in /settings.";

/// Notice sent when non-media content arrives in photo/video-only mode.
pub const MEDIA_ONLY_NOTICE: &str = "🚫 Filter Active: Photo/Video Only mode is ON. Ignoring \
     non-photo/video content (e.g., text, document, poll, GIF).";

/// Outcome of running a message through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    /// Rejected, optionally with a notice for the chat.
    Reject(Option<&'static str>),
}

/// Applies the toggle rules in priority order; the first match wins.
///
/// 1. Stickers are rejected while sticker blocking is on.
/// 2. In photo/video-only mode anything that is neither is rejected. Commands
///    are rejected quietly so each one does not produce its own notice.
/// 3. Everything else is accepted.
#[must_use]
pub fn check_content(config: &BotConfig, content: &ExtractedContent) -> FilterDecision {
    if content.is_sticker && config.sticker_block_enabled {
        debug!("Rejecting sticker: sticker block is enabled");
        return FilterDecision::Reject(Some(STICKER_BLOCKED_NOTICE));
    }

    if config.photo_video_only_enabled {
        if content.is_photo || content.is_video {
            return FilterDecision::Accept;
        }
        debug!("Rejecting non-media content: photo/video-only mode is enabled");
        let notice = (!content.is_command()).then_some(MEDIA_ONLY_NOTICE);
        return FilterDecision::Reject(notice);
    }

    FilterDecision::Accept
}
