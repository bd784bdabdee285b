//! Normalizes an inbound message into text plus content-type flags.

use crate::event::InboundMessage;

/// Uniform view of a message's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    pub is_sticker: bool,
    pub is_photo: bool,
    pub is_video: bool,
    pub is_document: bool,
    pub is_large_file: bool,
}

impl ExtractedContent {
    /// Whether the text is addressed to the command router.
    #[must_use]
    pub fn is_command(&self) -> bool {
        self.text.starts_with('/')
    }
}

/// Extracts content from a possibly absent message. Never fails.
///
/// Text precedence is caption, then plain text, then poll question; the first
/// non-empty one wins. A missing message yields empty text and no flags.
#[must_use]
pub fn extract_content(message: Option<&InboundMessage>) -> ExtractedContent {
    let Some(message) = message else {
        return ExtractedContent::default();
    };

    let text = [&message.caption, &message.text, &message.poll_question]
        .into_iter()
        .filter_map(Option::as_deref)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_owned();

    ExtractedContent {
        text,
        is_sticker: message.is_sticker,
        is_photo: message.is_photo,
        is_video: message.is_video,
        is_document: message.is_document,
        is_large_file: message.is_large_file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message() {
        assert_eq!(extract_content(None), ExtractedContent::default());
    }

    #[test]
    fn test_caption_wins_over_text() {
        let message = InboundMessage {
            caption: Some("caption".to_owned()),
            text: Some("text".to_owned()),
            is_photo: true,
            ..InboundMessage::default()
        };
        let content = extract_content(Some(&message));
        assert_eq!(content.text, "caption");
        assert!(content.is_photo);
    }

    #[test]
    fn test_empty_caption_falls_through() {
        let message = InboundMessage {
            caption: Some(String::new()),
            text: Some("/start".to_owned()),
            ..InboundMessage::default()
        };
        let content = extract_content(Some(&message));
        assert_eq!(content.text, "/start");
        assert!(content.is_command());
    }

    #[test]
    fn test_poll_question_used_last() {
        let message = InboundMessage {
            poll_question: Some("What is your favorite color?".to_owned()),
            is_poll: true,
            ..InboundMessage::default()
        };
        let content = extract_content(Some(&message));
        assert_eq!(content.text, "What is your favorite color?");
        assert!(!content.is_photo && !content.is_video && !content.is_sticker);
    }

    #[test]
    fn test_flags_without_text() {
        let message = InboundMessage {
            is_document: true,
            is_large_file: true,
            ..InboundMessage::default()
        };
        let content = extract_content(Some(&message));
        assert!(content.text.is_empty());
        assert!(content.is_document);
        assert!(content.is_large_file);
    }
}
