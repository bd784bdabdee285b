//! Bot API wire types and their conversion into inbound events.

use serde::Deserialize;

use crate::event::{CallbackEvent, InboundEvent, InboundMessage};

/// Envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub sticker: Option<FileInfo>,
    #[serde(default)]
    pub photo: Option<Vec<FileInfo>>,
    #[serde(default)]
    pub video: Option<FileInfo>,
    #[serde(default)]
    pub document: Option<FileInfo>,
    #[serde(default)]
    pub poll: Option<Poll>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

/// The subset shared by stickers, photo sizes, videos and documents.
#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Poll {
    pub question: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

/// Minimal `sendMessage` result, used to learn the new message id.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

impl FileInfo {
    fn exceeds(&self, max_bytes: u64) -> bool {
        self.file_size.is_some_and(|size| size > max_bytes)
    }
}

impl Message {
    /// Converts the wire message, flagging attachments above `max_file_bytes`.
    ///
    /// For photos only the largest size (the last one) is checked.
    #[must_use]
    pub fn into_inbound(self, max_file_bytes: u64) -> InboundMessage {
        let is_large_file = self.document.as_ref().is_some_and(|d| d.exceeds(max_file_bytes))
            || self.video.as_ref().is_some_and(|v| v.exceeds(max_file_bytes))
            || self
                .photo
                .as_ref()
                .and_then(|sizes| sizes.last())
                .is_some_and(|p| p.exceeds(max_file_bytes));

        InboundMessage {
            chat_id: self.chat.id,
            from_user_id: self.from.map(|u| u.id),
            message_id: self.message_id,
            is_sticker: self.sticker.is_some(),
            is_photo: self.photo.is_some(),
            is_video: self.video.is_some(),
            is_document: self.document.is_some(),
            is_poll: self.poll.is_some(),
            is_large_file,
            text: self.text,
            caption: self.caption,
            poll_question: self.poll.map(|p| p.question),
        }
    }
}

impl Update {
    /// Converts the update into an event, or `None` for update kinds the bot
    /// does not handle (and callbacks detached from a message).
    #[must_use]
    pub fn into_event(self, max_file_bytes: u64) -> Option<InboundEvent> {
        if let Some(query) = self.callback_query {
            let message = query.message?;
            return Some(InboundEvent::Callback(CallbackEvent {
                chat_id: message.chat.id,
                message_id: message.message_id,
                from_user_id: Some(query.from.id),
                data: query.data.unwrap_or_default(),
            }));
        }

        self.message
            .map(|m| InboundEvent::Message(m.into_inbound(max_file_bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 20 * 1024 * 1024;

    fn update(json: serde_json::Value) -> Update {
        serde_json::from_value(json).expect("valid update")
    }

    #[test]
    fn test_text_message() {
        let event = update(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 7,
                "chat": {"id": -1001234567890_i64, "type": "supergroup"},
                "from": {"id": 42, "is_bot": false},
                "text": "/start"
            }
        }))
        .into_event(LIMIT);

        let Some(InboundEvent::Message(message)) = event else {
            panic!("expected a message event");
        };
        assert_eq!(message.chat_id, -1_001_234_567_890);
        assert_eq!(message.from_user_id, Some(42));
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert!(!message.is_large_file);
    }

    #[test]
    fn test_large_photo_checks_last_size() {
        let event = update(serde_json::json!({
            "update_id": 2,
            "message": {
                "message_id": 8,
                "chat": {"id": 5},
                "photo": [
                    {"file_id": "small", "file_size": 1000},
                    {"file_id": "big", "file_size": LIMIT + 1}
                ],
                "caption": "holiday"
            }
        }))
        .into_event(LIMIT);

        let Some(InboundEvent::Message(message)) = event else {
            panic!("expected a message event");
        };
        assert!(message.is_photo);
        assert!(message.is_large_file);
        assert_eq!(message.caption.as_deref(), Some("holiday"));
    }

    #[test]
    fn test_document_without_size_is_not_large() {
        let event = update(serde_json::json!({
            "update_id": 3,
            "message": {
                "message_id": 9,
                "chat": {"id": 5},
                "document": {"file_id": "doc"}
            }
        }))
        .into_event(LIMIT);

        let Some(InboundEvent::Message(message)) = event else {
            panic!("expected a message event");
        };
        assert!(message.is_document);
        assert!(!message.is_large_file);
    }

    #[test]
    fn test_poll_and_sticker_flags() {
        let event = update(serde_json::json!({
            "update_id": 4,
            "message": {
                "message_id": 10,
                "chat": {"id": 5},
                "poll": {"id": "p", "question": "Favorite color?"}
            }
        }))
        .into_event(LIMIT);

        let Some(InboundEvent::Message(message)) = event else {
            panic!("expected a message event");
        };
        assert!(message.is_poll);
        assert_eq!(message.poll_question.as_deref(), Some("Favorite color?"));
    }

    #[test]
    fn test_callback_query() {
        let event = update(serde_json::json!({
            "update_id": 5,
            "callback_query": {
                "id": "q1",
                "from": {"id": 42},
                "message": {"message_id": 102, "chat": {"id": 5}},
                "data": "toggle_photo_video"
            }
        }))
        .into_event(LIMIT);

        assert_eq!(
            event,
            Some(InboundEvent::Callback(CallbackEvent {
                chat_id: 5,
                message_id: 102,
                from_user_id: Some(42),
                data: "toggle_photo_video".to_owned(),
            }))
        );
    }

    #[test]
    fn test_unhandled_update_kind() {
        let event = update(serde_json::json!({"update_id": 6})).into_event(LIMIT);
        assert_eq!(event, None);
    }

    #[test]
    fn test_error_envelope() {
        let response: ApiResponse<SentMessage> = serde_json::from_value(serde_json::json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        }))
        .expect("valid envelope");

        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.error_code, Some(400));
    }
}
