//! Offline transport that logs and records every call.
//!
//! Backs `--simulate` runs and the handler tests. Message ids are handed out
//! sequentially, starting after 1000.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use super::client::truncate_for_log;
use super::transport::{ChatTransport, InlineKeyboard, TelegramError};

const FIRST_MESSAGE_ID: i64 = 1000;

/// A call made against [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentItem {
    Text {
        chat_id: i64,
        text: String,
    },
    Document {
        chat_id: i64,
        filename: String,
        content: Vec<u8>,
    },
    Keyboard {
        chat_id: i64,
        message_id: i64,
        text: String,
        keyboard: InlineKeyboard,
    },
    EditMarkup {
        chat_id: i64,
        message_id: i64,
        keyboard: InlineKeyboard,
    },
    Delete {
        chat_id: i64,
        message_id: i64,
    },
    Leave {
        chat_id: i64,
    },
}

/// Records outbound calls instead of sending them.
#[derive(Debug)]
pub struct MockTransport {
    next_message_id: AtomicI64,
    sent: Mutex<Vec<SentItem>>,
    fail_texts: AtomicBool,
    fail_documents: AtomicBool,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            next_message_id: AtomicI64::new(FIRST_MESSAGE_ID),
            sent: Mutex::new(Vec::new()),
            fail_texts: AtomicBool::new(false),
            fail_documents: AtomicBool::new(false),
        }
    }
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent text messages fail, as in a chat the bot may not
    /// post in.
    pub fn fail_texts(&self) {
        self.fail_texts.store(true, Ordering::SeqCst);
    }

    /// Makes subsequent document uploads fail.
    pub fn fail_documents(&self) {
        self.fail_documents.store(true, Ordering::SeqCst);
    }

    /// Everything sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentItem> {
        self.items().clone()
    }

    /// Texts sent so far, keyboards excluded.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.items()
            .iter()
            .filter_map(|item| match item {
                SentItem::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.items().clear();
    }

    fn items(&self) -> MutexGuard<'_, Vec<SentItem>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(&self) -> i64 {
        self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record(&self, item: SentItem) {
        self.items().push(item);
    }
}

impl ChatTransport for MockTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<i64, TelegramError> {
        if self.fail_texts.load(Ordering::SeqCst) {
            return Err(TelegramError::Api {
                code: 403,
                description: "Forbidden: not enough rights to send text messages".to_owned(),
            });
        }
        let message_id = self.next_id();
        info!(
            "MOCK: message {} to chat {}: \"{}\"",
            message_id,
            chat_id,
            truncate_for_log(text, 50)
        );
        self.record(SentItem::Text {
            chat_id,
            text: text.to_owned(),
        });
        Ok(message_id)
    }

    async fn send_document(
        &self,
        chat_id: i64,
        content: Vec<u8>,
        filename: &str,
    ) -> Result<(), TelegramError> {
        if self.fail_documents.load(Ordering::SeqCst) {
            return Err(TelegramError::Api {
                code: 413,
                description: "Request Entity Too Large".to_owned(),
            });
        }
        info!("MOCK: document '{}' to chat {}", filename, chat_id);
        self.record(SentItem::Document {
            chat_id,
            filename: filename.to_owned(),
            content,
        });
        Ok(())
    }

    async fn send_inline_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<i64, TelegramError> {
        let message_id = self.next_id();
        info!(
            "MOCK: keyboard message {} ({} buttons) to chat {}",
            message_id,
            keyboard.buttons().count(),
            chat_id
        );
        self.record(SentItem::Keyboard {
            chat_id,
            message_id,
            text: text.to_owned(),
            keyboard: keyboard.clone(),
        });
        Ok(message_id)
    }

    async fn edit_markup(
        &self,
        chat_id: i64,
        message_id: i64,
        keyboard: &InlineKeyboard,
    ) -> Result<(), TelegramError> {
        info!("MOCK: edit markup of message {} in chat {}", message_id, chat_id);
        self.record(SentItem::EditMarkup {
            chat_id,
            message_id,
            keyboard: keyboard.clone(),
        });
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        info!("MOCK: delete message {} in chat {}", message_id, chat_id);
        self.record(SentItem::Delete {
            chat_id,
            message_id,
        });
        Ok(())
    }

    async fn leave_chat(&self, chat_id: i64) -> Result<(), TelegramError> {
        warn!("MOCK: leaving chat {}", chat_id);
        self.record(SentItem::Leave { chat_id });
        Ok(())
    }
}
