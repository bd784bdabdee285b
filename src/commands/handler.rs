//! Command handler implementation.
//!
//! Every inbound message goes through the same ordered checks:
//! 1. Authorization: only the owner may talk to the bot; anyone else gets a
//!    notice and the bot leaves the chat
//! 2. Content filter: toggle rules may reject the message (with a notice)
//! 3. Large-file short-circuit: oversized attachments are recorded as failed
//!    tasks without looking at their text
//! 4. Dispatch on the parsed command
//!
//! Button presses skip the filter and go to the settings toggle handler.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::tasks::{EchoProcessor, TaskProcessor};
use super::types::{BotCommand, CommandResult};
use crate::config::{BotSettings, MAX_MESSAGE_LENGTH};
use crate::event::{InboundEvent, InboundMessage};
use crate::pipeline::{FilterDecision, check_content, extract_content, split_message};
use crate::store::{BotConfig, FailedTask, Store, StoreError};
use crate::telegram::{ChatTransport, TelegramError};

/// Notice sent to anyone but the owner.
pub const UNAUTHORIZED_NOTICE: &str = "🔒 Unauthorized access denied.";

/// Errors that abort the handling of a single event.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("transport error: {0}")]
    Transport(#[from] TelegramError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Routes inbound events for the single owner and executes commands
/// against persisted state.
pub struct CommandHandler<T, S> {
    /// Outbound chat operations.
    pub(super) transport: T,

    /// Configuration and failed-task persistence.
    pub(super) store: S,

    /// The only user allowed to issue commands, compared as a string.
    owner_id: String,

    /// Target of the wake-up link button.
    pub(super) public_url: String,

    /// Activity log served by `/log`.
    pub(super) log_path: PathBuf,

    /// Large-file threshold, for user-facing notices.
    pub(super) max_file_size_mb: u64,

    /// Does the actual work of a task.
    pub(super) processor: Box<dyn TaskProcessor>,
}

impl<T: ChatTransport, S: Store> CommandHandler<T, S> {
    /// Creates a handler using the default [`EchoProcessor`].
    #[must_use]
    pub fn new(transport: T, store: S, settings: &BotSettings) -> Self {
        Self {
            transport,
            store,
            owner_id: settings.owner_id.clone(),
            public_url: settings.public_url.clone(),
            log_path: settings.log_path.clone(),
            max_file_size_mb: settings.max_file_size_mb,
            processor: Box::new(EchoProcessor),
        }
    }

    /// Replaces the task processor.
    #[must_use]
    pub fn with_processor(mut self, processor: impl TaskProcessor + 'static) -> Self {
        self.processor = Box::new(processor);
        self
    }

    /// The transport this handler sends through.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The store this handler persists to.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Whether `user_id` is the configured owner.
    #[must_use]
    pub fn is_owner(&self, user_id: Option<i64>) -> bool {
        user_id.is_some_and(|id| id.to_string() == self.owner_id)
    }

    /// Handles one event to completion. Never fails: internal errors are
    /// logged and reported to the chat as a generic notice.
    pub async fn handle_event(&self, event: &InboundEvent) {
        let chat_id = event.chat_id();
        let result = match event {
            InboundEvent::Message(message) => self.handle_message(message).await,
            InboundEvent::Callback(callback) => self.handle_callback(callback).await,
        };

        if let Err(e) = result {
            error!("Failed to handle event in chat {}: {}", chat_id, e);
            let notice = format!("⚠️ An error occurred while processing your request: {e}");
            if let Err(send_err) = self.transport.send_text(chat_id, &notice).await {
                error!("Failed to report error to chat {}: {}", chat_id, send_err);
            }
        }
    }

    /// Runs a message through authorization, filtering and dispatch.
    pub async fn handle_message(&self, message: &InboundMessage) -> Result<(), BotError> {
        let chat_id = message.chat_id;

        if !self.is_owner(message.from_user_id) {
            warn!(
                "Unauthorized message from {:?} in chat {}",
                message.from_user_id, chat_id
            );
            self.send_unauthorized_notice(chat_id).await;
            if let Err(e) = self.transport.leave_chat(chat_id).await {
                error!("Failed to leave chat {}: {}", chat_id, e);
            }
            return Ok(());
        }

        let content = extract_content(Some(message));

        let config = self.store.load_config()?;
        if let FilterDecision::Reject(notice) = check_content(&config, &content) {
            if let Some(notice) = notice {
                self.transport.send_text(chat_id, notice).await?;
            }
            return Ok(());
        }

        if content.is_large_file {
            info!("Message {} carries a large file, skipping command parsing", message.message_id);
            self.run_task(chat_id, message.message_id, &content.text, true)
                .await?;
            return Ok(());
        }

        let command = BotCommand::parse(&content.text);
        debug!("Handling command: {}", command);
        self.execute(chat_id, message.message_id, command).await
    }

    /// Executes a parsed command.
    async fn execute(
        &self,
        chat_id: i64,
        message_id: i64,
        command: BotCommand,
    ) -> Result<(), BotError> {
        let name = command.name();
        let result = match command {
            BotCommand::Start => CommandResult::success(self.status_text()?),
            BotCommand::Settings => {
                self.send_settings_menu(chat_id).await?;
                return Ok(());
            }
            BotCommand::RunTask(text) | BotCommand::Task(text) => {
                self.run_task(chat_id, message_id, &text, false).await?;
                self.send_wake_up_link(chat_id).await?;
                return Ok(());
            }
            BotCommand::Finish => {
                self.reply(
                    chat_id,
                    "Batch complete. I'm now awaiting new tasks or going dormant.",
                )
                .await?;
                self.send_wake_up_link(chat_id).await?;
                return Ok(());
            }
            BotCommand::Log => {
                self.send_log(chat_id).await?;
                return Ok(());
            }
            BotCommand::Failed => CommandResult::success(self.failed_tasks_report()?),
            BotCommand::AddTask(content) => match content {
                Some(content) => self.add_manual_task(chat_id, &content)?,
                None => CommandResult::error("❌ Usage: /add_task [content]"),
            },
            BotCommand::RemoveTask(index) => match index {
                Some(index) => self.remove_failed_task(&index)?,
                None => CommandResult::error("❌ Usage: /remove_task [number]"),
            },
            BotCommand::ListCleanup => CommandResult::success(self.cleanup_list_report()?),
            BotCommand::AddCleanup(phrase) => match phrase {
                Some(phrase) => self.add_cleanup_phrase(&phrase)?,
                None => CommandResult::error("❌ Usage: /add_cleanup [phrase to remove]"),
            },
            BotCommand::RemoveCleanup(index) => match index {
                Some(index) => self.remove_cleanup_phrase(&index)?,
                None => CommandResult::error("❌ Usage: /remove_cleanup [number]"),
            },
            BotCommand::Unknown(token) => CommandResult::error(format!(
                "❓ Unknown command: {token}. Send /help for the command list."
            )),
        };

        info!("Command {} result: success={}", name, result.success);
        self.reply(chat_id, &result.message).await
    }

    /// Tells a stranger they are not allowed. Failures are only logged: the
    /// bot may not be allowed to post in that chat at all.
    pub(super) async fn send_unauthorized_notice(&self, chat_id: i64) {
        if let Err(e) = self.transport.send_text(chat_id, UNAUTHORIZED_NOTICE).await {
            warn!("Failed to send unauthorized notice to chat {}: {}", chat_id, e);
        }
    }

    /// Sends text, split into numbered parts when it is too long.
    pub(super) async fn reply(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        for chunk in split_message(text, MAX_MESSAGE_LENGTH) {
            self.transport.send_text(chat_id, &chunk).await?;
        }
        Ok(())
    }

    /// Saves the configuration; failures are logged, never surfaced.
    pub(super) fn persist_config(&self, config: &BotConfig) {
        if let Err(e) = self.store.save_config(config) {
            warn!("Failed to save configuration: {}", e);
        }
    }

    /// Saves the failed-task list; failures are logged, never surfaced.
    pub(super) fn persist_failed_tasks(&self, tasks: &[FailedTask]) {
        if let Err(e) = self.store.save_failed_tasks(tasks) {
            warn!("Failed to save failed tasks: {}", e);
        }
    }
}

impl<T, S> std::fmt::Debug for CommandHandler<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("owner_id", &self.owner_id)
            .field("log_path", &self.log_path)
            .finish_non_exhaustive()
    }
}
