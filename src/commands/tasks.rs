//! Task execution, the failed-task list and the wake-up link.

use thiserror::Error;
use tracing::{error, info, warn};

use super::handler::{BotError, CommandHandler};
use super::types::{CommandResult, IndexError, parse_index};
use crate::pipeline::clean_text;
use crate::store::{FailedTask, Store, content_preview};
use crate::telegram::{ChatTransport, InlineButton, InlineKeyboard};

/// Preview stored for tasks whose content cleaned down to nothing.
const NO_CONTENT_PREVIEW: &str = "[No content]";

const WAKE_UP_TEXT: &str = "😴 BOT SLEEPING 😴\n\n\
     I have completed all pending tasks and will go dormant shortly.\n\
     To wake me up instantly when you need me again, please click the link below.";

/// Why a task could not be completed.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Nothing left to process after cleanup")]
    EmptyContent,

    #[error("{0}")]
    Failed(String),
}

/// Does the work behind a task.
pub trait TaskProcessor: Send + Sync {
    /// Processes already-cleaned content and returns the result text.
    fn process(&self, content: &str) -> Result<String, TaskError>;
}

/// Returns the cleaned content unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoProcessor;

impl TaskProcessor for EchoProcessor {
    fn process(&self, content: &str) -> Result<String, TaskError> {
        if content.is_empty() {
            return Err(TaskError::EmptyContent);
        }
        Ok(content.to_owned())
    }
}

/// Builds a link to a source message, when the chat allows one.
///
/// Only supergroups/channels (`-100…` ids) have public message links;
/// manual entries (message id 0) never link anywhere.
#[must_use]
pub fn source_link(chat_id: i64, message_id: i64) -> Option<String> {
    if message_id == 0 {
        return None;
    }
    chat_id
        .to_string()
        .strip_prefix("-100")
        .filter(|internal| !internal.is_empty())
        .map(|internal| format!("https://t.me/c/{internal}/{message_id}"))
}

/// Numbered report of the failed-task list.
#[must_use]
pub fn failed_tasks_report(tasks: &[FailedTask]) -> String {
    if tasks.is_empty() {
        return "🎉 Failed Task List is Clean! No tasks are awaiting manual retry.".to_owned();
    }

    let mut report = vec![format!("⚠️ FAILED TASKS REPORT ({} items) ⚠️", tasks.len())];
    for (i, task) in tasks.iter().enumerate() {
        let timestamp: String = task.timestamp.chars().take(19).collect();
        report.push(format!("{}. [{}] Reason: {}", i + 1, timestamp, task.reason));
        report.push(format!("Content: {}", task.content_preview));
        if let Some(link) = source_link(task.chat_id, task.message_id) {
            report.push(format!("🔗 Source: {link}"));
        }
        report.push(String::new());
    }

    report.join("\n").trim_end().to_owned()
}

impl<T: ChatTransport, S: Store> CommandHandler<T, S> {
    /// Executes a task on `text`.
    ///
    /// Large files are refused outright. Otherwise the text is cleaned and
    /// processed; a processing failure is recorded in the failed-task list.
    pub async fn run_task(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        is_large_file: bool,
    ) -> Result<(), BotError> {
        if is_large_file {
            let reason = format!(
                "RESOURCE EXHAUSTION BLOCK: Incoming file exceeds {}MB safety limit.",
                self.max_file_size_mb
            );
            error!("Task failed due to large file: message {}", message_id);
            let preview = if text.is_empty() {
                "LARGE FILE BLOCKED".to_owned()
            } else {
                content_preview(text)
            };
            self.record_failure(FailedTask::now(chat_id, message_id, &reason, preview))?;
            self.reply(chat_id, &format!("🛑 FAILURE: {reason}")).await?;
            return Ok(());
        }

        let config = self.store.load_config()?;
        let cleaned = clean_text(text, &config.cleanup_strings);
        info!(
            "Processing message {}. Cleaned content: \"{}\"",
            message_id,
            cleaned.chars().take(50).collect::<String>()
        );

        match self.processor.process(&cleaned) {
            Ok(output) => {
                self.reply(
                    chat_id,
                    &format!("✅ TASK COMPLETE\nOriginal Content:\n\n{output}"),
                )
                .await
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("Task failed persistently: {}", reason);
                let preview = if cleaned.is_empty() {
                    NO_CONTENT_PREVIEW.to_owned()
                } else {
                    content_preview(&cleaned)
                };
                self.record_failure(FailedTask::now(chat_id, message_id, &reason, preview))?;
                self.reply(
                    chat_id,
                    &format!(
                        "⚠️ Task failed. Reason: {reason}. It has been added to the /failed list."
                    ),
                )
                .await
            }
        }
    }

    fn record_failure(&self, task: FailedTask) -> Result<(), BotError> {
        let mut tasks = self.store.load_failed_tasks()?;
        tasks.push(task);
        self.persist_failed_tasks(&tasks);
        Ok(())
    }

    /// Replaces the previous wake-up link with a fresh one and remembers its id.
    pub async fn send_wake_up_link(&self, chat_id: i64) -> Result<i64, BotError> {
        let mut config = self.store.load_config()?;

        if let Some(previous) = config.last_link_message_id
            && let Err(e) = self.transport.delete_message(chat_id, previous).await
        {
            // Already deleted by the user, or too old to delete.
            warn!("Could not delete previous wake-up link {}: {}", previous, e);
        }

        let keyboard = InlineKeyboard::single_column([InlineButton::url(
            "🚀 Click to WAKE UP",
            self.public_url.as_str(),
        )]);
        let message_id = self
            .transport
            .send_inline_keyboard(chat_id, WAKE_UP_TEXT, &keyboard)
            .await?;

        config.last_link_message_id = Some(message_id);
        self.persist_config(&config);
        info!("Wake-up link sent as message {}", message_id);

        Ok(message_id)
    }

    pub(super) fn failed_tasks_report(&self) -> Result<String, BotError> {
        Ok(failed_tasks_report(&self.store.load_failed_tasks()?))
    }

    pub(super) fn add_manual_task(
        &self,
        chat_id: i64,
        content: &str,
    ) -> Result<CommandResult, BotError> {
        let preview = content_preview(content);
        self.record_failure(FailedTask::now(chat_id, 0, "MANUAL ENTRY", preview.clone()))?;
        Ok(CommandResult::success(format!("✅ Manual task added: {preview}")))
    }

    pub(super) fn remove_failed_task(&self, index: &str) -> Result<CommandResult, BotError> {
        let mut tasks = self.store.load_failed_tasks()?;

        match parse_index(index, tasks.len()) {
            Ok(position) => {
                let removed = tasks.remove(position);
                self.persist_failed_tasks(&tasks);
                Ok(CommandResult::success(format!(
                    "🗑️ Task #{} removed successfully. Reason: {}.",
                    position + 1,
                    removed.reason
                )))
            }
            Err(IndexError::OutOfRange { len }) => Ok(CommandResult::error(format!(
                "❌ Invalid index. Please use a number from the /failed list (1 to {len})."
            ))),
            Err(IndexError::Format) => Ok(CommandResult::error(
                "❌ Invalid format. Please provide a valid number (e.g., /remove_task 3).",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(chat_id: i64, message_id: i64, reason: &str) -> FailedTask {
        FailedTask {
            timestamp: "2026-10-19 12:00:00".to_owned(),
            chat_id,
            message_id,
            reason: reason.to_owned(),
            content_preview: "hello...".to_owned(),
        }
    }

    #[test]
    fn test_echo_processor() {
        assert_eq!(EchoProcessor.process("hi").ok(), Some("hi".to_owned()));
        assert!(matches!(
            EchoProcessor.process(""),
            Err(TaskError::EmptyContent)
        ));
    }

    #[test]
    fn test_source_link() {
        assert_eq!(
            source_link(-1_001_234_567_890, 101),
            Some("https://t.me/c/1234567890/101".to_owned())
        );
        assert_eq!(source_link(-1_001_234_567_890, 0), None);
        assert_eq!(source_link(42, 7), None);
    }

    #[test]
    fn test_empty_report() {
        assert!(failed_tasks_report(&[]).contains("Clean"));
    }

    #[test]
    fn test_report_numbers_in_append_order() {
        let report = failed_tasks_report(&[
            task(-1_001_234_567_890, 106, "Timeout"),
            task(42, 0, "MANUAL ENTRY"),
        ]);

        assert!(report.starts_with("⚠️ FAILED TASKS REPORT (2 items)"));
        assert!(report.contains("1. [2026-10-19 12:00:00] Reason: Timeout"));
        assert!(report.contains("2. [2026-10-19 12:00:00] Reason: MANUAL ENTRY"));
        assert!(report.contains("https://t.me/c/1234567890/106"));
        assert_eq!(report.matches("🔗").count(), 1);
        assert!(report.find("Timeout") < report.find("MANUAL ENTRY"));
    }
}
