//! Management of the configured cleanup phrases.

use super::handler::{BotError, CommandHandler};
use super::types::{CommandResult, IndexError, parse_index};
use crate::store::Store;
use crate::telegram::ChatTransport;

/// Numbered listing of the cleanup phrases.
#[must_use]
pub fn cleanup_list_report(phrases: &[String]) -> String {
    if phrases.is_empty() {
        return "🧹 Cleanup List is Empty! No phrases will be stripped.".to_owned();
    }

    let mut report = vec![format!(
        "🧹 CURRENT CLEANUP STRINGS ({} items) 🧹",
        phrases.len()
    )];
    report.extend(
        phrases
            .iter()
            .enumerate()
            .map(|(i, phrase)| format!("{}. {phrase}", i + 1)),
    );
    report.join("\n")
}

impl<T: ChatTransport, S: Store> CommandHandler<T, S> {
    pub(super) fn cleanup_list_report(&self) -> Result<String, BotError> {
        Ok(cleanup_list_report(
            &self.store.load_config()?.cleanup_strings,
        ))
    }

    pub(super) fn add_cleanup_phrase(&self, phrase: &str) -> Result<CommandResult, BotError> {
        let mut config = self.store.load_config()?;
        config.cleanup_strings.push(phrase.to_owned());
        self.persist_config(&config);
        Ok(CommandResult::success(format!(
            "✅ Cleanup string added: {phrase}"
        )))
    }

    pub(super) fn remove_cleanup_phrase(&self, index: &str) -> Result<CommandResult, BotError> {
        let mut config = self.store.load_config()?;

        match parse_index(index, config.cleanup_strings.len()) {
            Ok(position) => {
                let removed = config.cleanup_strings.remove(position);
                self.persist_config(&config);
                Ok(CommandResult::success(format!(
                    "🗑️ Cleanup string #{} removed: {removed}.",
                    position + 1
                )))
            }
            Err(IndexError::OutOfRange { len }) => Ok(CommandResult::error(format!(
                "❌ Invalid index. Use a number from the /list_cleanup list (1 to {len})."
            ))),
            Err(IndexError::Format) => Ok(CommandResult::error(
                "❌ Invalid format. Please provide a valid number (e.g., /remove_cleanup 2).",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        assert!(cleanup_list_report(&[]).contains("Empty"));
    }

    #[test]
    fn test_numbered_list() {
        let report = cleanup_list_report(&["Shared via Telegram".to_owned(), "#ad".to_owned()]);
        assert_eq!(
            report,
            "🧹 CURRENT CLEANUP STRINGS (2 items) 🧹\n1. Shared via Telegram\n2. #ad"
        );
    }
}
