//! `/log`: serves the tail of the activity log as a document.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::error;

use super::handler::{BotError, CommandHandler};
use crate::config::LOG_TAIL_LINES;
use crate::logging::LOG_MAX_BYTES;
use crate::store::Store;
use crate::telegram::ChatTransport;

/// Reads the last `max_lines` lines of a text file, line endings preserved.
///
/// At most [`LOG_MAX_BYTES`] from the end of the file are read.
pub fn read_log_tail(path: &Path, max_lines: usize) -> std::io::Result<String> {
    read_tail(path, max_lines, LOG_MAX_BYTES)
}

fn read_tail(path: &Path, max_lines: usize, max_bytes: u64) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let start = len.saturating_sub(max_bytes);

    // One byte of lookbehind tells whether `start` begins a line.
    let mut bytes = Vec::new();
    file.seek(SeekFrom::Start(start.saturating_sub(1)))?;
    file.read_to_end(&mut bytes)?;

    let (starts_line, body) = match bytes.split_first() {
        Some((&before, rest)) if start > 0 => (before == b'\n', rest),
        _ => (true, bytes.as_slice()),
    };
    let content = String::from_utf8_lossy(body);

    let mut lines: Vec<&str> = content.split_inclusive('\n').collect();
    if !starts_line && !lines.is_empty() {
        lines.remove(0);
    }
    let first = lines.len().saturating_sub(max_lines);
    Ok(lines[first..].concat())
}

impl<T: ChatTransport, S: Store> CommandHandler<T, S> {
    /// Sends the log tail, reporting a missing file and other failures
    /// as distinct notices.
    pub(super) async fn send_log(&self, chat_id: i64) -> Result<(), BotError> {
        let filename = self
            .log_path
            .file_name()
            .map_or_else(|| "bot_activity.log".to_owned(), |n| n.to_string_lossy().into_owned());

        let content = match read_log_tail(&self.log_path, LOG_TAIL_LINES) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.reply(chat_id, "❌ Log file not found.").await?;
                return Ok(());
            }
            Err(e) => {
                error!("Error reading log file: {}", e);
                self.reply(
                    chat_id,
                    &format!("❌ An error occurred while fetching the log: {e}"),
                )
                .await?;
                return Ok(());
            }
        };

        if let Err(e) = self
            .transport
            .send_document(chat_id, content.into_bytes(), &filename)
            .await
        {
            error!("Error sending log file: {}", e);
            self.reply(
                chat_id,
                &format!("❌ An error occurred while fetching the log: {e}"),
            )
            .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_of_long_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bot_activity.log");
        let content: String = (1..=1500).map(|i| format!("line {i}\n")).collect();
        std::fs::write(&path, content).expect("write");

        let tail = read_log_tail(&path, 1000).expect("tail");
        assert_eq!(tail.lines().count(), 1000);
        assert!(tail.starts_with("line 501\n"));
        assert!(tail.ends_with("line 1500\n"));
    }

    #[test]
    fn test_short_file_is_returned_whole() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bot_activity.log");
        std::fs::write(&path, "a\nb").expect("write");

        assert_eq!(read_log_tail(&path, 1000).expect("tail"), "a\nb");
    }

    #[test]
    fn test_oversized_file_reads_only_the_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bot_activity.log");
        std::fs::write(&path, "first line\nsecond\nthird\n").expect("write");

        // The last 10 bytes start inside "second".
        assert_eq!(read_tail(&path, 1000, 10).expect("tail"), "third\n");
        // The last 13 bytes start exactly at "second".
        assert_eq!(read_tail(&path, 1000, 13).expect("tail"), "second\nthird\n");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_log_tail(&dir.path().join("missing.log"), 10).expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
