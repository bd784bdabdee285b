//! Command types and definitions.

use std::fmt;

/// Everything an accepted owner message can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Show the status summary and command list (`/start`, `/help`).
    Start,

    /// Show the inline toggle menu.
    Settings,

    /// Run a task on the given text.
    RunTask(String),

    /// Announce the end of a batch.
    Finish,

    /// Send the tail of the activity log as a document.
    Log,

    /// Show the failed-task list.
    Failed,

    /// Record a manual failed task. `None` when the argument is missing.
    AddTask(Option<String>),

    /// Remove a failed task by 1-based index (still unparsed).
    RemoveTask(Option<String>),

    /// Show the cleanup phrase list.
    ListCleanup,

    /// Append a cleanup phrase.
    AddCleanup(Option<String>),

    /// Remove a cleanup phrase by 1-based index (still unparsed).
    RemoveCleanup(Option<String>),

    /// A `/`-prefixed token that matches no command.
    Unknown(String),

    /// Plain text, treated as an implicit task.
    Task(String),
}

impl BotCommand {
    /// Parses message text into a command.
    ///
    /// Text starting with `/` has its first whitespace-delimited token
    /// lower-cased as the command (a trailing `@botname` is ignored); the rest,
    /// split on the first whitespace only, is the argument. Anything else is
    /// an implicit task.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if !text.starts_with('/') {
            return Self::Task(text.to_owned());
        }

        let (token, args) = match text.split_once(char::is_whitespace) {
            Some((token, args)) => (token, Some(args.trim())),
            None => (text, None),
        };
        let args = args.filter(|a| !a.is_empty()).map(str::to_owned);

        let command = token.to_lowercase();
        let command = command
            .split_once('@')
            .map_or(command.as_str(), |(name, _bot)| name);

        match command {
            "/start" | "/help" => Self::Start,
            "/settings" => Self::Settings,
            "/run_task" => Self::RunTask(args.unwrap_or_default()),
            "/finish" => Self::Finish,
            "/log" => Self::Log,
            "/failed" => Self::Failed,
            "/add_task" => Self::AddTask(args),
            "/remove_task" => Self::RemoveTask(args),
            "/list_cleanup" => Self::ListCleanup,
            "/add_cleanup" => Self::AddCleanup(args),
            "/remove_cleanup" => Self::RemoveCleanup(args),
            _ => Self::Unknown(command.to_owned()),
        }
    }

    /// Returns the command name as it appears in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Settings => "settings",
            Self::RunTask(_) => "run_task",
            Self::Finish => "finish",
            Self::Log => "log",
            Self::Failed => "failed",
            Self::AddTask(_) => "add_task",
            Self::RemoveTask(_) => "remove_task",
            Self::ListCleanup => "list_cleanup",
            Self::AddCleanup(_) => "add_cleanup",
            Self::RemoveCleanup(_) => "remove_cleanup",
            Self::Unknown(_) => "unknown",
            Self::Task(_) => "task",
        }
    }

    /// Returns all available commands with their descriptions.
    #[must_use]
    pub fn all_commands() -> Vec<(&'static str, &'static str)> {
        vec![
            ("/run_task [content]", "Process content as a task"),
            ("/finish", "Sends completion confirmation"),
            ("/settings", "Manage toggles"),
            ("/failed", "Failed task list"),
            ("/add_task [content]", "Add a failed task manually"),
            ("/remove_task [number]", "Remove a failed task"),
            ("/list_cleanup", "Show cleanup phrases"),
            ("/add_cleanup [phrase]", "Add a cleanup phrase"),
            ("/remove_cleanup [number]", "Remove a cleanup phrase"),
            ("/log", "Download the activity log"),
            ("/help", "Show this message"),
        ]
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddTask(Some(arg))
            | Self::RemoveTask(Some(arg))
            | Self::AddCleanup(Some(arg))
            | Self::RemoveCleanup(Some(arg)) => write!(f, "{} {arg}", self.name()),
            Self::Unknown(token) => write!(f, "unknown {token}"),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Result of command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command was successful.
    pub success: bool,

    /// Response message to show the user.
    pub message: String,
}

impl CommandResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Creates an error result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Why a 1-based index argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// Not an integer.
    Format,
    /// Outside `1..=len`.
    OutOfRange { len: usize },
}

/// Parses a 1-based index argument against a list of `len` items,
/// returning the 0-based position.
pub fn parse_index(arg: &str, len: usize) -> Result<usize, IndexError> {
    let index: i64 = arg.trim().parse().map_err(|_| IndexError::Format)?;
    usize::try_from(index)
        .ok()
        .filter(|&i| (1..=len).contains(&i))
        .map(|i| i - 1)
        .ok_or(IndexError::OutOfRange { len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(BotCommand::parse("/start"), BotCommand::Start);
        assert_eq!(BotCommand::parse("/help"), BotCommand::Start);
        assert_eq!(BotCommand::parse("/settings"), BotCommand::Settings);
        assert_eq!(BotCommand::parse("/finish"), BotCommand::Finish);
        assert_eq!(BotCommand::parse("/log"), BotCommand::Log);
        assert_eq!(BotCommand::parse("/failed"), BotCommand::Failed);
        assert_eq!(BotCommand::parse("/list_cleanup"), BotCommand::ListCleanup);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(BotCommand::parse("/SETTINGS"), BotCommand::Settings);
        assert_eq!(BotCommand::parse("/Start extra"), BotCommand::Start);
    }

    #[test]
    fn test_parse_bot_suffix() {
        assert_eq!(BotCommand::parse("/failed@my_private_bot"), BotCommand::Failed);
    }

    #[test]
    fn test_parse_argument_splits_on_first_whitespace() {
        assert_eq!(
            BotCommand::parse("/add_cleanup Shared via Telegram"),
            BotCommand::AddCleanup(Some("Shared via Telegram".to_owned()))
        );
        assert_eq!(
            BotCommand::parse("/run_task  Process   this"),
            BotCommand::RunTask("Process   this".to_owned())
        );
    }

    #[test]
    fn test_parse_missing_argument() {
        assert_eq!(BotCommand::parse("/add_task"), BotCommand::AddTask(None));
        assert_eq!(BotCommand::parse("/remove_task   "), BotCommand::RemoveTask(None));
        assert_eq!(BotCommand::parse("/run_task"), BotCommand::RunTask(String::new()));
    }

    #[test]
    fn test_parse_unknown_and_plain_text() {
        assert_eq!(
            BotCommand::parse("/dance now"),
            BotCommand::Unknown("/dance".to_owned())
        );
        assert_eq!(
            BotCommand::parse("hello /start"),
            BotCommand::Task("hello /start".to_owned())
        );
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("1", 3), Ok(0));
        assert_eq!(parse_index(" 3 ", 3), Ok(2));
        assert_eq!(parse_index("0", 3), Err(IndexError::OutOfRange { len: 3 }));
        assert_eq!(parse_index("4", 3), Err(IndexError::OutOfRange { len: 3 }));
        assert_eq!(parse_index("-1", 3), Err(IndexError::OutOfRange { len: 3 }));
        assert_eq!(parse_index("abc", 3), Err(IndexError::Format));
        assert_eq!(parse_index("1.5", 3), Err(IndexError::Format));
        assert_eq!(parse_index("1", 0), Err(IndexError::OutOfRange { len: 0 }));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BotCommand::RemoveTask(Some("2".to_owned())).to_string(),
            "remove_task 2"
        );
        assert_eq!(BotCommand::Task("hi".to_owned()).to_string(), "task");
    }
}
