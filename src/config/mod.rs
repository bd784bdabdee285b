//! Configuration module for the bot.
//!
//! Handles loading and validation of the process-level settings
//! (token, owner id, file locations and limits).

mod settings;

pub use settings::{BotSettings, ConfigError};

/// Maximum length of an outbound text message, part tag included.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Number of trailing log lines served by `/log`.
pub const LOG_TAIL_LINES: usize = 1000;
