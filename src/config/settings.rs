//! Application settings loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Placeholder URL shipped in deployment templates.
const PLACEHOLDER_PUBLIC_URL: &str = "https://your-deployment-name.koyeb.app";

/// Placeholder owner id shipped in deployment templates.
const PLACEHOLDER_OWNER_ID: &str = "12345678";

/// Runtime settings for the bot.
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Telegram Bot API token. Only required for live polling.
    pub bot_token: Option<String>,

    /// The single user allowed to issue commands.
    pub owner_id: String,

    /// Target of the wake-up link button.
    pub public_url: String,

    /// Path to the persisted configuration document.
    pub config_path: PathBuf,

    /// Path to the persisted failed-task list.
    pub failed_tasks_path: PathBuf,

    /// Path to the activity log served by `/log`.
    pub log_path: PathBuf,

    /// Attachments above this size are blocked before processing.
    pub max_file_size_mb: u64,

    /// Minimum spacing between outbound API calls in milliseconds.
    pub api_call_interval_ms: u64,

    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout_secs: u64,
}

fn default_public_url() -> String {
    PLACEHOLDER_PUBLIC_URL.to_owned()
}

fn default_config_path() -> PathBuf {
    PathBuf::from("bot_config.json")
}

fn default_failed_tasks_path() -> PathBuf {
    PathBuf::from("failed_tasks.json")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("bot_activity.log")
}

fn default_max_file_size_mb() -> u64 {
    20
}

fn default_api_call_interval_ms() -> u64 {
    1000 // Telegram tolerates roughly one message per second per chat
}

fn default_poll_timeout_secs() -> u64 {
    30
}

impl BotSettings {
    /// Creates settings for the given owner with every other field defaulted.
    #[must_use]
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            bot_token: None,
            owner_id: owner_id.into(),
            public_url: default_public_url(),
            config_path: default_config_path(),
            failed_tasks_path: default_failed_tasks_path(),
            log_path: default_log_path(),
            max_file_size_mb: default_max_file_size_mb(),
            api_call_interval_ms: default_api_call_interval_ms(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }

    /// Creates settings from environment variables.
    ///
    /// `BOT_OWNER_ID` is required; everything else falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner id is missing or still the template placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let owner_id = std::env::var("BOT_OWNER_ID")
            .map_err(|_| ConfigError::MissingEnvVar("BOT_OWNER_ID"))?;

        let settings = Self {
            bot_token: std::env::var("TELEGRAM_TOKEN")
                .ok()
                .filter(|t| !t.is_empty() && t != "YOUR_TELEGRAM_TOKEN"),
            owner_id: owner_id.trim().to_owned(),
            public_url: std::env::var("PUBLIC_URL").unwrap_or_else(|_| default_public_url()),
            config_path: env_path("BOT_CONFIG_FILE").unwrap_or_else(default_config_path),
            failed_tasks_path: env_path("FAILED_TASKS_FILE")
                .unwrap_or_else(default_failed_tasks_path),
            log_path: env_path("LOG_FILE").unwrap_or_else(default_log_path),
            max_file_size_mb: env_number("MAX_FILE_SIZE_MB")
                .unwrap_or_else(default_max_file_size_mb),
            api_call_interval_ms: env_number("API_CALL_INTERVAL_MS")
                .unwrap_or_else(default_api_call_interval_ms),
            poll_timeout_secs: env_number("POLL_TIMEOUT_SECS")
                .unwrap_or_else(default_poll_timeout_secs),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Checks the settings that would leave the bot unusable.
    ///
    /// A placeholder public URL only produces a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner id is empty, a placeholder or not numeric.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner_id.is_empty() || self.owner_id == PLACEHOLDER_OWNER_ID {
            return Err(ConfigError::PlaceholderOwnerId);
        }

        let digits = self.owner_id.strip_prefix('-').unwrap_or(&self.owner_id);
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidOwnerId(self.owner_id.clone()));
        }

        if self.public_url == PLACEHOLDER_PUBLIC_URL {
            warn!("PUBLIC_URL is using the default placeholder. Wake-up link will be incorrect.");
        }

        Ok(())
    }

    /// Returns the bot token, failing if none was configured.
    ///
    /// # Errors
    ///
    /// Returns an error when `TELEGRAM_TOKEN` was not set.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.bot_token
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar("TELEGRAM_TOKEN"))
    }

    /// Large-file threshold in bytes.
    #[must_use]
    pub const fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Spacing enforced between outbound API calls.
    #[must_use]
    pub const fn api_call_interval(&self) -> Duration {
        Duration::from_millis(self.api_call_interval_ms)
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn env_number(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("BOT_OWNER_ID is not set correctly (empty or template placeholder)")]
    PlaceholderOwnerId,

    #[error("Invalid owner id '{0}' (must be a numeric Telegram user id)")]
    InvalidOwnerId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = BotSettings::new("42");
        assert_eq!(settings.config_path, PathBuf::from("bot_config.json"));
        assert_eq!(settings.failed_tasks_path, PathBuf::from("failed_tasks.json"));
        assert_eq!(settings.log_path, PathBuf::from("bot_activity.log"));
        assert_eq!(settings.max_file_size_mb, 20);
        assert_eq!(settings.api_call_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_max_file_size_bytes() {
        let settings = BotSettings::new("42");
        assert_eq!(settings.max_file_size_bytes(), 20 * 1024 * 1024);
    }

    #[test]
    fn test_huge_file_size_limit_saturates() {
        let mut settings = BotSettings::new("42");
        settings.max_file_size_mb = u64::MAX;
        assert_eq!(settings.max_file_size_bytes(), u64::MAX);
    }

    #[test]
    fn test_validate_rejects_placeholder_owner() {
        assert!(matches!(
            BotSettings::new("12345678").validate(),
            Err(ConfigError::PlaceholderOwnerId)
        ));
        assert!(matches!(
            BotSettings::new("").validate(),
            Err(ConfigError::PlaceholderOwnerId)
        ));
    }

    #[test]
    fn test_validate_rejects_non_numeric_owner() {
        assert!(matches!(
            BotSettings::new("@owner").validate(),
            Err(ConfigError::InvalidOwnerId(_))
        ));
        assert!(BotSettings::new("987654321").validate().is_ok());
    }

    #[test]
    fn test_require_token() {
        let mut settings = BotSettings::new("42");
        assert!(settings.require_token().is_err());

        settings.bot_token = Some("123:abc".to_owned());
        assert_eq!(settings.require_token().ok(), Some("123:abc"));
    }
}
