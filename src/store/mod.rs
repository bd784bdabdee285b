//! Persistence port for bot state.
//!
//! State lives in two documents: the configuration singleton and the
//! ordered failed-task list. Both are always read and written whole;
//! callers load, mutate in memory and save the full document back.

mod file;
mod memory;
mod model;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use model::{BotConfig, FailedTask, Toggle, content_preview, on_off};

use thiserror::Error;

/// Errors raised by a [`Store`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Full-document persistence for configuration and the failed-task list.
///
/// Reads are defaulted: a backend with nothing stored returns
/// [`BotConfig::default`] and an empty list.
pub trait Store: Send + Sync {
    /// Loads the whole configuration document.
    fn load_config(&self) -> Result<BotConfig, StoreError>;

    /// Replaces the whole configuration document.
    fn save_config(&self, config: &BotConfig) -> Result<(), StoreError>;

    /// Loads the failed-task list in append order.
    fn load_failed_tasks(&self) -> Result<Vec<FailedTask>, StoreError>;

    /// Replaces the whole failed-task list.
    fn save_failed_tasks(&self, tasks: &[FailedTask]) -> Result<(), StoreError>;

    /// Reads a single toggle from a fresh load.
    fn flag(&self, toggle: Toggle) -> Result<bool, StoreError> {
        Ok(self.load_config()?.flag(toggle))
    }

    /// Sets a single toggle with its own load-modify-save cycle.
    fn set_flag(&self, toggle: Toggle, value: bool) -> Result<(), StoreError> {
        let mut config = self.load_config()?;
        config.set_flag(toggle, value);
        self.save_config(&config)
    }
}
