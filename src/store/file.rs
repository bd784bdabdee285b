//! JSON file backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{BotConfig, FailedTask, Store, StoreError};

/// Stores each document as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config_path: PathBuf,
    failed_tasks_path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store over the two document paths. Nothing is touched on disk
    /// until the first load or save.
    #[must_use]
    pub fn new(config_path: impl Into<PathBuf>, failed_tasks_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            failed_tasks_path: failed_tasks_path.into(),
        }
    }

    /// Path of the configuration document.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Path of the failed-task document.
    #[must_use]
    pub fn failed_tasks_path(&self) -> &Path {
        &self.failed_tasks_path
    }
}

/// Reads a document, returning `T::default()` when the file does not exist.
fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} not found, using defaults", path.display());
            return Ok(T::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn write_document<T: Serialize + ?Sized>(path: &Path, document: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })
}

impl Store for JsonFileStore {
    fn load_config(&self) -> Result<BotConfig, StoreError> {
        read_document(&self.config_path)
    }

    fn save_config(&self, config: &BotConfig) -> Result<(), StoreError> {
        write_document(&self.config_path, config)
    }

    fn load_failed_tasks(&self) -> Result<Vec<FailedTask>, StoreError> {
        read_document(&self.failed_tasks_path)
    }

    fn save_failed_tasks(&self, tasks: &[FailedTask]) -> Result<(), StoreError> {
        write_document(&self.failed_tasks_path, tasks)
    }
}
