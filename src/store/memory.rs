//! In-memory backend, used by simulation runs and tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{BotConfig, FailedTask, Store, StoreError};

#[derive(Debug, Default)]
struct Documents {
    config: Option<BotConfig>,
    failed_tasks: Vec<FailedTask>,
}

/// Keeps both documents in memory with the same whole-document semantics
/// as [`super::JsonFileStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Documents>,
}

impl MemoryStore {
    /// Creates an empty store; reads return defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a configuration document.
    #[must_use]
    pub fn with_config(config: BotConfig) -> Self {
        Self {
            documents: Mutex::new(Documents {
                config: Some(config),
                failed_tasks: Vec::new(),
            }),
        }
    }

    fn documents(&self) -> MutexGuard<'_, Documents> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn load_config(&self) -> Result<BotConfig, StoreError> {
        Ok(self.documents().config.clone().unwrap_or_default())
    }

    fn save_config(&self, config: &BotConfig) -> Result<(), StoreError> {
        self.documents().config = Some(config.clone());
        Ok(())
    }

    fn load_failed_tasks(&self) -> Result<Vec<FailedTask>, StoreError> {
        Ok(self.documents().failed_tasks.clone())
    }

    fn save_failed_tasks(&self, tasks: &[FailedTask]) -> Result<(), StoreError> {
        self.documents().failed_tasks = tasks.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Toggle;

    #[test]
    fn test_defaults_when_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.load_config().expect("config"), BotConfig::default());
        assert!(store.load_failed_tasks().expect("tasks").is_empty());
    }

    #[test]
    fn test_loaded_copy_is_detached() {
        let store = MemoryStore::new();
        let mut config = store.load_config().expect("config");
        config.cleanup_strings.push("unsaved".to_owned());

        assert_eq!(
            store.load_config().expect("config").cleanup_strings,
            vec!["Shared via Telegram".to_owned()]
        );
    }

    #[test]
    fn test_set_flag_round_trip() {
        let store = MemoryStore::new();
        store.set_flag(Toggle::StickerBlock, false).expect("save");
        assert!(!store.flag(Toggle::StickerBlock).expect("flag"));
        assert!(!store.flag(Toggle::PhotoVideoOnly).expect("flag"));
    }
}
