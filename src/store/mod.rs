pub mod sqlite;

use std::sync::Mutex;

use crate::app::Result;
use crate::domain::{Preferences, PreferencesUpdate};

pub use sqlite::SqliteStore;

/// Durable key/value storage for reader settings and favorites.
pub trait PreferenceStore {
    /// Read every stored setting. Unreadable storage or values degrade to
    /// defaults; loading never fails.
    fn load(&self) -> Preferences;

    /// Write the fields set in `update`, leaving the others untouched.
    fn save(&self, update: &PreferencesUpdate) -> Result<()>;
}

/// Volatile store, used where nothing should touch the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prefs: Mutex<Preferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(prefs: Preferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Preferences {
        match self.prefs.lock() {
            Ok(prefs) => prefs.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, update: &PreferencesUpdate) -> Result<()> {
        match self.prefs.lock() {
            Ok(mut prefs) => prefs.apply(update),
            Err(poisoned) => poisoned.into_inner().apply(update),
        }
        Ok(())
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for std::sync::Arc<S> {
    fn load(&self) -> Preferences {
        (**self).load()
    }

    fn save(&self, update: &PreferencesUpdate) -> Result<()> {
        (**self).save(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_applies_partial_updates() {
        let store = MemoryStore::new();
        store
            .save(&PreferencesUpdate {
                dark_mode: Some(true),
                ..Default::default()
            })
            .unwrap();
        store
            .save(&PreferencesUpdate {
                last_chapter: Some(36),
                ..Default::default()
            })
            .unwrap();

        let prefs = store.load();
        assert!(prefs.dark_mode);
        assert_eq!(prefs.last_chapter, 36);
        assert_eq!(prefs.reciter, Preferences::default().reciter);
    }
}
