use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{MushafError, Result};
use crate::config::Config;
use crate::fetcher::{ContentSource, HttpFetcher, Orchestrator};
use crate::playback::{AudioOutput, NullOutput, RodioOutput};
use crate::session::Session;
use crate::store::SqliteStore;

/// The session the TUI drives: durable preferences, real audio.
pub type ReaderSession = Session<Arc<SqliteStore>, Box<dyn AudioOutput>>;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub orchestrator: Orchestrator,
    pub config: Config,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, config: Config) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(store, config)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_store(Arc::new(SqliteStore::in_memory()?), config)
    }

    fn with_store(store: Arc<SqliteStore>, config: Config) -> Result<Self> {
        let source: Arc<dyn ContentSource + Send + Sync> = Arc::new(HttpFetcher::new(&config.api)?);
        let orchestrator = Orchestrator::with_editions(
            source,
            &config.api.text_edition,
            &config.api.transliteration_edition,
        );

        Ok(Self {
            store,
            orchestrator,
            config,
        })
    }

    /// Speakers if there are any. Without an output device the reader still
    /// works; playback requests just fail.
    pub fn audio_output(&self) -> Box<dyn AudioOutput> {
        match RodioOutput::new(self.config.api.audio_timeout()) {
            Ok(output) => Box::new(output),
            Err(e) => {
                tracing::warn!("Audio disabled: {}", e);
                Box::new(NullOutput)
            }
        }
    }

    pub fn session(&self) -> ReaderSession {
        Session::new(self.store.clone(), self.audio_output())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| MushafError::Config("Could not find data directory".into()))?;
        let mushaf_dir = data_dir.join("mushaf");
        std::fs::create_dir_all(&mushaf_dir)?;
        Ok(mushaf_dir.join("mushaf.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PreferenceStore;

    #[test]
    fn test_in_memory_context_uses_defaults() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        let prefs = ctx.store.load();
        assert_eq!(prefs.last_chapter, 1);
        assert_eq!(prefs.reciter, "ar.alafasy");
    }

    #[test]
    fn test_context_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::new(Some(dir.path().join("mushaf.db")), Config::default()).unwrap();
        assert!(dir.path().join("mushaf.db").exists());
        assert!(ctx.store.raw_entries().unwrap().is_empty());
    }
}
