pub mod http_fetcher;
pub mod orchestrator;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::Verse;

pub use http_fetcher::HttpFetcher;
pub use orchestrator::{ChapterRequest, LoadCompletion, LoadTag, LoadTracker, Orchestrator};

/// Upstream source of per-chapter verse collections.
#[async_trait]
pub trait ContentSource {
    /// Fetch several editions of one chapter in a single request, returned
    /// in the order they were asked for.
    async fn fetch_editions(&self, chapter: u16, editions: &[&str]) -> Result<Vec<Vec<Verse>>>;

    /// Fetch one edition of one chapter.
    async fn fetch_edition(&self, chapter: u16, edition: &str) -> Result<Vec<Verse>>;
}
