use std::sync::Arc;

use tokio::sync::mpsc;

use crate::aligner::{Aligner, ChapterSources};
use crate::app::{MushafError, Result};
use crate::domain::AlignedChapter;
use crate::fetcher::ContentSource;

pub const DEFAULT_TEXT_EDITION: &str = "quran-uthmani";
pub const DEFAULT_TRANSLITERATION_EDITION: &str = "en.transliteration";

/// What a chapter load is fetched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRequest {
    pub chapter: u16,
    pub reciter: String,
    pub translation: String,
}

/// Identifies one issued load. Completions are matched against the
/// tracker's current tag and dropped when they no longer match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTag {
    generation: u64,
    request: ChapterRequest,
}

impl LoadTag {
    pub fn request(&self) -> &ChapterRequest {
        &self.request
    }

    pub fn chapter(&self) -> u16 {
        self.request.chapter
    }
}

#[derive(Debug)]
pub struct LoadCompletion {
    pub tag: LoadTag,
    pub result: Result<AlignedChapter>,
}

/// Keeps track of the single load that is allowed to land.
#[derive(Debug, Default)]
pub struct LoadTracker {
    generation: u64,
    in_flight: Option<LoadTag>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new load, superseding any load still in flight.
    pub fn begin(&mut self, request: ChapterRequest) -> LoadTag {
        self.generation += 1;
        if let Some(stale) = self.in_flight.take() {
            tracing::debug!("Superseding load for surah {}", stale.chapter());
        }
        let tag = LoadTag {
            generation: self.generation,
            request,
        };
        self.in_flight = Some(tag.clone());
        tag
    }

    /// Accept a completion if it belongs to the current load.
    pub fn accept(&mut self, tag: &LoadTag) -> bool {
        if self.in_flight.as_ref() == Some(tag) {
            self.in_flight = None;
            true
        } else {
            tracing::debug!("Discarding stale load for surah {}", tag.chapter());
            false
        }
    }
}

/// Issues the three per-chapter fetches and aligns their results.
#[derive(Clone)]
pub struct Orchestrator {
    source: Arc<dyn ContentSource + Send + Sync>,
    aligner: Aligner,
    text_edition: String,
    transliteration_edition: String,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn ContentSource + Send + Sync>) -> Self {
        Self::with_editions(source, DEFAULT_TEXT_EDITION, DEFAULT_TRANSLITERATION_EDITION)
    }

    pub fn with_editions(
        source: Arc<dyn ContentSource + Send + Sync>,
        text_edition: &str,
        transliteration_edition: &str,
    ) -> Self {
        Self {
            source,
            aligner: Aligner::new(),
            text_edition: text_edition.to_string(),
            transliteration_edition: transliteration_edition.to_string(),
        }
    }

    /// Fetch and align one chapter.
    ///
    /// The text+audio request is mandatory; translation and transliteration
    /// failures degrade to empty collections.
    pub async fn load(&self, request: &ChapterRequest) -> Result<AlignedChapter> {
        let chapter = request.chapter;
        let combined = [self.text_edition.as_str(), request.reciter.as_str()];

        let (primary, translation, transliteration) = tokio::join!(
            self.source.fetch_editions(chapter, &combined),
            self.source.fetch_edition(chapter, &request.translation),
            self.source.fetch_edition(chapter, &self.transliteration_edition),
        );

        let mut editions = primary
            .map_err(|e| MushafError::Fetch {
                chapter,
                message: e.to_string(),
            })?
            .into_iter();
        let text = editions.next().ok_or_else(|| MushafError::Fetch {
            chapter,
            message: "response contained no editions".into(),
        })?;
        let audio = editions.next().unwrap_or_default();

        let translation = translation.unwrap_or_else(|e| {
            tracing::warn!("Translation for surah {} unavailable: {}", chapter, e);
            Vec::new()
        });
        let transliteration = transliteration.unwrap_or_else(|e| {
            tracing::warn!("Transliteration for surah {} unavailable: {}", chapter, e);
            Vec::new()
        });

        let aligned = self.aligner.align(
            chapter,
            ChapterSources {
                text,
                audio,
                translation,
                transliteration,
            },
        );
        tracing::info!("Loaded surah {} ({} verses)", chapter, aligned.len());
        Ok(aligned)
    }

    /// Run a load on the runtime and report it, tagged, on `tx`.
    pub fn spawn_load(&self, tag: LoadTag, tx: mpsc::UnboundedSender<LoadCompletion>) {
        let orchestrator = self.clone();
        tokio::spawn(async move {
            let result = orchestrator.load(tag.request()).await;
            if let Err(ref e) = result {
                tracing::error!("{}", e);
            }
            // The receiver is gone only when the UI has shut down.
            let _ = tx.send(LoadCompletion { tag, result });
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::aligner::tests::{audio, verses};
    use crate::domain::{Collection, TextCell, Verse};
    use crate::fetcher::ContentSource;

    /// Serves synthetic chapters; editions listed in `failing` error out and
    /// chapters listed in `delays` answer late.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub failing: Vec<String>,
        pub delays: HashMap<u16, Duration>,
    }

    impl FakeSource {
        pub(crate) fn failing(editions: &[&str]) -> Self {
            Self {
                failing: editions.iter().map(|e| e.to_string()).collect(),
                ..Default::default()
            }
        }

        async fn edition(&self, chapter: u16, edition: &str) -> Result<Vec<Verse>> {
            if let Some(delay) = self.delays.get(&chapter) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing.iter().any(|e| e == edition) {
                return Err(MushafError::Api(format!("{} unavailable", edition)));
            }
            let count = crate::domain::catalog::chapter(chapter)
                .map(|c| c.verse_count)
                .ok_or(MushafError::ChapterOutOfRange(chapter))?;
            Ok(if edition.starts_with("ar.") {
                audio(count)
            } else {
                verses(count, &format!("{}:{}", chapter, edition))
            })
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn fetch_editions(&self, chapter: u16, editions: &[&str]) -> Result<Vec<Vec<Verse>>> {
            let mut result = Vec::new();
            for edition in editions {
                result.push(self.edition(chapter, edition).await?);
            }
            Ok(result)
        }

        async fn fetch_edition(&self, chapter: u16, edition: &str) -> Result<Vec<Verse>> {
            self.edition(chapter, edition).await
        }
    }

    pub(crate) fn request(chapter: u16) -> ChapterRequest {
        ChapterRequest {
            chapter,
            reciter: "ar.alafasy".into(),
            translation: "en.asad".into(),
        }
    }

    #[tokio::test]
    async fn test_load_aligns_all_collections() {
        let orchestrator = Orchestrator::new(Arc::new(FakeSource::default()));
        let aligned = orchestrator.load(&request(1)).await.unwrap();

        assert_eq!(aligned.chapter(), 1);
        assert_eq!(aligned.len(), 7);
        assert!(aligned.degraded().is_empty());
        let row = aligned.row(0).unwrap();
        assert_eq!(row.original, "1:quran-uthmani 1");
        assert_eq!(row.translation_display(), "1:en.asad 1");
        assert_eq!(row.transliteration_display(), "1:en.transliteration 1");
        assert!(row.is_playable());
    }

    #[tokio::test]
    async fn test_translation_failure_is_not_fatal() {
        let orchestrator = Orchestrator::new(Arc::new(FakeSource::failing(&["en.asad"])));
        let aligned = orchestrator.load(&request(1)).await.unwrap();

        assert_eq!(aligned.len(), 7);
        assert_eq!(aligned.degraded(), &[Collection::Translation]);
        for row in aligned.rows() {
            assert!(!row.original.is_empty());
            assert!(row.is_playable());
            assert_eq!(row.translation, TextCell::Unavailable);
            assert_eq!(row.translation_display(), "Translation not available");
        }
    }

    #[tokio::test]
    async fn test_transliteration_failure_is_not_fatal() {
        let orchestrator =
            Orchestrator::new(Arc::new(FakeSource::failing(&["en.transliteration"])));
        let aligned = orchestrator.load(&request(112)).await.unwrap();
        assert_eq!(aligned.len(), 4);
        assert_eq!(aligned.degraded(), &[Collection::Transliteration]);
        assert_eq!(aligned.row(0).unwrap().transliteration_display(), "Not available");
    }

    #[tokio::test]
    async fn test_primary_failure_fails_the_load() {
        let orchestrator = Orchestrator::new(Arc::new(FakeSource::failing(&["quran-uthmani"])));
        let err = orchestrator.load(&request(1)).await.unwrap_err();
        assert!(matches!(err, MushafError::Fetch { chapter: 1, .. }));
    }

    #[tokio::test]
    async fn test_reciter_failure_fails_the_load() {
        let orchestrator = Orchestrator::new(Arc::new(FakeSource::failing(&["ar.alafasy"])));
        assert!(orchestrator.load(&request(1)).await.is_err());
    }

    #[test]
    fn test_tracker_accepts_only_latest() {
        let mut tracker = LoadTracker::new();
        let first = tracker.begin(request(1));
        let second = tracker.begin(request(2));

        assert!(!tracker.accept(&first));
        assert!(tracker.accept(&second));
        // A completion is accepted once.
        assert!(!tracker.accept(&second));
    }

    #[test]
    fn test_tracker_distinguishes_same_chapter_reloads() {
        let mut tracker = LoadTracker::new();
        let first = tracker.begin(request(1));
        let mut changed = request(1);
        changed.translation = "en.sahih".into();
        let second = tracker.begin(changed);
        assert!(!tracker.accept(&first));
        assert!(tracker.accept(&second));
    }

    #[tokio::test]
    async fn test_slow_stale_response_is_discarded() {
        let mut source = FakeSource::default();
        source.delays.insert(1, Duration::from_millis(80));
        let orchestrator = Orchestrator::new(Arc::new(source));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tracker = LoadTracker::new();

        let slow = tracker.begin(request(1));
        orchestrator.spawn_load(slow, tx.clone());
        let fast = tracker.begin(request(2));
        orchestrator.spawn_load(fast, tx);

        let mut landed = Vec::new();
        while let Some(completion) = rx.recv().await {
            if tracker.accept(&completion.tag) {
                landed.push(completion.result.unwrap().chapter());
            }
        }
        assert_eq!(landed, vec![2]);
    }
}
