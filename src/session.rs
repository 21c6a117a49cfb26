//! One running reader: the loaded chapter and everything that acts on it.
//!
//! All mutation happens on the caller's thread. Fetches are issued as
//! [`LoadTag`]s for the caller to run and are handed back through
//! [`Session::complete_load`].

use chrono::Utc;

use crate::app::{MushafError, Result};
use crate::domain::catalog::{self, CHAPTER_COUNT, RECITERS, TRANSLATIONS};
use crate::domain::preferences::FONT_SIZE_RANGE;
use crate::domain::{AlignedChapter, AlignedRow, Preferences, PreferencesUpdate, VerseKey};
use crate::fetcher::{ChapterRequest, LoadCompletion, LoadTag, LoadTracker};
use crate::filter::Filter;
use crate::playback::{AudioOutput, PlaybackController, PlaybackEvent, PlaybackState};
use crate::share::{self, SharePayload};
use crate::store::PreferenceStore;
use crate::view_sync::ViewSync;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The mandatory fetch failed; the chapter can be retried.
    Failed(String),
}

pub struct Session<S: PreferenceStore, O: AudioOutput> {
    store: S,
    prefs: Preferences,
    chapter_number: u16,
    chapter: Option<AlignedChapter>,
    load_state: LoadState,
    tracker: LoadTracker,
    playback: PlaybackController<O>,
    filter: Filter,
    visible: Vec<usize>,
    view: ViewSync,
    /// Rows the verse list showed last time it was laid out.
    view_height: usize,
}

impl<S: PreferenceStore, O: AudioOutput> Session<S, O> {
    /// Start on the last chapter read.
    pub fn new(store: S, output: O) -> Self {
        let prefs = store.load();
        Self {
            chapter_number: prefs.last_chapter,
            store,
            prefs,
            chapter: None,
            load_state: LoadState::Loading,
            tracker: LoadTracker::new(),
            playback: PlaybackController::new(output),
            filter: Filter::new(),
            visible: Vec::new(),
            view: ViewSync::new(),
            view_height: 0,
        }
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn chapter_number(&self) -> u16 {
        self.chapter_number
    }

    /// The loaded rows, once the current load has landed.
    pub fn chapter(&self) -> Option<&AlignedChapter> {
        self.chapter.as_ref()
    }

    pub fn row(&self, index: usize) -> Option<&AlignedRow> {
        self.chapter.as_ref().and_then(|c| c.row(index))
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn loaded_url(&self) -> Option<&str> {
        self.playback.loaded_url()
    }

    pub fn playback(&self) -> &PlaybackController<O> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController<O> {
        &mut self.playback
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Indices into the full chapter of the rows passing the filter.
    pub fn visible_rows(&self) -> &[usize] {
        &self.visible
    }

    pub fn view_offset(&self) -> usize {
        self.view.offset()
    }

    fn request(&self) -> ChapterRequest {
        ChapterRequest {
            chapter: self.chapter_number,
            reciter: self.prefs.reciter.clone(),
            translation: self.prefs.translation.clone(),
        }
    }

    /// Apply an update in memory and write it through. A failed write is
    /// logged and otherwise ignored; the session keeps running on the
    /// in-memory value.
    fn persist(&mut self, update: PreferencesUpdate) {
        self.prefs.apply(&update);
        if let Err(e) = self.store.save(&update) {
            tracing::error!("Failed to save preferences: {}", e);
        }
    }

    // Loading

    /// Issue a load for the current chapter and selections. Any load
    /// already in flight will be discarded when it lands.
    pub fn begin_load(&mut self) -> LoadTag {
        self.playback.handle(PlaybackEvent::ChapterChanged, &[]);
        self.chapter = None;
        self.visible.clear();
        self.view.reset();
        self.load_state = LoadState::Loading;
        self.tracker.begin(self.request())
    }

    /// Apply a finished load. Returns false if it was stale and dropped.
    pub fn complete_load(&mut self, completion: LoadCompletion) -> bool {
        if !self.tracker.accept(&completion.tag) {
            return false;
        }
        match completion.result {
            Ok(chapter) => {
                self.chapter = Some(chapter);
                self.load_state = LoadState::Ready;
                self.refresh_visible();
            }
            Err(e) => {
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Reissue the load after a failure. No-op otherwise.
    pub fn retry(&mut self) -> Option<LoadTag> {
        match self.load_state {
            LoadState::Failed(_) => Some(self.begin_load()),
            _ => None,
        }
    }

    /// Open `number` and remember it as the last chapter read.
    pub fn select_chapter(&mut self, number: u16) -> Result<LoadTag> {
        if !catalog::is_valid_chapter(number) {
            return Err(MushafError::ChapterOutOfRange(number));
        }
        self.chapter_number = number;
        self.persist(PreferencesUpdate {
            last_chapter: Some(number),
            ..Default::default()
        });
        Ok(self.begin_load())
    }

    /// Step to the previous or next chapter. Nothing happens past either
    /// end of the catalog.
    pub fn navigate(&mut self, delta: i32) -> Option<LoadTag> {
        let target = i32::from(self.chapter_number) + delta;
        if delta == 0 || target < 1 || target > i32::from(CHAPTER_COUNT) {
            return None;
        }
        self.playback.handle(PlaybackEvent::Navigate, &[]);
        self.select_chapter(target as u16).ok()
    }

    // Playback

    pub fn play_one(&mut self, index: usize) -> PlaybackState {
        let rows = self.chapter.as_ref().map(|c| c.rows()).unwrap_or(&[]);
        self.playback.handle(PlaybackEvent::PlayOne(index), rows)
    }

    pub fn play_all(&mut self) -> PlaybackState {
        let rows = self.chapter.as_ref().map(|c| c.rows()).unwrap_or(&[]);
        self.playback.handle(PlaybackEvent::PlayAll, rows)
    }

    /// Drain audio output events. Returns true if playback moved.
    pub fn poll_audio(&mut self) -> bool {
        let rows = self.chapter.as_ref().map(|c| c.rows()).unwrap_or(&[]);
        self.playback.poll(rows)
    }

    // View

    /// Follow the playing row and advance any scroll animation by one step.
    /// Returns true if the offset moved.
    pub fn tick_view(&mut self, height: usize) -> bool {
        self.view_height = height;
        self.view.observe(self.playback.current_index(), &self.visible, height);
        self.view.tick()
    }

    /// The user moved the cursor to `position` in the visible list.
    pub fn scroll_to(&mut self, position: usize, height: usize) {
        self.view_height = height;
        self.view.scroll_into_view(position, height);
    }

    // Favorites and filtering

    pub fn is_favorite(&self, index: usize) -> bool {
        self.row(index).is_some_and(|row| {
            self.prefs
                .favorites
                .contains(VerseKey::new(self.chapter_number, row.ordinal))
        })
    }

    /// Flip the favorite flag of row `index` and persist the set. Returns
    /// the new flag.
    pub fn toggle_favorite(&mut self, index: usize) -> Result<bool> {
        let row = self
            .row(index)
            .ok_or_else(|| MushafError::InvalidVerse(format!("row {}", index)))?;
        let key = VerseKey::new(self.chapter_number, row.ordinal);

        let mut favorites = self.prefs.favorites.clone();
        let now_favorite = favorites.toggle(key, Utc::now());
        self.persist(PreferencesUpdate {
            favorites: Some(favorites.entries().to_vec()),
            ..Default::default()
        });
        self.refresh_visible();
        Ok(now_favorite)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
        self.refresh_visible();
    }

    pub fn toggle_favorites_only(&mut self) -> bool {
        let on = self.filter.toggle_favorites_only();
        self.refresh_visible();
        on
    }

    fn refresh_visible(&mut self) {
        self.visible = match &self.chapter {
            Some(chapter) => self.filter.visible_rows(chapter, &self.prefs.favorites),
            None => Vec::new(),
        };
        self.view.clamp(self.visible.len(), self.view_height);
    }

    // Display settings

    pub fn toggle_dark_mode(&mut self) -> bool {
        let dark_mode = !self.prefs.dark_mode;
        self.persist(PreferencesUpdate {
            dark_mode: Some(dark_mode),
            ..Default::default()
        });
        dark_mode
    }

    pub fn adjust_arabic_font(&mut self, delta: i16) -> u16 {
        let size = adjusted_font(self.prefs.arabic_font_size, delta);
        self.persist(PreferencesUpdate {
            arabic_font_size: Some(size),
            ..Default::default()
        });
        size
    }

    pub fn adjust_translation_font(&mut self, delta: i16) -> u16 {
        let size = adjusted_font(self.prefs.translation_font_size, delta);
        self.persist(PreferencesUpdate {
            translation_font_size: Some(size),
            ..Default::default()
        });
        size
    }

    /// Switch to the next/previous reciter. Playback stops and the chapter
    /// reloads with the new audio edition.
    pub fn cycle_reciter(&mut self, delta: i32) -> LoadTag {
        let next = catalog::cycle(RECITERS, &self.prefs.reciter, delta);
        self.persist(PreferencesUpdate {
            reciter: Some(next.identifier.to_string()),
            ..Default::default()
        });
        self.begin_load()
    }

    /// Switch to the next/previous translation and reload.
    pub fn cycle_translation(&mut self, delta: i32) -> LoadTag {
        let next = catalog::cycle(TRANSLATIONS, &self.prefs.translation, delta);
        self.persist(PreferencesUpdate {
            translation: Some(next.identifier.to_string()),
            ..Default::default()
        });
        self.begin_load()
    }

    // Sharing

    pub fn copy_block(&self, index: usize) -> Option<String> {
        self.row(index)
            .map(|row| share::copy_block(self.chapter_number, row))
    }

    pub fn share(&self, index: usize, origin: Option<&str>) -> Option<SharePayload> {
        self.row(index)
            .map(|row| share::share_payload(self.chapter_number, row, origin))
    }
}

fn adjusted_font(current: u16, delta: i16) -> u16 {
    let size = current.saturating_add_signed(delta);
    size.clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::tests::chapter;
    use crate::playback::audio::tests::FakeOutput;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    type TestSession = Session<Arc<MemoryStore>, FakeOutput>;

    fn session() -> (TestSession, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Session::new(store.clone(), FakeOutput::default()), store)
    }

    /// Land a synthetic load for whatever the tag asked for.
    fn land(session: &mut TestSession, tag: LoadTag) -> bool {
        let info = catalog::chapter(tag.chapter()).unwrap();
        let result = Ok(chapter(info.number, info.verse_count));
        session.complete_load(LoadCompletion { tag, result })
    }

    fn ready(chapter_number: u16) -> (TestSession, Arc<MemoryStore>) {
        let (mut session, store) = session();
        let tag = session.select_chapter(chapter_number).unwrap();
        assert!(land(&mut session, tag));
        (session, store)
    }

    #[test]
    fn test_starts_on_last_chapter_read() {
        let store = Arc::new(MemoryStore::with_preferences(Preferences {
            last_chapter: 36,
            ..Default::default()
        }));
        let mut session = Session::new(store, FakeOutput::default());
        assert_eq!(session.chapter_number(), 36);
        assert_eq!(session.begin_load().chapter(), 36);
        assert_eq!(session.load_state(), &LoadState::Loading);
    }

    #[test]
    fn test_select_chapter_persists_and_loads() {
        let (session, store) = ready(112);
        assert_eq!(session.load_state(), &LoadState::Ready);
        assert_eq!(session.chapter().unwrap().len(), 4);
        assert_eq!(session.visible_rows(), &[0, 1, 2, 3]);
        assert_eq!(store.load().last_chapter, 112);
    }

    #[test]
    fn test_select_invalid_chapter() {
        let (mut session, _) = session();
        assert!(matches!(
            session.select_chapter(115),
            Err(MushafError::ChapterOutOfRange(115))
        ));
        assert!(session.select_chapter(0).is_err());
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let (mut session, _) = session();
        let first = session.select_chapter(1).unwrap();
        let second = session.select_chapter(2).unwrap();

        assert!(!land(&mut session, first));
        assert_eq!(session.load_state(), &LoadState::Loading);
        assert!(land(&mut session, second));
        assert_eq!(session.chapter().unwrap().chapter(), 2);
    }

    #[test]
    fn test_failed_load_can_be_retried() {
        let (mut session, _) = session();
        assert!(session.retry().is_none());
        let tag = session.select_chapter(1).unwrap();
        session.complete_load(LoadCompletion {
            tag,
            result: Err(MushafError::Fetch {
                chapter: 1,
                message: "timed out".into(),
            }),
        });
        assert!(matches!(session.load_state(), LoadState::Failed(m) if m.contains("timed out")));
        assert!(session.chapter().is_none());

        let tag = session.retry().unwrap();
        assert!(land(&mut session, tag));
        assert_eq!(session.load_state(), &LoadState::Ready);
    }

    #[test]
    fn test_navigate_clamps_at_catalog_edges() {
        let (mut session, _) = ready(1);
        assert!(session.navigate(-1).is_none());
        assert_eq!(session.chapter_number(), 1);

        let tag = session.navigate(1).unwrap();
        assert_eq!(tag.chapter(), 2);

        let (mut session, _) = ready(114);
        assert!(session.navigate(1).is_none());
        assert_eq!(session.chapter_number(), 114);
    }

    #[test]
    fn test_navigate_during_sequence_goes_idle() {
        let (mut session, _) = ready(1);
        session.play_all();
        for _ in 0..3 {
            session.playback_mut().output_mut().finish();
            session.poll_audio();
        }
        assert_eq!(session.playback_state(), PlaybackState::PlayingSequence(3));
        let abandoned = session.playback().loaded_token().unwrap();

        let tag = session.navigate(1).unwrap();
        assert_eq!(session.playback_state(), PlaybackState::Idle);
        assert_eq!(session.loaded_url(), None);

        // The old resource reports its end after the new chapter landed.
        land(&mut session, tag);
        let loads = session.playback().output().loads.len();
        session
            .playback_mut()
            .output_mut()
            .queued
            .push_back(crate::playback::OutputEvent::Ended(abandoned));
        assert!(!session.poll_audio());
        assert_eq!(session.playback_state(), PlaybackState::Idle);
        assert_eq!(session.playback().output().loads.len(), loads);
    }

    #[test]
    fn test_play_all_then_first_end() {
        let (mut session, _) = ready(1);
        assert_eq!(session.play_all(), PlaybackState::PlayingSequence(0));
        session.playback_mut().output_mut().finish();
        assert!(session.poll_audio());
        assert_eq!(session.playback_state(), PlaybackState::PlayingSequence(1));
        let expected = session.chapter().unwrap().audio_url(1).map(String::from);
        assert_eq!(session.loaded_url().map(String::from), expected);
    }

    #[test]
    fn test_play_before_load_is_no_op() {
        let (mut session, _) = session();
        session.begin_load();
        assert_eq!(session.play_one(0), PlaybackState::Idle);
        assert_eq!(session.play_all(), PlaybackState::Idle);
    }

    #[test]
    fn test_toggle_favorite_twice_restores_state() {
        let (mut session, store) = ready(1);
        assert!(!session.is_favorite(3));

        assert!(session.toggle_favorite(3).unwrap());
        assert!(session.is_favorite(3));
        assert!(store.load().favorites.contains(VerseKey::new(1, 4)));

        assert!(!session.toggle_favorite(3).unwrap());
        assert!(!session.is_favorite(3));
        assert!(store.load().favorites.is_empty());
    }

    #[test]
    fn test_favorites_only_tracks_toggles() {
        let (mut session, _) = ready(1);
        session.toggle_favorite(2).unwrap();
        session.toggle_favorite(5).unwrap();
        session.toggle_favorites_only();
        assert_eq!(session.visible_rows(), &[2, 5]);

        session.toggle_favorite(2).unwrap();
        assert_eq!(session.visible_rows(), &[5]);
    }

    #[test]
    fn test_filter_does_not_shift_playback_indices() {
        let (mut session, _) = ready(1);
        session.play_one(4);
        session.set_query("text 5");
        assert_eq!(session.visible_rows(), &[4]);
        assert_eq!(session.playback_state(), PlaybackState::PlayingSingle(4));
        assert_eq!(session.loaded_url(), session.chapter().unwrap().audio_url(4));
    }

    #[test]
    fn test_toggle_favorite_out_of_range() {
        let (mut session, _) = ready(112);
        assert!(matches!(
            session.toggle_favorite(10),
            Err(MushafError::InvalidVerse(_))
        ));
    }

    #[test]
    fn test_display_settings_persist() {
        let (mut session, store) = ready(1);
        assert!(session.toggle_dark_mode());
        assert_eq!(session.adjust_arabic_font(4), 32);
        assert_eq!(session.adjust_translation_font(-100), 10);
        assert_eq!(session.adjust_translation_font(1000), 72);

        let prefs = store.load();
        assert!(prefs.dark_mode);
        assert_eq!(prefs.arabic_font_size, 32);
        assert_eq!(prefs.translation_font_size, 72);
    }

    #[test]
    fn test_cycle_reciter_reloads_and_stops_playback() {
        let (mut session, store) = ready(1);
        session.play_all();

        let tag = session.cycle_reciter(1);
        assert_eq!(session.playback_state(), PlaybackState::Idle);
        assert_eq!(session.load_state(), &LoadState::Loading);
        assert_eq!(tag.request().reciter, RECITERS[1].identifier);
        assert_eq!(store.load().reciter, RECITERS[1].identifier);
    }

    #[test]
    fn test_cycle_translation_wraps() {
        let (mut session, _) = ready(1);
        let tag = session.cycle_translation(-1);
        assert_eq!(
            tag.request().translation,
            TRANSLATIONS[TRANSLATIONS.len() - 1].identifier
        );
    }

    #[test]
    fn test_view_follows_playback() {
        let (mut session, _) = ready(2);
        session.play_one(100);
        while session.tick_view(10) {}
        assert_eq!(session.view_offset(), 95);

        // Manual scroll wins until the playing row changes.
        session.scroll_to(0, 10);
        assert!(!session.tick_view(10));
        assert_eq!(session.view_offset(), 0);
    }

    #[test]
    fn test_shrinking_filter_keeps_last_page_full() {
        let (mut session, _) = ready(2);
        for index in 0..20 {
            session.toggle_favorite(index).unwrap();
        }
        session.toggle_favorites_only();
        session.scroll_to(19, 10);
        assert_eq!(session.view_offset(), 10);

        session.toggle_favorite(19).unwrap();
        assert_eq!(session.visible_rows().len(), 19);
        assert_eq!(session.view_offset(), 9);
    }

    #[test]
    fn test_copy_block() {
        let (session, _) = ready(1);
        let block = session.copy_block(0).unwrap();
        assert!(block.starts_with("text 1\n\ntransliteration 1\n\ntranslation 1"));
        assert!(block.ends_with("— Quran 1:1"));
        assert!(session.copy_block(7).is_none());
        assert_eq!(
            session.share(0, Some("https://reader.example")).unwrap().url.as_deref(),
            Some("https://reader.example?surah=1&ayah=1")
        );
    }
}
