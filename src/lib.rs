//! # Mushaf
//!
//! A terminal Quran reader with verse-by-verse recitation.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Aligner → Session → UI
//!                      ↑   ↓
//!        Preference store   Playback controller → audio output
//! ```
//!
//! - [`fetcher`]: Fetches a chapter's editions concurrently and tags each load
//! - [`aligner`]: Zips text, audio, translation and transliteration into rows
//! - [`session`]: The loaded chapter plus everything acting on it
//! - [`playback`]: Single-verse and continuous playback state machine
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the reader on the last surah read
//! mushaf
//!
//! # Open a specific surah
//! mushaf tui --chapter 36
//!
//! # Print a verse
//! mushaf copy 2:255
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`domain`]: Verses, catalogs, favorites and preferences
//! - [`store`]: Preference persistence

/// Splits a chapter's fetched collections into aligned rows.
pub mod aligner;

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the load orchestrator and the configuration.
pub mod app;

/// Command-line interface using clap.
///
/// - `tui [--chapter N]` - Launch the reader (default)
/// - `show <surah>` - Print a surah
/// - `copy <surah:ayah> [--share]` - Print a verse for pasting
/// - `chapters`, `reciters`, `translations` - List the catalogs
/// - `favorites`, `favorite <surah:ayah>` - List or toggle favorites
/// - `prefs [...]` - Show or change preferences
pub mod cli;

/// Configuration management for the TUI.
///
/// Loads from `~/.config/mushaf/config.toml`, supporting:
/// - Light and dark palettes (named or hex colors)
/// - Custom keybindings
/// - API endpoint and share link origin
pub mod config;

/// Core domain models.
///
/// - [`AlignedChapter`](domain::AlignedChapter): One row per verse, ready to display
/// - [`Favorites`](domain::Favorites): Favorite verses with creation time
/// - [`Preferences`](domain::Preferences): Everything the reader remembers
pub mod domain;

/// Chapter loading.
///
/// - [`ContentSource`](fetcher::ContentSource): Async trait for edition fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`Orchestrator`](fetcher::Orchestrator): Concurrent fetch, degrade, align
pub mod fetcher;

/// Search and favorites-only filtering of the verse list.
pub mod filter;

/// Audio playback.
///
/// - [`PlaybackController`](playback::PlaybackController): State machine owning the output
/// - [`RodioOutput`](playback::RodioOutput): Streams verse MP3s through rodio
pub mod playback;

pub mod session;

/// Copy and share text for a single verse.
pub mod share;

/// SQLite persistence layer.
///
/// - [`PreferenceStore`](store::PreferenceStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Terminal user interface.
///
/// Three-pane layout built with ratatui:
/// - Surah list (left)
/// - Verse list (top right), scrolled to follow playback
/// - Verse detail (bottom right)
///
/// Keybindings: j/k navigate, Enter plays a verse, a plays the surah,
/// n/p change surah, f toggles favorite, / searches, q quits.
pub mod tui;

pub mod view_sync;
