use chrono::Utc;

use crate::app::{AppContext, MushafError, Result};
use crate::cli::PrefsArgs;
use crate::domain::catalog::{self, EditionOption, CHAPTERS, RECITERS, TRANSLATIONS};
use crate::domain::{AlignedChapter, AlignedRow, Preferences, PreferencesUpdate, VerseKey};
use crate::fetcher::ChapterRequest;
use crate::share;
use crate::store::PreferenceStore;

fn request_for(prefs: &Preferences, chapter: u16) -> ChapterRequest {
    ChapterRequest {
        chapter,
        reciter: prefs.reciter.clone(),
        translation: prefs.translation.clone(),
    }
}

async fn load_chapter(ctx: &AppContext, chapter: u16) -> Result<AlignedChapter> {
    if !catalog::is_valid_chapter(chapter) {
        return Err(MushafError::ChapterOutOfRange(chapter));
    }
    let prefs = ctx.store.load();
    let aligned = ctx.orchestrator.load(&request_for(&prefs, chapter)).await?;
    for collection in aligned.degraded() {
        eprintln!("Note: {} could not be loaded for surah {}", collection, chapter);
    }
    Ok(aligned)
}

fn format_row(row: &AlignedRow) -> String {
    format!(
        "[{}] {}\n      {}\n      {}",
        row.ordinal,
        row.original,
        row.transliteration_display(),
        row.translation_display()
    )
}

pub async fn show_chapter(ctx: &AppContext, chapter: u16) -> Result<()> {
    let aligned = load_chapter(ctx, chapter).await?;

    if let Some(info) = catalog::chapter(chapter) {
        println!(
            "{}. {} ({}) - {} verses, {}\n",
            info.number, info.name, info.translation, info.verse_count, info.revelation
        );
    }
    for row in aligned.rows() {
        println!("{}\n", format_row(row));
    }
    Ok(())
}

/// Print one verse for pasting elsewhere.
pub async fn copy_verse(ctx: &AppContext, key: VerseKey, share_layout: bool) -> Result<()> {
    let aligned = load_chapter(ctx, key.chapter).await?;
    let row = aligned
        .index_of_ordinal(key.ordinal)
        .and_then(|index| aligned.row(index))
        .ok_or_else(|| MushafError::InvalidVerse(key.to_string()))?;

    if share_layout {
        let origin = ctx.config.share.origin.as_deref();
        println!("{}", share::share_payload(key.chapter, row, origin).to_text());
    } else {
        println!("{}", share::copy_block(key.chapter, row));
    }
    Ok(())
}

pub fn list_chapters() {
    for chapter in CHAPTERS.iter() {
        println!(
            "{:>3}  {:<16} {:<28} {:>3} verses  {}",
            chapter.number, chapter.name, chapter.translation, chapter.verse_count, chapter.revelation
        );
    }
}

fn print_editions(options: &[EditionOption], selected: &str) {
    for option in options {
        let marker = if option.identifier == selected { "*" } else { " " };
        println!(
            "{} {:<26} {} ({})",
            marker, option.identifier, option.name, option.language
        );
    }
}

pub fn list_reciters(ctx: &AppContext) {
    print_editions(RECITERS, &ctx.store.load().reciter);
}

pub fn list_translations(ctx: &AppContext) {
    print_editions(TRANSLATIONS, &ctx.store.load().translation);
}

pub fn list_favorites(ctx: &AppContext) {
    let prefs = ctx.store.load();

    if prefs.favorites.is_empty() {
        println!("No favorites");
        return;
    }

    for favorite in prefs.favorites.entries() {
        let name = catalog::chapter(favorite.chapter)
            .map(|c| c.name)
            .unwrap_or("?");
        let date = favorite
            .created_at()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "          ".to_string());
        println!("{}  {:<8} {}", date, favorite.key(), name);
    }
}

/// Flip a verse in the favorite set. Returns whether it is now a favorite.
pub fn toggle_favorite<S: PreferenceStore>(store: &S, key: VerseKey) -> Result<bool> {
    let mut favorites = store.load().favorites;
    let now_favorite = favorites.toggle(key, Utc::now());
    store.save(&PreferencesUpdate {
        favorites: Some(favorites.entries().to_vec()),
        ..Default::default()
    })?;
    Ok(now_favorite)
}

pub fn favorite_verse(ctx: &AppContext, key: VerseKey) -> Result<()> {
    if toggle_favorite(ctx.store.as_ref(), key)? {
        println!("Added {} to favorites", key);
    } else {
        println!("Removed {} from favorites", key);
    }
    Ok(())
}

/// Turn command-line flags into an update, rejecting unknown editions.
fn build_update(args: &PrefsArgs) -> Result<PreferencesUpdate> {
    if let Some(ref reciter) = args.reciter {
        catalog::reciter(reciter)
            .ok_or_else(|| MushafError::Config(format!("Unknown reciter: {}", reciter)))?;
    }
    if let Some(ref translation) = args.translation {
        catalog::translation(translation)
            .ok_or_else(|| MushafError::Config(format!("Unknown translation: {}", translation)))?;
    }

    Ok(PreferencesUpdate {
        reciter: args.reciter.clone(),
        translation: args.translation.clone(),
        dark_mode: args.dark_mode,
        arabic_font_size: args.arabic_font_size,
        translation_font_size: args.translation_font_size,
        ..Default::default()
    })
}

/// Apply any flags given, then return what is stored.
pub fn apply_preferences<S: PreferenceStore>(store: &S, args: &PrefsArgs) -> Result<Preferences> {
    let update = build_update(args)?;
    store.save(&update)?;
    Ok(store.load())
}

pub fn update_preferences(ctx: &AppContext, args: &PrefsArgs) -> Result<()> {
    let prefs = apply_preferences(ctx.store.as_ref(), args)?;

    let last = catalog::chapter(prefs.last_chapter)
        .map(|c| c.name)
        .unwrap_or("?");
    println!("last surah read:        {} ({})", prefs.last_chapter, last);
    println!("reciter:                {}", prefs.reciter);
    println!("translation:            {}", prefs.translation);
    println!("dark mode:              {}", prefs.dark_mode);
    println!("arabic font size:       {}", prefs.arabic_font_size);
    println!("translation font size:  {}", prefs.translation_font_size);
    println!("favorites:              {}", prefs.favorites.len());
    Ok(())
}
