use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::domain::catalog;
use crate::domain::favorite::{Favorite, Favorites};

pub const DEFAULT_CHAPTER: u16 = 1;
pub const DEFAULT_ARABIC_FONT_SIZE: u16 = 28;
pub const DEFAULT_TRANSLATION_FONT_SIZE: u16 = 16;
pub const FONT_SIZE_RANGE: RangeInclusive<u16> = 10..=72;

/// Storage keys. These match the names earlier versions wrote.
pub mod keys {
    pub const LAST_CHAPTER: &str = "lastReadSurah";
    pub const DARK_MODE: &str = "darkMode";
    pub const ARABIC_FONT_SIZE: &str = "arabicFontSize";
    pub const TRANSLATION_FONT_SIZE: &str = "translationFontSize";
    pub const RECITER: &str = "selectedReciter";
    pub const TRANSLATION: &str = "selectedTranslation";
    pub const FAVORITES: &str = "favoriteVerses";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub last_chapter: u16,
    pub dark_mode: bool,
    pub arabic_font_size: u16,
    pub translation_font_size: u16,
    pub reciter: String,
    pub translation: String,
    pub favorites: Favorites,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_chapter: DEFAULT_CHAPTER,
            dark_mode: false,
            arabic_font_size: DEFAULT_ARABIC_FONT_SIZE,
            translation_font_size: DEFAULT_TRANSLATION_FONT_SIZE,
            reciter: catalog::default_reciter().identifier.to_string(),
            translation: catalog::default_translation().identifier.to_string(),
            favorites: Favorites::new(),
        }
    }
}

impl Preferences {
    /// Rebuild preferences from raw stored values.
    ///
    /// Every key is read on its own: a missing, malformed or out-of-catalog
    /// value falls back to its default without affecting the others.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries: HashMap<String, String> = entries.into_iter().collect();
        let defaults = Self::default();

        let favorites = match entries.get(keys::FAVORITES) {
            None => defaults.favorites,
            Some(raw) => match serde_json::from_str::<Vec<Favorite>>(raw) {
                Ok(list) => Favorites::from_entries(
                    list.into_iter()
                        .filter(|f| catalog::is_valid_chapter(f.chapter))
                        .collect(),
                ),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable favorites: {}", e);
                    defaults.favorites
                }
            },
        };

        Self {
            last_chapter: parse_entry(
                &entries,
                keys::LAST_CHAPTER,
                defaults.last_chapter,
                |n| catalog::is_valid_chapter(*n),
            ),
            dark_mode: parse_entry(&entries, keys::DARK_MODE, defaults.dark_mode, |_| true),
            arabic_font_size: parse_entry(
                &entries,
                keys::ARABIC_FONT_SIZE,
                defaults.arabic_font_size,
                |n| FONT_SIZE_RANGE.contains(n),
            ),
            translation_font_size: parse_entry(
                &entries,
                keys::TRANSLATION_FONT_SIZE,
                defaults.translation_font_size,
                |n| FONT_SIZE_RANGE.contains(n),
            ),
            reciter: parse_entry(&entries, keys::RECITER, defaults.reciter, |id: &String| {
                catalog::reciter(id).is_some()
            }),
            translation: parse_entry(
                &entries,
                keys::TRANSLATION,
                defaults.translation,
                |id: &String| catalog::translation(id).is_some(),
            ),
            favorites,
        }
    }

    pub fn apply(&mut self, update: &PreferencesUpdate) {
        if let Some(chapter) = update.last_chapter {
            self.last_chapter = chapter;
        }
        if let Some(dark_mode) = update.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(size) = update.arabic_font_size {
            self.arabic_font_size = size;
        }
        if let Some(size) = update.translation_font_size {
            self.translation_font_size = size;
        }
        if let Some(ref reciter) = update.reciter {
            self.reciter = reciter.clone();
        }
        if let Some(ref translation) = update.translation {
            self.translation = translation.clone();
        }
        if let Some(ref favorites) = update.favorites {
            self.favorites = Favorites::from_entries(favorites.clone());
        }
    }
}

fn parse_entry<T, F>(entries: &HashMap<String, String>, key: &str, default: T, valid: F) -> T
where
    T: FromStr,
    F: Fn(&T) -> bool,
{
    let Some(raw) = entries.get(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            tracing::warn!("Ignoring invalid preference {}={:?}", key, raw);
            default
        }
    }
}

/// A partial preferences write. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub last_chapter: Option<u16>,
    pub dark_mode: Option<bool>,
    pub arabic_font_size: Option<u16>,
    pub translation_font_size: Option<u16>,
    pub reciter: Option<String>,
    pub translation: Option<String>,
    pub favorites: Option<Vec<Favorite>>,
}

impl PreferencesUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Serialize the set fields into raw key/value pairs.
    pub fn entries(&self) -> serde_json::Result<Vec<(&'static str, String)>> {
        let mut entries = Vec::new();
        if let Some(chapter) = self.last_chapter {
            entries.push((keys::LAST_CHAPTER, chapter.to_string()));
        }
        if let Some(dark_mode) = self.dark_mode {
            entries.push((keys::DARK_MODE, dark_mode.to_string()));
        }
        if let Some(size) = self.arabic_font_size {
            entries.push((keys::ARABIC_FONT_SIZE, size.to_string()));
        }
        if let Some(size) = self.translation_font_size {
            entries.push((keys::TRANSLATION_FONT_SIZE, size.to_string()));
        }
        if let Some(ref reciter) = self.reciter {
            entries.push((keys::RECITER, reciter.clone()));
        }
        if let Some(ref translation) = self.translation {
            entries.push((keys::TRANSLATION, translation.clone()));
        }
        if let Some(ref favorites) = self.favorites {
            entries.push((keys::FAVORITES, serde_json::to_string(favorites)?));
        }
        Ok(entries)
    }
}
