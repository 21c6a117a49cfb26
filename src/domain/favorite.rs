use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::app::MushafError;
use crate::domain::catalog;

/// Address of a verse: chapter number and 1-based ordinal within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseKey {
    pub chapter: u16,
    pub ordinal: u16,
}

impl VerseKey {
    pub fn new(chapter: u16, ordinal: u16) -> Self {
        Self { chapter, ordinal }
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.ordinal)
    }
}

/// Parses `chapter:verse`, checking both against the chapter table.
impl FromStr for VerseKey {
    type Err = MushafError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MushafError::InvalidVerse(s.to_string());
        let (chapter, ordinal) = s.trim().split_once(':').ok_or_else(invalid)?;
        let chapter: u16 = chapter.trim().parse().map_err(|_| invalid())?;
        let ordinal: u16 = ordinal.trim().parse().map_err(|_| invalid())?;

        let info = catalog::chapter(chapter).ok_or(MushafError::ChapterOutOfRange(chapter))?;
        if ordinal == 0 || ordinal > info.verse_count {
            return Err(invalid());
        }
        Ok(Self::new(chapter, ordinal))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(rename = "surahNumber")]
    pub chapter: u16,
    #[serde(rename = "ayahNumber")]
    pub ordinal: u16,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Favorite {
    pub fn new(key: VerseKey, created_at: DateTime<Utc>) -> Self {
        Self {
            chapter: key.chapter,
            ordinal: key.ordinal,
            timestamp: created_at.timestamp_millis(),
        }
    }

    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter, self.ordinal)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// The favorite set: insertion-ordered for persistence, hashed for lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    entries: Vec<Favorite>,
    keys: HashSet<VerseKey>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted list; a repeated key keeps its first entry.
    pub fn from_entries(entries: Vec<Favorite>) -> Self {
        let mut favorites = Self::new();
        for entry in entries {
            if favorites.keys.insert(entry.key()) {
                favorites.entries.push(entry);
            }
        }
        favorites
    }

    pub fn contains(&self, key: VerseKey) -> bool {
        self.keys.contains(&key)
    }

    /// Add the key if absent, remove it if present. Returns the new state.
    pub fn toggle(&mut self, key: VerseKey, now: DateTime<Utc>) -> bool {
        if self.keys.remove(&key) {
            self.entries.retain(|f| f.key() != key);
            false
        } else {
            self.keys.insert(key);
            self.entries.push(Favorite::new(key, now));
            true
        }
    }

    pub fn entries(&self) -> &[Favorite] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut favorites = Favorites::new();
        let key = VerseKey::new(2, 255);
        let before = favorites.clone();

        assert!(favorites.toggle(key, Utc::now()));
        assert!(favorites.contains(key));
        assert!(!favorites.toggle(key, Utc::now()));
        assert!(!favorites.contains(key));
        assert_eq!(favorites, before);
    }

    #[test]
    fn test_toggle_keeps_other_entries_in_order() {
        let mut favorites = Favorites::new();
        let now = Utc::now();
        favorites.toggle(VerseKey::new(1, 1), now);
        favorites.toggle(VerseKey::new(1, 2), now);
        favorites.toggle(VerseKey::new(1, 3), now);
        favorites.toggle(VerseKey::new(1, 2), now);

        let keys: Vec<_> = favorites.entries().iter().map(Favorite::key).collect();
        assert_eq!(keys, vec![VerseKey::new(1, 1), VerseKey::new(1, 3)]);
    }

    #[test]
    fn test_same_ordinal_different_chapter_is_distinct() {
        let mut favorites = Favorites::new();
        favorites.toggle(VerseKey::new(1, 1), Utc::now());
        assert!(!favorites.contains(VerseKey::new(2, 1)));
    }

    #[test]
    fn test_from_entries_dedups() {
        let entry = Favorite {
            chapter: 1,
            ordinal: 5,
            timestamp: 1_700_000_000_000,
        };
        let favorites = Favorites::from_entries(vec![entry.clone(), entry]);
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_favorite_json_shape() {
        let favorite = Favorite {
            chapter: 36,
            ordinal: 58,
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&favorite).unwrap();
        assert_eq!(
            json,
            r#"{"surahNumber":36,"ayahNumber":58,"timestamp":1700000000000}"#
        );
        assert!(favorite.created_at().is_some());
    }

    #[test]
    fn test_parse_verse_key() {
        assert_eq!("2:255".parse::<VerseKey>().unwrap(), VerseKey::new(2, 255));
        assert_eq!(" 1 : 7 ".parse::<VerseKey>().unwrap(), VerseKey::new(1, 7));
        assert!("1:8".parse::<VerseKey>().is_err());
        assert!("1:0".parse::<VerseKey>().is_err());
        assert!("2-255".parse::<VerseKey>().is_err());
        assert!(matches!(
            "115:1".parse::<VerseKey>(),
            Err(MushafError::ChapterOutOfRange(115))
        ));
    }
}
