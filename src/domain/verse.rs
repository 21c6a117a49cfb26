use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const TRANSLATION_UNAVAILABLE: &str = "Translation not available";
pub const TRANSLITERATION_UNAVAILABLE: &str = "Not available";

/// A single verse as returned by one edition of the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub number: u32,
    pub text: String,
    pub number_in_surah: u16,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub audio_secondary: Vec<String>,
}

impl Verse {
    pub fn new(number: u32, number_in_surah: u16, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            number_in_surah,
            audio: None,
            audio_secondary: Vec::new(),
        }
    }

    pub fn with_audio(mut self, url: impl Into<String>) -> Self {
        self.audio = Some(url.into());
        self
    }

    /// The URL to play: the primary audio, or the first secondary mirror
    /// when the primary is missing. Empty strings count as absent.
    pub fn primary_audio(&self) -> Option<&str> {
        self.audio
            .iter()
            .chain(self.audio_secondary.iter())
            .map(String::as_str)
            .find(|url| !url.is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The per-chapter collections a load produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Audio,
    Translation,
    Transliteration,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Audio => "audio",
            Collection::Translation => "translation",
            Collection::Transliteration => "transliteration",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCell {
    Available(String),
    Unavailable,
}

impl TextCell {
    pub fn text(&self) -> Option<&str> {
        match self {
            TextCell::Available(text) => Some(text),
            TextCell::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TextCell::Available(_))
    }
}

/// One row of the three-column display. Built only by the aligner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRow {
    pub number: u32,
    pub ordinal: u16,
    pub original: String,
    pub translation: TextCell,
    pub transliteration: TextCell,
    pub audio_url: Option<String>,
}

impl AlignedRow {
    pub fn translation_display(&self) -> &str {
        self.translation.text().unwrap_or(TRANSLATION_UNAVAILABLE)
    }

    pub fn transliteration_display(&self) -> &str {
        self.transliteration.text().unwrap_or(TRANSLITERATION_UNAVAILABLE)
    }

    pub fn is_playable(&self) -> bool {
        self.audio_url.is_some()
    }

    /// Case-insensitive substring match over the available texts.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        [
            Some(self.original.as_str()),
            self.translation.text(),
            self.transliteration.text(),
        ]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(needle))
    }
}

/// The aligned rows of one chapter.
///
/// Row `i` always describes the `i`-th verse of the primary collection; the
/// raw per-edition collections never leave the aligner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedChapter {
    chapter: u16,
    rows: Vec<AlignedRow>,
    degraded: Vec<Collection>,
}

impl AlignedChapter {
    pub(crate) fn from_parts(chapter: u16, rows: Vec<AlignedRow>, degraded: Vec<Collection>) -> Self {
        Self {
            chapter,
            rows,
            degraded,
        }
    }

    pub fn chapter(&self) -> u16 {
        self.chapter
    }

    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&AlignedRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn audio_url(&self, index: usize) -> Option<&str> {
        self.rows.get(index).and_then(|row| row.audio_url.as_deref())
    }

    pub fn index_of_ordinal(&self, ordinal: u16) -> Option<usize> {
        self.rows.iter().position(|row| row.ordinal == ordinal)
    }

    /// Optional collections that were missing or shorter than the primary text.
    pub fn degraded(&self) -> &[Collection] {
        &self.degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(original: &str, translation: TextCell, transliteration: TextCell) -> AlignedRow {
        AlignedRow {
            number: 1,
            ordinal: 1,
            original: original.into(),
            translation,
            transliteration,
            audio_url: None,
        }
    }

    #[test]
    fn test_verse_deserializes_api_shape() {
        let json = r#"{
            "number": 2,
            "text": "ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَـٰلَمِينَ",
            "numberInSurah": 2,
            "juz": 1,
            "audio": "https://cdn.islamic.network/quran/audio/128/ar.alafasy/2.mp3",
            "audioSecondary": ["https://cdn.islamic.network/quran/audio/64/ar.alafasy/2.mp3"]
        }"#;
        let verse: Verse = serde_json::from_str(json).unwrap();
        assert_eq!(verse.number, 2);
        assert_eq!(verse.number_in_surah, 2);
        assert_eq!(verse.audio_secondary.len(), 1);
        assert!(verse.primary_audio().unwrap().ends_with("/2.mp3"));
    }

    #[test]
    fn test_verse_without_audio_fields() {
        let json = r#"{"number": 1, "text": "In the name of God", "numberInSurah": 1, "audioSecondary": null}"#;
        let verse: Verse = serde_json::from_str(json).unwrap();
        assert_eq!(verse.primary_audio(), None);
        assert!(verse.audio_secondary.is_empty());
    }

    #[test]
    fn test_secondary_audio_is_a_fallback() {
        let json = r#"{
            "number": 8,
            "text": "text",
            "numberInSurah": 1,
            "audio": "",
            "audioSecondary": ["", "https://cdn.islamic.network/quran/audio/64/ar.alafasy/8.mp3"]
        }"#;
        let verse: Verse = serde_json::from_str(json).unwrap();
        assert!(verse.primary_audio().unwrap().ends_with("/64/ar.alafasy/8.mp3"));
    }

    #[test]
    fn test_empty_audio_is_absent() {
        let verse = Verse::new(1, 1, "text").with_audio("");
        assert_eq!(verse.primary_audio(), None);
    }

    #[test]
    fn test_placeholders_for_unavailable_cells() {
        let r = row("text", TextCell::Unavailable, TextCell::Unavailable);
        assert_eq!(r.translation_display(), TRANSLATION_UNAVAILABLE);
        assert_eq!(r.transliteration_display(), TRANSLITERATION_UNAVAILABLE);
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let r = row(
            "بِسْمِ",
            TextCell::Available("In the Name of God".into()),
            TextCell::Available("Bismi Allahi".into()),
        );
        assert!(r.matches("name"));
        assert!(r.matches("bismi"));
        assert!(r.matches("بِسْمِ"));
        assert!(!r.matches("mercy"));
    }

    #[test]
    fn test_matches_ignores_placeholders() {
        let r = row("text", TextCell::Unavailable, TextCell::Unavailable);
        assert!(!r.matches("available"));
    }
}
