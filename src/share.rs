//! Plain-text renderings of a single verse for copying and sharing.

use crate::domain::AlignedRow;

/// "Quran 2:255"
pub fn citation(chapter: u16, ordinal: u16) -> String {
    format!("Quran {}:{}", chapter, ordinal)
}

/// Original, transliteration and translation separated by blank lines,
/// followed by the citation. Unavailable cells contribute nothing.
pub fn copy_block(chapter: u16, row: &AlignedRow) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\n— {}",
        row.original,
        row.transliteration.text().unwrap_or_default(),
        row.translation.text().unwrap_or_default(),
        citation(chapter, row.ordinal)
    )
    .trim()
    .to_string()
}

/// What a share target receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
}

/// Original and translation with the citation, plus a deep link when an
/// origin is configured.
pub fn share_payload(chapter: u16, row: &AlignedRow, origin: Option<&str>) -> SharePayload {
    let title = citation(chapter, row.ordinal);
    let text = format!(
        "{}\n\n{}\n\n— {}",
        row.original,
        row.translation.text().unwrap_or_default(),
        title
    );
    let url = origin.map(|origin| {
        format!(
            "{}?surah={}&ayah={}",
            origin.trim_end_matches('/'),
            chapter,
            row.ordinal
        )
    });
    SharePayload { title, text, url }
}

impl SharePayload {
    /// Text and link as one block, for targets that only take text.
    pub fn to_text(&self) -> String {
        match &self.url {
            Some(url) => format!("{}\n{}", self.text, url),
            None => self.text.clone(),
        }
    }
}
