use crate::domain::{AlignedChapter, AlignedRow, Collection, TextCell, Verse};

/// The raw collections fetched for one chapter.
#[derive(Debug, Clone, Default)]
pub struct ChapterSources {
    pub text: Vec<Verse>,
    pub audio: Vec<Verse>,
    pub translation: Vec<Verse>,
    pub transliteration: Vec<Verse>,
}

/// Merges per-edition collections into index-aligned rows.
///
/// Collections are taken to be in canonical verse order already. Row `i`
/// reads position `i` of every collection; a collection that is too short
/// yields an unavailable cell for that row instead of shifting the rest.
#[derive(Clone)]
pub struct Aligner;

impl Default for Aligner {
    fn default() -> Self {
        Self::new()
    }
}

impl Aligner {
    pub fn new() -> Self {
        Self
    }

    pub fn align(&self, chapter: u16, sources: ChapterSources) -> AlignedChapter {
        let ChapterSources {
            text,
            audio,
            translation,
            transliteration,
        } = sources;

        let expected = text.len();
        let mut degraded = Vec::new();
        for (collection, len) in [
            (Collection::Audio, audio.len()),
            (Collection::Translation, translation.len()),
            (Collection::Transliteration, transliteration.len()),
        ] {
            if len < expected {
                tracing::warn!(
                    "Surah {}: {} has {} of {} verses",
                    chapter,
                    collection,
                    len,
                    expected
                );
                degraded.push(collection);
            }
        }

        let rows = text
            .into_iter()
            .enumerate()
            .map(|(index, verse)| AlignedRow {
                number: verse.number,
                ordinal: verse.number_in_surah,
                original: verse.text,
                translation: cell_at(&translation, index),
                transliteration: cell_at(&transliteration, index),
                audio_url: audio
                    .get(index)
                    .and_then(Verse::primary_audio)
                    .map(String::from),
            })
            .collect();

        AlignedChapter::from_parts(chapter, rows, degraded)
    }
}

fn cell_at(collection: &[Verse], index: usize) -> TextCell {
    match collection.get(index) {
        Some(verse) => TextCell::Available(verse.text.clone()),
        None => TextCell::Unavailable,
    }
}
