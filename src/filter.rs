use crate::domain::{AlignedChapter, AlignedRow, Favorites, VerseKey};

/// Search query plus the favorites-only switch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    query: String,
    favorites_only: bool,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn toggle_favorites_only(&mut self) -> bool {
        self.favorites_only = !self.favorites_only;
        self.favorites_only
    }

    pub fn is_active(&self) -> bool {
        self.favorites_only || !self.query.is_empty()
    }

    /// Indices into the full chapter of the rows that pass the filter, in
    /// chapter order. The chapter itself is never touched.
    ///
    /// The query is matched as typed, whitespace included.
    pub fn visible_rows(&self, chapter: &AlignedChapter, favorites: &Favorites) -> Vec<usize> {
        let needle = self.query.to_lowercase();
        chapter
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| self.accepts(chapter.chapter(), row, favorites, &needle))
            .map(|(index, _)| index)
            .collect()
    }

    fn accepts(&self, chapter: u16, row: &AlignedRow, favorites: &Favorites, needle: &str) -> bool {
        let favorite_ok =
            !self.favorites_only || favorites.contains(VerseKey::new(chapter, row.ordinal));
        favorite_ok && (needle.is_empty() || row.matches(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::tests::chapter;
    use crate::aligner::{Aligner, ChapterSources};
    use crate::domain::Verse;
    use chrono::Utc;

    fn favorites(keys: &[(u16, u16)]) -> Favorites {
        let mut favorites = Favorites::new();
        for &(c, v) in keys {
            favorites.toggle(VerseKey::new(c, v), Utc::now());
        }
        favorites
    }

    fn texts(original: &[&str], translation: &[&str]) -> AlignedChapter {
        let verses = |texts: &[&str]| {
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| Verse::new(i as u32 + 1, i as u16 + 1, *t))
                .collect::<Vec<_>>()
        };
        Aligner::new().align(
            1,
            ChapterSources {
                text: verses(original),
                translation: verses(translation),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_no_filter_shows_everything() {
        let ch = chapter(1, 7);
        let rows = Filter::new().visible_rows(&ch, &Favorites::new());
        assert_eq!(rows, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_favorites_only() {
        let ch = chapter(1, 7);
        let favs = favorites(&[(1, 2), (1, 5), (2, 3)]);
        let mut filter = Filter::new();
        filter.toggle_favorites_only();
        assert_eq!(filter.visible_rows(&ch, &favs), vec![1, 4]);
    }

    #[test]
    fn test_query_is_case_insensitive_across_columns() {
        let ch = texts(
            &["بِسْمِ ٱللَّهِ", "ٱلْحَمْدُ لِلَّهِ", "ٱلرَّحْمَٰنِ"],
            &["In the Name of God", "All praise", "The Most Gracious"],
        );
        let mut filter = Filter::new();

        filter.set_query("GRACIOUS");
        assert_eq!(filter.visible_rows(&ch, &Favorites::new()), vec![2]);

        filter.set_query("ٱلْحَمْدُ");
        assert_eq!(filter.visible_rows(&ch, &Favorites::new()), vec![1]);
    }

    #[test]
    fn test_placeholder_text_is_not_searchable() {
        let ch = texts(&["one", "two"], &[]);
        let mut filter = Filter::new();
        filter.set_query("not available");
        assert!(filter.visible_rows(&ch, &Favorites::new()).is_empty());
    }

    #[test]
    fn test_both_conditions_must_hold() {
        let ch = chapter(1, 7);
        let favs = favorites(&[(1, 3), (1, 4)]);
        let mut filter = Filter::new();
        filter.toggle_favorites_only();
        filter.set_query("translation 4");
        assert_eq!(filter.visible_rows(&ch, &favs), vec![3]);
    }

    #[test]
    fn test_visible_indices_satisfy_predicate() {
        let ch = chapter(2, 286);
        let favs = favorites(&[(2, 1), (2, 10), (2, 100), (2, 255), (2, 286)]);
        let mut filter = Filter::new();
        filter.toggle_favorites_only();
        filter.set_query("1");

        let rows = filter.visible_rows(&ch, &favs);
        assert!(!rows.is_empty());
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
        for index in rows {
            let row = ch.row(index).unwrap();
            assert!(favs.contains(VerseKey::new(2, row.ordinal)));
            assert!(row.matches("1"));
        }
        // Filtering left the chapter alone.
        assert_eq!(ch.len(), 286);
    }

    #[test]
    fn test_only_empty_query_is_inactive() {
        let mut filter = Filter::new();
        assert!(!filter.is_active());
        filter.set_query("   ");
        assert!(filter.is_active());
        filter.set_query("");
        assert!(!filter.is_active());
        filter.toggle_favorites_only();
        assert!(filter.is_active());
    }

    #[test]
    fn test_whitespace_in_query_is_kept() {
        let ch = texts(&["one", "two"], &["mercy", "the mercy"]);
        let mut filter = Filter::new();

        filter.set_query("   ");
        assert!(filter.visible_rows(&ch, &Favorites::new()).is_empty());

        filter.set_query(" MERCY");
        assert_eq!(filter.visible_rows(&ch, &Favorites::new()), vec![1]);

        filter.set_query("mercy ");
        assert!(filter.visible_rows(&ch, &Favorites::new()).is_empty());
    }
}
