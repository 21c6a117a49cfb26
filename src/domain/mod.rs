pub mod catalog;
pub mod favorite;
pub mod preferences;
pub mod verse;

pub use catalog::{Chapter, EditionOption};
pub use favorite::{Favorite, Favorites, VerseKey};
pub use preferences::{Preferences, PreferencesUpdate};
pub use verse::{AlignedChapter, AlignedRow, Collection, TextCell, Verse};
