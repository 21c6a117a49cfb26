pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::domain::VerseKey;

#[derive(Parser)]
#[command(name = "mushaf")]
#[command(about = "A terminal Quran reader with verse-by-verse recitation", long_about = None)]
pub struct Cli {
    /// Preferences database (default: <data dir>/mushaf/mushaf.db)
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,

    /// Configuration file (default: <config dir>/mushaf/config.toml)
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Append logs to this file (the reader logs to <data dir>/mushaf/mushaf.log
    /// by default, other commands to stderr)
    #[arg(long, global = true)]
    pub log: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the reader (the default)
    Tui {
        /// Surah to open instead of the last one read
        #[arg(short, long)]
        chapter: Option<u16>,
    },
    /// Print a surah with its translation and transliteration
    Show {
        /// Surah number (1-114)
        chapter: u16,
    },
    /// Print a verse in copyable form, e.g. `copy 2:255`
    Copy {
        /// Verse as surah:ayah
        verse: VerseKey,

        /// Use the share layout, with a link when `[share] origin` is set
        #[arg(long)]
        share: bool,
    },
    /// List all surahs
    Chapters,
    /// List available reciters
    Reciters,
    /// List available translations
    Translations,
    /// List favorite verses
    Favorites,
    /// Add a verse to favorites, or remove it if already there
    Favorite {
        /// Verse as surah:ayah
        verse: VerseKey,
    },
    /// Show or change saved preferences
    Prefs(PrefsArgs),
}

#[derive(Args, Debug, Default)]
pub struct PrefsArgs {
    /// Reciter identifier, see `mushaf reciters`
    #[arg(long)]
    pub reciter: Option<String>,

    /// Translation identifier, see `mushaf translations`
    #[arg(long)]
    pub translation: Option<String>,

    #[arg(long)]
    pub dark_mode: Option<bool>,

    #[arg(long, value_parser = clap::value_parser!(u16).range(10..=72))]
    pub arabic_font_size: Option<u16>,

    #[arg(long, value_parser = clap::value_parser!(u16).range(10..=72))]
    pub translation_font_size: Option<u16>,
}
