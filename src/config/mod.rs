//! Configuration management.
//!
//! Configuration is read from `~/.config/mushaf/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::{ColorConfig, ThemeConfig};
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
    pub api: ApiConfig,
    pub share: ShareConfig,
}

/// Upstream content API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Recitation downloads are far larger than text responses.
    pub audio_timeout_secs: u64,
    pub text_edition: String,
    pub transliteration_edition: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.alquran.cloud/v1".to_string(),
            timeout_secs: 10,
            audio_timeout_secs: 120,
            text_edition: "quran-uthmani".to_string(),
            transliteration_edition: "en.transliteration".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn audio_timeout(&self) -> Duration {
        Duration::from_secs(self.audio_timeout_secs)
    }
}

/// Verse sharing settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Web reader that understands `?surah=N&ayah=M` deep links. Shared
    /// text carries no link when unset.
    pub origin: Option<String>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/mushaf/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("mushaf").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let io_error = |path: &Path, source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let mut file = fs::File::create(path).map_err(|e| io_error(path, e))?;
        file.write_all(DEFAULT_CONFIG.as_bytes())
            .map_err(|e| io_error(path, e))?;

        tracing::info!("Wrote default configuration to {}", path.display());
        Ok(())
    }
}

const DEFAULT_CONFIG: &str = r##"# mushaf configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "F", "/"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, Plus, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"

[api]
base_url = "https://api.alquran.cloud/v1"
# Requests slower than this fail the load (no automatic retry)
timeout_secs = 10
# Limit for downloading one verse of recitation
audio_timeout_secs = 120
text_edition = "quran-uthmani"
transliteration_edition = "en.transliteration"

[share]
# Web reader to deep-link shared verses to, e.g. "https://reader.example"
# origin = ""

[colors.light]
background = "Reset"
active_border = "Green"
inactive_border = "Gray"
selection_bg = "Green"
selection_fg = "Black"
original_text = "Reset"
transliteration_text = "DarkGray"
translation_text = "Reset"
unavailable_text = "Gray"
playing_marker = "Green"
favorite_marker = "Yellow"
error = "Red"
status_fg = "Black"
status_bg = "Gray"

[colors.dark]
background = "#111827"
active_border = "LightGreen"
inactive_border = "DarkGray"
selection_bg = "LightGreen"
selection_fg = "Black"
original_text = "White"
transliteration_text = "Gray"
translation_text = "White"
unavailable_text = "DarkGray"
playing_marker = "LightGreen"
favorite_marker = "LightYellow"
error = "LightRed"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
# Navigation
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["PageDown", "Ctrl+d"]
prev_page = ["PageUp", "Ctrl+u"]
next_pane = ["Tab"]
prev_pane = ["BackTab", "Shift+Tab"]
next_chapter = ["n", "Right"]
prev_chapter = ["p", "Left"]

# Playback
select = ["Enter", "Space"]
play_all = ["a"]

# Reading
toggle_favorite = ["f"]
favorites_only = ["F"]
search = ["/"]
toggle_dark_mode = ["d"]
cycle_reciter = ["r"]
cycle_translation = ["t"]
arabic_font_up = ["Plus", "="]
arabic_font_down = ["-"]
translation_font_up = ["]"]
translation_font_down = ["["]
retry = ["R"]
toggle_maximize = ["m"]
"##;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
