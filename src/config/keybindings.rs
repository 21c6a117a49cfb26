//! Keybinding configuration for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

/// Key strings bound to each action.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub next_pane: Vec<String>,
    pub prev_pane: Vec<String>,
    pub select: Vec<String>,
    pub play_all: Vec<String>,
    pub next_chapter: Vec<String>,
    pub prev_chapter: Vec<String>,
    pub toggle_favorite: Vec<String>,
    pub favorites_only: Vec<String>,
    pub search: Vec<String>,
    pub toggle_dark_mode: Vec<String>,
    pub cycle_reciter: Vec<String>,
    pub cycle_translation: Vec<String>,
    pub arabic_font_up: Vec<String>,
    pub arabic_font_down: Vec<String>,
    pub translation_font_up: Vec<String>,
    pub translation_font_down: Vec<String>,
    pub retry: Vec<String>,
    pub toggle_maximize: Vec<String>,
}

fn keys(bindings: &[&str]) -> Vec<String> {
    bindings.iter().map(|s| s.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            next_page: keys(&["PageDown", "Ctrl+d"]),
            prev_page: keys(&["PageUp", "Ctrl+u"]),
            next_pane: keys(&["Tab"]),
            prev_pane: keys(&["BackTab", "Shift+Tab"]),
            select: keys(&["Enter", "Space"]),
            play_all: keys(&["a"]),
            next_chapter: keys(&["n", "Right"]),
            prev_chapter: keys(&["p", "Left"]),
            toggle_favorite: keys(&["f"]),
            favorites_only: keys(&["F"]),
            search: keys(&["/"]),
            toggle_dark_mode: keys(&["d"]),
            cycle_reciter: keys(&["r"]),
            cycle_translation: keys(&["t"]),
            arabic_font_up: keys(&["Plus", "="]),
            arabic_font_down: keys(&["-"]),
            translation_font_up: keys(&["]"]),
            translation_font_down: keys(&["["]),
            retry: keys(&["R"]),
            toggle_maximize: keys(&["m"]),
        }
    }
}

impl KeybindingConfig {
    /// Get the action for a key event.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 23] = [
            (&self.quit, Action::Quit),
            (&self.move_up, Action::MoveUp),
            (&self.move_down, Action::MoveDown),
            (&self.next_page, Action::NextPage),
            (&self.prev_page, Action::PrevPage),
            (&self.next_pane, Action::NextPane),
            (&self.prev_pane, Action::PrevPane),
            (&self.select, Action::Select),
            (&self.play_all, Action::PlayAll),
            (&self.next_chapter, Action::NextChapter),
            (&self.prev_chapter, Action::PrevChapter),
            (&self.toggle_favorite, Action::ToggleFavorite),
            (&self.favorites_only, Action::FavoritesOnly),
            (&self.search, Action::Search),
            (&self.toggle_dark_mode, Action::ToggleDarkMode),
            (&self.cycle_reciter, Action::CycleReciter),
            (&self.cycle_translation, Action::CycleTranslation),
            (&self.arabic_font_up, Action::ArabicFontUp),
            (&self.arabic_font_down, Action::ArabicFontDown),
            (&self.translation_font_up, Action::TranslationFontUp),
            (&self.translation_font_down, Action::TranslationFontDown),
            (&self.retry, Action::Retry),
            (&self.toggle_maximize, Action::ToggleMaximize),
        ];

        table
            .iter()
            .find(|(bindings, _)| matches_key(key, bindings))
            .map(|(_, action)| *action)
            .unwrap_or(Action::None)
    }

    /// What to tell the user when a chapter failed to load.
    pub fn retry_hint(&self) -> String {
        match self.retry.first() {
            Some(key) => format!("Press {} to retry", key),
            None => "Retry has no key bound".to_string(),
        }
    }
}

fn matches_key(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|binding| parse_key_string(binding).ok())
        .any(|parsed| parsed.matches(key))
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Shift is ignored when the binding doesn't ask for it, since
    /// terminals report "F" and "+" with the shift bit set.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse a key string into a KeyBinding.
///
/// Supported formats:
/// - Single characters: "a", "F", "/", "["
/// - Special keys: "Enter", "Tab", "BackTab", "Backspace", "Delete", "Home", "End",
///   "PageUp", "PageDown", "Up", "Down", "Left", "Right", "Esc", "Space", "Plus", "F1"-"F12"
/// - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter", "Ctrl+Shift+a"
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    let mut parts: Vec<&str> = s.split('+').collect();
    let key_part = parts.pop().unwrap_or_default();

    let mut modifiers = KeyModifiers::NONE;
    for part in parts {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier in {:?}: {:?}", s, part)),
        }
    }

    let code = parse_key_code(key_part)?;
    Ok(KeyBinding { code, modifiers })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let code = match s.to_lowercase().as_str() {
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" | "bs" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "plus" => KeyCode::Char('+'),
        other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            Some(n) if (1..=12).contains(&n) => KeyCode::F(n),
            _ => return Err(format!("Unknown key: {}", s)),
        },
    };
    Ok(code)
}
