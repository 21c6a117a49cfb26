//! Palette configuration for the TUI.
//!
//! Two palettes are configured side by side and the reader's dark-mode
//! preference decides which one is drawn.

use std::collections::BTreeMap;

use ratatui::style::Color;
use serde::Deserialize;

/// Both palettes.
///
/// Each `[colors.light]` / `[colors.dark]` table only overrides the keys it
/// names; everything else keeps that palette's default.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawColors")]
pub struct ColorConfig {
    pub light: ThemeConfig,
    pub dark: ThemeConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawColors {
    light: BTreeMap<String, String>,
    dark: BTreeMap<String, String>,
}

impl TryFrom<RawColors> for ColorConfig {
    type Error = String;

    fn try_from(raw: RawColors) -> Result<Self, Self::Error> {
        Ok(Self {
            light: ThemeConfig::light().with_overrides(&raw.light)?,
            dark: ThemeConfig::dark().with_overrides(&raw.dark)?,
        })
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ThemeConfig::light(),
            dark: ThemeConfig::dark(),
        }
    }
}

impl ColorConfig {
    pub fn theme(&self, dark_mode: bool) -> &ThemeConfig {
        if dark_mode {
            &self.dark
        } else {
            &self.light
        }
    }
}

/// One palette.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeConfig {
    pub background: Color,
    pub active_border: Color,
    pub inactive_border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub original_text: Color,
    pub transliteration_text: Color,
    pub translation_text: Color,
    pub unavailable_text: Color,
    pub playing_marker: Color,
    pub favorite_marker: Color,
    pub error: Color,
    pub status_fg: Color,
    pub status_bg: Color,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::light()
    }
}

impl ThemeConfig {
    pub fn light() -> Self {
        Self {
            background: Color::Reset,
            active_border: Color::Green,
            inactive_border: Color::Gray,
            selection_bg: Color::Green,
            selection_fg: Color::Black,
            original_text: Color::Reset,
            transliteration_text: Color::DarkGray,
            translation_text: Color::Reset,
            unavailable_text: Color::Gray,
            playing_marker: Color::Green,
            favorite_marker: Color::Yellow,
            error: Color::Red,
            status_fg: Color::Black,
            status_bg: Color::Gray,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(0x11, 0x18, 0x27),
            active_border: Color::LightGreen,
            inactive_border: Color::DarkGray,
            selection_bg: Color::LightGreen,
            selection_fg: Color::Black,
            original_text: Color::White,
            transliteration_text: Color::Gray,
            translation_text: Color::White,
            unavailable_text: Color::DarkGray,
            playing_marker: Color::LightGreen,
            favorite_marker: Color::LightYellow,
            error: Color::LightRed,
            status_fg: Color::White,
            status_bg: Color::DarkGray,
        }
    }

    fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Result<Self, String> {
        for (key, value) in overrides {
            let slot = match key.as_str() {
                "background" => &mut self.background,
                "active_border" => &mut self.active_border,
                "inactive_border" => &mut self.inactive_border,
                "selection_bg" => &mut self.selection_bg,
                "selection_fg" => &mut self.selection_fg,
                "original_text" => &mut self.original_text,
                "transliteration_text" => &mut self.transliteration_text,
                "translation_text" => &mut self.translation_text,
                "unavailable_text" => &mut self.unavailable_text,
                "playing_marker" => &mut self.playing_marker,
                "favorite_marker" => &mut self.favorite_marker,
                "error" => &mut self.error,
                "status_fg" => &mut self.status_fg,
                "status_bg" => &mut self.status_bg,
                _ => return Err(format!("Unknown color key: {}", key)),
            };
            *slot = parse_color_string(value)?;
        }
        Ok(self)
    }
}

/// Parse a named color ("Green", "darkgray", case-insensitive) or a hex
/// color ("#RRGGBB" or "#RGB").
pub fn parse_color_string(s: &str) -> Result<Color, String> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| format!("Invalid hex color: {}", s));
    }

    let color = match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "reset" | "default" => Color::Reset,
        _ => return Err(format!("Unknown color: {}", s)),
    };
    Ok(color)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        // #RGB expands each digit: F -> FF
        3 => Some(Color::Rgb(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color_string("Green").unwrap(), Color::Green);
        assert_eq!(parse_color_string("LIGHTGREEN").unwrap(), Color::LightGreen);
        assert_eq!(parse_color_string("darkgrey").unwrap(), Color::DarkGray);
        assert_eq!(parse_color_string("default").unwrap(), Color::Reset);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(
            parse_color_string("#111827").unwrap(),
            Color::Rgb(0x11, 0x18, 0x27)
        );
        assert_eq!(parse_color_string("#0F0").unwrap(), Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_parse_invalid_colors() {
        assert!(parse_color_string("emerald").is_err());
        assert!(parse_color_string("#GG0000").is_err());
        assert!(parse_color_string("#1234").is_err());
        // Non-ASCII input must not panic on slicing.
        assert!(parse_color_string("#éa").is_err());
    }

    #[test]
    fn test_overrides_keep_palette_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert("error".to_string(), "#F00".to_string());
        let theme = ThemeConfig::dark().with_overrides(&overrides).unwrap();
        assert_eq!(theme.error, Color::Rgb(255, 0, 0));
        assert_eq!(theme.inactive_border, Color::DarkGray);

        overrides.insert("sparkle".to_string(), "Red".to_string());
        assert!(ThemeConfig::dark().with_overrides(&overrides).is_err());
    }

    #[test]
    fn test_theme_selection() {
        let colors = ColorConfig::default();
        assert_eq!(colors.theme(true), &ThemeConfig::dark());
        assert_eq!(colors.theme(false), &ThemeConfig::light());
    }
}
