use anyhow::Result;
use ratatui::style::Color;
use ratatui::widgets::BorderType;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::config_dir;

pub fn hex_to_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() { return Color::Reset; }
    let r = u8::from_str_radix(&h[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&h[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&h[4..6], 16).unwrap_or(0);
    Color::Rgb(r, g, b)
}

fn default_week_number() -> String { "#6c7086".to_owned() }
fn default_border_style() -> String { "rounded".to_owned() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    // Backgrounds
    pub bg_primary: String, pub bg_popup: String,
    // Borders
    pub border_normal: String, pub border_focused: String,
    // Text
    pub text_primary: String, pub text_muted: String, pub text_accent: String,
    // Cells
    pub today_bg: String,  pub today_fg: String,
    pub cursor_bg: String, pub cursor_fg: String,
    pub range_bg: String,  pub range_fg: String,
    pub weekend_fg: String,
    /// Greyed days of the neighbouring months.
    pub outside_fg: String,
    #[serde(default = "default_week_number")]
    pub week_number_fg: String,
    pub error: String,
    /// Border style: "rounded" | "double" | "thick" | "plain"
    #[serde(default = "default_border_style")]
    pub border_style: String,
}

impl ThemeConfig {
    // ── Color accessors ───────────────────────────────────────────────────────
    pub fn bg(&self)            -> Color { hex_to_color(&self.bg_primary) }
    pub fn popup_bg(&self)      -> Color { hex_to_color(&self.bg_popup) }
    pub fn border(&self)        -> Color { hex_to_color(&self.border_normal) }
    pub fn border_active(&self) -> Color { hex_to_color(&self.border_focused) }
    pub fn fg(&self)            -> Color { hex_to_color(&self.text_primary) }
    pub fn fg_dim(&self)        -> Color { hex_to_color(&self.text_muted) }
    pub fn accent(&self)        -> Color { hex_to_color(&self.text_accent) }
    pub fn weekend_color(&self) -> Color { hex_to_color(&self.weekend_fg) }
    pub fn outside_color(&self) -> Color { hex_to_color(&self.outside_fg) }
    pub fn week_number(&self)   -> Color { hex_to_color(&self.week_number_fg) }
    pub fn error(&self)         -> Color { hex_to_color(&self.error) }

    pub fn today_highlight(&self)  -> (Color, Color) {
        (hex_to_color(&self.today_bg), hex_to_color(&self.today_fg))
    }
    pub fn cursor_highlight(&self) -> (Color, Color) {
        (hex_to_color(&self.cursor_bg), hex_to_color(&self.cursor_fg))
    }
    pub fn range_highlight(&self)  -> (Color, Color) {
        (hex_to_color(&self.range_bg), hex_to_color(&self.range_fg))
    }

    pub fn border_type(&self) -> BorderType {
        match self.border_style.as_str() {
            "double" => BorderType::Double,
            "thick"  => BorderType::Thick,
            "plain"  => BorderType::Plain,
            _        => BorderType::Rounded,
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────────
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir())
    }

    /// Reads `theme.toml` from `dir`, writing the default theme there first
    /// when it is missing.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join("theme.toml");
        if path.exists() {
            Ok(toml::from_str(&std::fs::read_to_string(&path)?)?)
        } else {
            let t = ThemeConfig::default();
            t.save_to(dir)?;
            Ok(t)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_dir())
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join("theme.toml"), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    // ── Theme catalogue ───────────────────────────────────────────────────────
    pub fn all_themes() -> Vec<ThemeConfig> {
        vec![
            ThemeConfig::default(),    // Catppuccin Mocha
            ThemeConfig::nord(),
            ThemeConfig::gruvbox(),
            ThemeConfig::high_contrast(),
        ]
    }

    /// Theme after `self` in the catalogue, wrapping around.
    pub fn next(&self) -> ThemeConfig {
        let all = Self::all_themes();
        let idx = all.iter().position(|t| t.name == self.name).map(|i| i + 1).unwrap_or(0);
        all[idx % all.len()].clone()
    }

    // ── Built-in themes ───────────────────────────────────────────────────────

    pub fn nord() -> Self { Self {
        name: "nord".into(),
        bg_primary: "#2e3440".into(), bg_popup: "#434c5e".into(),
        border_normal: "#4c566a".into(), border_focused: "#88c0d0".into(),
        text_primary: "#eceff4".into(), text_muted: "#4c566a".into(), text_accent: "#88c0d0".into(),
        today_bg: "#88c0d0".into(),  today_fg: "#2e3440".into(),
        cursor_bg: "#eceff4".into(), cursor_fg: "#2e3440".into(),
        range_bg: "#81a1c1".into(),  range_fg: "#2e3440".into(),
        weekend_fg: "#bf616a".into(), outside_fg: "#4c566a".into(),
        week_number_fg: "#616e88".into(),
        error: "#bf616a".into(),
        border_style: "rounded".into(),
    }}

    pub fn gruvbox() -> Self { Self {
        name: "gruvbox".into(),
        bg_primary: "#282828".into(), bg_popup: "#3c3836".into(),
        border_normal: "#504945".into(), border_focused: "#d79921".into(),
        text_primary: "#ebdbb2".into(), text_muted: "#7c6f64".into(), text_accent: "#d79921".into(),
        today_bg: "#d79921".into(),  today_fg: "#282828".into(),
        cursor_bg: "#ebdbb2".into(), cursor_fg: "#282828".into(),
        range_bg: "#689d6a".into(),  range_fg: "#282828".into(),
        weekend_fg: "#fb4934".into(), outside_fg: "#665c54".into(),
        week_number_fg: "#928374".into(),
        error: "#fb4934".into(),
        border_style: "rounded".into(),
    }}

    /// Black and white with bold yellow selection, double borders.
    pub fn high_contrast() -> Self { Self {
        name: "high-contrast".into(),
        bg_primary: "#000000".into(), bg_popup: "#000000".into(),
        border_normal: "#ffffff".into(), border_focused: "#ffff00".into(),
        text_primary: "#ffffff".into(), text_muted: "#aaaaaa".into(), text_accent: "#ffff00".into(),
        today_bg: "#00ffff".into(),  today_fg: "#000000".into(),
        cursor_bg: "#ffffff".into(), cursor_fg: "#000000".into(),
        range_bg: "#ffff00".into(),  range_fg: "#000000".into(),
        weekend_fg: "#ffffff".into(), outside_fg: "#808080".into(),
        week_number_fg: "#aaaaaa".into(),
        error: "#ff0000".into(),
        border_style: "double".into(),
    }}
}

impl Default for ThemeConfig {
    fn default() -> Self { Self {
        name: "catppuccin-mocha".into(),
        bg_primary: "#1e1e2e".into(), bg_popup: "#313244".into(),
        border_normal: "#45475a".into(), border_focused: "#89b4fa".into(),
        text_primary: "#cdd6f4".into(), text_muted: "#6c7086".into(), text_accent: "#89b4fa".into(),
        today_bg: "#cba6f7".into(),  today_fg: "#1e1e2e".into(),
        cursor_bg: "#f5e0dc".into(), cursor_fg: "#1e1e2e".into(),
        range_bg: "#89b4fa".into(),  range_fg: "#1e1e2e".into(),
        weekend_fg: "#f38ba8".into(), outside_fg: "#45475a".into(),
        week_number_fg: default_week_number(),
        error: "#f38ba8".into(),
        border_style: default_border_style(),
    }}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color("#1e1e2e"), Color::Rgb(0x1e, 0x1e, 0x2e));
        assert_eq!(hex_to_color("ffffff"), Color::Rgb(255, 255, 255));
        assert_eq!(hex_to_color("#fff"), Color::Reset);
        assert_eq!(hex_to_color("#zz0000"), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_load_writes_default_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let first = ThemeConfig::load_from(dir.path()).unwrap();
        assert_eq!(first, ThemeConfig::default());
        assert!(dir.path().join("theme.toml").exists());

        ThemeConfig::nord().save_to(dir.path()).unwrap();
        let again = ThemeConfig::load_from(dir.path()).unwrap();
        assert_eq!(again.name, "nord");
    }

    #[test]
    fn test_next_cycles_catalogue() {
        let mut t = ThemeConfig::default();
        let n = ThemeConfig::all_themes().len();
        for _ in 0..n {
            t = t.next();
        }
        assert_eq!(t.name, ThemeConfig::default().name);

        let custom = ThemeConfig { name: "mine".into(), ..ThemeConfig::default() };
        assert_eq!(custom.next().name, "catppuccin-mocha");
    }

    #[test]
    fn test_border_type() {
        assert_eq!(ThemeConfig::high_contrast().border_type(), BorderType::Double);
        assert_eq!(ThemeConfig::default().border_type(), BorderType::Rounded);
    }
}
