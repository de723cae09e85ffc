//! Theme loading from TOML files.

use anyhow::Result;
use ratatui::style::Color;
use serde::Deserialize;
use std::path::Path;

use crate::Theme;

/// Color representation in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TomlColor {
    Named(String),
    Rgb { rgb: [u8; 3] },
}

impl TomlColor {
    fn to_color(&self) -> Color {
        match self {
            TomlColor::Named(name) => name.parse().unwrap_or(Color::White),
            TomlColor::Rgb { rgb } => Color::Rgb(rgb[0], rgb[1], rgb[2]),
        }
    }
}

/// TOML theme colors structure.
#[derive(Debug, Clone, Deserialize)]
struct TomlColors {
    bg: TomlColor,
    fg: TomlColor,
    accented_bg: TomlColor,
    accented_fg: TomlColor,
    selected_bg: TomlColor,
    selected_fg: TomlColor,
    disabled: TomlColor,
    success: TomlColor,
    warning: TomlColor,
    error: TomlColor,
}

/// TOML theme structure.
#[derive(Debug, Clone, Deserialize)]
struct TomlTheme {
    name: String,
    colors: TomlColors,
}

impl TomlTheme {
    fn into_theme(self, name: &'static str) -> Theme {
        let c = self.colors;
        Theme {
            name,
            bg: c.bg.to_color(),
            fg: c.fg.to_color(),
            accented_bg: c.accented_bg.to_color(),
            accented_fg: c.accented_fg.to_color(),
            selected_bg: c.selected_bg.to_color(),
            selected_fg: c.selected_fg.to_color(),
            disabled: c.disabled.to_color(),
            success: c.success.to_color(),
            warning: c.warning.to_color(),
            error: c.error.to_color(),
        }
    }
}

/// Load theme from TOML file.
///
/// Returns the parsed theme with a leaked static name string.
pub fn load_theme(path: &Path) -> Result<Theme> {
    let content = std::fs::read_to_string(path)?;
    let toml_theme: TomlTheme = toml::from_str(&content)?;

    // Leak the name string to get 'static lifetime
    let name: &'static str = Box::leak(toml_theme.name.clone().into_boxed_str());

    Ok(toml_theme.into_theme(name))
}
