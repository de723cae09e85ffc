//! Theme system for bpedit.
//!
//! Provides built-in color themes with support for custom TOML themes
//! placed in the `themes` config directory.

mod colors;
mod loader;

pub use colors::Theme;
pub use loader::load_theme;

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const DEFAULT: Theme = Theme {
    name: "default",
    bg: Color::Black,
    fg: Color::White,
    accented_bg: Color::DarkGray,
    accented_fg: Color::Cyan,
    selected_bg: Color::Blue,
    selected_fg: Color::White,
    disabled: Color::Gray,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
};

/// Warm palette close to the in-game GUI.
const FACTORIO: Theme = Theme {
    name: "factorio",
    bg: Color::Rgb(49, 48, 49),
    fg: Color::Rgb(255, 230, 192),
    accented_bg: Color::Rgb(64, 63, 64),
    accented_fg: Color::Rgb(255, 166, 41),
    selected_bg: Color::Rgb(227, 125, 44),
    selected_fg: Color::Black,
    disabled: Color::Rgb(142, 142, 142),
    success: Color::Rgb(93, 201, 69),
    warning: Color::Rgb(255, 200, 0),
    error: Color::Rgb(255, 64, 64),
};

const BUILT_IN: &[Theme] = &[DEFAULT, FACTORIO];

// Cache for user-loaded themes
static USER_THEMES: OnceLock<Mutex<HashMap<String, &'static Theme>>> = OnceLock::new();

// Themes directory path (set by app on startup)
static THEMES_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Set the themes directory path (call this at app startup).
pub fn set_themes_dir(path: PathBuf) {
    let _ = THEMES_DIR.set(path);
}

/// Try to load user theme from config directory.
fn try_load_user_theme(name: &str) -> Option<&'static Theme> {
    let cache = USER_THEMES.get_or_init(|| Mutex::new(HashMap::new()));

    // Use ok() to gracefully handle poisoned mutex (return None instead of panicking)
    {
        let cache_lock = cache.lock().ok()?;
        if let Some(theme) = cache_lock.get(name) {
            return Some(*theme);
        }
    }

    let theme_path = THEMES_DIR.get()?.join(format!("{}.toml", name));
    if !theme_path.exists() {
        return None;
    }

    let theme = load_theme(&theme_path).ok()?;

    // Leak the theme to get 'static reference
    let static_theme: &'static Theme = Box::leak(Box::new(theme));

    if let Ok(mut cache_lock) = cache.lock() {
        cache_lock.insert(name.to_string(), static_theme);
    }

    Some(static_theme)
}

impl Theme {
    /// Get theme by name.
    ///
    /// First tries to load from user's themes directory.
    /// If not found, falls back to built-in themes, then to "default".
    pub fn get_by_name(name: &str) -> &'static Theme {
        if let Some(theme) = try_load_user_theme(name) {
            return theme;
        }

        BUILT_IN
            .iter()
            .find(|t| t.name == name)
            .unwrap_or(&BUILT_IN[0])
    }

    /// Get list of all built-in theme names.
    pub fn all_theme_names() -> Vec<&'static str> {
        BUILT_IN.iter().map(|t| t.name).collect()
    }
}
