//! Configuration structures for bpedit settings.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General application settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Editor layout scaling
    #[serde(default)]
    pub layout: LayoutSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Selected theme name
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Input poll interval in ms
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

/// Mapping of editor layout units to terminal cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Layout units per terminal column
    #[serde(default = "default_px_per_col")]
    pub px_per_col: u16,

    /// Layout units per terminal row
    #[serde(default = "default_px_per_row")]
    pub px_per_row: u16,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional, defaults to the data directory)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,

    /// Number of entries kept in memory
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

// Default value functions for serde
fn default_theme_name() -> String {
    defaults::THEME_NAME.to_string()
}

fn default_tick_rate_ms() -> u64 {
    defaults::TICK_RATE_MS
}

fn default_px_per_col() -> u16 {
    defaults::PX_PER_COL
}

fn default_px_per_row() -> u16 {
    defaults::PX_PER_ROW
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

fn default_max_entries() -> usize {
    defaults::MAX_LOG_ENTRIES
}

// Default implementations
impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            px_per_col: default_px_per_col(),
            px_per_row: default_px_per_row(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
            max_entries: default_max_entries(),
        }
    }
}
