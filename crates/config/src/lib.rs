//! Configuration management for bpedit.
//!
//! This crate provides configuration loading and saving in TOML format
//! following XDG directory conventions.

mod settings;
mod xdg;

pub use settings::{Config, GeneralSettings, LayoutSettings, LoggingSettings};
pub use xdg::{get_config_dir, get_data_dir};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Default values as constants
pub mod defaults {
    pub const THEME_NAME: &str = "default";
    pub const TICK_RATE_MS: u64 = 250;
    pub const PX_PER_COL: u16 = 8;
    pub const PX_PER_ROW: u16 = 18;
    pub const MIN_LOG_LEVEL: &str = "info";
    pub const MAX_LOG_ENTRIES: usize = 200;
    pub const LOG_FILE_NAME: &str = "bpedit.log";
}

impl Config {
    /// Load configuration from the XDG config file.
    ///
    /// On first run, creates the file with default values.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from `path`.
    ///
    /// Creates the file with defaults if it does not exist and rewrites it
    /// when missing keys had to be filled in.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let original_content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&original_content)?;

        // Serialize back to get normalized content
        let normalized_content = toml::to_string_pretty(&config)?;
        if original_content != normalized_content {
            config.save_to(path)?;
        }

        Ok(config)
    }

    /// Save configuration to the XDG config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Get path to themes directory.
    pub fn get_themes_dir() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("themes"))
    }

    /// Resolve the log file path: configured value or the data directory.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        match &self.logging.file_path {
            Some(path) => Some(PathBuf::from(path)),
            None => get_data_dir()
                .ok()
                .map(|dir| dir.join(defaults::LOG_FILE_NAME)),
        }
    }
}
