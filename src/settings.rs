//! Settings loaded from TOML
//!
//! Read from ~/.config/blocktris/settings.toml (or platform equivalent). The
//! file is optional and never written back.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Timer intervals
    pub timing: TimingSettings,
    /// Fixed seed for the piece generator; random when absent
    pub seed: Option<u64>,
}

/// Timer intervals in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Regular gravity
    pub normal_drop_ms: u64,
    /// Gravity while a landed piece waits to lock
    pub sliding_drop_ms: u64,
    /// Gravity while soft drop is held
    pub fast_drop_ms: u64,
    /// Horizontal auto-repeat while a direction is held
    pub move_repeat_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            normal_drop_ms: 800,
            sliding_drop_ms: 100,
            fast_drop_ms: 50,
            move_repeat_ms: 30,
        }
    }
}

impl TimingSettings {
    pub fn normal_drop(&self) -> Duration {
        Duration::from_millis(self.normal_drop_ms)
    }

    pub fn sliding_drop(&self) -> Duration {
        Duration::from_millis(self.sliding_drop_ms)
    }

    pub fn fast_drop(&self) -> Duration {
        Duration::from_millis(self.fast_drop_ms)
    }

    pub fn move_repeat(&self) -> Duration {
        Duration::from_millis(self.move_repeat_ms)
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blocktris", "blocktris")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!("no settings at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_toml_str(&contents) {
            Ok(settings) => {
                tracing::info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
