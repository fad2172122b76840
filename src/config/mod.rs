//! Configuration management for mandala-board.
//!
//! Handles:
//! - API endpoint and timeout
//! - Board timings (fresh window, toast lifetime) and the default segment source
//! - Theme settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Board behaviour.
    #[serde(default)]
    pub board: BoardConfig,
    /// TUI theme.
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BoardError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| BoardError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path, atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| BoardError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Board behaviour configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// How long submitted segments stay marked fresh, in milliseconds.
    #[serde(default = "default_fresh_window")]
    pub fresh_window_ms: u64,
    /// Source label used when none is given.
    #[serde(default = "default_source")]
    pub default_source: String,
    /// How long toasts stay visible, in milliseconds.
    #[serde(default = "default_toast")]
    pub toast_ms: u64,
}

impl BoardConfig {
    /// Fresh window as a duration.
    pub fn fresh_window(&self) -> Duration {
        Duration::from_millis(self.fresh_window_ms)
    }

    /// Toast lifetime as a duration.
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            fresh_window_ms: default_fresh_window(),
            default_source: default_source(),
            toast_ms: default_toast(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme name.
    #[serde(default = "default_theme")]
    pub name: String,
    /// Use Unicode characters.
    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme(),
            unicode: true,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_fresh_window() -> u64 {
    8000
}

fn default_source() -> String {
    "manual".to_string()
}

fn default_toast() -> u64 {
    4000
}

fn default_theme() -> String {
    "dark".to_string()
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| BoardError::ConfigError {
        message: "cannot determine the user config directory".to_string(),
    })?;

    Ok(config_dir.join("mandala-board").join("config.toml"))
}
