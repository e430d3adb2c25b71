//! Configuration types for the shell.
//!
//! Local display settings persisted between sessions, plus tuning knobs
//! for the controller.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::layout::LayoutPreference;

/// Persisted shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Column layout preference.
    #[serde(default)]
    pub layout: LayoutPreference,

    /// Stretch columns to fill wide viewports.
    #[serde(default)]
    pub stretch: bool,

    /// Render the tabs bar below the columns.
    #[serde(default)]
    pub navbar_under: bool,

    /// Use the system font instead of the bundled one.
    #[serde(default)]
    pub system_font_ui: bool,

    /// Show the unread count on the notifications tab.
    #[serde(default = "default_notifications_badge")]
    pub notifications_badge: bool,

    /// Quiet period after the last resize before layout is recomputed.
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

fn default_notifications_badge() -> bool {
    true
}

fn default_resize_debounce_ms() -> u64 {
    500
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            layout: LayoutPreference::Auto,
            stretch: false,
            navbar_under: false,
            system_font_ui: false,
            notifications_badge: default_notifications_badge(),
            resize_debounce_ms: default_resize_debounce_ms(),
        }
    }
}

impl ShellConfig {
    /// Load configuration from a file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Resize debounce delay.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
