//! Read-only application state consumed by the shell.
//!
//! The shell never writes any of this back. Hosts hand over a fresh
//! [`StateSnapshot`] whenever the surrounding application state changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ConfigError, ShellConfig};
use crate::layout::LayoutPreference;

/// Snapshot of everything the shell reads from application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    /// Signed-in account id.
    pub me: Option<String>,
    /// Column layout preference.
    pub layout: LayoutPreference,
    /// Stretch columns on wide viewports.
    pub stretch: bool,
    /// Tabs bar below the columns.
    pub navbar_under: bool,
    /// Use the system font.
    pub system_font_ui: bool,
    /// Unread notification count.
    pub unread_notifications: u32,
    /// Show the unread count badge.
    pub show_notifications_badge: bool,
    /// Search results panel hidden.
    pub search_hidden: bool,
    /// A search has been submitted.
    pub search_submitted: bool,
    /// A post is being composed.
    pub is_composing: bool,
    /// Drawer mascot index.
    pub mascot: u32,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self::from_config(&ShellConfig::default())
    }
}

impl StateSnapshot {
    /// A snapshot carrying the persisted display settings.
    pub fn from_config(config: &ShellConfig) -> Self {
        Self {
            me: None,
            layout: config.layout,
            stretch: config.stretch,
            navbar_under: config.navbar_under,
            system_font_ui: config.system_font_ui,
            unread_notifications: 0,
            show_notifications_badge: config.notifications_badge,
            search_hidden: false,
            search_submitted: false,
            is_composing: false,
            mascot: 0,
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Whether `next` differs from `self` only in [`Self::is_composing`].
    pub fn only_composing_changed(&self, next: &Self) -> bool {
        self.is_composing != next.is_composing
            && Self {
                is_composing: next.is_composing,
                ..self.clone()
            } == *next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_inherits_config() {
        let config = ShellConfig {
            layout: LayoutPreference::Multiple,
            notifications_badge: false,
            ..ShellConfig::default()
        };
        let snapshot = StateSnapshot::from_config(&config);
        assert_eq!(snapshot.layout, LayoutPreference::Multiple);
        assert!(!snapshot.show_notifications_badge);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let snapshot: StateSnapshot =
            serde_json::from_str(r#"{"me": "1", "unread_notifications": 3}"#).unwrap();
        assert_eq!(snapshot.me.as_deref(), Some("1"));
        assert_eq!(snapshot.unread_notifications, 3);
        assert_eq!(snapshot.layout, LayoutPreference::Auto);
    }

    #[test]
    fn test_only_composing_changed() {
        let base = StateSnapshot::default();
        let composing = StateSnapshot {
            is_composing: true,
            ..base.clone()
        };
        let composing_elsewhere = StateSnapshot {
            unread_notifications: 4,
            ..composing.clone()
        };

        assert!(base.only_composing_changed(&composing));
        assert!(!base.only_composing_changed(&base));
        assert!(!base.only_composing_changed(&composing_elsewhere));
    }
}
