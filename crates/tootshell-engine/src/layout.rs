//! Layout mode selection.
//!
//! The column area is arranged in one of three modes. The user's layout
//! preference always wins; only `auto` looks at the viewport width.

use serde::{Deserialize, Serialize};

/// Narrowest viewport width (in pixels) laid out with multiple columns.
///
/// Anything narrower is treated as a mobile viewport.
pub const LAYOUT_BREAKPOINT: u32 = 631;

/// The user's persisted layout preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPreference {
    /// Always a single column.
    Single,
    /// Always multiple columns.
    Multiple,
    /// Decide from the viewport width.
    #[default]
    #[serde(other)]
    Auto,
}

impl LayoutPreference {
    /// Parse a preference string. Unknown values degrade to [`Self::Auto`].
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "single" => Self::Single,
            "multiple" => Self::Multiple,
            _ => Self::Auto,
        }
    }

    /// The persisted string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Auto => "auto",
        }
    }
}

impl std::fmt::Display for LayoutPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arrangement of the column area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// One column fills the viewport.
    SingleColumn,
    /// Columns sit side by side.
    MultiColumn,
    /// Mode is derived from the viewport width.
    AutoColumn,
}

impl LayoutMode {
    /// The mode the root element advertises for a preference.
    ///
    /// Unlike [`select_layout`] this keeps `auto` as [`Self::AutoColumn`].
    pub fn for_preference(preference: LayoutPreference) -> Self {
        match preference {
            LayoutPreference::Single => Self::SingleColumn,
            LayoutPreference::Multiple => Self::MultiColumn,
            LayoutPreference::Auto => Self::AutoColumn,
        }
    }

    /// Class name applied to the root element.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::SingleColumn => "single-column",
            Self::MultiColumn => "multi-columns",
            Self::AutoColumn => "auto-columns",
        }
    }
}

/// Select the effective layout for a viewport width and preference.
///
/// Never returns [`LayoutMode::AutoColumn`].
pub fn select_layout(viewport_width: u32, preference: LayoutPreference) -> LayoutMode {
    match preference {
        LayoutPreference::Single => LayoutMode::SingleColumn,
        LayoutPreference::Multiple => LayoutMode::MultiColumn,
        LayoutPreference::Auto => {
            if viewport_width < LAYOUT_BREAKPOINT {
                LayoutMode::SingleColumn
            } else {
                LayoutMode::MultiColumn
            }
        }
    }
}

/// Whether the column area should render a single column.
pub fn is_single_column(viewport_width: u32, preference: LayoutPreference) -> bool {
    select_layout(viewport_width, preference) == LayoutMode::SingleColumn
}
