//! Colors for the TUI.

use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub surface: Color,
    pub overlay: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,
    pub secondary: Color,

    // Semantic
    pub warning: Color,
    pub info: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Mocha, or monochrome when `NO_COLOR` is set to a non-empty value.
    pub fn from_env() -> Self {
        match std::env::var_os("NO_COLOR") {
            Some(value) if !value.is_empty() => Self::monochrome(),
            _ => Self::mocha(),
        }
    }

    /// Terminal default colors only.
    pub fn monochrome() -> Self {
        Self {
            surface: Color::Reset,
            overlay: Color::Reset,
            text: Color::Reset,
            subtext: Color::Reset,
            muted: Color::Reset,
            primary: Color::Reset,
            secondary: Color::Reset,
            warning: Color::Reset,
            info: Color::Reset,
            border: Color::Reset,
            border_focused: Color::Reset,
        }
    }

    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        Self {
            surface: Color::Rgb(49, 50, 68),    // #313244
            overlay: Color::Rgb(69, 71, 90),    // #45475a

            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            primary: Color::Rgb(203, 166, 247),   // #cba6f7 mauve
            secondary: Color::Rgb(137, 180, 250), // #89b4fa blue

            warning: Color::Rgb(249, 226, 175), // #f9e2af
            info: Color::Rgb(137, 220, 235),    // #89dceb

            border: Color::Rgb(69, 71, 90),          // #45475a
            border_focused: Color::Rgb(203, 166, 247), // #cba6f7
        }
    }
}
