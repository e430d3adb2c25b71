//! tootshell-tui: Terminal front-end for the tootshell timeline shell
//!
//! This crate hosts the headless shell controller on a terminal:
//! - Single or multi-column timeline layout that follows the terminal width
//! - File drops through bracketed paste of dropped paths
//! - Smooth scroll-to-top that yields to the mouse wheel
//! - Headless mode for testing and automation

mod app;
mod column;
mod event;
pub mod headless;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod ui;

pub use app::{viewport_width, App, CELL_WIDTH_PX};
pub use event::{key_to_action, Action, Event, EventHandler};
pub use tootshell_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Instant;
use tootshell_engine::{ShellConfig, StateSnapshot};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, mounts the shell, runs the event loop, and
/// restores the terminal on exit. Returns the settings as left by the
/// user so the caller can persist them.
pub async fn run_tui(
    config: ShellConfig,
    snapshot: StateSnapshot,
) -> Result<ShellConfig, Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(config, snapshot, size.width)?;

    // 20 Hz keeps the scroll animation smooth
    let mut events = EventHandler::new(50);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result.map(|()| app.config)
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let frame = terminal.draw(|frame| {
            let area = frame.area();
            ui::render(app, area, frame.buffer_mut());
        })?;
        let screen = frame.area;

        if app.should_quit {
            break;
        }

        if let Some(event) = events.next().await {
            app.handle_event(event, screen, Instant::now());
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}

#[cfg(test)]
mod snapshot_tests {
    use crate::test_utils::*;
    use insta::assert_snapshot;
    use std::time::Instant;

    #[test]
    fn test_snapshot_tabs_bar() {
        let app = create_test_app();
        let screen = render_app_to_string(&app);
        let tabs = screen.lines().next().unwrap_or_default();
        assert_snapshot!(tabs, @"1 Home │ 2 Notifications │ 3 Local │ 4 Federated │ 5 Start");
    }

    #[test]
    fn test_snapshot_status_line() {
        let mut app = create_test_app();
        app.handle_action(crate::Action::ToggleComposing, Instant::now());
        let screen = render_app_to_string(&app);
        let status = screen.lines().last().unwrap_or_default();
        assert_snapshot!(status, @"ui auto-columns is-composing │ /");
    }
}
