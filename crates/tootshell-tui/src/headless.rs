//! Headless mode for the tootshell TUI.
//!
//! Runs the TUI against an in-memory terminal so it can be driven from
//! tests and scripts. Input is sent through channels and the screen is
//! captured after each render.

use crate::app::App;
use crate::event::{Action, Event};
use crate::ui;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tootshell_engine::{LayoutMode, Pane, ShellConfig, ShellEvent, StateSnapshot};

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone)]
pub struct HeadlessState {
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Effective layout.
    pub layout: LayoutMode,
    /// Current location path.
    pub path: String,
    /// Pane selected by the route.
    pub pane: Pane,
    /// Number of columns on screen.
    pub columns: usize,
    /// Whether the upload overlay is visible.
    pub show_drop_overlay: bool,
    /// Whether the settings modal is visible.
    pub show_settings: bool,
    /// Files handed to the uploader so far.
    pub uploads: Vec<PathBuf>,
    /// Names of the intents dispatched so far.
    pub dispatched: Vec<String>,
    /// Whether the TUI should quit.
    pub should_quit: bool,
}

impl Default for HeadlessState {
    fn default() -> Self {
        Self {
            screen_contents: String::new(),
            layout: LayoutMode::MultiColumn,
            path: "/".to_string(),
            pane: Pane::GettingStarted,
            columns: 0,
            show_drop_overlay: false,
            show_settings: false,
            uploads: Vec::new(),
            dispatched: Vec::new(),
            should_quit: false,
        }
    }
}

impl HeadlessState {
    fn capture(app: &App, screen_contents: String) -> Self {
        let view = app.view();
        Self {
            screen_contents,
            layout: view.layout,
            path: app.shell.location().path().to_string(),
            pane: view.route.pane,
            columns: app.columns.len(),
            show_drop_overlay: view.show_drop_overlay,
            show_settings: app.show_settings,
            uploads: app.uploads.clone(),
            dispatched: app.dispatched.clone(),
            should_quit: app.should_quit,
        }
    }
}

/// Input accepted by the headless loop.
#[derive(Debug)]
enum Input {
    Action(Action),
    Event(Event),
    Shell(ShellEvent<PathBuf>),
}

/// Handle to control a headless TUI instance.
pub struct HeadlessHandle {
    input_tx: mpsc::UnboundedSender<Input>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send an action to the TUI.
    ///
    /// Returns `true` if the action was sent successfully.
    pub fn send_action(&self, action: Action) -> bool {
        self.input_tx.send(Input::Action(action)).is_ok()
    }

    /// Send a terminal event, as the event thread would.
    pub fn send_event(&self, event: Event) -> bool {
        self.input_tx.send(Input::Event(event)).is_ok()
    }

    /// Forward a raw shell event, bypassing the terminal mapping.
    pub fn send_shell_event(&self, event: ShellEvent<PathBuf>) -> bool {
        self.input_tx.send(Input::Shell(event)).is_ok()
    }

    /// Deliver a payload on the background message channel.
    pub fn send_message(&self, payload: serde_json::Value) -> bool {
        self.send_shell_event(ShellEvent::Message(payload))
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait for the state to change, with a timeout.
    ///
    /// Returns `true` if state changed, `false` if timed out.
    pub async fn wait_for_change(&mut self, timeout: std::time::Duration) -> bool {
        tokio::time::timeout(timeout, self.state_rx.changed())
            .await
            .is_ok()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(
        &mut self,
        condition: F,
        timeout: std::time::Duration,
    ) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            if tokio::time::timeout(remaining, self.state_rx.changed())
                .await
                .is_err()
            {
                return None;
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(
        &mut self,
        text: &str,
        timeout: std::time::Duration,
    ) -> Option<HeadlessState> {
        let text = text.to_string();
        self.wait_for(|s| s.screen_contents.contains(&text), timeout)
            .await
    }

    /// Wait for a specific layout to take effect.
    pub async fn wait_for_layout(
        &mut self,
        layout: LayoutMode,
        timeout: std::time::Duration,
    ) -> Option<HeadlessState> {
        self.wait_for(|s| s.layout == layout, timeout).await
    }

    /// Check if the TUI has quit.
    pub fn has_quit(&self) -> bool {
        self.state().should_quit
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
    /// Persisted settings to mount with.
    pub shell: ShellConfig,
    /// Initial application state.
    pub snapshot: StateSnapshot,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        let shell = ShellConfig::default();
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 50, // Faster tick rate for testing
            snapshot: StateSnapshot::from_config(&shell),
            shell,
        }
    }
}

/// Run the TUI in headless mode.
///
/// Returns a handle to control the TUI and a join handle for the background task.
///
/// # Example
///
/// ```ignore
/// let (mut handle, task) = run_tui_headless(HeadlessConfig::default());
///
/// handle.send_action(Action::Tab(1));
/// let state = handle.wait_for_text("Notifications", Duration::from_secs(1)).await;
///
/// handle.send_action(Action::Quit);
/// task.await.unwrap();
/// ```
pub fn run_tui_headless(config: HeadlessConfig) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(config, input_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    let handle = HeadlessHandle { input_tx, state_rx };

    (handle, task)
}

async fn run_headless_loop(
    config: HeadlessConfig,
    mut input_rx: mpsc::UnboundedReceiver<Input>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let backend = TestBackend::new(config.width, config.height);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.shell, config.snapshot, config.width)?;

    let tick_duration = std::time::Duration::from_millis(config.tick_rate_ms);

    loop {
        let frame = terminal.draw(|frame| {
            let area = frame.area();
            ui::render(&app, area, frame.buffer_mut());
        })?;
        let screen = frame.area;

        let screen_contents = buffer_to_string(terminal.backend().buffer());
        let _ = state_tx.send(HeadlessState::capture(&app, screen_contents));

        if app.should_quit {
            break;
        }

        let input = tokio::select! {
            Some(input) = input_rx.recv() => input,
            () = tokio::time::sleep(tick_duration) => Input::Event(Event::Tick),
        };

        let now = Instant::now();
        match input {
            Input::Action(action) => app.handle_action(action, now),
            Input::Event(event) => {
                if let Event::Resize(width, height) = event {
                    terminal.backend_mut().resize(width, height);
                }
                app.handle_event(event, screen, now);
            }
            Input::Shell(event) => app.handle_shell_event(event, now),
        }
    }

    Ok(())
}

/// Convert a terminal buffer to a string representation.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        // Trim trailing whitespace from each line
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    // Remove trailing newline
    if result.ends_with('\n') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(3);

    #[test]
    fn test_headless_state_default() {
        let state = HeadlessState::default();
        assert_eq!(state.path, "/");
        assert!(!state.should_quit);
        assert!(state.screen_contents.is_empty());
    }

    #[test]
    fn test_headless_config_default() {
        let config = HeadlessConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.tick_rate_ms, 50);
        assert!(config.snapshot.show_notifications_badge);
    }

    #[tokio::test]
    async fn test_tab_navigation_and_quit() {
        let (mut handle, task) = run_tui_headless(HeadlessConfig::default());
        assert!(handle.wait_for_text("Getting started", WAIT).await.is_some());

        handle.send_action(Action::Tab(1));
        let state = handle
            .wait_for(|s| s.path == "/notifications", WAIT)
            .await
            .unwrap();
        assert_eq!(state.pane, Pane::Notifications);

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
        assert!(handle.has_quit());
    }

    #[tokio::test]
    async fn test_narrow_resize_settles_to_single_column() {
        let (mut handle, task) = run_tui_headless(HeadlessConfig::default());
        handle
            .wait_for_layout(LayoutMode::MultiColumn, WAIT)
            .await
            .unwrap();

        handle.send_event(Event::Resize(60, 24));
        let state = handle
            .wait_for_layout(LayoutMode::SingleColumn, WAIT)
            .await
            .unwrap();
        assert_eq!(state.columns, 1);
        assert!(state
            .dispatched
            .iter()
            .any(|name| name == "invalidate-cached-item-heights"));

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_pasted_file_is_uploaded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"jpg").unwrap();

        let (mut handle, task) = run_tui_headless(HeadlessConfig::default());
        handle.send_event(Event::Paste(path.display().to_string()));

        let state = handle.wait_for(|s| !s.uploads.is_empty(), WAIT).await.unwrap();
        assert_eq!(state.uploads, vec![path]);
        assert!(!state.show_drop_overlay);

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_background_message_routes() {
        let (mut handle, task) = run_tui_headless(HeadlessConfig::default());
        handle.send_message(json!({"type": "navigate", "path": "/follow_requests"}));

        let state = handle
            .wait_for(|s| s.pane == Pane::FollowRequests, WAIT)
            .await
            .unwrap();
        assert!(state.screen_contents.contains("Follow requests"));

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[test]
    fn test_buffer_to_string() {
        use ratatui::layout::Rect;
        use ratatui::style::Style;

        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", Style::default());
        buffer.set_string(0, 1, "World", Style::default());

        let result = buffer_to_string(&buffer);
        assert!(result.contains("Hello"));
        assert!(result.contains("World"));
    }
}
