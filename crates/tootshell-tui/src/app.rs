//! Application state for the tootshell TUI.
//!
//! The app hosts a [`ShellController`] on a terminal: it turns terminal
//! input into shell events, keeps the visible columns in sync with the
//! shell's layout and route, and plays the part of the surrounding
//! application for the intents the shell dispatches.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::MouseEventKind;
use ratatui::layout::Rect;
use tootshell_engine::{
    DataTransfer, DropEffect, DropEffectError, Intent, LayoutMode, LayoutPreference,
    ListenerError, ListenerKind, ListenerRegistry, MountTargets, NodeId, NodeTree, Pane, ShellConfig,
    ShellController, ShellEvent, ShellHost, ShellView, StateSnapshot, UpdateDecision,
    FILES_PAYLOAD,
};
use tracing::{debug, info};

use crate::column::{Column, PLACEHOLDER_ROWS, SCROLL_STEP};
use crate::event::{key_to_action, Action, Event};
use crate::theme::Theme;
use crate::ui;

/// Pixels per terminal cell when deriving the viewport width.
pub const CELL_WIDTH_PX: u32 = 8;

/// Drop target identity of the shell root.
pub const ROOT_NODE: NodeId = NodeId(0);

/// Routes reachable from the number keys.
pub const TAB_ROUTES: [&str; 5] = [
    "/timelines/home",
    "/notifications",
    "/timelines/public/local",
    "/timelines/public",
    "/getting-started",
];

/// Convert a terminal width in cells to a viewport width in pixels.
pub fn viewport_width(cells: u16) -> u32 {
    u32::from(cells) * CELL_WIDTH_PX
}

/// The terminal seen as a document: the root and the mounted columns.
struct TerminalDocument {
    attached: Vec<NodeId>,
}

impl NodeTree for TerminalDocument {
    fn contains(&self, node: NodeId) -> bool {
        self.attached.contains(&node)
    }
}

impl DataTransfer for TerminalDocument {
    fn set_drop_effect(&mut self, _: DropEffect) -> Result<(), DropEffectError> {
        Ok(())
    }
}

impl ShellHost for TerminalDocument {
    fn tree(&self) -> &dyn NodeTree {
        self
    }

    fn data_transfer(&mut self) -> &mut dyn DataTransfer {
        self
    }
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// The mounted shell.
    pub shell: ShellController,
    /// Window, document and background-channel listeners.
    pub registry: Arc<ListenerRegistry>,
    /// Columns currently on screen, left to right.
    pub columns: Vec<Column>,
    /// Index of the focused column.
    pub focused: usize,
    /// Last status line message.
    pub status: Option<String>,
    /// Settings modal visible.
    pub show_settings: bool,
    /// Names of every intent dispatched so far.
    pub dispatched: Vec<String>,
    /// Files handed to the uploader.
    pub uploads: Vec<PathBuf>,
    /// Persisted settings.
    pub config: ShellConfig,
    /// Colors, picked once at startup.
    pub theme: Theme,
    /// Should the app quit?
    pub should_quit: bool,
    next_node: u64,
}

impl App {
    /// Mount the shell for a terminal `width` cells wide.
    pub fn new(
        config: ShellConfig,
        snapshot: StateSnapshot,
        width: u16,
    ) -> Result<Self, ListenerError> {
        let registry = Arc::new(ListenerRegistry::new());
        let targets = MountTargets {
            window: registry.clone(),
            document: registry.clone(),
            background: Some(registry.clone()),
        };

        let mut intents: Vec<Intent<PathBuf>> = Vec::new();
        let shell = ShellController::mount(
            &targets,
            &config,
            snapshot,
            viewport_width(width),
            &mut intents,
        )?;

        let mut app = Self {
            shell,
            registry,
            columns: Vec::new(),
            focused: 0,
            status: None,
            show_settings: false,
            dispatched: Vec::new(),
            uploads: Vec::new(),
            config,
            theme: Theme::from_env(),
            should_quit: false,
            next_node: 1,
        };
        app.apply(intents);
        app.sync_columns()?;
        Ok(app)
    }

    /// Create an app for tests with default settings on an 80-column
    /// terminal.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self::new(ShellConfig::default(), StateSnapshot::default(), 80)
            .expect("in-memory listeners never fail")
    }

    /// Current derived view.
    pub fn view(&self) -> ShellView {
        self.shell.view()
    }

    /// The focused column.
    pub fn focused_column(&self) -> Option<&Column> {
        self.columns.get(self.focused)
    }

    /// Handle a user action.
    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Back => {
                if self.show_settings {
                    self.show_settings = false;
                } else if self.view().show_drop_overlay {
                    self.shell.close_upload_overlay();
                }
            }
            Action::Tab(index) => {
                if let Some(path) = TAB_ROUTES.get(index) {
                    self.navigate(path);
                }
            }
            Action::NextColumn => {
                if !self.columns.is_empty() {
                    self.focused = (self.focused + 1) % self.columns.len();
                }
            }
            Action::PrevColumn => {
                if !self.columns.is_empty() {
                    self.focused = self
                        .focused
                        .checked_sub(1)
                        .unwrap_or(self.columns.len() - 1);
                }
            }
            Action::ScrollUp => self.wheel(self.focused, -SCROLL_STEP),
            Action::ScrollDown => self.wheel(self.focused, SCROLL_STEP),
            Action::ScrollToTop => {
                if let Some(column) = self.columns.get_mut(self.focused) {
                    column.scroll_to_top(now);
                }
            }
            Action::CycleLayout => {
                let layout = match self.shell.snapshot().layout {
                    LayoutPreference::Auto => LayoutPreference::Single,
                    LayoutPreference::Single => LayoutPreference::Multiple,
                    LayoutPreference::Multiple => LayoutPreference::Auto,
                };
                self.config.layout = layout;
                let next = StateSnapshot {
                    layout,
                    ..self.shell.snapshot().clone()
                };
                self.update_snapshot(next);
            }
            Action::ToggleComposing => {
                let next = StateSnapshot {
                    is_composing: !self.shell.snapshot().is_composing,
                    ..self.shell.snapshot().clone()
                };
                self.update_snapshot(next);
            }
            Action::OpenSettings => {
                let mut intents: Vec<Intent<PathBuf>> = Vec::new();
                tootshell_engine::drawer::open_settings(&mut intents);
                self.apply(intents);
            }
            Action::CycleMascot => {
                let mut intents: Vec<Intent<PathBuf>> = Vec::new();
                tootshell_engine::drawer::cycle_mascot(&mut intents);
                self.apply(intents);
            }
            Action::None => {}
        }
    }

    /// Handle a terminal event. `screen` is the area last rendered into.
    ///
    /// Every event lets time pass, so a stream of input never holds back a
    /// pending resize or a scroll animation.
    pub fn handle_event(&mut self, event: Event, screen: Rect, now: Instant) {
        match event {
            Event::Key(key) => self.handle_action(key_to_action(key), now),
            Event::Mouse(mouse) => {
                let delta = match mouse.kind {
                    MouseEventKind::ScrollUp => Some(-SCROLL_STEP),
                    MouseEventKind::ScrollDown => Some(SCROLL_STEP),
                    _ => None,
                };
                if let Some(delta) = delta {
                    let areas = ui::shell_areas(&self.view(), self.columns.len(), screen);
                    if let Some(index) = ui::column_at(&areas, mouse.column, mouse.row) {
                        self.wheel(index, delta);
                    }
                }
            }
            Event::Paste(text) => self.handle_paste(&text, now),
            Event::Tick => {}
            Event::Resize(width, _) => self.handle_resize(width, now),
        }

        self.tick(now);
    }

    /// Forward a raw shell event, as a browser host would.
    ///
    /// Events whose listener is not installed are dropped.
    pub fn handle_shell_event(&mut self, event: ShellEvent<PathBuf>, now: Instant) {
        let kind = event.listener_kind();
        if !self.registry.is_listening(kind) {
            debug!(%kind, "No listener installed, event dropped");
            return;
        }

        let mut document = TerminalDocument {
            attached: self.attached_nodes(),
        };
        let mut intents: Vec<Intent<PathBuf>> = Vec::new();
        self.shell
            .handle_event(event, &mut document, now, &mut intents);
        self.apply(intents);
    }

    /// Terminal resized to `width` cells.
    pub fn handle_resize(&mut self, width: u16, now: Instant) {
        self.handle_shell_event(
            ShellEvent::Resize {
                width: viewport_width(width),
            },
            now,
        );
    }

    /// Text pasted into the terminal.
    ///
    /// Terminals paste the paths of files dropped onto them, so a paste is
    /// replayed as a drag entering the shell followed by a drop.
    pub fn handle_paste(&mut self, text: &str, now: Instant) {
        let files = dropped_files(text);
        let kinds = if files.is_empty() {
            vec!["text/plain".to_string()]
        } else {
            vec![FILES_PAYLOAD.to_string()]
        };

        self.handle_shell_event(
            ShellEvent::DragEnter {
                target: ROOT_NODE,
                payload_kinds: kinds,
            },
            now,
        );
        self.handle_shell_event(ShellEvent::DragOver, now);

        if files.len() > 1 {
            self.status = Some(format!("Drop one file at a time ({} given)", files.len()));
        }
        self.handle_shell_event(ShellEvent::Drop { files }, now);
    }

    /// Mouse wheel over the column at `index`.
    pub fn wheel(&mut self, index: usize, delta: f64) {
        if !self.registry.is_listening(ListenerKind::Wheel) {
            return;
        }
        if let Some(column) = self.columns.get_mut(index) {
            column.wheel(delta);
        }
    }

    /// Let time pass: settle resizes and step scroll animations.
    pub fn tick(&mut self, now: Instant) {
        let mut intents: Vec<Intent<PathBuf>> = Vec::new();
        let resized = self.shell.advance(now, &mut intents);
        self.apply(intents);
        if resized {
            self.sync_columns_or_report();
        }

        for column in &mut self.columns {
            column.tick(now);
        }
    }

    /// Route to `path`.
    pub fn navigate(&mut self, path: &str) {
        let content_changed = self.shell.navigate(path);
        self.sync_columns_or_report();

        if content_changed && self.view().layout == LayoutMode::MultiColumn {
            // Bring the routed column into focus.
            self.focused = self.columns.len().saturating_sub(1);
        }
    }

    fn update_snapshot(&mut self, next: StateSnapshot) {
        match self.shell.update(next) {
            UpdateDecision::FullRender => self.sync_columns_or_report(),
            UpdateDecision::ToggleClasses { is_composing, .. } => {
                debug!(is_composing, "Toggled composing state");
            }
        }
    }

    /// Act on dispatched intents on behalf of the surrounding application.
    fn apply(&mut self, intents: Vec<Intent<PathBuf>>) {
        for intent in intents {
            self.dispatched.push(intent.name().to_string());
            match intent {
                Intent::Navigate(path) => self.navigate(&path),
                Intent::UploadFile(path) => {
                    info!(path = %path.display(), "Upload requested");
                    self.status = Some(format!("Uploading {}", path.display()));
                    self.uploads.push(path);
                }
                Intent::OpenSettingsModal => self.show_settings = true,
                Intent::CycleMascot => {
                    let next = StateSnapshot {
                        mascot: self.shell.snapshot().mascot.wrapping_add(1),
                        ..self.shell.snapshot().clone()
                    };
                    self.update_snapshot(next);
                }
                Intent::RefreshHomeTimeline
                | Intent::RefreshNotifications
                | Intent::InvalidateCachedItemHeights => {
                    debug!(intent = intent.name(), "Dispatched");
                }
            }
        }
    }

    fn attached_nodes(&self) -> Vec<NodeId> {
        std::iter::once(ROOT_NODE)
            .chain(self.columns.iter().map(Column::node))
            .collect()
    }

    /// Panes to show for the current layout and route.
    pub fn desired_panes(&self) -> Vec<Pane> {
        let view = self.view();
        let routed = view.route.pane;

        if view.single_column {
            return vec![routed];
        }

        let mut panes = vec![Pane::Compose, Pane::HomeTimeline, Pane::Notifications];
        if !panes.contains(&routed) {
            panes.push(routed);
        }
        panes
    }

    fn sync_columns_or_report(&mut self) {
        if let Err(e) = self.sync_columns() {
            self.status = Some(format!("Error: {e}"));
        }
    }

    /// Mount and unmount columns to match [`Self::desired_panes`], keeping
    /// the scroll state of columns that stay.
    fn sync_columns(&mut self) -> Result<(), ListenerError> {
        let desired = self.desired_panes();
        let mut current = std::mem::take(&mut self.columns);

        for pane in desired {
            if let Some(pos) = current.iter().position(|c| c.pane() == pane) {
                self.columns.push(current.remove(pos));
            } else {
                let node = NodeId(self.next_node);
                self.next_node += 1;
                let rows = if pane == Pane::Compose { 0 } else { PLACEHOLDER_ROWS };
                self.columns
                    .push(Column::mount(self.registry.clone(), node, pane, rows)?);
            }
        }

        // Remaining columns unmount as they drop.
        drop(current);

        if self.focused >= self.columns.len() {
            self.focused = self.columns.len().saturating_sub(1);
        }
        Ok(())
    }
}

/// Existing files among pasted text, one path per line or word.
pub fn dropped_files(text: &str) -> Vec<PathBuf> {
    text.split(['\n', '\r'])
        .flat_map(|line| {
            let line = line.trim();
            if Path::new(unquote(line)).is_file() {
                vec![line]
            } else {
                line.split_whitespace().collect()
            }
        })
        .map(unquote)
        .map(|s| s.strip_prefix("file://").unwrap_or(s))
        .map(PathBuf::from)
        .filter(|p| p.is_file())
        .collect()
}

fn unquote(s: &str) -> &str {
    s.trim_matches(|c| c == '\'' || c == '"')
}
