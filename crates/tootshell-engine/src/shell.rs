//! The shell controller.
//!
//! Composes the layout selector, drag tracker and resize debouncer behind
//! one mounted instance. Hosts forward raw events into it and read back a
//! [`ShellView`]; everything the shell wants done elsewhere leaves through a
//! [`Dispatch`] sink.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::ShellConfig;
use crate::debounce::Debouncer;
use crate::drag::{DataTransfer, DragTracker, EventDisposition, NodeId, NodeTree};
use crate::drawer::DrawerView;
use crate::intent::{Dispatch, Intent};
use crate::layout::{select_layout, LayoutMode};
use crate::listener::{EventTarget, ListenerError, ListenerGuard, ListenerKind, ListenerOptions};
use crate::message::BackgroundMessage;
use crate::route::{Location, RouteMatch, RouteTable};
use crate::state::StateSnapshot;

/// Environment capabilities needed while handling drag events.
pub trait ShellHost {
    /// Containment queries against the shell root.
    fn tree(&self) -> &dyn NodeTree;
    /// Data transfer of the current drag.
    fn data_transfer(&mut self) -> &mut dyn DataTransfer;
}

/// Raw events a host forwards to the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent<F> {
    /// The viewport was resized.
    Resize { width: u32 },
    /// `dragenter` on a node.
    DragEnter {
        target: NodeId,
        payload_kinds: Vec<String>,
    },
    /// `dragover` anywhere in the document.
    DragOver,
    /// `dragleave` on a node.
    DragLeave { target: NodeId },
    /// `dragend` at the drag source.
    DragEnd,
    /// `drop` with the dropped files.
    Drop { files: Vec<F> },
    /// Payload received on the background channel.
    Message(serde_json::Value),
}

impl<F> ShellEvent<F> {
    /// Listener that must be installed for this event to be delivered.
    pub fn listener_kind(&self) -> ListenerKind {
        match self {
            Self::Resize { .. } => ListenerKind::Resize,
            Self::DragEnter { .. } => ListenerKind::DragEnter,
            Self::DragOver => ListenerKind::DragOver,
            Self::DragLeave { .. } => ListenerKind::DragLeave,
            Self::DragEnd => ListenerKind::DragEnd,
            Self::Drop { .. } => ListenerKind::Drop,
            Self::Message(_) => ListenerKind::Message,
        }
    }
}

/// Listener targets the shell attaches to at mount.
pub struct MountTargets {
    /// Receives `resize`.
    pub window: Arc<dyn EventTarget>,
    /// Receives the drag and drop events.
    pub document: Arc<dyn EventTarget>,
    /// Background message channel, when the host has one.
    pub background: Option<Arc<dyn EventTarget>>,
}

/// Where the tabs bar is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabsBarPosition {
    /// Above the columns.
    Top,
    /// Below the columns.
    Bottom,
}

/// What an update with a new snapshot requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Re-render the whole shell.
    FullRender,
    /// Only the root element's state classes were toggled.
    ToggleClasses {
        is_composing: bool,
        navbar_under: bool,
    },
}

/// Class list of the shell's root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootClasses(Vec<&'static str>);

impl RootClasses {
    fn toggle(&mut self, class: &'static str, on: bool) {
        let present = self.contains(class);
        if on && !present {
            self.0.push(class);
        } else if !on && present {
            self.0.retain(|c| *c != class);
        }
    }

    /// Whether `class` is set.
    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| *c == class)
    }

    /// Classes in application order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }
}

impl std::fmt::Display for RootClasses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Derived view state for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    /// Current viewport width.
    pub viewport_width: u32,
    /// Effective layout.
    pub layout: LayoutMode,
    /// Passed down to the column area.
    pub single_column: bool,
    /// Root element classes.
    pub classes: RootClasses,
    /// Tabs bar placement.
    pub tabs_bar: TabsBarPosition,
    /// Upload overlay visibility.
    pub show_drop_overlay: bool,
    /// Pane selected by the current location.
    pub route: RouteMatch,
    /// Compose drawer visibility.
    pub drawer: DrawerView,
}

/// The mounted shell.
///
/// Listeners are installed by [`ShellController::mount`] and removed when
/// the controller is unmounted or dropped.
#[derive(Debug)]
pub struct ShellController {
    viewport_width: u32,
    resize: Debouncer<u32>,
    drag: DragTracker,
    snapshot: StateSnapshot,
    routes: RouteTable,
    location: Location,
    root: RootClasses,
    renders: u64,
    listeners: Vec<ListenerGuard>,
}

impl ShellController {
    /// Install listeners and request the initial timeline loads.
    pub fn mount<F>(
        targets: &MountTargets,
        config: &ShellConfig,
        snapshot: StateSnapshot,
        viewport_width: u32,
        dispatch: &mut dyn Dispatch<F>,
    ) -> Result<Self, ListenerError> {
        let passive = ListenerOptions { passive: true };
        let active = ListenerOptions::default();

        let mut listeners = vec![ListenerGuard::register(
            Arc::clone(&targets.window),
            ListenerKind::Resize,
            passive,
        )?];

        for kind in [
            ListenerKind::DragEnter,
            ListenerKind::DragOver,
            ListenerKind::Drop,
            ListenerKind::DragLeave,
            ListenerKind::DragEnd,
        ] {
            listeners.push(ListenerGuard::register(
                Arc::clone(&targets.document),
                kind,
                active,
            )?);
        }

        if let Some(background) = &targets.background {
            listeners.push(ListenerGuard::register(
                Arc::clone(background),
                ListenerKind::Message,
                active,
            )?);
        }

        dispatch.dispatch(Intent::RefreshHomeTimeline);
        dispatch.dispatch(Intent::RefreshNotifications);

        debug!(viewport_width, listeners = listeners.len(), "Shell mounted");

        let mut shell = Self {
            viewport_width,
            resize: Debouncer::new(config.resize_debounce()),
            drag: DragTracker::new(),
            snapshot,
            routes: RouteTable::default(),
            location: Location::default(),
            root: RootClasses::default(),
            renders: 0,
            listeners,
        };
        shell.render();
        Ok(shell)
    }

    /// Remove every listener and drop pending work.
    pub fn unmount(mut self) {
        self.resize.cancel();
        self.drag.reset();
        self.listeners.clear();
        debug!("Shell unmounted");
    }

    /// Replace the route table.
    #[must_use]
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Current viewport width.
    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> &StateSnapshot {
        &self.snapshot
    }

    /// The current location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The drag tracker.
    pub fn drag(&self) -> &DragTracker {
        &self.drag
    }

    /// Root element classes as last rendered or toggled.
    pub fn root_classes(&self) -> &RootClasses {
        &self.root
    }

    /// Number of full renders so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// When the pending resize recomputation fires.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    /// Effective layout for the current width and preference.
    pub fn layout(&self) -> LayoutMode {
        select_layout(self.viewport_width, self.snapshot.layout)
    }

    /// Forward a raw event.
    pub fn handle_event<F>(
        &mut self,
        event: ShellEvent<F>,
        host: &mut dyn ShellHost,
        now: Instant,
        dispatch: &mut dyn Dispatch<F>,
    ) -> EventDisposition {
        match event {
            ShellEvent::Resize { width } => {
                self.on_resize(width, now);
                EventDisposition::default()
            }
            ShellEvent::DragEnter {
                target,
                payload_kinds,
            } => self.drag.on_drag_enter(target, payload_kinds.as_slice()),
            ShellEvent::DragOver => self.drag.on_drag_over(host.data_transfer()),
            ShellEvent::DragLeave { target } => self.drag.on_drag_leave(target, host.tree()),
            ShellEvent::DragEnd => {
                self.drag.on_drag_end();
                EventDisposition::default()
            }
            ShellEvent::Drop { files } => self.on_drop(files, dispatch),
            ShellEvent::Message(payload) => {
                self.on_message(payload, dispatch);
                EventDisposition::default()
            }
        }
    }

    /// Record a resize. The width is adopted once the burst settles.
    pub fn on_resize(&mut self, width: u32, now: Instant) {
        self.resize.call(width, now);
    }

    /// Let time pass. Fires the settled resize, if due.
    ///
    /// Returns whether the viewport width was recomputed.
    pub fn advance<F>(&mut self, now: Instant, dispatch: &mut dyn Dispatch<F>) -> bool {
        let Some(width) = self.resize.poll(now) else {
            return false;
        };

        dispatch.dispatch(Intent::InvalidateCachedItemHeights);

        if width != self.viewport_width {
            debug!(from = self.viewport_width, to = width, "Viewport resized");
        }
        self.viewport_width = width;
        self.render();
        true
    }

    /// Handle a drop, uploading a lone file.
    pub fn on_drop<F>(&mut self, files: Vec<F>, dispatch: &mut dyn Dispatch<F>) -> EventDisposition {
        let (disposition, upload) = self.drag.on_drop(files);
        if let Some(file) = upload {
            dispatch.dispatch(Intent::UploadFile(file));
        }
        disposition
    }

    /// Handle a background channel payload. Never fails.
    pub fn on_message<F>(&mut self, payload: serde_json::Value, dispatch: &mut dyn Dispatch<F>) {
        match BackgroundMessage::from_value(payload) {
            Ok(BackgroundMessage::Navigate(path)) => dispatch.dispatch(Intent::Navigate(path)),
            Ok(BackgroundMessage::Unknown(kind)) => {
                warn!(kind = %kind, "Unknown message type");
            }
            Err(e) => warn!(error = %e, "Ignoring malformed background message"),
        }
    }

    /// Manual close of the upload overlay.
    pub fn close_upload_overlay(&mut self) {
        self.drag.reset();
    }

    /// Move to `path`. Returns whether the column area should be told its
    /// content changed.
    pub fn navigate(&mut self, path: &str) -> bool {
        let next = Location::new(path);
        let changed = Location::content_changed(&self.location, &next);
        self.location = next;
        self.render();
        changed
    }

    /// Adopt a new snapshot.
    ///
    /// When only the composing flag changed, the root classes are toggled in
    /// place and the full render is skipped.
    pub fn update(&mut self, next: StateSnapshot) -> UpdateDecision {
        if self.snapshot.only_composing_changed(&next) {
            self.root.toggle("is-composing", next.is_composing);
            self.root.toggle("navbar-under", next.navbar_under);
            let decision = UpdateDecision::ToggleClasses {
                is_composing: next.is_composing,
                navbar_under: next.navbar_under,
            };
            self.snapshot = next;
            return decision;
        }

        self.snapshot = next;
        self.render();
        UpdateDecision::FullRender
    }

    fn render(&mut self) {
        self.root = self.classes();
        self.renders += 1;
    }

    fn classes(&self) -> RootClasses {
        let mut classes = RootClasses(vec![
            "ui",
            LayoutMode::for_preference(self.snapshot.layout).class_name(),
        ]);
        classes.toggle("wide", self.snapshot.stretch);
        classes.toggle("system-font", self.snapshot.system_font_ui);
        classes.toggle("navbar-under", self.snapshot.navbar_under);
        classes.toggle("is-composing", self.snapshot.is_composing);
        classes
    }

    /// Derive the view for the current state.
    pub fn view(&self) -> ShellView {
        let layout = self.layout();
        let route = self.routes.route(self.location.path());
        let is_search_page = self.location.path().starts_with("/search");

        ShellView {
            viewport_width: self.viewport_width,
            layout,
            single_column: layout == LayoutMode::SingleColumn,
            classes: self.root.clone(),
            tabs_bar: if self.snapshot.navbar_under {
                TabsBarPosition::Bottom
            } else {
                TabsBarPosition::Top
            },
            show_drop_overlay: self.drag.show_drop_overlay(),
            route,
            drawer: DrawerView::derive(
                &self.snapshot,
                layout == LayoutMode::MultiColumn,
                is_search_page,
            ),
        }
    }
}
