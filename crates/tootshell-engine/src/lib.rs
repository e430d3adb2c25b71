//! tootshell-engine: Headless shell controller for a social-timeline client
//!
//! This crate provides the environment-free core of the shell, including:
//! - Layout mode selection from viewport width and user preference
//! - Drag-and-drop session tracking across nested drop targets
//! - Smooth-scroll animation and its interruption on wheel input
//! - Debounced resize handling with explicit time
//! - Route table and background message handling
//!
//! Hosts supply the environment through small traits ([`NodeTree`],
//! [`DataTransfer`], [`EventTarget`], [`ScrollRegion`]) and receive
//! [`Intent`]s back.

pub mod config;
pub mod debounce;
pub mod drag;
pub mod drawer;
pub mod intent;
pub mod layout;
pub mod listener;
pub mod message;
pub mod route;
pub mod scroll;
pub mod shell;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, ShellConfig};
pub use debounce::Debouncer;
pub use drag::{
    DataTransfer, DragSession, DragTracker, DropEffect, DropEffectError, EventDisposition,
    NodeId, NodeTree, FILES_PAYLOAD,
};
pub use drawer::DrawerView;
pub use intent::{Dispatch, Intent};
pub use layout::{is_single_column, select_layout, LayoutMode, LayoutPreference, LAYOUT_BREAKPOINT};
pub use listener::{
    EventTarget, ListenerError, ListenerGuard, ListenerKind, ListenerOptions, ListenerRegistry,
};
pub use message::{BackgroundMessage, MessageError};
pub use route::{Location, Pane, RouteBinding, RouteMatch, RouteOutcome, RouteTable};
pub use scroll::{AnimationHandle, ScrollAnimation, ScrollInterrupter, ScrollRegion};
pub use shell::{
    MountTargets, RootClasses, ShellController, ShellEvent, ShellHost, ShellView,
    TabsBarPosition, UpdateDecision,
};
pub use state::StateSnapshot;

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
