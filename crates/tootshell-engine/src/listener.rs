//! Scoped event listener registration.
//!
//! Every listener the shell installs is held by a [`ListenerGuard`] which
//! removes it again when dropped, so unmounting (or failing halfway through
//! mounting) never leaks handlers into the next shell instance.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Host events the shell listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerKind {
    /// Window resize.
    Resize,
    /// Document `dragenter`.
    DragEnter,
    /// Document `dragover`.
    DragOver,
    /// Document `dragleave`.
    DragLeave,
    /// Document `dragend`.
    DragEnd,
    /// Document `drop`.
    Drop,
    /// Per-column wheel input.
    Wheel,
    /// Background-process message channel.
    Message,
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resize => "resize",
            Self::DragEnter => "dragenter",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::DragEnd => "dragend",
            Self::Drop => "drop",
            Self::Wheel => "wheel",
            Self::Message => "message",
        };
        f.write_str(name)
    }
}

/// Registration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// The listener never suppresses default handling.
    pub passive: bool,
}

/// Identity of an installed listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Errors installing a listener.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The host does not offer this event.
    #[error("{0} events are not supported by this host")]
    Unsupported(ListenerKind),

    /// The host refused the registration.
    #[error("failed to register {kind} listener: {reason}")]
    Rejected {
        /// Event kind being registered.
        kind: ListenerKind,
        /// Host-supplied reason.
        reason: String,
    },
}

/// Something listeners can be attached to (window, document, column).
pub trait EventTarget: Send + Sync {
    /// Install a listener.
    fn add_listener(
        &self,
        kind: ListenerKind,
        options: ListenerOptions,
    ) -> Result<ListenerId, ListenerError>;

    /// Remove a previously installed listener.
    fn remove_listener(&self, id: ListenerId);
}

/// Owns one installed listener and removes it on drop.
pub struct ListenerGuard {
    target: Arc<dyn EventTarget>,
    id: ListenerId,
    kind: ListenerKind,
}

impl ListenerGuard {
    /// Install a listener on `target`, scoped to the returned guard.
    pub fn register(
        target: Arc<dyn EventTarget>,
        kind: ListenerKind,
        options: ListenerOptions,
    ) -> Result<Self, ListenerError> {
        let id = target.add_listener(kind, options)?;
        Ok(Self { target, id, kind })
    }

    /// Event kind of this listener.
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.target.remove_listener(self.id);
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// In-memory [`EventTarget`] for hosts without native listeners, and tests.
///
/// Hosts consult [`ListenerRegistry::is_listening`] before forwarding an
/// event, so removing a listener makes the shell deaf to that event.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    active: Mutex<BTreeMap<ListenerId, (ListenerKind, ListenerOptions)>>,
    unsupported: Vec<ListenerKind>,
}

impl ListenerRegistry {
    /// Create a registry that accepts every event kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that rejects the given kinds.
    pub fn without(unsupported: &[ListenerKind]) -> Self {
        Self {
            unsupported: unsupported.to_vec(),
            ..Self::default()
        }
    }

    /// Number of installed listeners of `kind`.
    pub fn count(&self, kind: ListenerKind) -> usize {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Total number of installed listeners.
    pub fn len(&self) -> usize {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no listener is installed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the installed listeners of `kind`.
    pub fn ids(&self, kind: ListenerKind) -> Vec<ListenerId> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, (k, _))| *k == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether at least one listener of `kind` is installed.
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.count(kind) > 0
    }

    /// Whether every installed listener of `kind` is passive.
    pub fn is_passive(&self, kind: ListenerKind) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|(k, _)| *k == kind)
            .all(|(_, options)| options.passive)
    }
}

impl EventTarget for ListenerRegistry {
    fn add_listener(
        &self,
        kind: ListenerKind,
        options: ListenerOptions,
    ) -> Result<ListenerId, ListenerError> {
        if self.unsupported.contains(&kind) {
            return Err(ListenerError::Unsupported(kind));
        }

        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, (kind, options));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}
