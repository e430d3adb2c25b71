//! Drag-and-drop session tracking.
//!
//! Hosts fire `dragenter`/`dragleave` for every nested element the pointer
//! crosses, not just for the outermost container. Toggling a flag on each
//! pair makes the drop overlay flicker whenever the pointer crosses a child
//! boundary, so the tracker keeps the set of entered nodes instead and only
//! ends the session once that set drains.
//!
//! Containment is asked of the host through [`NodeTree`], which keeps the
//! tracker free of any rendering environment.

use std::collections::BTreeSet;

use tracing::{debug, trace};

/// Payload kind announced by the host when files are being dragged.
pub const FILES_PAYLOAD: &str = "Files";

/// Opaque identity of a drop target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

/// Containment queries against the shell's root element.
pub trait NodeTree {
    /// Whether `node` is still attached beneath the shell root.
    fn contains(&self, node: NodeId) -> bool;
}

impl<F> NodeTree for F
where
    F: Fn(NodeId) -> bool,
{
    fn contains(&self, node: NodeId) -> bool {
        self(node)
    }
}

/// Drop effect hint reported while dragging over the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    /// The dropped payload will be copied.
    Copy,
}

/// The host refused a drop effect hint.
#[derive(Debug, thiserror::Error)]
#[error("drop effect rejected: {reason}")]
pub struct DropEffectError {
    /// Host-supplied reason.
    pub reason: String,
}

/// Host data-transfer object of an in-progress drag.
pub trait DataTransfer {
    /// Set the drop effect hint. Some hosts reject this.
    fn set_drop_effect(&mut self, effect: DropEffect) -> Result<(), DropEffectError>;
}

/// How the host should treat an event after the tracker handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventDisposition {
    /// Suppress the host's default handling.
    pub prevent_default: bool,
    /// Stop the event from bubbling further.
    pub stop_propagation: bool,
}

impl EventDisposition {
    fn prevent_default() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: false,
        }
    }

    fn consume() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: true,
        }
    }
}

/// One in-progress drag gesture over the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    entered: BTreeSet<NodeId>,
    is_file_drag: bool,
}

impl DragSession {
    /// Nodes the pointer is currently inside of.
    pub fn entered(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entered.iter().copied()
    }

    /// Whether the payload includes files.
    pub fn is_file_drag(&self) -> bool {
        self.is_file_drag
    }
}

/// Tracks the drag session across nested drop targets.
#[derive(Debug, Default)]
pub struct DragTracker {
    session: Option<DragSession>,
}

impl DragTracker {
    /// Create an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Whether a drag session is active.
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Number of nodes currently entered.
    pub fn entered_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.entered.len())
    }

    /// Whether the upload overlay should be shown.
    pub fn show_drop_overlay(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.is_file_drag && !s.entered.is_empty())
    }

    /// Handle `dragenter` on `target`.
    pub fn on_drag_enter<S: AsRef<str>>(
        &mut self,
        target: NodeId,
        payload_kinds: &[S],
    ) -> EventDisposition {
        let session = self.session.get_or_insert_with(|| {
            debug!(node = target.0, "Drag session started");
            DragSession::default()
        });

        session.entered.insert(target);

        if payload_kinds.iter().any(|k| k.as_ref() == FILES_PAYLOAD) {
            session.is_file_drag = true;
        }

        EventDisposition::prevent_default()
    }

    /// Handle `dragover`. Rejections of the copy hint are discarded.
    pub fn on_drag_over(&mut self, data_transfer: &mut dyn DataTransfer) -> EventDisposition {
        if let Err(e) = data_transfer.set_drop_effect(DropEffect::Copy) {
            trace!(error = %e, "Ignoring rejected drop effect");
        }

        EventDisposition::consume()
    }

    /// Handle `dragleave` on `target`.
    ///
    /// Drops `target` and lazily prunes every tracked node the shell no
    /// longer contains, rather than pairing enters with leaves.
    pub fn on_drag_leave(&mut self, target: NodeId, tree: &dyn NodeTree) -> EventDisposition {
        if let Some(session) = self.session.as_mut() {
            session
                .entered
                .retain(|&node| node != target && tree.contains(node));

            if session.entered.is_empty() {
                debug!("Drag session left the shell");
                self.session = None;
            }
        }

        EventDisposition::consume()
    }

    /// Handle `dragend`: the gesture was cancelled at the source.
    pub fn on_drag_end(&mut self) {
        if self.session.take().is_some() {
            debug!("Drag session cancelled");
        }
    }

    /// Handle `drop`.
    ///
    /// The session always ends. Only a single dropped file is handed back
    /// for upload; empty and multi-file drops are ignored.
    pub fn on_drop<F>(&mut self, files: Vec<F>) -> (EventDisposition, Option<F>) {
        self.session = None;

        let upload = if files.len() == 1 {
            files.into_iter().next()
        } else {
            debug!(count = files.len(), "Ignoring drop without exactly one file");
            None
        };

        (EventDisposition::prevent_default(), upload)
    }

    /// Force the tracker back to idle.
    pub fn reset(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    const OUTER: NodeId = NodeId(1);
    const INNER: NodeId = NodeId(2);

    /// Mutable set of attached nodes.
    #[derive(Default)]
    struct FakeTree(RefCell<HashSet<NodeId>>);

    impl FakeTree {
        fn with(nodes: &[NodeId]) -> Self {
            Self(RefCell::new(nodes.iter().copied().collect()))
        }

        fn detach(&self, node: NodeId) {
            self.0.borrow_mut().remove(&node);
        }
    }

    impl NodeTree for FakeTree {
        fn contains(&self, node: NodeId) -> bool {
            self.0.borrow().contains(&node)
        }
    }

    struct Rejecting;

    impl DataTransfer for Rejecting {
        fn set_drop_effect(&mut self, _: DropEffect) -> Result<(), DropEffectError> {
            Err(DropEffectError {
                reason: "read-only".into(),
            })
        }
    }

    #[derive(Default)]
    struct Recording(Option<DropEffect>);

    impl DataTransfer for Recording {
        fn set_drop_effect(&mut self, effect: DropEffect) -> Result<(), DropEffectError> {
            self.0 = Some(effect);
            Ok(())
        }
    }

    #[test]
    fn test_enter_creates_session() {
        let mut tracker = DragTracker::new();
        assert!(!tracker.is_tracking());

        let disposition = tracker.on_drag_enter(OUTER, &["Files"]);
        assert!(disposition.prevent_default);
        assert!(tracker.is_tracking());
        assert!(tracker.show_drop_overlay());
    }

    #[test]
    fn test_enter_is_idempotent() {
        let mut tracker = DragTracker::new();
        tracker.on_drag_enter(OUTER, &["Files"]);
        tracker.on_drag_enter(OUTER, &["Files"]);
        assert_eq!(tracker.entered_count(), 1);
    }

    #[test]
    fn test_non_file_drag_tracks_without_overlay() {
        let mut tracker = DragTracker::new();
        tracker.on_drag_enter(OUTER, &["text/plain"]);
        assert!(tracker.is_tracking());
        assert!(!tracker.show_drop_overlay());
    }

    #[test]
    fn test_file_flag_is_monotonic() {
        let mut tracker = DragTracker::new();
        tracker.on_drag_enter(OUTER, &["Files"]);
        tracker.on_drag_enter(INNER, &["text/plain"]);
        assert!(tracker.session().unwrap().is_file_drag());
    }

    #[test]
    fn test_nested_leave_does_not_flicker() {
        let tree = FakeTree::with(&[OUTER, INNER]);
        let mut tracker = DragTracker::new();

        tracker.on_drag_enter(OUTER, &["Files"]);
        assert!(tracker.show_drop_overlay());
        tracker.on_drag_enter(INNER, &["Files"]);
        assert!(tracker.show_drop_overlay());

        tree.detach(OUTER);
        tracker.on_drag_leave(OUTER, &tree);
        assert!(tracker.show_drop_overlay());

        tree.detach(INNER);
        tracker.on_drag_leave(INNER, &tree);
        assert!(!tracker.show_drop_overlay());
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_leave_prunes_detached_nodes() {
        let tree = FakeTree::with(&[OUTER, INNER, NodeId(3)]);
        let mut tracker = DragTracker::new();
        tracker.on_drag_enter(OUTER, &["Files"]);
        tracker.on_drag_enter(INNER, &["Files"]);
        tracker.on_drag_enter(NodeId(3), &["Files"]);

        tree.detach(INNER);
        tracker.on_drag_leave(NodeId(3), &tree);
        assert_eq!(tracker.session().unwrap().entered().collect::<Vec<_>>(), vec![OUTER]);
    }

    #[test]
    fn test_leave_accepts_closure_predicate() {
        let mut tracker = DragTracker::new();
        tracker.on_drag_enter(OUTER, &["Files"]);
        let disposition = tracker.on_drag_leave(OUTER, &|_: NodeId| true);
        assert!(disposition.stop_propagation);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_leave_without_session_is_noop() {
        let mut tracker = DragTracker::new();
        tracker.on_drag_leave(OUTER, &|_: NodeId| true);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_drag_over_swallows_rejection() {
        let mut tracker = DragTracker::new();
        let disposition = tracker.on_drag_over(&mut Rejecting);
        assert!(disposition.prevent_default);
        assert!(disposition.stop_propagation);
    }

    #[test]
    fn test_drag_over_requests_copy() {
        let mut tracker = DragTracker::new();
        let mut transfer = Recording::default();
        tracker.on_drag_over(&mut transfer);
        assert_eq!(transfer.0, Some(DropEffect::Copy));
    }

    #[test]
    fn test_drop_single_file_uploads() {
        let mut tracker = DragTracker::new();
        tracker.on_drag_enter(OUTER, &["Files"]);
        let (disposition, upload) = tracker.on_drop(vec!["a.png"]);
        assert!(disposition.prevent_default);
        assert_eq!(upload, Some("a.png"));
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_drop_ignores_zero_or_many_files() {
        let mut tracker = DragTracker::new();
        tracker.on_drag_enter(OUTER, &["Files"]);
        let (_, upload) = tracker.on_drop(Vec::<&str>::new());
        assert_eq!(upload, None);
        assert!(!tracker.is_tracking());

        tracker.on_drag_enter(OUTER, &["Files"]);
        let (_, upload) = tracker.on_drop(vec!["a.png", "b.png"]);
        assert_eq!(upload, None);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_drag_end_and_reset_return_to_idle() {
        let mut tracker = DragTracker::new();
        tracker.on_drag_enter(OUTER, &["Files"]);
        tracker.on_drag_end();
        assert!(!tracker.is_tracking());

        tracker.on_drag_enter(OUTER, &["Files"]);
        tracker.reset();
        assert!(!tracker.show_drop_overlay());
    }
}
