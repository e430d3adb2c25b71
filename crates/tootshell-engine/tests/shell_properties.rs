//! End-to-end behaviour of a mounted shell.

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tootshell_engine::{
    DataTransfer, DropEffect, DropEffectError, Intent, LayoutMode, LayoutPreference,
    ListenerRegistry, MountTargets, NodeId, NodeTree, ShellConfig, ShellController, ShellEvent,
    ShellHost, StateSnapshot,
};

const OUTER: NodeId = NodeId(10);
const INNER: NodeId = NodeId(11);

/// A document whose nodes can be detached mid-drag and whose drop effect
/// hint is always rejected.
struct Document {
    attached: RefCell<HashSet<NodeId>>,
}

impl Document {
    fn new(nodes: &[NodeId]) -> Self {
        Self {
            attached: RefCell::new(nodes.iter().copied().collect()),
        }
    }

    fn detach(&self, node: NodeId) {
        self.attached.borrow_mut().remove(&node);
    }
}

impl NodeTree for Document {
    fn contains(&self, node: NodeId) -> bool {
        self.attached.borrow().contains(&node)
    }
}

impl DataTransfer for Document {
    fn set_drop_effect(&mut self, _: DropEffect) -> Result<(), DropEffectError> {
        Err(DropEffectError {
            reason: "dropEffect is read-only here".into(),
        })
    }
}

impl ShellHost for Document {
    fn tree(&self) -> &dyn NodeTree {
        self
    }

    fn data_transfer(&mut self) -> &mut dyn DataTransfer {
        self
    }
}

fn mount(snapshot: StateSnapshot, width: u32) -> (Arc<ListenerRegistry>, ShellController) {
    let registry = Arc::new(ListenerRegistry::new());
    let targets = MountTargets {
        window: registry.clone(),
        document: registry.clone(),
        background: None,
    };
    let mut sink: Vec<Intent<&str>> = Vec::new();
    let shell =
        ShellController::mount(&targets, &ShellConfig::default(), snapshot, width, &mut sink)
            .unwrap();
    (registry, shell)
}

fn enter(target: NodeId) -> ShellEvent<&'static str> {
    ShellEvent::DragEnter {
        target,
        payload_kinds: vec!["Files".into()],
    }
}

#[test]
fn nested_enter_leave_never_flickers() {
    let (_registry, mut shell) = mount(StateSnapshot::default(), 1280);
    let mut document = Document::new(&[OUTER, INNER]);
    let mut sink: Vec<Intent<&str>> = Vec::new();
    let now = Instant::now();
    let mut overlay = Vec::new();

    shell.handle_event(enter(OUTER), &mut document, now, &mut sink);
    overlay.push(shell.view().show_drop_overlay);
    shell.handle_event(enter(INNER), &mut document, now, &mut sink);
    overlay.push(shell.view().show_drop_overlay);
    shell.handle_event(ShellEvent::DragOver, &mut document, now, &mut sink);
    overlay.push(shell.view().show_drop_overlay);

    document.detach(OUTER);
    shell.handle_event(ShellEvent::DragLeave { target: OUTER }, &mut document, now, &mut sink);
    overlay.push(shell.view().show_drop_overlay);

    document.detach(INNER);
    shell.handle_event(ShellEvent::DragLeave { target: INNER }, &mut document, now, &mut sink);

    assert_eq!(overlay, vec![true; 4]);
    assert!(!shell.view().show_drop_overlay);
    assert!(!shell.drag().is_tracking());
    assert!(sink.is_empty());
}

#[test]
fn drop_uploads_only_a_single_file() {
    let (_registry, mut shell) = mount(StateSnapshot::default(), 1280);
    let mut document = Document::new(&[OUTER]);
    let now = Instant::now();

    for (files, expected) in [
        (vec!["a.png"], vec![Intent::UploadFile("a.png")]),
        (vec![], vec![]),
        (vec!["a.png", "b.png"], vec![]),
    ] {
        let mut sink: Vec<Intent<&str>> = Vec::new();
        shell.handle_event(enter(OUTER), &mut document, now, &mut sink);
        let disposition =
            shell.handle_event(ShellEvent::Drop { files }, &mut document, now, &mut sink);

        assert!(disposition.prevent_default);
        assert_eq!(sink, expected);
        assert!(!shell.drag().is_tracking());
    }
}

#[test]
fn overlay_stays_up_until_drop() {
    let (_registry, mut shell) = mount(StateSnapshot::default(), 1280);
    let mut document = Document::new(&[OUTER, INNER]);
    let mut sink: Vec<Intent<&str>> = Vec::new();
    let now = Instant::now();

    shell.handle_event(enter(OUTER), &mut document, now, &mut sink);
    assert!(shell.view().show_drop_overlay);
    shell.handle_event(enter(INNER), &mut document, now, &mut sink);
    assert!(shell.view().show_drop_overlay);
    shell.handle_event(ShellEvent::DragLeave { target: INNER }, &mut document, now, &mut sink);
    assert!(shell.view().show_drop_overlay);

    shell.handle_event(
        ShellEvent::Drop {
            files: vec!["fileA"],
        },
        &mut document,
        now,
        &mut sink,
    );

    assert!(!shell.view().show_drop_overlay);
    assert_eq!(sink, vec![Intent::UploadFile("fileA")]);
}

#[test]
fn resize_burst_uses_last_width() {
    let (_registry, mut shell) = mount(StateSnapshot::default(), 1280);
    let mut document = Document::new(&[]);
    let mut sink: Vec<Intent<&str>> = Vec::new();
    let start = Instant::now();

    for step in 0..10u32 {
        let at = start + Duration::from_millis(u64::from(step) * 40);
        shell.handle_event(
            ShellEvent::Resize {
                width: 1200 - step * 100,
            },
            &mut document,
            at,
            &mut sink,
        );
        shell.advance(at, &mut sink);
    }

    let settled = start + Duration::from_millis(360) + ShellConfig::default().resize_debounce();
    assert!(shell.advance(settled, &mut sink));
    assert_eq!(shell.viewport_width(), 300);
    assert_eq!(sink, vec![Intent::InvalidateCachedItemHeights]);
}

#[test]
fn preference_overrides_narrow_viewport() {
    let snapshot = StateSnapshot {
        layout: LayoutPreference::Auto,
        ..StateSnapshot::default()
    };
    let (_registry, mut shell) = mount(snapshot, 300);
    assert_eq!(shell.view().layout, LayoutMode::SingleColumn);

    let multiple = StateSnapshot {
        layout: LayoutPreference::Multiple,
        ..shell.snapshot().clone()
    };
    shell.update(multiple);
    assert_eq!(shell.view().layout, LayoutMode::MultiColumn);
    assert!(!shell.view().single_column);
}

#[test]
fn unmount_removes_every_listener() {
    let (registry, shell) = mount(StateSnapshot::default(), 1280);
    assert_eq!(registry.len(), 6);

    shell.unmount();
    assert!(registry.is_empty());
}
