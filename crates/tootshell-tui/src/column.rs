//! Scrollable timeline columns.
//!
//! Column contents belong to the surrounding application; a column here
//! only knows how many rows it holds and where it is scrolled to.

use std::sync::Arc;
use std::time::Instant;

use tootshell_engine::{
    AnimationHandle, EventTarget, ListenerError, NodeId, Pane, ScrollAnimation,
    ScrollInterrupter, ScrollRegion,
};

/// Rows moved per wheel notch or key press.
pub const SCROLL_STEP: f64 = 3.0;

/// Placeholder rows shown per timeline column.
pub const PLACEHOLDER_ROWS: usize = 40;

/// Scroll position and in-flight animation of a column's body.
#[derive(Debug, Default)]
pub struct ColumnBody {
    rows: usize,
    offset: f64,
    animation: Option<ScrollAnimation>,
}

impl ColumnBody {
    /// A body holding `rows` rows.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Number of rows held.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Top visible row.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    fn max_offset(&self) -> f64 {
        self.rows.saturating_sub(1) as f64
    }

    /// Scroll by `delta` rows, clamped to the content.
    pub fn scroll_by(&mut self, delta: f64) {
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset());
    }

    /// Advance the animation. Returns whether the offset moved.
    pub fn step(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };

        match animation.step(now) {
            Some(offset) => {
                self.offset = offset;
                true
            }
            None => {
                self.animation = None;
                false
            }
        }
    }
}

impl ScrollRegion for ColumnBody {
    fn animate_to_top(&mut self, now: Instant) -> Option<AnimationHandle> {
        if self.rows == 0 {
            return None;
        }

        let animation = ScrollAnimation::to_top(self.offset, now);
        let handle = animation.handle();
        self.animation = Some(animation);
        Some(handle)
    }
}

/// One rendered column.
#[derive(Debug)]
pub struct Column {
    node: NodeId,
    pane: Pane,
    body: ColumnBody,
    interrupter: ScrollInterrupter,
}

impl Column {
    /// Mount a column for `pane`, attaching its wheel listener to `target`.
    pub fn mount(
        target: Arc<dyn EventTarget>,
        node: NodeId,
        pane: Pane,
        rows: usize,
    ) -> Result<Self, ListenerError> {
        let interrupter = ScrollInterrupter::mount(target)?;

        Ok(Self {
            node,
            pane,
            body: ColumnBody::new(rows),
            interrupter,
        })
    }

    /// Drop target identity of this column.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The pane shown.
    pub fn pane(&self) -> Pane {
        self.pane
    }

    /// Scroll position.
    pub fn body(&self) -> &ColumnBody {
        &self.body
    }

    /// Whether a programmatic scroll is still in flight.
    pub fn is_animating(&self) -> bool {
        self.interrupter.is_animating()
    }

    /// Smoothly scroll to the top.
    pub fn scroll_to_top(&mut self, now: Instant) {
        self.interrupter
            .begin_programmatic_scroll(&mut self.body, now);
    }

    /// Wheel input: interrupt any animation, then scroll natively.
    pub fn wheel(&mut self, delta: f64) {
        self.interrupter.on_wheel();
        self.body.scroll_by(delta);
    }

    /// Advance animations.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.body.step(now)
    }
}
