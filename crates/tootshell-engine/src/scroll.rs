//! Smooth scrolling and its interruption.
//!
//! A column can animate itself back to the top. As soon as the user turns
//! the wheel over that column the animation is cancelled so the native
//! scroll takes over without fighting it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::listener::{EventTarget, ListenerError, ListenerGuard, ListenerKind, ListenerOptions};

/// Length of a smooth scroll.
pub const SCROLL_DURATION: Duration = Duration::from_millis(1000);

/// One-shot cancellation of an in-flight scroll animation.
pub struct AnimationHandle {
    cancel: Box<dyn FnOnce() + Send>,
    finished: Option<Arc<AtomicBool>>,
}

impl AnimationHandle {
    /// Wrap a host cancellation callback.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
            finished: None,
        }
    }

    /// Report completion through `finished`, set by the animation once it
    /// lands on its target.
    pub fn with_completion(mut self, finished: Arc<AtomicBool>) -> Self {
        self.finished = Some(finished);
        self
    }

    /// Whether the animation reached its target on its own.
    pub fn is_finished(&self) -> bool {
        self.finished
            .as_ref()
            .is_some_and(|finished| finished.load(Ordering::Relaxed))
    }

    /// Cancel the animation. Consumes the handle.
    pub fn cancel(self) {
        (self.cancel)();
    }
}

impl fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHandle").finish_non_exhaustive()
    }
}

/// Ease-out quint: fast start, long gentle landing.
fn ease_out_quint(elapsed: f64, start: f64, gap: f64, duration: f64) -> f64 {
    let t = elapsed / duration - 1.0;
    gap * (t * t * t * t * t + 1.0) + start
}

/// An eased scroll from one offset to another, stepped with explicit time.
#[derive(Debug)]
pub struct ScrollAnimation {
    started_at: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    interrupted: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl ScrollAnimation {
    /// Start animating from `from` to `to` at `now`.
    pub fn new(from: f64, to: f64, now: Instant) -> Self {
        Self::with_duration(from, to, now, SCROLL_DURATION)
    }

    /// Start an animation with a custom duration.
    pub fn with_duration(from: f64, to: f64, now: Instant, duration: Duration) -> Self {
        Self {
            started_at: now,
            from,
            to,
            duration,
            interrupted: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Animate a vertical offset back to the top.
    pub fn to_top(offset: f64, now: Instant) -> Self {
        Self::new(offset, 0.0, now)
    }

    /// Animate a horizontal offset to `position`.
    pub fn to_right(offset: f64, position: f64, now: Instant) -> Self {
        Self::new(offset, position, now)
    }

    /// A handle that interrupts this animation.
    pub fn handle(&self) -> AnimationHandle {
        let interrupted = Arc::clone(&self.interrupted);
        AnimationHandle::new(move || interrupted.store(true, Ordering::Relaxed))
            .with_completion(Arc::clone(&self.finished))
    }

    /// Whether the animation was interrupted.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    /// Whether no further offsets will be produced.
    pub fn is_done(&self) -> bool {
        self.finished.load(Ordering::Relaxed) || self.is_interrupted()
    }

    /// Offset to apply at `now`, or `None` once finished or interrupted.
    pub fn step(&mut self, now: Instant) -> Option<f64> {
        if self.is_done() {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.duration {
            self.finished.store(true, Ordering::Relaxed);
            return Some(self.to);
        }

        Some(ease_out_quint(
            elapsed.as_secs_f64(),
            self.from,
            self.to - self.from,
            self.duration.as_secs_f64(),
        ))
    }
}

/// A column region that may contain a scrollable descendant.
pub trait ScrollRegion {
    /// Start animating the scrollable descendant to the top.
    ///
    /// Returns `None` when the region has nothing scrollable.
    fn animate_to_top(&mut self, now: Instant) -> Option<AnimationHandle>;
}

/// Cancels a column's programmatic scroll on user wheel input.
#[derive(Debug)]
pub struct ScrollInterrupter {
    animation: Option<AnimationHandle>,
    _wheel: ListenerGuard,
}

impl ScrollInterrupter {
    /// Attach to a column. The wheel listener lives as long as the returned
    /// value.
    pub fn mount(target: Arc<dyn EventTarget>) -> Result<Self, ListenerError> {
        let wheel = ListenerGuard::register(
            target,
            ListenerKind::Wheel,
            ListenerOptions { passive: true },
        )?;

        Ok(Self {
            animation: None,
            _wheel: wheel,
        })
    }

    /// Whether an animation is still in flight.
    pub fn is_animating(&self) -> bool {
        self.animation
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Scroll the region to the top, replacing any animation in flight.
    pub fn begin_programmatic_scroll(&mut self, region: &mut dyn ScrollRegion, now: Instant) {
        if let Some(previous) = self.animation.take() {
            if !previous.is_finished() {
                previous.cancel();
            }
        }

        self.animation = region.animate_to_top(now);
        if self.animation.is_none() {
            debug!("No scrollable content to animate");
        }
    }

    /// Handle raw wheel input. Returns whether an animation was cancelled.
    ///
    /// An animation that already landed is released without cancelling.
    pub fn on_wheel(&mut self) -> bool {
        match self.animation.take() {
            Some(handle) if handle.is_finished() => false,
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Detach from the column, cancelling any animation in flight.
    pub fn unmount(mut self) {
        if let Some(handle) = self.animation.take() {
            handle.cancel();
        }
    }
}
