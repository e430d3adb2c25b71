//! Intents the shell emits toward the surrounding application.
//!
//! The shell never fetches or persists anything itself. Everything it wants
//! done goes out as a fire-and-forget [`Intent`].

/// Outward intent. `F` is the host's file handle type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent<F> {
    /// Reload the home timeline.
    RefreshHomeTimeline,
    /// Reload notifications.
    RefreshNotifications,
    /// Cached item heights are stale after a resize.
    InvalidateCachedItemHeights,
    /// Attach a dropped file to the post being composed.
    UploadFile(F),
    /// Show the settings modal.
    OpenSettingsModal,
    /// Route to a path.
    Navigate(String),
    /// Show the next drawer mascot.
    CycleMascot,
}

impl<F> Intent<F> {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RefreshHomeTimeline => "refresh-home-timeline",
            Self::RefreshNotifications => "refresh-notifications",
            Self::InvalidateCachedItemHeights => "invalidate-cached-item-heights",
            Self::UploadFile(_) => "upload-file",
            Self::OpenSettingsModal => "open-settings-modal",
            Self::Navigate(_) => "navigate",
            Self::CycleMascot => "cycle-mascot",
        }
    }
}

/// Sink for intents.
pub trait Dispatch<F> {
    /// Emit an intent. No result is consumed.
    fn dispatch(&mut self, intent: Intent<F>);
}

impl<F> Dispatch<F> for Vec<Intent<F>> {
    fn dispatch(&mut self, intent: Intent<F>) {
        self.push(intent);
    }
}
