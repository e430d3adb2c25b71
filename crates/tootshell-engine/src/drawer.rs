//! Compose drawer view state.
//!
//! Which parts of the compose/search drawer are visible depends on the
//! effective layout and a handful of snapshot flags.

use crate::intent::{Dispatch, Intent};
use crate::state::StateSnapshot;

/// Number of drawer mascots to cycle through.
pub const MASCOT_COUNT: u32 = 4;

/// Derived visibility of the drawer's parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerView {
    /// Header with navigation links and the settings button.
    pub show_header: bool,
    /// Search box.
    pub show_search: bool,
    /// Composer form.
    pub show_composer: bool,
    /// Search results panel (rendered but possibly hidden).
    pub show_results: bool,
    /// Search results are visible.
    pub results_visible: bool,
    /// Unread count on the notifications link.
    pub notifications_badge: Option<u32>,
    /// Mascot below the composer.
    pub mascot: Option<u32>,
}

impl DrawerView {
    /// Derive the drawer from the snapshot.
    ///
    /// `is_search_page` is set when the drawer is rendered as the
    /// stand-alone search pane.
    pub fn derive(snapshot: &StateSnapshot, multi_column: bool, is_search_page: bool) -> Self {
        let badge = snapshot.show_notifications_badge && snapshot.unread_notifications > 0;

        Self {
            show_header: multi_column,
            show_search: multi_column || is_search_page,
            show_composer: !is_search_page,
            show_results: multi_column || is_search_page,
            results_visible: snapshot.search_submitted && !snapshot.search_hidden,
            notifications_badge: (multi_column && badge).then_some(snapshot.unread_notifications),
            mascot: (multi_column && !is_search_page).then_some(snapshot.mascot % MASCOT_COUNT),
        }
    }
}

/// Settings button in the drawer header.
pub fn open_settings<F>(dispatch: &mut dyn Dispatch<F>) {
    dispatch.dispatch(Intent::OpenSettingsModal);
}

/// Click on the drawer mascot.
pub fn cycle_mascot<F>(dispatch: &mut dyn Dispatch<F>) {
    dispatch.dispatch(Intent::CycleMascot);
}
