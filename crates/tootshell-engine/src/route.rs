//! URL routing for the column area.
//!
//! Routes [`Location`] paths to the [`Pane`] rendered in the routed column.
//! Bindings are tried in order and the first match wins.

use std::collections::BTreeMap;

/// Path the root redirects to.
pub const ONBOARDING_PATH: &str = "/getting-started";

/// Content panes the router can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    GettingStarted,
    HomeTimeline,
    PublicTimeline,
    CommunityTimeline,
    HashtagTimeline,
    Notifications,
    FavouritedStatuses,
    Compose,
    Status,
    Reblogs,
    Favourites,
    AccountTimeline,
    Followers,
    Following,
    AccountGallery,
    FollowRequests,
    Blocks,
    Mutes,
    NotFound,
}

impl Pane {
    /// Column heading for this pane.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::GettingStarted => "Getting started",
            Self::HomeTimeline => "Home",
            Self::PublicTimeline => "Federated timeline",
            Self::CommunityTimeline => "Local timeline",
            Self::HashtagTimeline => "Hashtag",
            Self::Notifications => "Notifications",
            Self::FavouritedStatuses => "Favourites",
            Self::Compose => "Compose",
            Self::Status => "Toot",
            Self::Reblogs => "Boosted by",
            Self::Favourites => "Favourited by",
            Self::AccountTimeline => "Account",
            Self::Followers => "Followers",
            Self::Following => "Follows",
            Self::AccountGallery => "Media",
            Self::FollowRequests => "Follow requests",
            Self::Blocks => "Blocked users",
            Self::Mutes => "Muted users",
            Self::NotFound => "Not found",
        }
    }
}

/// One `(pattern, exact, pane)` entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBinding {
    pattern: &'static str,
    exact: bool,
    pane: Pane,
}

impl RouteBinding {
    /// A binding that also matches deeper paths.
    pub const fn prefix(pattern: &'static str, pane: Pane) -> Self {
        Self {
            pattern,
            exact: false,
            pane,
        }
    }

    /// A binding that only matches the whole path.
    pub const fn exact(pattern: &'static str, pane: Pane) -> Self {
        Self {
            pattern,
            exact: true,
            pane,
        }
    }

    /// The path pattern.
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Whether only whole-path matches count.
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// The pane rendered on match.
    pub fn pane(&self) -> Pane {
        self.pane
    }

    /// Match `path`, capturing `:name` segments.
    ///
    /// Static segments compare ASCII case-insensitively; captured values
    /// keep their case.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let mut path_segments = segments(path);
        let mut params = BTreeMap::new();

        for pattern_segment in segments(self.pattern) {
            let segment = path_segments.next()?;
            if let Some(name) = pattern_segment.strip_prefix(':') {
                params.insert(name.to_string(), segment.to_string());
            } else if !pattern_segment.eq_ignore_ascii_case(segment) {
                return None;
            }
        }

        if self.exact && path_segments.next().is_some() {
            return None;
        }

        Some(params)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Result of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Navigate elsewhere instead of rendering.
    Redirect(&'static str),
    /// Render a pane.
    Render(RouteMatch),
}

/// A pane selected for a path, with captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Selected pane.
    pub pane: Pane,
    /// Captured `:name` parameters.
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    /// Look up a captured parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Ordered route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    bindings: Vec<RouteBinding>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![
            RouteBinding::prefix("/getting-started", Pane::GettingStarted),
            RouteBinding::prefix("/timelines/home", Pane::HomeTimeline),
            RouteBinding::exact("/timelines/public", Pane::PublicTimeline),
            RouteBinding::prefix("/timelines/public/local", Pane::CommunityTimeline),
            RouteBinding::prefix("/timelines/tag/:id", Pane::HashtagTimeline),
            RouteBinding::prefix("/notifications", Pane::Notifications),
            RouteBinding::prefix("/favourites", Pane::FavouritedStatuses),
            RouteBinding::prefix("/statuses/new", Pane::Compose),
            RouteBinding::exact("/statuses/:statusId", Pane::Status),
            RouteBinding::prefix("/statuses/:statusId/reblogs", Pane::Reblogs),
            RouteBinding::prefix("/statuses/:statusId/favourites", Pane::Favourites),
            RouteBinding::exact("/accounts/:accountId", Pane::AccountTimeline),
            RouteBinding::prefix("/accounts/:accountId/followers", Pane::Followers),
            RouteBinding::prefix("/accounts/:accountId/following", Pane::Following),
            RouteBinding::prefix("/accounts/:accountId/media", Pane::AccountGallery),
            RouteBinding::prefix("/follow_requests", Pane::FollowRequests),
            RouteBinding::prefix("/blocks", Pane::Blocks),
            RouteBinding::prefix("/mutes", Pane::Mutes),
        ])
    }
}

impl RouteTable {
    /// Build a table from ordered bindings.
    pub fn new(bindings: Vec<RouteBinding>) -> Self {
        Self { bindings }
    }

    /// The bindings in match order.
    pub fn bindings(&self) -> &[RouteBinding] {
        &self.bindings
    }

    /// Resolve `path`. The root always redirects to onboarding; unmatched
    /// paths render [`Pane::NotFound`].
    pub fn resolve(&self, path: &str) -> RouteOutcome {
        if segments(path).next().is_none() {
            return RouteOutcome::Redirect(ONBOARDING_PATH);
        }

        let found = self.bindings.iter().find_map(|binding| {
            binding.matches(path).map(|params| RouteMatch {
                pane: binding.pane,
                params,
            })
        });

        RouteOutcome::Render(found.unwrap_or(RouteMatch {
            pane: Pane::NotFound,
            params: BTreeMap::new(),
        }))
    }

    /// Resolve `path`, following a root redirect.
    pub fn route(&self, path: &str) -> RouteMatch {
        match self.resolve(path) {
            RouteOutcome::Render(found) => found,
            RouteOutcome::Redirect(target) => match self.resolve(target) {
                RouteOutcome::Render(found) => found,
                RouteOutcome::Redirect(_) => RouteMatch {
                    pane: Pane::NotFound,
                    params: BTreeMap::new(),
                },
            },
        }
    }
}

/// The current path of the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
}

impl Default for Location {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Location {
    /// Create a location for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether moving from `prev` to `next` changed the routed content.
    ///
    /// Leaving the root or staying on the same path does not count.
    pub fn content_changed(prev: &Location, next: &Location) -> bool {
        prev.path != next.path && prev.path != "/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pane(path: &str) -> Pane {
        RouteTable::default().route(path).pane
    }

    #[test]
    fn test_root_redirects_to_onboarding() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/"), RouteOutcome::Redirect(ONBOARDING_PATH));
        assert_eq!(table.resolve(""), RouteOutcome::Redirect(ONBOARDING_PATH));
        assert_eq!(pane("/"), Pane::GettingStarted);
    }

    #[test]
    fn test_every_default_binding_routes() {
        let cases = [
            ("/getting-started", Pane::GettingStarted),
            ("/timelines/home", Pane::HomeTimeline),
            ("/timelines/public", Pane::PublicTimeline),
            ("/timelines/public/local", Pane::CommunityTimeline),
            ("/timelines/tag/rust", Pane::HashtagTimeline),
            ("/notifications", Pane::Notifications),
            ("/favourites", Pane::FavouritedStatuses),
            ("/statuses/new", Pane::Compose),
            ("/statuses/42", Pane::Status),
            ("/statuses/42/reblogs", Pane::Reblogs),
            ("/statuses/42/favourites", Pane::Favourites),
            ("/accounts/7", Pane::AccountTimeline),
            ("/accounts/7/followers", Pane::Followers),
            ("/accounts/7/following", Pane::Following),
            ("/accounts/7/media", Pane::AccountGallery),
            ("/follow_requests", Pane::FollowRequests),
            ("/blocks", Pane::Blocks),
            ("/mutes", Pane::Mutes),
        ];

        for (path, expected) in cases {
            assert_eq!(pane(path), expected, "path {path}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        // "new" would also satisfy the exact :statusId binding further down.
        assert_eq!(pane("/statuses/new"), Pane::Compose);
    }

    #[test]
    fn test_exact_binding_rejects_deeper_paths() {
        assert_eq!(pane("/timelines/public/remote"), Pane::NotFound);
        assert_eq!(pane("/accounts/7/lists"), Pane::NotFound);
    }

    #[test]
    fn test_prefix_binding_accepts_deeper_paths_and_trailing_slash() {
        assert_eq!(pane("/notifications/mentions"), Pane::Notifications);
        assert_eq!(pane("/timelines/public/"), Pane::PublicTimeline);
    }

    #[test]
    fn test_prefix_matches_whole_segments_only() {
        assert_eq!(pane("/blockset"), Pane::NotFound);
    }

    #[test]
    fn test_params_are_captured() {
        let found = RouteTable::default().route("/statuses/109/favourites");
        assert_eq!(found.param("statusId"), Some("109"));
        assert_eq!(found.param("accountId"), None);
    }

    #[test]
    fn test_static_segments_ignore_case() {
        assert_eq!(pane("/Timelines/Home"), Pane::HomeTimeline);
        assert_eq!(pane("/NOTIFICATIONS"), Pane::Notifications);

        let found = RouteTable::default().route("/Statuses/AbC/Reblogs");
        assert_eq!(found.param("statusId"), Some("AbC"));
    }

    #[test]
    fn test_unmatched_is_not_found() {
        assert_eq!(pane("/nowhere"), Pane::NotFound);
    }

    #[test]
    fn test_content_changed() {
        let root = Location::default();
        let home = Location::new("/timelines/home");
        let mutes = Location::new("/mutes");

        assert!(!Location::content_changed(&root, &home));
        assert!(!Location::content_changed(&home, &home));
        assert!(Location::content_changed(&home, &mutes));
    }
}
