//! Route table and the authentication guard in front of private pages.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardSection {
    Display,
    Insert,
    Edit,
    Use,
}

impl DashboardSection {
    pub const ALL: [DashboardSection; 4] = [
        DashboardSection::Display,
        DashboardSection::Insert,
        DashboardSection::Edit,
        DashboardSection::Use,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            DashboardSection::Display => "display",
            DashboardSection::Insert => "insert",
            DashboardSection::Edit => "edit",
            DashboardSection::Use => "use",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardSection::Display => "Display",
            DashboardSection::Insert => "Insert",
            DashboardSection::Edit => "Edit",
            DashboardSection::Use => "Use",
        }
    }

    fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.slug() == slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    About,
    /// `None` is the bare `/dashboard` path.
    Dashboard(Option<DashboardSection>),
}

/// Outcome of matching a browser path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch {
    Matched(Route),
    /// The path is unknown; the browser should be sent to the given route.
    Redirect(Route),
}

impl RouteMatch {
    pub fn route(self) -> Route {
        match self {
            RouteMatch::Matched(route) | RouteMatch::Redirect(route) => route,
        }
    }
}

impl Route {
    /// Matches a path; query strings, fragments and trailing slashes are ignored.
    pub fn resolve(path: &str) -> RouteMatch {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => RouteMatch::Matched(Route::Home),
            ["login"] => RouteMatch::Matched(Route::Login),
            ["signup"] => RouteMatch::Matched(Route::Signup),
            ["about"] => RouteMatch::Matched(Route::About),
            ["dashboard"] => RouteMatch::Matched(Route::Dashboard(None)),
            ["dashboard", section] => match DashboardSection::from_slug(section) {
                Some(section) => RouteMatch::Matched(Route::Dashboard(Some(section))),
                None => RouteMatch::Redirect(Route::Dashboard(None)),
            },
            _ => RouteMatch::Redirect(Route::Home),
        }
    }

    pub fn path(self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::About => "/about".to_string(),
            Route::Dashboard(None) => "/dashboard".to_string(),
            Route::Dashboard(Some(section)) => format!("/dashboard/{}", section.slug()),
        }
    }

    pub fn requires_auth(self) -> bool {
        matches!(self, Route::About | Route::Dashboard(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// ===== AUTH =====

/// What a route guard needs to know about the current user.
pub trait AuthState {
    fn is_authenticated(&self) -> bool;
    fn is_loading(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Loading,
    SignedOut,
    SignedIn {
        user: String,
    },
}

impl AuthState for AuthStatus {
    fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::SignedIn { .. })
    }

    fn is_loading(&self) -> bool {
        matches!(self, AuthStatus::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    ShowLoading,
    Redirect(Route),
}

pub fn guard(route: Route, auth: &impl AuthState) -> GuardDecision {
    if !route.requires_auth() {
        return GuardDecision::Render;
    }
    if auth.is_loading() {
        GuardDecision::ShowLoading
    } else if auth.is_authenticated() {
        GuardDecision::Render
    } else {
        GuardDecision::Redirect(Route::Login)
    }
}

/// Main area of the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellContent {
    /// Chart panel stacked above the table panel.
    Composite,
    Nested(DashboardSection),
}

impl ShellContent {
    pub fn for_section(section: Option<DashboardSection>) -> Self {
        match section {
            None | Some(DashboardSection::Display) => ShellContent::Composite,
            Some(section) => ShellContent::Nested(section),
        }
    }
}
