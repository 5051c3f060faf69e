//! Route definitions and the navigation guard.
//!
//! Pure logic, no DOM access. The browser router asks [`guard`] before it
//! mounts a view, so a protected page never starts loading data for an
//! anonymous visitor.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// Login page (default route)
    #[default]
    Login,
    Dashboard,
    Admissions,
    Receptions,
    ProductRequests,
    Reports,
    NotFound,
}

impl AppRoute {
    /// Pages listed in the navigation bar, in display order.
    pub const NAVIGATION: [AppRoute; 5] = [
        AppRoute::Dashboard,
        AppRoute::Admissions,
        AppRoute::Receptions,
        AppRoute::ProductRequests,
        AppRoute::Reports,
    ];

    /// Parses a URL path. Trailing slashes and query strings are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/admissions" => Self::Admissions,
            "/receptions" => Self::Receptions,
            "/product-requests" => Self::ProductRequests,
            "/reports" => Self::Reports,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Dashboard => "/dashboard",
            Self::Admissions => "/admissions",
            Self::Receptions => "/receptions",
            Self::ProductRequests => "/product-requests",
            Self::Reports => "/reports",
            Self::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Dashboard => "Dashboard",
            Self::Admissions => "Admissions",
            Self::Receptions => "Receptions",
            Self::ProductRequests => "Product requests",
            Self::Reports => "Reports",
            Self::NotFound => "Not found",
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// Signed-in users are sent away from these routes.
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// Outcome of checking a navigation target against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow(AppRoute),
    Redirect(AppRoute),
}

impl RouteDecision {
    /// The route that ends up displayed.
    pub fn route(&self) -> AppRoute {
        match self {
            RouteDecision::Allow(route) | RouteDecision::Redirect(route) => *route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, RouteDecision::Redirect(_))
    }
}

pub fn guard(target: AppRoute, is_authenticated: bool) -> RouteDecision {
    if target.requires_auth() && !is_authenticated {
        RouteDecision::Redirect(AppRoute::auth_failure_redirect())
    } else if target.should_redirect_when_authenticated() && is_authenticated {
        RouteDecision::Redirect(AppRoute::auth_success_redirect())
    } else {
        RouteDecision::Allow(target)
    }
}
