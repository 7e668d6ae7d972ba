use models::Session;
use tracing::info;

use crate::routes::{self, LANDING};

/// What the shell should show for a requested route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Login form, carrying the last login error if any.
    Login { error: Option<String> },
    Page(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardDecision {
    pub view: View,
    /// Set when the token just disappeared away from the landing route.
    pub redirect: Option<String>,
}

impl GuardDecision {
    pub fn shows_login(&self) -> bool {
        matches!(self.view, View::Login { .. })
    }
}

/// Gates every page behind token presence.
///
/// Only presence is checked: an expired token still renders pages until a
/// request comes back 401.
#[derive(Debug, Default)]
pub struct RouteGuard {
    had_token: bool,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, session: &Session, route: &str) -> GuardDecision {
        let route = routes::normalize(route);
        let has_token = session.is_authenticated();
        let token_lost = self.had_token && !has_token;
        self.had_token = has_token;

        if has_token {
            return GuardDecision { view: View::Page(route), redirect: None };
        }

        let redirect = (token_lost && !routes::is_landing(&route)).then(|| LANDING.to_string());
        if redirect.is_some() {
            info!(from = %route, "session ended; redirecting to landing");
        }
        GuardDecision { view: View::Login { error: session.error.clone() }, redirect }
    }
}
