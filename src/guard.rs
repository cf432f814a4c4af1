//! Navigation Guard
//!
//! Decides, for every route transition, whether to let it through or send
//! the user elsewhere. The session is passed in explicitly; the token and
//! role are read from its durable storage at decision time, so a login in
//! another tab is seen on the next navigation.

use crate::config::{AuthenticatedEntryPolicy, RouterConfig};
use crate::router::{normalize_path, RouteTable};
use crate::session::{DurableStorage, SessionStore};

/// Outcome of a guard decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Proceed to the requested path
    Allow,
    /// Go to `to` instead
    Redirect { to: String },
}

impl Navigation {
    pub fn redirect(to: impl Into<String>) -> Self {
        Navigation::Redirect { to: to.into() }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Navigation::Allow)
    }

    /// Redirect target, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Navigation::Allow => None,
            Navigation::Redirect { to } => Some(to),
        }
    }
}

/// Authentication and authorization gate evaluated before each transition
#[derive(Debug, Clone, Copy)]
pub struct NavigationGuard<'a> {
    routes: &'a RouteTable,
    config: &'a RouterConfig,
}

impl<'a> NavigationGuard<'a> {
    pub fn new(routes: &'a RouteTable, config: &'a RouterConfig) -> Self {
        Self { routes, config }
    }

    /// Whether `path` is the login page or the site root
    pub fn is_entry_path(&self, path: &str) -> bool {
        let path = normalize_path(path);
        path == normalize_path(&self.config.login_path)
            || path == normalize_path(&self.config.root_path)
    }

    /// Whether navigating to `path` signs the user out
    pub fn clears_session(&self, path: &str) -> bool {
        self.is_entry_path(path)
            && self.config.authenticated_entry == AuthenticatedEntryPolicy::ClearSession
    }

    /// Decide the transition to `to`.
    ///
    /// Entering the login or root page clears the session unless the
    /// configured policy redirects signed-in users instead.
    pub fn before_each<S: DurableStorage>(
        &self,
        to: &str,
        session: &mut SessionStore<S>,
    ) -> Navigation {
        let path = normalize_path(to);

        if self.clears_session(path) {
            if let Err(e) = session.clear_user_info() {
                tracing::warn!(error = %e, "Failed to clear session on entry page");
            }
            return self.decide(path, Navigation::Allow);
        }

        self.check(path, session)
    }

    /// Decide the transition to `to` without touching the session.
    ///
    /// Callers that skip [`before_each`](Self::before_each) must handle
    /// [`clears_session`](Self::clears_session) paths themselves.
    pub fn check<S: DurableStorage>(&self, to: &str, session: &SessionStore<S>) -> Navigation {
        let path = normalize_path(to);
        let entry = self.is_entry_path(path);

        let token = session.stored_token();
        let is_admin = session.stored_role().is_some_and(|role| role.is_admin());
        let matched = self.routes.matched(path);

        if token.is_none() && matched.iter().any(|record| record.meta.requires_auth) {
            return self.decide(path, Navigation::redirect(&self.config.login_path));
        }

        if !is_admin && matched.iter().any(|record| record.meta.requires_admin) {
            return self.decide(path, Navigation::redirect(&self.config.default_landing));
        }

        if token.is_some() && entry {
            let landing = if is_admin {
                &self.config.admin_landing
            } else {
                &self.config.default_landing
            };
            return self.decide(path, Navigation::redirect(landing));
        }

        self.decide(path, Navigation::Allow)
    }

    fn decide(&self, path: &str, decision: Navigation) -> Navigation {
        match &decision {
            Navigation::Allow => tracing::debug!(path, "Navigation allowed"),
            Navigation::Redirect { to } => tracing::debug!(path, to = %to, "Navigation redirected"),
        }
        decision
    }
}
