//! Client-side routing: table lookup, guard evaluation and redirects.
//!
//! SYSTEM CONTEXT
//! ==============
//! `table` maps paths to views, `guards` decides each transition, and
//! [`Router`] applies decisions against the shared session. Components that
//! cannot own the router (session store, API client) request navigation
//! through a [`Navigator`]; the router drains those requests in order.

pub mod guards;
pub mod location;
pub mod table;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::sync::Arc;

use tokio::sync::mpsc;

pub use guards::{Guard, GuardDecision, home_view};
pub use location::{Location, LocationError, REDIRECT_QUERY_KEY};
pub use table::{Route, RouteMatch, RouteName};

use crate::state::session::{Role, SessionCell};

/// Redirect hops followed before a navigation is abandoned.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    InvalidLocation(#[from] LocationError),
    #[error("no route matches '{0}'")]
    NotFound(String),
    #[error("redirect loop while navigating to '{0}'")]
    RedirectLoop(String),
}

/// Cloneable handle for requesting a navigation from outside the router.
#[derive(Clone, Debug)]
pub struct Navigator {
    tx: mpsc::UnboundedSender<Location>,
}

impl Navigator {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Location>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a navigation. Dropped silently once the router is gone.
    pub fn push(&self, location: Location) {
        tracing::debug!(to = %location, "navigation requested");
        if let Err(e) = self.tx.send(location) {
            tracing::debug!(to = %e.0, "router gone, navigation dropped");
        }
    }
}

/// Result of a completed navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub location: Location,
    pub matched: RouteMatch,
    /// Guard redirects followed to get here.
    pub redirects: usize,
}

impl Resolved {
    #[must_use]
    pub fn name(&self) -> RouteName {
        self.matched.route.name
    }

    #[must_use]
    pub fn view(&self) -> &'static str {
        self.matched.route.view
    }
}

pub struct Router {
    session: Arc<SessionCell>,
    pending: mpsc::UnboundedReceiver<Location>,
    current: Option<Resolved>,
}

impl Router {
    #[must_use]
    pub fn new(session: Arc<SessionCell>, pending: mpsc::UnboundedReceiver<Location>) -> Self {
        Self { session, pending, current: None }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Resolved> {
        self.current.as_ref()
    }

    /// Navigate to an app-relative path such as `/company/4?tab=staff`.
    ///
    /// # Errors
    ///
    /// Returns a [`RouterError`] for malformed paths, unknown routes or
    /// redirect chains longer than [`MAX_REDIRECTS`].
    pub fn navigate(&mut self, raw: &str) -> Result<Resolved, RouterError> {
        let location = Location::parse(raw)?;
        self.navigate_to(location)
    }

    /// Navigate to `target`, following guard redirects.
    ///
    /// # Errors
    ///
    /// See [`Router::navigate`].
    pub fn navigate_to(&mut self, target: Location) -> Result<Resolved, RouterError> {
        let requested = target.full_path();
        let mut location = target;
        for hop in 0..=MAX_REDIRECTS {
            let matched = table::resolve(&location.path).ok_or_else(|| RouterError::NotFound(location.full_path()))?;
            let session = self.session.current();
            let decision = matched
                .route
                .guard
                .map_or(GuardDecision::Proceed, |guard| guard.evaluate(session.as_ref(), &location));

            match decision {
                GuardDecision::Proceed => {
                    let resolved = Resolved { location, matched, redirects: hop };
                    tracing::debug!(route = %resolved.name(), redirects = hop, "navigation complete");
                    self.current = Some(resolved.clone());
                    return Ok(resolved);
                }
                GuardDecision::RedirectTo(next) => {
                    tracing::debug!(from = %location, to = %next, "guard redirect");
                    location = next;
                }
                GuardDecision::ForceLogout => {
                    tracing::warn!(at = %location, "unrecognized session role, forcing logout");
                    self.session.clear();
                    location = Location::named(RouteName::Login);
                }
            }
        }
        Err(RouterError::RedirectLoop(requested))
    }

    /// Apply every queued navigation request. Returns the last resolution, if any.
    ///
    /// # Errors
    ///
    /// Stops at the first request that fails to resolve.
    pub fn process_pending(&mut self) -> Result<Option<Resolved>, RouterError> {
        let mut last = None;
        while let Ok(location) = self.pending.try_recv() {
            last = Some(self.navigate_to(location)?);
        }
        Ok(last)
    }

    /// Post-login landing: the remembered `redirect` target when the current
    /// view carries one, else the role's home view.
    ///
    /// # Errors
    ///
    /// See [`Router::navigate`].
    pub fn after_login(&mut self, role: Option<Role>) -> Result<Resolved, RouterError> {
        let remembered = self
            .current
            .as_ref()
            .and_then(|c| c.location.query_value(REDIRECT_QUERY_KEY))
            .and_then(|raw| Location::parse(raw).ok());
        let target = match (remembered, role) {
            (Some(loc), _) => loc,
            (None, Some(role)) => Location::named(home_view(role)),
            (None, None) => Location::named(RouteName::Home),
        };
        self.navigate_to(target)
    }
}
