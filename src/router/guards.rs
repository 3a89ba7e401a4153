//! Route guards evaluated before a navigation completes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guards are pure: they see a session snapshot and the target location and
//! return a [`GuardDecision`]. The router applies the decision, so the same
//! functions serve the CLI, tests and any other front end.
//!
//! ROLE HOMES
//! ==========
//! The role-to-home mapping is total over [`Role`]. A session whose role
//! string does not parse is treated as corrupted, never as a fourth role.

#[cfg(test)]
#[path = "guards_test.rs"]
mod guards_test;

use super::location::Location;
use super::table::RouteName;
use crate::state::session::{Role, Session};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    RedirectTo(Location),
    /// Session is unusable: clear it and land on the login view.
    ForceLogout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    RequireAuth,
    RequireRole(Role),
    RedirectLoggedIn,
}

impl Guard {
    #[must_use]
    pub fn evaluate(self, session: Option<&Session>, target: &Location) -> GuardDecision {
        match self {
            Self::RequireAuth => require_auth(session, target),
            Self::RequireRole(role) => require_role(role, session, target),
            Self::RedirectLoggedIn => redirect_logged_in(session, target),
        }
    }
}

/// Landing view for each role.
#[must_use]
pub fn home_view(role: Role) -> RouteName {
    match role {
        Role::PetOwner => RouteName::PetOwner,
        Role::PetSitter => RouteName::PetSitter,
        Role::Company => RouteName::Company,
    }
}

/// Any authenticated user may pass; everyone else goes to login.
#[must_use]
pub fn require_auth(session: Option<&Session>, target: &Location) -> GuardDecision {
    match session {
        Some(_) => GuardDecision::Proceed,
        None => GuardDecision::RedirectTo(Location::login_redirect(target)),
    }
}

/// Only `required` may pass. Other roles are sent to their own home view.
#[must_use]
pub fn require_role(required: Role, session: Option<&Session>, target: &Location) -> GuardDecision {
    let Some(session) = session else {
        return GuardDecision::RedirectTo(Location::login_redirect(target));
    };
    match session.role() {
        Some(role) if role == required => GuardDecision::Proceed,
        Some(role) => GuardDecision::RedirectTo(Location::named(home_view(role))),
        None => GuardDecision::ForceLogout,
    }
}

/// Keep authenticated users off login/register style views.
#[must_use]
pub fn redirect_logged_in(session: Option<&Session>, _target: &Location) -> GuardDecision {
    match session.and_then(Session::role) {
        Some(role) => GuardDecision::RedirectTo(Location::named(home_view(role))),
        None => GuardDecision::Proceed,
    }
}
