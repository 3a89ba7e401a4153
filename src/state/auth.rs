//! Auth-session store for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the CLI and route guards to coordinate login redirects and
//! identity-dependent behavior. Login and register failures are absorbed here
//! and reported as values; nothing in this module panics or leaks a raw
//! transport error to the caller.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use serde_json::Value;

use super::session::{Role, Session, SessionCell};
use crate::net::api::{ApiClient, ApiError};
use crate::net::types::{NewUser, User};
use crate::router::{Location, Navigator, RouteName};

const GENERIC_REGISTRATION_ERROR: &str = "Registration failed";

/// Result of [`SessionStore::login`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Success { role: Option<Role>, is_admin: bool },
    Failure { error: String },
}

impl LoginOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Most specific message extracted from the backend's validation payload.
    #[error("{0}")]
    Validation(String),
}

#[derive(Clone)]
pub struct SessionStore {
    session: Arc<SessionCell>,
    api: ApiClient,
    navigator: Navigator,
}

impl SessionStore {
    #[must_use]
    pub fn new(session: Arc<SessionCell>, api: ApiClient, navigator: Navigator) -> Self {
        Self { session, api, navigator }
    }

    /// Reload the persisted session. Returns whether the user is authenticated.
    pub fn restore(&self) -> bool {
        match self.session.restore() {
            Some(session) => {
                tracing::info!(user_id = session.user_id, role = %session.role, "session restored");
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.session.current()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Admin if the session carries the explicit flag or staff/superuser status.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.current().is_some_and(|s| s.grants_admin())
    }

    /// Authenticate and install the session. State is written only after the
    /// backend response has been fully validated; any failure leaves the user
    /// logged out.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        match self.api.login(email, password).await {
            Ok(grant) => {
                let role = grant.session.role();
                let is_admin = grant.session.grants_admin();
                tracing::info!(user_id = grant.session.user_id, role = %grant.session.role, is_admin, "login succeeded");
                self.session.establish(grant.session, &grant.token);
                LoginOutcome::Success { role, is_admin }
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.session.clear();
                LoginOutcome::Failure { error: e.to_string() }
            }
        }
    }

    /// Create an account. Does not log the new user in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] carrying the most specific backend message.
    pub async fn register(&self, user: &NewUser) -> Result<User, AuthError> {
        match self.api.register(user).await {
            Ok(created) => {
                tracing::info!(user_id = created.id, role = %user.role, "registration succeeded");
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error = %e, "registration failed");
                Err(AuthError::Validation(registration_error_message(&e)))
            }
        }
    }

    /// Drop the session and return to the login view. Never fails.
    pub fn logout(&self) {
        if self.session.clear() {
            tracing::info!("logged out");
        }
        self.navigator.push(Location::named(RouteName::Login));
    }
}

/// Pick the most specific message from a failed registration.
///
/// Preference: the first field-level error list in the order the backend sent
/// it (`"field: a, b"`), then an `error`/`detail` string, then a plain-text body.
pub(crate) fn registration_error_message(err: &ApiError) -> String {
    match err.body() {
        Some(Value::Object(map)) => {
            let field_error = map.iter().find_map(|(field, value)| {
                let Value::Array(messages) = value else {
                    return None;
                };
                let joined = messages.iter().map(value_text).collect::<Vec<_>>().join(", ");
                Some(format!("{field}: {joined}"))
            });
            field_error
                .or_else(|| ["error", "detail"].iter().find_map(|k| map.get(*k).and_then(Value::as_str).map(str::to_owned)))
                .unwrap_or_else(|| GENERIC_REGISTRATION_ERROR.to_owned())
        }
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(_) => GENERIC_REGISTRATION_ERROR.to_owned(),
        None => format!("{GENERIC_REGISTRATION_ERROR}: {err}"),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
