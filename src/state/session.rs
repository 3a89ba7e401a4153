//! Session identity and the shared cell that mirrors it to persistence.
//!
//! DESIGN
//! ======
//! [`SessionCell`] is the single owner of the in-memory session. The API
//! client, session store and router hold it behind an `Arc`. Writes go to
//! persistence and memory together so a `user` entry never outlives its
//! `token` entry (and vice versa).

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::persistence::{SessionPersistence, TOKEN_KEY, USER_KEY, load_json, save_json};

/// Marketplace account role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    PetOwner,
    PetSitter,
    Company,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::PetOwner, Role::PetSitter, Role::Company];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PetOwner => "petowner",
            Self::PetSitter => "petsitter",
            Self::Company => "company",
        }
    }

    /// Parse the backend's wire value. Unknown values yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == raw)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown role '{s}' (expected petowner, petsitter or company)"))
    }
}

/// Nested staff/superuser flags reported by the login endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStatus {
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// The authenticated user as cached on the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Raw role string; see [`Session::role`].
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_status: Option<AdminStatus>,
}

impl Session {
    /// Recognized role, or `None` for a corrupted session.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    /// Explicit admin flag or nested staff/superuser flags.
    #[must_use]
    pub fn grants_admin(&self) -> bool {
        self.is_admin || self.admin_status.is_some_and(|s| s.is_staff || s.is_superuser)
    }
}

/// Shared in-memory session plus its persisted mirror.
pub struct SessionCell {
    persistence: Arc<dyn SessionPersistence>,
    current: Mutex<Option<Session>>,
}

impl fmt::Debug for SessionCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCell").field("current", &*self.lock()).finish_non_exhaustive()
    }
}

impl SessionCell {
    /// Create an unauthenticated cell. Call [`SessionCell::restore`] to load persisted state.
    #[must_use]
    pub fn new(persistence: Arc<dyn SessionPersistence>) -> Self {
        Self { persistence, current: Mutex::new(None) }
    }

    /// Snapshot of the in-memory session.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Persisted bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.persistence.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Load persisted `user` + `token`. Anything less than both valid entries
    /// clears persistence and memory.
    pub fn restore(&self) -> Option<Session> {
        let token = self.token();
        let user = load_json::<Session>(self.persistence.as_ref(), USER_KEY);
        let mut current = self.lock();
        if let (Some(_), Some(session)) = (token, user) {
            *current = Some(session.clone());
            return Some(session);
        }
        self.persistence.remove(USER_KEY);
        self.persistence.remove(TOKEN_KEY);
        *current = None;
        None
    }

    /// Persist and install a fully validated session.
    pub(crate) fn establish(&self, session: Session, token: &str) {
        let mut current = self.lock();
        self.persistence.set(TOKEN_KEY, token);
        save_json(self.persistence.as_ref(), USER_KEY, &session);
        *current = Some(session);
    }

    /// Apply `f` to the current session and persist the result.
    /// Returns `false` when there is no session to update.
    pub(crate) fn update(&self, f: impl FnOnce(&mut Session)) -> bool {
        let mut current = self.lock();
        let Some(session) = current.as_mut() else {
            return false;
        };
        f(session);
        save_json(self.persistence.as_ref(), USER_KEY, &*session);
        true
    }

    /// Drop the session from memory and persistence. Returns whether a
    /// session or token was present.
    pub fn clear(&self) -> bool {
        let mut current = self.lock();
        let had_state = current.is_some() || self.persistence.get(TOKEN_KEY).is_some();
        self.persistence.remove(USER_KEY);
        self.persistence.remove(TOKEN_KEY);
        *current = None;
        had_state
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
