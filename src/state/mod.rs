//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `persistence` is the storage capability, `session` the shared identity
//! cell, and `auth` the store that drives login/register/logout.

pub mod auth;
pub mod persistence;
pub mod session;

pub use auth::{AuthError, LoginOutcome, SessionStore};
pub use persistence::{FilePersistence, MemoryPersistence, SessionPersistence};
pub use session::{AdminStatus, Role, Session, SessionCell};
