//! # petatwork
//!
//! Client core for the Pet at Work marketplace (pet owners, pet sitters and
//! companies). Owns the session lifecycle, the REST gateway to the backend,
//! role-based navigation guards and locale selection.
//!
//! SYSTEM CONTEXT
//! ==============
//! A route change runs the matching guard against the current session.
//! Session mutations (login, register, logout) go through the API client,
//! which attaches the bearer token and forces a logout when the backend
//! rejects it. `app::App` wires these together behind one context object.

pub mod app;
pub mod config;
pub mod net;
pub mod router;
pub mod state;
pub mod util;
