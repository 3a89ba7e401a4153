//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` exposes one method per backend action, `transport` abstracts the
//! HTTP round trip, and `types` defines the shared wire schema.

pub mod api;
pub mod transport;
pub mod types;

pub use api::{ApiClient, ApiError};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
