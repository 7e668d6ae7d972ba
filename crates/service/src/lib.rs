//! Client-side session layer for the field-sales backend.
//! - `session`: store, persistence bridge, authorized HTTP client, backend gateway.
//! - `storage`: durable key/value storage surviving restarts.
//! - `observability`: Prometheus counters for the login lifecycle.

pub mod errors;
pub mod observability;
pub mod session;
pub mod storage;

pub use session::{
    AuthorizedClient, HttpSessionBackend, PersistenceBridge, SessionBackend, SessionContext, SessionStore,
};
