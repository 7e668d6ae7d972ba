//! Session lifecycle: token acquisition, persistence, propagation to the
//! HTTP client and profile/team hydration.

pub mod backend;
pub mod context;
pub mod errors;
pub mod http;
pub mod persistence;
pub mod store;

pub use backend::{HttpSessionBackend, RawReply, SessionBackend};
pub use context::SessionContext;
pub use errors::{BackendError, LoginError, SessionError};
pub use http::AuthorizedClient;
pub use persistence::{Hydration, PersistenceBridge};
pub use store::{LoginOutcome, SessionStore};
