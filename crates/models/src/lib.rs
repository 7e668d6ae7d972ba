//! Domain types for the field-sales console session: roles, the session
//! bundle itself and the backend payloads it is hydrated from.

pub mod errors;
pub mod role;
pub mod session;
pub mod profile;
pub mod token;

pub use errors::ModelError;
pub use profile::{Team, UserInfo};
pub use role::Role;
pub use session::{LoginStatus, Session};
pub use token::TokenReply;
