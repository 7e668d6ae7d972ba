//! Ambient helpers shared by the console crates: tracing setup and
//! runtime directory checks.

pub mod env;
pub mod utils;
