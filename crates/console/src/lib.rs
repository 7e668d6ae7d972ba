pub mod errors;
pub mod guard;
pub mod navigation;
pub mod routes;
pub mod startup;

pub use startup::{App, Screen};
