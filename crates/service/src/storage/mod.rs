//! Durable storage for the session
//!
//! A JSON file-backed map plus the `DurableStorage` seam the persistence
//! bridge writes through, with an in-memory implementation for tests.

pub mod durable;
pub mod json_map_store;

pub use durable::{DurableStorage, FileStorage, MemoryStorage};
