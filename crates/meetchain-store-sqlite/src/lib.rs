//! SQLite backend for the MeetChain roster store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The database is used as a
//! plain key-value store: the entire roster lives as one JSON blob under
//! one fixed key.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
