//! SQLite backend for the sicil registry store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. A whole normalization runs inside one
//! [`tokio_rusqlite::Connection::call`], which is what makes the transaction
//! scope synchronous.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteStore, SqliteTx};
