//! The normalization engine: turns one scraped [`CompanyRecord`] into rows of
//! the registry schema, atomically and idempotently, then publishes a search
//! projection.
//!
//! Layers, leaves first:
//!
//! - [`cache`]: per-call snapshot of every table, keyed by natural key.
//! - [`reference`]: find-or-create for lookup tables.
//! - [`composite`]: link-once and merge upserts for composite-keyed rows.
//! - [`normalize`]: walks the record in dependency order.
//! - [`projection`]: search documents, the outbox, and publishing.
//! - [`coordinator`]: fetch, one transaction, commit, then publish.
//!
//! [`CompanyRecord`]: sicil_core::record::CompanyRecord

pub mod cache;
pub mod composite;
pub mod coordinator;
pub mod error;
pub mod fields;
pub mod normalize;
pub mod projection;
pub mod reference;

pub use coordinator::{IngestReport, Ingestor};
pub use error::{IngestError, Result};
pub use normalize::{Normalized, normalize};

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;
