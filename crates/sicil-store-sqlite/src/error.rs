//! Error type for `sicil-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] sicil_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A column came back with a storage class the schema never produces.
  #[error("unsupported value in {table}: {detail}")]
  Unsupported {
    table:  &'static str,
    detail: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
