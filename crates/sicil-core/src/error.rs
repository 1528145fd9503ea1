//! Error types for `sicil-core`.

use thiserror::Error;

/// A stored value could not be converted into the field type it backs.
#[derive(Debug, Error)]
pub enum ValueError {
  #[error("expected {expected}, found {found}")]
  Mismatch {
    expected: &'static str,
    found:    &'static str,
  },

  #[error("invalid timestamp {0:?}")]
  Timestamp(String),

  #[error("integer {0} out of range")]
  OutOfRange(i64),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{table}.{column}: {source}")]
  Column {
    table:  &'static str,
    column: &'static str,
    #[source]
    source: ValueError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
