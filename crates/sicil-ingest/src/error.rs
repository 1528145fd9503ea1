//! The ingestion error taxonomy.

use thiserror::Error;

/// A boxed error from a collaborator (store, search index, scraper).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum IngestError {
  /// The scraper was unreachable or rejected the request. Raised before any
  /// transaction is opened.
  #[error("fetching {query:?} failed: {source}")]
  Fetch {
    query:  String,
    #[source]
    source: BoxError,
  },

  /// A store operation failed; the transaction has been rolled back.
  #[error("{step} failed: {source}")]
  Persistence {
    /// The operation and table, e.g. `create company_medias`.
    step:   String,
    #[source]
    source: BoxError,
  },

  /// A strictly-parsed numeric field was malformed.
  #[error("field {field} has unparseable value {value:?}")]
  Parse {
    field: &'static str,
    value: String,
  },

  /// The search index rejected a document. Relational rows are already
  /// committed; the document stays in the outbox.
  #[error("publishing search document {key} failed: {source}")]
  IndexSync {
    key:    String,
    #[source]
    source: BoxError,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl IngestError {
  pub(crate) fn persistence(
    step: impl Into<String>,
    source: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self::Persistence { step: step.into(), source: Box::new(source) }
  }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
