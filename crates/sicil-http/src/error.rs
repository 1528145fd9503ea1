//! Error types for the HTTP collaborators.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("request to {url} failed: {source}")]
  Request {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{url} returned {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
