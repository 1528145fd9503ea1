//! The search-index collaborator and the flattened document it receives.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Denormalized company summary published to the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
  pub uin:               i64,
  pub name:              String,
  /// Registration date as `YYYY-MM-DD`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub registration_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:           Option<String>,
}

impl SearchDocument {
  /// The index document key: the decimal UIN.
  pub fn key(&self) -> String { self.uin.to_string() }
}

/// Insert-or-update access to a named search index.
pub trait SearchIndex: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn upsert_document<'a>(
    &'a self,
    index: &'a str,
    key: &'a str,
    document: &'a SearchDocument,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
