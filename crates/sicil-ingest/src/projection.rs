//! The search projection and its outbox.
//!
//! Documents are built inside the ingestion transaction and written to the
//! `search_outbox` table alongside the relational rows, one row per document
//! key. Only after commit are they published. A row is marked published once
//! the index has accepted the document it holds, so a failed publish can be
//! retried by [`crate::Ingestor::flush_outbox`].
//!
//! Rows are never deleted: a later ingestion of the same key rewrites the row
//! and clears the mark, and an acknowledgement only marks the row when it
//! still holds the document that was published.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sicil_core::{
  entity::Stored,
  record::Unit,
  search::{SearchDocument, SearchIndex},
  store::StoreTx,
  tables::SearchOutboxEntry,
};

use crate::{IngestError, Result};

/// A document committed to the outbox and awaiting publication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingProjection {
  /// Surrogate id of the outbox row.
  pub outbox_id: i64,
  pub key:       String,
  pub document:  SearchDocument,
}

/// Build the search document for `unit`, or `None` when its UIN is not a
/// decimal integer and so cannot key the index.
pub fn project(unit: &Unit, uin: &str) -> Option<SearchDocument> {
  let Ok(uin) = uin.parse::<i64>() else {
    tracing::debug!(uin, "non-numeric UIN, not indexed");
    return None;
  };

  Some(SearchDocument {
    uin,
    name: unit.name.clone().unwrap_or_default(),
    registration_date: unit
      .reg_date
      .map(|date| date.format("%Y-%m-%d").to_string()),
    address: unit.address.clone().filter(|a| !a.is_empty()),
  })
}

/// The outbox row carrying `document`.
pub fn outbox_entry(
  document: &SearchDocument,
  now: DateTime<Utc>,
) -> Result<SearchOutboxEntry> {
  Ok(SearchOutboxEntry {
    document_key: document.key(),
    document:     serde_json::to_string(document)?,
    relevance:    now,
    published_at: None,
  })
}

/// Decode a stored outbox row back into a publishable projection.
pub fn pending(stored: Stored<SearchOutboxEntry>) -> Result<PendingProjection> {
  Ok(PendingProjection {
    outbox_id: stored.id,
    document:  serde_json::from_str(&stored.row.document)?,
    key:       stored.row.document_key,
  })
}

/// Mark outbox row `outbox_id` published, provided it still holds
/// `document` (its JSON encoding).
///
/// Returns the row when a later ingestion has rewritten it in the meantime:
/// the index may now hold an older document than the row, so the caller has
/// to publish the row's current document as well.
pub fn mark_published<T: StoreTx>(
  tx: &mut T,
  outbox_id: i64,
  document: &str,
  now: DateTime<Utc>,
) -> Result<Option<Stored<SearchOutboxEntry>>, T::Error> {
  let current = tx
    .scan::<SearchOutboxEntry>()?
    .into_iter()
    .find(|stored| stored.id == outbox_id);

  match current {
    Some(stored) if stored.row.document != document => Ok(Some(stored)),
    Some(mut stored) if stored.row.published_at.is_none() => {
      stored.row.published_at = Some(now);
      tx.update(stored.id, &stored.row)?;
      Ok(None)
    }
    _ => Ok(None),
  }
}

/// Upsert one document into the named index.
pub async fn publish<I: SearchIndex>(
  index: &I,
  index_name: &str,
  projection: &PendingProjection,
) -> Result<()> {
  index
    .upsert_document(index_name, &projection.key, &projection.document)
    .await
    .map_err(|e| IngestError::IndexSync {
      key:    projection.key.clone(),
      source: Box::new(e),
    })
}
