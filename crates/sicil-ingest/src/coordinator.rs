//! [`Ingestor`]: one ingestion call end to end.
//!
//! Fetch the record, normalize it inside a single transaction, and only after
//! commit publish the search projections. A fetch failure opens no
//! transaction; a normalization failure rolls everything back and publishes
//! nothing; a publish failure leaves the committed rows in place and the
//! document pending in the outbox.

use chrono::Utc;
use serde::Serialize;
use sicil_core::{
  entity::Stored,
  search::SearchIndex,
  source::RecordSource,
  store::{RegistryStore, StoreTx},
  tables::SearchOutboxEntry,
};
use uuid::Uuid;

use crate::{
  IngestError, Result,
  normalize::{NormalizedCompany, WriteStats, normalize},
  projection::{PendingProjection, mark_published, pending, publish},
};

/// Summary of a successful [`Ingestor::ingest`] call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
  pub run_id:        Uuid,
  pub query:         String,
  pub companies:     Vec<NormalizedCompany>,
  pub skipped_units: usize,
  pub stats:         WriteStats,
  /// Document keys accepted by the search index.
  pub published:     Vec<String>,
}

/// Ties the record source, the relational store and the search index
/// together.
pub struct Ingestor<S, I, R> {
  store:      S,
  index:      I,
  source:     R,
  index_name: String,
}

impl<S, I, R> Ingestor<S, I, R>
where
  S: RegistryStore,
  I: SearchIndex,
  R: RecordSource,
{
  pub fn new(store: S, index: I, source: R, index_name: impl Into<String>) -> Self {
    Self { store, index, source, index_name: index_name.into() }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn index(&self) -> &I { &self.index }

  pub fn source(&self) -> &R { &self.source }

  /// Fetch the record for `query` (a company name or UIN) and persist it.
  ///
  /// Re-running with the same record leaves the relational state unchanged
  /// apart from `relevance` timestamps.
  #[tracing::instrument(skip(self), fields(run_id = tracing::field::Empty))]
  pub async fn ingest(&self, query: &str) -> Result<IngestReport> {
    let run_id = Uuid::new_v4();
    tracing::Span::current().record("run_id", tracing::field::display(run_id));
    let query = query.trim();

    let record = self.source.fetch(query).await.map_err(|e| {
      IngestError::Fetch { query: query.to_owned(), source: Box::new(e) }
    })?;
    tracing::info!(units = record.units.len(), "record fetched");

    let now = Utc::now();
    let outcome = self
      .store
      .transaction(move |tx| normalize(tx, &record, now))
      .await
      .map_err(|e| IngestError::persistence("transaction", e))?;
    let normalized = outcome.inspect_err(|e| {
      tracing::warn!(error = %e, "ingestion rolled back");
    })?;
    tracing::info!(
      companies = normalized.companies.len(),
      skipped = normalized.skipped_units,
      "ingestion committed"
    );

    let published = self.publish_all(normalized.projections).await?;

    Ok(IngestReport {
      run_id,
      query: query.to_owned(),
      companies: normalized.companies,
      skipped_units: normalized.skipped_units,
      stats: normalized.stats,
      published,
    })
  }

  /// Retry every document still pending in the outbox. Returns how many
  /// were published.
  #[tracing::instrument(skip(self))]
  pub async fn flush_outbox(&self) -> Result<usize> {
    let rows = self
      .store
      .transaction(|tx| tx.scan::<SearchOutboxEntry>())
      .await
      .map_err(|e| IngestError::persistence("transaction", e))?
      .map_err(|e| IngestError::persistence("scan search_outbox", e))?;

    let pending = rows
      .into_iter()
      .filter(|stored| stored.row.published_at.is_none())
      .map(pending)
      .collect::<Result<Vec<_>>>()?;
    tracing::info!(pending = pending.len(), "flushing search outbox");
    Ok(self.publish_all(pending).await?.len())
  }

  /// Publish each projection until its outbox row is acknowledged. Every
  /// projection is attempted; the first failure is returned afterwards.
  async fn publish_all(&self, projections: Vec<PendingProjection>) -> Result<Vec<String>> {
    let mut published = Vec::with_capacity(projections.len());
    let mut failure = None;

    for projection in projections {
      let key = projection.key.clone();
      match self.publish_latest(projection).await {
        Ok(()) => published.push(key),
        Err(e) => {
          tracing::warn!(%key, error = %e, "publish failed, kept in outbox");
          failure.get_or_insert(e);
        }
      }
    }

    match failure {
      Some(e) => Err(e),
      None => Ok(published),
    }
  }

  /// Publish `projection`, then whatever its outbox row holds instead, until
  /// the row is acknowledged with the document the index last received.
  async fn publish_latest(&self, mut projection: PendingProjection) -> Result<()> {
    loop {
      publish(&self.index, &self.index_name, &projection).await?;
      match self.acknowledge(&projection).await? {
        None => return Ok(()),
        Some(current) => {
          tracing::debug!(key = %projection.key, "outbox row superseded, republishing");
          projection = pending(current)?;
        }
      }
    }
  }

  async fn acknowledge(
    &self,
    projection: &PendingProjection,
  ) -> Result<Option<Stored<SearchOutboxEntry>>> {
    let outbox_id = projection.outbox_id;
    let document = serde_json::to_string(&projection.document)?;
    let now = Utc::now();

    self
      .store
      .transaction(move |tx| mark_published(tx, outbox_id, &document, now))
      .await
      .map_err(|e| IngestError::persistence("transaction", e))?
      .map_err(|e| IngestError::persistence("update search_outbox", e))
  }
}
