//! Request handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use sicil_core::{search::SearchIndex, source::RecordSource, store::RegistryStore};
use sicil_ingest::{IngestReport, Ingestor};

use crate::error::ApiError;

/// JSON body accepted by `POST /ingest`.
#[derive(Debug, Deserialize)]
pub struct IngestBody {
  /// Company name or UIN, passed to the scraper.
  pub query: String,
}

/// `POST /ingest`
pub async fn ingest<S, I, R>(
  State(ingestor): State<Arc<Ingestor<S, I, R>>>,
  Json(body): Json<IngestBody>,
) -> Result<Json<IngestReport>, ApiError>
where
  S: RegistryStore,
  I: SearchIndex,
  R: RecordSource,
{
  if body.query.trim().is_empty() {
    return Err(ApiError::BadRequest("query must not be empty".into()));
  }
  Ok(Json(ingestor.ingest(&body.query).await?))
}

#[derive(Debug, Serialize)]
pub struct FlushReply {
  pub published: usize,
}

/// `POST /outbox/flush`
pub async fn flush_outbox<S, I, R>(
  State(ingestor): State<Arc<Ingestor<S, I, R>>>,
) -> Result<Json<FlushReply>, ApiError>
where
  S: RegistryStore,
  I: SearchIndex,
  R: RecordSource,
{
  let published = ingestor.flush_outbox().await?;
  Ok(Json(FlushReply { published }))
}
