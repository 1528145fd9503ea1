//! JSON HTTP surface for sicil.
//!
//! Exposes an axum [`Router`] over a shared [`Ingestor`]:
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/ingest` | Body: `{"query": "<name or UIN>"}`; returns the [`IngestReport`](sicil_ingest::IngestReport) |
//! | `POST` | `/outbox/flush` | Retries pending search documents; returns `{"published": n}` |

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{Router, routing::post};
use sicil_core::{search::SearchIndex, source::RecordSource, store::RegistryStore};
use sicil_ingest::Ingestor;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the API router for `ingestor`.
pub fn api_router<S, I, R>(ingestor: Arc<Ingestor<S, I, R>>) -> Router<()>
where
  S: RegistryStore + 'static,
  I: SearchIndex + 'static,
  R: RecordSource + 'static,
{
  Router::new()
    .route("/ingest", post(handlers::ingest::<S, I, R>))
    .route("/outbox/flush", post(handlers::flush_outbox::<S, I, R>))
    .layer(TraceLayer::new_for_http())
    .with_state(ingestor)
}
