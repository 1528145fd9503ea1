//! `sicil`: ingests Turkish company-registry records into a normalized
//! relational store and a search index.
//!
//! ```text
//! sicil ingest "Acme AS"     # fetch, normalize, publish one company
//! sicil flush-outbox         # retry search documents left unpublished
//! sicil serve                # run the JSON API
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sicil_http::{ScraperClient, SearchClient};
use sicil_ingest::Ingestor;
use sicil_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use settings::Settings;

#[derive(Parser)]
#[command(author, version, about = "Turkish company registry ingester")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, env = "SICIL_CONFIG", default_value = "sicil.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Fetch one company by name or UIN and persist it.
  Ingest {
    /// Company name or registry UIN.
    query: String,
  },
  /// Publish search documents still waiting in the outbox.
  FlushOutbox,
  /// Serve the JSON API.
  Serve,
}

type AppIngestor = Ingestor<SqliteStore, SearchClient, ScraperClient>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;
  let ingestor = build_ingestor(&settings).await?;

  match cli.command {
    Command::Ingest { query } => {
      let report = ingestor
        .ingest(&query)
        .await
        .with_context(|| format!("ingesting {query:?} failed"))?;
      println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Command::FlushOutbox => {
      let published = ingestor.flush_outbox().await.context("outbox flush failed")?;
      println!("published {published} document(s)");
    }
    Command::Serve => serve(ingestor, &settings).await?,
  }

  Ok(())
}

async fn build_ingestor(settings: &Settings) -> anyhow::Result<AppIngestor> {
  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  let source = ScraperClient::new(&settings.scraper).context("scraper client")?;
  let index = SearchClient::new(&settings.search).context("search client")?;

  Ok(Ingestor::new(store, index, source, settings.search.index.clone()))
}

async fn serve(ingestor: AppIngestor, settings: &Settings) -> anyhow::Result<()> {
  let app = sicil_api::api_router(Arc::new(ingestor));
  let address = format!("{}:{}", settings.server.host, settings.server.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
