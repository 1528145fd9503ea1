//! Layered configuration: an optional TOML file under `SICIL_`-prefixed
//! environment variables.
//!
//! ```toml
//! store_path = "~/.local/share/sicil/sicil.db"
//!
//! [scraper]
//! base_url = "http://localhost:8081"
//! timeout_secs = 30
//!
//! [search]
//! base_url = "http://localhost:9200"
//! index = "companies"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `SICIL_SEARCH__PASSWORD`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use sicil_http::{ScraperConfig, SearchConfig};

fn default_store_path() -> PathBuf { PathBuf::from("sicil.db") }

#[derive(Debug, Deserialize)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  pub scraper:    ScraperConfig,
  pub search:     SearchConfig,
  #[serde(default)]
  pub server:     ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self { Self { host: "127.0.0.1".to_string(), port: 8080 } }
}

impl Settings {
  /// Read `path` (if it exists) and overlay the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("SICIL")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read configuration")?;

    let mut settings: Self = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
