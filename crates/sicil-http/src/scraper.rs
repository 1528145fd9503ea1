//! [`ScraperClient`]: fetches company records from the registry scraper.
//!
//! | Method | Path | Body | Reply |
//! |--------|------|------|-------|
//! | `POST` | `/companies/load` | `{"name": "<name or UIN>"}` | `{"data": CompanyRecord}` |

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sicil_core::{record::CompanyRecord, source::RecordSource};

use crate::{Error, Result};

fn default_timeout_secs() -> u64 { 30 }

/// Connection settings for the scraper service.
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
  pub base_url:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

#[derive(Clone)]
pub struct ScraperClient {
  client:   Client,
  base_url: String,
}

#[derive(Serialize)]
struct LoadRequest<'a> {
  name: &'a str,
}

#[derive(Deserialize)]
struct LoadResponse {
  data: CompanyRecord,
}

impl ScraperClient {
  pub fn new(config: &ScraperConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(Error::Build)?;
    Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_owned() })
  }

  fn url(&self, path: &str) -> String { format!("{}{path}", self.base_url) }
}

impl RecordSource for ScraperClient {
  type Error = Error;

  async fn fetch(&self, name_or_uin: &str) -> Result<CompanyRecord> {
    let url = self.url("/companies/load");
    tracing::debug!(%url, query = name_or_uin, "loading company record");

    let resp = self
      .client
      .post(&url)
      .json(&LoadRequest { name: name_or_uin })
      .send()
      .await
      .map_err(|source| Error::Request { url: url.clone(), source })?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { url, status });
    }

    let body: LoadResponse =
      resp.json().await.map_err(|source| Error::Request { url, source })?;
    Ok(body.data)
  }
}
