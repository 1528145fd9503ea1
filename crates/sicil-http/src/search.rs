//! [`SearchClient`]: upserts documents into an Elasticsearch-style index.
//!
//! Each document is written with `PUT {base_url}/{index}/_doc/{key}`, which
//! creates or replaces it.

use reqwest::Client;
use serde::Deserialize;
use sicil_core::search::{SearchDocument, SearchIndex};

use crate::{Error, Result};

/// Connection settings for the search index.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
  pub base_url: String,
  /// Index that receives company documents.
  pub index:    String,
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub password: Option<String>,
}

#[derive(Clone)]
pub struct SearchClient {
  client:   Client,
  base_url: String,
  username: Option<String>,
  password: Option<String>,
}

impl SearchClient {
  pub fn new(config: &SearchConfig) -> Result<Self> {
    let client = Client::builder().build().map_err(Error::Build)?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_owned(),
      username: config.username.clone(),
      password: config.password.clone(),
    })
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.username {
      Some(username) => req.basic_auth(username, self.password.as_ref()),
      None => req,
    }
  }
}

impl SearchIndex for SearchClient {
  type Error = Error;

  async fn upsert_document(
    &self,
    index: &str,
    key: &str,
    document: &SearchDocument,
  ) -> Result<()> {
    let url = format!("{}/{index}/_doc/{key}", self.base_url);

    let resp = self
      .auth(self.client.put(&url))
      .json(document)
      .send()
      .await
      .map_err(|source| Error::Request { url: url.clone(), source })?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { url, status });
    }
    tracing::debug!(index, key, "search document upserted");
    Ok(())
  }
}
