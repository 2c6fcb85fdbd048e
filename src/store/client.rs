use crate::config::Config;
use crate::store::api_types::{ApiCollectionResponse, ApiRecordResponse};
use crate::store::fallback::lookup_with_fallback;
use crate::store::types::Record;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

/// Storefront API client wrapper
#[derive(Debug, Clone)]
pub struct StoreClient {
  http: reqwest::Client,
  base: Url,
  id_field: String,
}

impl StoreClient {
  /// Build a client from configuration.
  ///
  /// Returns None when no backend URL is configured; callers must treat
  /// that as "no lookup requested" and issue no requests.
  pub fn from_config(config: &Config) -> Result<Option<Self>> {
    if !config.backend.is_configured() {
      return Ok(None);
    }
    Self::new(config).map(Some)
  }

  pub fn new(config: &Config) -> Result<Self> {
    let base = Url::parse(config.backend.url.trim())
      .map_err(|e| eyre!("Invalid backend URL {}: {}", config.backend.url, e))?;

    let mut headers = HeaderMap::new();
    if let Some(key) = Config::get_api_key() {
      let mut value = HeaderValue::from_str(&key)
        .map_err(|e| eyre!("API key contains invalid header characters: {}", e))?;
      value.set_sensitive(true);
      headers.insert("x-api-key", value);
    }

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    Ok(Self {
      http,
      base,
      id_field: config.backend.id_field.clone(),
    })
  }

  fn endpoint(&self, segments: &[&str]) -> Result<Url> {
    let mut url = self.base.clone();
    {
      let mut path = url
        .path_segments_mut()
        .map_err(|()| eyre!("Backend URL cannot be a base: {}", self.base))?;
      path.pop_if_empty();
      path.extend(segments);
    }
    Ok(url)
  }

  /// Fetch a single record: `GET {base}/{resource}/view/{id}`.
  ///
  /// Ok(None) means the endpoint answered but carried no payload.
  pub async fn fetch_by_id(&self, resource: &str, id: &str) -> Result<Option<Record>> {
    let url = self.endpoint(&[resource, "view", id])?;
    debug!(%url, "fetching record by id");

    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch {}/{}: {}", resource, id, e))?
      .error_for_status()
      .map_err(|e| eyre!("Backend rejected {}/{}: {}", resource, id, e))?;

    let body: ApiRecordResponse = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse {} record: {}", resource, e))?;

    Ok(body.data)
  }

  /// Fetch a full collection: `GET {base}/{resource}`.
  pub async fn fetch_collection(&self, resource: &str) -> Result<Vec<Record>> {
    let url = self.endpoint(&[resource])?;
    debug!(%url, "fetching collection");

    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch {} collection: {}", resource, e))?
      .error_for_status()
      .map_err(|e| eyre!("Backend rejected {} collection: {}", resource, e))?;

    let body: ApiCollectionResponse = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse {} collection: {}", resource, e))?;

    Ok(body.data)
  }

  /// Look up a record by id, scanning the full collection if the direct
  /// endpoint fails or carries no payload. Ok(None) means not found.
  pub async fn lookup(&self, resource: &str, id: &str) -> Result<Option<Record>> {
    lookup_with_fallback(
      || self.fetch_by_id(resource, id),
      || self.fetch_collection(resource),
      &self.id_field,
      id,
    )
    .await
  }
}
