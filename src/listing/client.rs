use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use color_eyre::{eyre::eyre, Result};

use super::api_types::ApiShiftsResponse;
use super::types::{Coordinate, ListingPage};
use crate::config::ApiConfig;

/// A boxed, sendable future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Why a fetch of listings failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  /// Network, DNS or timeout failure. Carries the underlying message verbatim.
  #[error("{0}")]
  Transport(String),
  /// The server answered with a non-2xx status.
  #[error("HTTP error! status: {status}, message: {body}")]
  Status { status: u16, body: String },
  /// The server answered 2xx with a body we could not decode.
  #[error("Failed to decode shifts response: {0}")]
  Decode(String),
}

/// Source of listings for a coordinate.
pub trait ListingRepository: Send + Sync {
  fn fetch(&self, coordinate: Coordinate) -> BoxFuture<'_, Result<ListingPage, FetchError>>;
}

/// HTTP client for the shifts endpoint.
#[derive(Clone)]
pub struct ShiftClient {
  http: reqwest::Client,
  base_url: Url,
}

impl ShiftClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid shifts API url {}: {}", config.base_url, e))?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  /// `<base>?latitude=<lat>&longitude=<lon>`
  pub fn endpoint(&self, coordinate: Coordinate) -> Url {
    let mut url = self.base_url.clone();
    url
      .query_pairs_mut()
      .append_pair("latitude", &coordinate.latitude.to_string())
      .append_pair("longitude", &coordinate.longitude.to_string());
    url
  }

  /// Get the page of shifts around a coordinate
  pub async fn get_shifts(&self, coordinate: Coordinate) -> Result<ListingPage, FetchError> {
    let url = self.endpoint(coordinate);
    debug!(%url, "requesting shifts");

    let response = self
      .http
      .get(url)
      .header(CONTENT_TYPE, "application/json")
      .header(ACCEPT, "application/json")
      .send()
      .await
      .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| FetchError::Transport(e.to_string()))?;

    if !status.is_success() {
      warn!(status = status.as_u16(), "shifts request rejected");
      return Err(FetchError::Status {
        status: status.as_u16(),
        body,
      });
    }

    let parsed: ApiShiftsResponse =
      serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

    Ok(parsed.into_page(status.as_u16()))
  }
}

impl ListingRepository for ShiftClient {
  fn fetch(&self, coordinate: Coordinate) -> BoxFuture<'_, Result<ListingPage, FetchError>> {
    Box::pin(self.get_shifts(coordinate))
  }
}
