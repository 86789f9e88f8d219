//! Coordinate-keyed persistent cache of listings.

use chrono::Duration;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::cache::{CacheLayer, Clock, KeyValueStorage, QueryKey};

use super::types::{Coordinate, Listing};

/// Namespace prefix for every listing cache key.
pub const NAMESPACE: &str = "listings";

/// Cache key for the listings around one coordinate.
#[derive(Clone, Copy, Debug)]
pub struct ListingQueryKey {
  pub coordinate: Coordinate,
}

impl ListingQueryKey {
  /// Coordinates rendered exactly as given: `-0.0` folds into `0.0`, nothing is rounded.
  fn canonical(&self) -> String {
    format!(
      "{}:{}",
      self.coordinate.latitude + 0.0,
      self.coordinate.longitude + 0.0
    )
  }
}

impl QueryKey for ListingQueryKey {
  fn cache_hash(&self) -> String {
    // SHA256 hash for stable, fixed-length keys
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", NAMESPACE, self.canonical()).as_bytes());
    hex::encode(hasher.finalize())
  }

  fn description(&self) -> String {
    format!("listings near {}", self.canonical())
  }
}

/// Persistent listing cache with a time-to-live.
///
/// Every failure inside is logged and reported as a miss.
#[derive(Clone)]
pub struct ListingCache {
  layer: CacheLayer,
}

impl ListingCache {
  pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
    Self {
      layer: CacheLayer::new(storage, NAMESPACE),
    }
  }

  pub fn with_ttl(self, ttl: Duration) -> Self {
    Self {
      layer: self.layer.with_ttl(ttl),
    }
  }

  pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
    Self {
      layer: self.layer.with_clock(clock),
    }
  }

  /// Fresh listings cached for exactly this coordinate.
  pub async fn get(&self, coordinate: Coordinate) -> Option<Vec<Listing>> {
    self
      .layer
      .get::<Vec<Listing>>(&ListingQueryKey { coordinate })
      .await
      .map(|entry| entry.value)
  }

  /// Store listings for a coordinate, superseding any earlier entry.
  pub async fn put(&self, coordinate: Coordinate, listings: &[Listing]) -> bool {
    self.layer.put(&ListingQueryKey { coordinate }, listings).await
  }

  /// Purge every listing entry. Returns how many were removed.
  pub async fn clear_all(&self) -> usize {
    self.layer.clear_all().await
  }
}
