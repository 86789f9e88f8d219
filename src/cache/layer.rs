//! Cache layer that adds freshness and failure isolation on top of storage.

use chrono::Duration;
use color_eyre::{eyre::eyre, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::KeyValueStorage;
use super::traits::{CacheEntry, Clock, QueryKey, SystemClock};

/// How long an entry stays fresh unless configured otherwise.
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// Cache layer that manages entry freshness over a storage backend.
///
/// All keys written through one layer share a namespace prefix, which is what
/// [`CacheLayer::clear_all`] purges. Storage calls run on the blocking thread
/// pool so a slow backend never stalls the async runtime.
///
/// Nothing in here returns an error: a failed read, a corrupt entry or a
/// failed write is logged and behaves like a miss.
pub struct CacheLayer {
  storage: Arc<dyn KeyValueStorage>,
  clock: Arc<dyn Clock>,
  namespace: String,
  /// How long before a cached entry is considered expired
  ttl: Duration,
}

impl CacheLayer {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: Arc<dyn KeyValueStorage>, namespace: impl Into<String>) -> Self {
    Self {
      storage,
      clock: Arc::new(SystemClock),
      namespace: namespace.into(),
      ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
    }
  }

  /// Set the time-to-live for cached entries.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  /// Replace the clock used for freshness checks.
  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  fn storage_key(&self, key: &impl QueryKey) -> String {
    format!("{}:{}", self.namespace, key.cache_hash())
  }

  /// An entry written at `stored_at` is fresh while strictly younger than the TTL.
  fn is_fresh(&self, stored_at: chrono::DateTime<chrono::Utc>) -> bool {
    self.clock.now() - stored_at < self.ttl
  }

  /// Look up a fresh entry.
  ///
  /// Expired and unreadable entries are deleted as a side effect and reported
  /// as a miss.
  pub async fn get<T>(&self, key: &impl QueryKey) -> Option<CacheEntry<T>>
  where
    T: DeserializeOwned,
  {
    let storage_key = self.storage_key(key);
    let description = key.description();

    let lookup_key = storage_key.clone();
    let raw = match self.with_storage(move |s| s.get(&lookup_key)).await {
      Ok(Some(raw)) => raw,
      Ok(None) => {
        debug!(query = %description, "cache miss");
        return None;
      }
      Err(e) => {
        warn!(query = %description, error = %e, "cache read failed, treating as miss");
        return None;
      }
    };

    let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
      Ok(entry) => entry,
      Err(e) => {
        warn!(query = %description, error = %e, "discarding corrupt cache entry");
        self.evict(storage_key).await;
        return None;
      }
    };

    if !self.is_fresh(entry.stored_at) {
      debug!(query = %description, stored_at = %entry.stored_at, "cache entry expired");
      self.evict(storage_key).await;
      return None;
    }

    debug!(query = %description, stored_at = %entry.stored_at, "cache hit");
    Some(entry)
  }

  /// Write `value` under `key`, stamped with the current time.
  ///
  /// Returns whether the write reached storage.
  pub async fn put<T>(&self, key: &impl QueryKey, value: &T) -> bool
  where
    T: Serialize + ?Sized,
  {
    let description = key.description();
    let entry = CacheEntry {
      key: description.clone(),
      stored_at: self.clock.now(),
      value,
    };

    let text = match serde_json::to_string(&entry) {
      Ok(text) => text,
      Err(e) => {
        warn!(query = %description, error = %e, "failed to serialize cache entry");
        return false;
      }
    };

    let storage_key = self.storage_key(key);
    match self.with_storage(move |s| s.set(&storage_key, &text)).await {
      Ok(()) => {
        debug!(query = %description, "cache entry stored");
        true
      }
      Err(e) => {
        warn!(query = %description, error = %e, "cache write failed");
        false
      }
    }
  }

  /// Delete every entry in this layer's namespace. Returns how many were removed.
  pub async fn clear_all(&self) -> usize {
    let prefix = format!("{}:", self.namespace);
    let result = self
      .with_storage(move |s| {
        let mut removed = 0;
        for key in s.list_keys()? {
          if key.starts_with(&prefix) {
            s.remove(&key)?;
            removed += 1;
          }
        }
        Ok(removed)
      })
      .await;

    match result {
      Ok(removed) => removed,
      Err(e) => {
        warn!(namespace = %self.namespace, error = %e, "failed to clear cache");
        0
      }
    }
  }

  async fn evict(&self, storage_key: String) {
    if let Err(e) = self.with_storage(move |s| s.remove(&storage_key)).await {
      warn!(error = %e, "failed to evict cache entry");
    }
  }

  /// Run a storage operation on the blocking pool.
  async fn with_storage<R, F>(&self, op: F) -> Result<R>
  where
    F: FnOnce(&dyn KeyValueStorage) -> Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let storage = Arc::clone(&self.storage);
    tokio::task::spawn_blocking(move || op(storage.as_ref()))
      .await
      .map_err(|e| eyre!("Cache task failed: {}", e))?
  }
}

impl Clone for CacheLayer {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      clock: Arc::clone(&self.clock),
      namespace: self.namespace.clone(),
      ttl: self.ttl,
    }
  }
}
