//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trait for values that address a cache entry.
pub trait QueryKey {
  /// Stable, fixed-length key used for storage lookups.
  fn cache_hash(&self) -> String;

  /// Human-readable description, used in logs.
  fn description(&self) -> String;
}

/// Source of the current time for freshness checks.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// A cached value and the moment it was written.
///
/// Stored as JSON text in the backing key-value store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
  /// Description of the query this entry answers
  pub key: String,
  /// When the entry was written
  pub stored_at: DateTime<Utc>,
  /// The cached data
  pub value: T,
}
