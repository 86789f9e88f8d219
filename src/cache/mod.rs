//! Generic time-to-live cache over an opaque key-value store.
//!
//! This module knows nothing about shifts. It provides:
//! - a [`KeyValueStorage`] trait with SQLite, in-memory and no-op backends
//! - a [`CacheLayer`] that stamps entries, evicts expired ones lazily on read,
//!   and absorbs every storage failure as a cache miss

mod layer;
mod storage;
mod traits;

pub use layer::{CacheLayer, DEFAULT_TTL_MINUTES};
pub use storage::{KeyValueStorage, MemoryStorage, NoopStorage, SqliteStorage};
pub use traits::{CacheEntry, Clock, QueryKey, SystemClock};

#[cfg(test)]
pub(crate) use traits::testing;
