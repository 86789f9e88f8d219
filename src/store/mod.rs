//! Listing store: owns the canonical listings and the request lifecycle.
//!
//! State lives in a `tokio::sync::watch` channel of [`StoreSnapshot`]s. Every
//! mutation commits all related fields in a single `send_modify`, so readers
//! never observe a half-applied transition, and subscribers are woken on each
//! commit. Derived views (`filtered_items`, `selected`) are computed from a
//! snapshot on read.
//!
//! `load` and `refresh` are serialized per store: a call waits for the
//! previous one to commit before it starts. The call that settles last is
//! therefore always the one that started last, and an older response can
//! never overwrite a newer one. `clear_all` additionally bumps a generation
//! counter so a request issued before it, in flight or still queued, drops
//! its result.

mod state;

pub use state::{RequestState, StoreSnapshot};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::listing::{Coordinate, FetchError, Listing, ListingCache, ListingRepository};
use crate::query::FilterPatch;

/// Error text used when a failure carries no message of its own.
pub const FALLBACK_ERROR: &str = "Network error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
  /// Cache first, network on miss
  Load,
  /// Network only
  Refresh,
}

impl RequestKind {
  fn in_flight_state(self) -> RequestState {
    match self {
      RequestKind::Load => RequestState::Loading,
      RequestKind::Refresh => RequestState::Refreshing,
    }
  }
}

/// Observable store of shift listings.
pub struct ListingStore<R> {
  repository: R,
  cache: ListingCache,
  state: watch::Sender<StoreSnapshot>,
  /// Held for the whole of a load/refresh so requests run one at a time
  gate: Mutex<()>,
  generation: AtomicU64,
}

impl<R: ListingRepository> ListingStore<R> {
  pub fn new(repository: R, cache: ListingCache) -> Self {
    let (state, _) = watch::channel(StoreSnapshot::default());

    Self {
      repository,
      cache,
      state,
      gate: Mutex::new(()),
      generation: AtomicU64::new(0),
    }
  }

  /// Receive a notification after every committed change.
  pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
    self.state.subscribe()
  }

  /// A consistent copy of the current state.
  pub fn snapshot(&self) -> StoreSnapshot {
    self.state.borrow().clone()
  }

  pub fn state(&self) -> RequestState {
    self.state.borrow().state
  }

  pub fn items(&self) -> Arc<Vec<Listing>> {
    Arc::clone(&self.state.borrow().items)
  }

  pub fn error(&self) -> Option<String> {
    self.state.borrow().error.clone()
  }

  pub fn is_loading(&self) -> bool {
    self.state.borrow().is_loading()
  }

  pub fn is_refreshing(&self) -> bool {
    self.state.borrow().is_refreshing()
  }

  /// Items narrowed by the current search text and filters, in store order.
  pub fn filtered_items(&self) -> Vec<Listing> {
    self
      .state
      .borrow()
      .filtered_items()
      .into_iter()
      .cloned()
      .collect()
  }

  /// The selected listing, or `None` if unset or no longer present.
  pub fn selected(&self) -> Option<Listing> {
    self.state.borrow().selected().cloned()
  }

  pub fn set_selected(&self, id: impl Into<String>) {
    let id = id.into();
    self.state.send_modify(|s| s.selected_id = Some(id));
  }

  pub fn set_search_query(&self, text: impl Into<String>) {
    let text = text.into();
    self.state.send_modify(|s| s.search_query = text);
  }

  /// Merge `patch` into the current filters; fields it leaves unset are kept.
  pub fn set_filters(&self, patch: FilterPatch) {
    self.state.send_modify(|s| s.filters = s.filters.merged(&patch));
  }

  /// Show listings for `coordinate`, from the cache when it holds a fresh copy.
  pub async fn load(&self, coordinate: Coordinate) {
    self.run(coordinate, RequestKind::Load).await;
  }

  /// Fetch listings for `coordinate` from the network, keeping the current
  /// items visible until the response arrives.
  pub async fn refresh(&self, coordinate: Coordinate) {
    self.run(coordinate, RequestKind::Refresh).await;
  }

  /// Reset to the initial state and purge every cached entry.
  ///
  /// The in-memory reset is immediate. The cache purge waits for any request
  /// in flight, whose result is discarded.
  pub async fn clear_all(&self) {
    self.state.send_modify(|s| {
      self.generation.fetch_add(1, Ordering::SeqCst);
      *s = StoreSnapshot::default();
    });

    let _turn = self.gate.lock().await;
    let removed = self.cache.clear_all().await;
    info!(removed, "cleared listings and cache");
  }

  async fn run(&self, coordinate: Coordinate, kind: RequestKind) {
    // Tagged when issued, so a call still queued behind the gate when
    // clear_all runs is dropped along with the one in flight
    let generation = self.generation.load(Ordering::SeqCst);
    let _turn = self.gate.lock().await;
    if !self.is_current(generation) {
      debug!(?kind, ?coordinate, "dropping request issued before clear_all");
      return;
    }

    self.state.send_modify(|s| {
      s.state = kind.in_flight_state();
      s.error = None;
    });
    debug!(?kind, ?coordinate, "request started");

    if kind == RequestKind::Load {
      if let Some(listings) = self.cache.get(coordinate).await {
        info!(count = listings.len(), ?coordinate, "serving listings from cache");
        self.commit(generation, Ok(listings));
        return;
      }
    }

    let outcome = match self.repository.fetch(coordinate).await {
      Ok(page) => {
        let listings = page.data.unwrap_or_default();
        info!(count = listings.len(), status = page.status, ?coordinate, "listings fetched");

        if self.is_current(generation) {
          self.cache.put(coordinate, &listings).await;
        }
        Ok(listings)
      }
      Err(e) => {
        warn!(error = %e, ?coordinate, "failed to fetch listings");
        Err(error_message(&e))
      }
    };

    self.commit(generation, outcome);
  }

  fn is_current(&self, generation: u64) -> bool {
    self.generation.load(Ordering::SeqCst) == generation
  }

  /// Apply a finished request. Results from before a `clear_all` are dropped.
  fn commit(&self, generation: u64, outcome: Result<Vec<Listing>, String>) {
    self.state.send_if_modified(|s| {
      if !self.is_current(generation) {
        debug!("discarding result of request superseded by clear_all");
        return false;
      }

      match outcome {
        Ok(listings) => {
          s.items = Arc::new(listings);
          s.state = RequestState::Loaded;
          s.error = None;
        }
        Err(message) => {
          s.state = RequestState::Failed;
          s.error = Some(message);
        }
      }
      true
    });
  }
}

/// Observable error text for a failed fetch.
fn error_message(error: &FetchError) -> String {
  let message = error.to_string();
  if message.trim().is_empty() {
    FALLBACK_ERROR.to_string()
  } else {
    message
  }
}
