use std::sync::Arc;

use crate::listing::Listing;
use crate::query::{FilterCriteria, QueryEngine};

/// Lifecycle of the store's most recent request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
  /// Nothing requested yet, or cleared
  #[default]
  Idle,
  /// First load for a coordinate is in flight
  Loading,
  /// Pull-to-refresh is in flight; previous items stay visible
  Refreshing,
  /// Last request succeeded
  Loaded,
  /// Last request failed; see the snapshot's error
  Failed,
}

impl RequestState {
  pub fn is_loading(&self) -> bool {
    matches!(self, RequestState::Loading)
  }

  pub fn is_refreshing(&self) -> bool {
    matches!(self, RequestState::Refreshing)
  }
}

/// Everything an observer may read, committed together.
///
/// A snapshot never mixes fields from two different requests.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
  pub state: RequestState,
  pub items: Arc<Vec<Listing>>,
  /// Set only while `state` is `Failed`
  pub error: Option<String>,
  /// May refer to an id that is no longer in `items`
  pub selected_id: Option<String>,
  pub search_query: String,
  pub filters: FilterCriteria,
}

impl StoreSnapshot {
  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn is_refreshing(&self) -> bool {
    self.state.is_refreshing()
  }

  /// Items narrowed by the current search text and filters.
  pub fn filtered_items(&self) -> Vec<&Listing> {
    QueryEngine::filter(&self.items, &self.search_query, &self.filters)
  }

  /// The selected listing, if it is still present.
  pub fn selected(&self) -> Option<&Listing> {
    let id = self.selected_id.as_deref()?;
    self.items.iter().find(|listing| listing.id == id)
  }
}
