//! Filtered, searchable view over the store's listings.
//!
//! The view is a pipeline of stages applied in order, each narrowing the
//! previous output:
//!
//! 1. text search over company name, address and work type names
//! 2. price range
//! 3. rating floor
//! 4. work type membership
//!
//! Inactive stages pass everything through. The output keeps the relative
//! order of the input.

use std::collections::BTreeSet;

use crate::listing::{Coordinate, Listing};

/// Default upper price bound, matching the filter screen's reset values.
pub const DEFAULT_MAX_PRICE: f64 = 10_000.0;

/// Highest rating a listing can have.
pub const MAX_RATING: f64 = 5.0;

/// Inclusive predicates narrowing the visible listings.
///
/// Always replaced as a whole; see [`FilterCriteria::merged`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
  pub min_price: f64,
  pub max_price: f64,
  /// 0 disables the rating floor
  pub min_rating: f64,
  /// Empty disables work type filtering
  pub work_type_ids: BTreeSet<i64>,
}

impl Default for FilterCriteria {
  fn default() -> Self {
    Self {
      min_price: 0.0,
      max_price: DEFAULT_MAX_PRICE,
      min_rating: 0.0,
      work_type_ids: BTreeSet::new(),
    }
  }
}

impl FilterCriteria {
  /// New criteria with every field set in `patch` replaced, others kept.
  pub fn merged(&self, patch: &FilterPatch) -> FilterCriteria {
    FilterCriteria {
      min_price: patch.min_price.unwrap_or(self.min_price),
      max_price: patch.max_price.unwrap_or(self.max_price),
      min_rating: patch.min_rating.unwrap_or(self.min_rating),
      work_type_ids: patch
        .work_type_ids
        .clone()
        .unwrap_or_else(|| self.work_type_ids.clone()),
    }
  }
}

/// Partial update of [`FilterCriteria`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
  pub min_price: Option<f64>,
  pub max_price: Option<f64>,
  pub min_rating: Option<f64>,
  pub work_type_ids: Option<BTreeSet<i64>>,
}

impl FilterPatch {
  /// A patch that sets every field back to its default.
  pub fn reset() -> Self {
    let defaults = FilterCriteria::default();
    Self {
      min_price: Some(defaults.min_price),
      max_price: Some(defaults.max_price),
      min_rating: Some(defaults.min_rating),
      work_type_ids: Some(defaults.work_type_ids),
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// One step of the filter pipeline.
trait Stage {
  /// Inactive stages are skipped entirely
  fn is_active(&self) -> bool;

  fn matches(&self, listing: &Listing) -> bool;
}

struct TextSearch {
  needle: String,
}

impl TextSearch {
  fn new(query: &str) -> Self {
    Self {
      needle: query.trim().to_lowercase(),
    }
  }
}

impl Stage for TextSearch {
  fn is_active(&self) -> bool {
    !self.needle.is_empty()
  }

  fn matches(&self, listing: &Listing) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(&self.needle);

    contains(&listing.company_name)
      || contains(&listing.address)
      || listing
        .work_types
        .iter()
        .any(|work_type| contains(&work_type.display_name))
  }
}

struct PriceRange {
  min: f64,
  max: f64,
}

impl Stage for PriceRange {
  fn is_active(&self) -> bool {
    true
  }

  fn matches(&self, listing: &Listing) -> bool {
    self.min <= listing.price_worker && listing.price_worker <= self.max
  }
}

struct RatingFloor {
  min: f64,
}

impl Stage for RatingFloor {
  fn is_active(&self) -> bool {
    self.min > 0.0 && self.min <= MAX_RATING
  }

  fn matches(&self, listing: &Listing) -> bool {
    listing.rating.is_some_and(|rating| rating >= self.min)
  }
}

struct WorkTypeSet<'a> {
  ids: &'a BTreeSet<i64>,
}

impl Stage for WorkTypeSet<'_> {
  fn is_active(&self) -> bool {
    !self.ids.is_empty()
  }

  fn matches(&self, listing: &Listing) -> bool {
    listing
      .work_types
      .iter()
      .any(|work_type| self.ids.contains(&work_type.id))
  }
}

/// Derives the visible subset of listings.
pub struct QueryEngine;

impl QueryEngine {
  /// Listings that pass every active stage, in input order.
  pub fn filter<'a>(
    items: &'a [Listing],
    search_query: &str,
    criteria: &FilterCriteria,
  ) -> Vec<&'a Listing> {
    let text = TextSearch::new(search_query);
    let price = PriceRange {
      min: criteria.min_price,
      max: criteria.max_price,
    };
    let rating = RatingFloor {
      min: criteria.min_rating,
    };
    let work_types = WorkTypeSet {
      ids: &criteria.work_type_ids,
    };

    let stages: [&dyn Stage; 4] = [&text, &price, &rating, &work_types];
    let active: Vec<&dyn Stage> = stages.into_iter().filter(|s| s.is_active()).collect();

    items
      .iter()
      .filter(|listing| active.iter().all(|stage| stage.matches(listing)))
      .collect()
  }

  /// Pair each listing with its distance from `origin`, nearest first.
  ///
  /// Listings without a finite distance go last. Ties keep input order.
  pub fn sorted_by_distance<'a>(
    listings: &[&'a Listing],
    origin: Coordinate,
  ) -> Vec<(&'a Listing, f64)> {
    let mut annotated: Vec<(&'a Listing, f64)> = listings
      .iter()
      .map(|listing| (*listing, origin.distance_to(&listing.coordinate)))
      .collect();

    annotated.sort_by(|(_, a), (_, b)| match (a.is_finite(), b.is_finite()) {
      (true, true) => a.total_cmp(b),
      (true, false) => std::cmp::Ordering::Less,
      (false, true) => std::cmp::Ordering::Greater,
      (false, false) => std::cmp::Ordering::Equal,
    });
    annotated
  }
}
