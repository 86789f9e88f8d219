use serde::{Deserialize, Serialize};

use crate::distance::distance_km;

/// A point on the Earth's surface, in degrees.
///
/// Ranges are not enforced; see [`Coordinate::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
  pub latitude: f64,
  pub longitude: f64,
}

impl Coordinate {
  pub fn new(latitude: f64, longitude: f64) -> Self {
    Self {
      latitude,
      longitude,
    }
  }

  /// Whether both components are finite and inside the usual ranges.
  pub fn is_valid(&self) -> bool {
    self.latitude.is_finite()
      && self.longitude.is_finite()
      && (-90.0..=90.0).contains(&self.latitude)
      && (-180.0..=180.0).contains(&self.longitude)
  }

  /// Great-circle distance to `other` in kilometers (NaN for non-finite input).
  pub fn distance_to(&self, other: &Coordinate) -> f64 {
    distance_km(
      self.latitude,
      self.longitude,
      other.latitude,
      other.longitude,
    )
  }
}

/// Kind of work offered on a shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkType {
  pub id: i64,
  pub display_name: String,
  /// Label for exactly one worker
  #[serde(default)]
  pub name_one: String,
  /// Label for two to four workers
  #[serde(default)]
  pub name_lt5: String,
  /// Label for five or more workers
  #[serde(default)]
  pub name_gt5: String,
}

/// A single shift offer. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
  pub id: String,
  pub company_name: String,
  pub address: String,
  /// Company logo URI
  pub logo: String,
  pub coordinate: Coordinate,
  pub date_start: String,
  pub time_start: String,
  pub time_end: String,
  pub current_workers: u32,
  pub plan_workers: u32,
  pub work_types: Vec<WorkType>,
  /// Pay per worker for the shift
  pub price_worker: f64,
  pub bonus_price_worker: f64,
  /// Pre-formatted by the server, e.g. "12 отзывов"
  pub feedback_count: String,
  pub rating: Option<f64>,
  pub promotion_enabled: bool,
}

impl Listing {
  /// Distance from `origin` in kilometers.
  ///
  /// `None` when the origin is unknown. A present origin with non-finite
  /// components gives `Some(NAN)`.
  pub fn distance_from(&self, origin: Option<Coordinate>) -> Option<f64> {
    origin.map(|origin| origin.distance_to(&self.coordinate))
  }

  /// Workers still needed to fill the shift.
  pub fn open_slots(&self) -> u32 {
    self.plan_workers.saturating_sub(self.current_workers)
  }
}

/// One response from the listings endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
  /// `None` when the response carried no data field
  pub data: Option<Vec<Listing>>,
  pub status: u16,
}
