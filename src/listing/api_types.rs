//! Serde-deserializable types matching the shifts API responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;

use super::types::{Coordinate, Listing, ListingPage, WorkType};

#[derive(Debug, Deserialize)]
pub struct ApiCoordinates {
  pub latitude: f64,
  pub longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWorkType {
  pub id: i64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub name_gt5: String,
  #[serde(default)]
  pub name_lt5: String,
  #[serde(default)]
  pub name_one: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiShift {
  pub id: String,
  #[serde(default)]
  pub logo: String,
  pub coordinates: ApiCoordinates,
  #[serde(default)]
  pub address: String,
  #[serde(default)]
  pub company_name: String,
  #[serde(default)]
  pub date_start_by_city: String,
  #[serde(default)]
  pub time_start_by_city: String,
  #[serde(default)]
  pub time_end_by_city: String,
  #[serde(default)]
  pub current_workers: u32,
  #[serde(default)]
  pub plan_workers: u32,
  #[serde(default)]
  pub work_types: Vec<ApiWorkType>,
  #[serde(default)]
  pub price_worker: f64,
  #[serde(default)]
  pub bonus_price_worker: f64,
  #[serde(default)]
  pub customer_feedbacks_count: String,
  pub customer_rating: Option<f64>,
  #[serde(default)]
  pub is_promotion_enabled: bool,
}

/// Top-level response body: `{"data": [...], "status": 200}`
#[derive(Debug, Deserialize)]
pub struct ApiShiftsResponse {
  pub data: Option<Vec<ApiShift>>,
  pub status: Option<u16>,
}

impl From<ApiWorkType> for WorkType {
  fn from(api: ApiWorkType) -> Self {
    WorkType {
      id: api.id,
      display_name: api.name,
      name_one: api.name_one,
      name_lt5: api.name_lt5,
      name_gt5: api.name_gt5,
    }
  }
}

impl From<ApiShift> for Listing {
  fn from(api: ApiShift) -> Self {
    Listing {
      id: api.id,
      company_name: api.company_name,
      address: api.address,
      logo: api.logo,
      coordinate: Coordinate::new(api.coordinates.latitude, api.coordinates.longitude),
      date_start: api.date_start_by_city,
      time_start: api.time_start_by_city,
      time_end: api.time_end_by_city,
      current_workers: api.current_workers,
      plan_workers: api.plan_workers,
      work_types: api.work_types.into_iter().map(WorkType::from).collect(),
      price_worker: api.price_worker,
      bonus_price_worker: api.bonus_price_worker,
      feedback_count: api.customer_feedbacks_count,
      rating: api.customer_rating,
      promotion_enabled: api.is_promotion_enabled,
    }
  }
}

impl ApiShiftsResponse {
  /// Convert to a domain page. `http_status` fills in a missing body status.
  pub fn into_page(self, http_status: u16) -> ListingPage {
    ListingPage {
      data: self
        .data
        .map(|shifts| shifts.into_iter().map(Listing::from).collect()),
      status: self.status.unwrap_or(http_status),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"{
    "data": [
      {
        "id": "3f2b1c",
        "logo": "https://example.com/logo.png",
        "coordinates": { "longitude": 38.987221, "latitude": 45.039268 },
        "address": "ул. Красная, 1",
        "companyName": "Склад Юг",
        "dateStartByCity": "01.02.2024",
        "timeStartByCity": "09:00",
        "timeEndByCity": "18:00",
        "currentWorkers": 1,
        "planWorkers": 4,
        "workTypes": [
          { "id": 7, "name": "Грузчик", "nameGt5": "грузчиков", "nameLt5": "грузчика", "nameOne": "грузчик" }
        ],
        "priceWorker": 2500,
        "bonusPriceWorker": 250.5,
        "customerFeedbacksCount": "12 отзывов",
        "customerRating": 4.7,
        "isPromotionEnabled": true
      }
    ],
    "status": 200
  }"#;

  #[test]
  fn test_decode_full_shift() {
    let response: ApiShiftsResponse = serde_json::from_str(SAMPLE).unwrap();
    let page = response.into_page(200);

    assert_eq!(page.status, 200);
    let listings = page.data.unwrap();
    assert_eq!(listings.len(), 1);

    let listing = &listings[0];
    assert_eq!(listing.id, "3f2b1c");
    assert_eq!(listing.company_name, "Склад Юг");
    assert_eq!(listing.coordinate, Coordinate::new(45.039268, 38.987221));
    assert_eq!(listing.date_start, "01.02.2024");
    assert_eq!(listing.price_worker, 2500.0);
    assert_eq!(listing.bonus_price_worker, 250.5);
    assert_eq!(listing.rating, Some(4.7));
    assert!(listing.promotion_enabled);
    assert_eq!(listing.work_types[0].id, 7);
    assert_eq!(listing.work_types[0].display_name, "Грузчик");
    assert_eq!(listing.work_types[0].name_lt5, "грузчика");
  }

  #[test]
  fn test_null_rating_and_sparse_fields() {
    let body = r#"{"data": [{"id": "a", "coordinates": {"latitude": 1.0, "longitude": 2.0}, "customerRating": null}]}"#;
    let page = serde_json::from_str::<ApiShiftsResponse>(body)
      .unwrap()
      .into_page(200);

    let listing = &page.data.unwrap()[0];
    assert_eq!(listing.rating, None);
    assert!(listing.work_types.is_empty());
    assert_eq!(listing.company_name, "");
  }

  #[test]
  fn test_missing_data_field() {
    let page = serde_json::from_str::<ApiShiftsResponse>(r#"{"status": 204}"#)
      .unwrap()
      .into_page(200);

    assert_eq!(page.data, None);
    assert_eq!(page.status, 204);
  }

  #[test]
  fn test_missing_status_uses_http_status() {
    let page = serde_json::from_str::<ApiShiftsResponse>(r#"{"data": []}"#)
      .unwrap()
      .into_page(200);

    assert_eq!(page.data, Some(Vec::new()));
    assert_eq!(page.status, 200);
  }
}
