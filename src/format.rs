//! Human-readable rendering of listing fields.

use crate::listing::{Listing, WorkType};

/// Shown when a listing has no rating yet.
pub const NO_RATING: &str = "Нет рейтинга";

/// Price with the ruble sign, e.g. `2500 ₽`.
pub fn format_price(price: f64) -> String {
  format!("{} ₽", price)
}

/// Rating to one decimal. Missing and zero ratings read as [`NO_RATING`].
pub fn format_rating(rating: Option<f64>) -> String {
  match rating {
    Some(r) if r != 0.0 && !r.is_nan() => format!("{:.1}", r),
    _ => NO_RATING.to_string(),
  }
}

/// Staffing as `current/planned`.
pub fn format_workers(current: u32, plan: u32) -> String {
  format!("{}/{}", current, plan)
}

/// Shift window as `start - end`.
pub fn format_time(start: &str, end: &str) -> String {
  format!("{} - {}", start, end)
}

/// Distance in kilometers to one decimal; `—` when unknown or not finite.
pub fn format_distance(distance: Option<f64>) -> String {
  match distance {
    Some(d) if d.is_finite() => format!("{:.1} км", d),
    _ => "—".to_string(),
  }
}

/// Work type label agreeing with a worker count.
///
/// Falls back to the display name when the API sent no plural forms.
pub fn work_type_label(work_type: &WorkType, count: u32) -> &str {
  let form = match (count % 10, count % 100) {
    (_, 11..=14) => &work_type.name_gt5,
    (1, _) => &work_type.name_one,
    (2..=4, _) => &work_type.name_lt5,
    _ => &work_type.name_gt5,
  };

  if form.is_empty() {
    &work_type.display_name
  } else {
    form
  }
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// One line of the listing table.
pub fn listing_line(listing: &Listing, distance: Option<f64>) -> String {
  let work = listing
    .work_types
    .first()
    .map(|w| work_type_label(w, listing.plan_workers).to_string())
    .unwrap_or_default();

  format!(
    "{:<10} {:<28} {:>9} {:>12} {:>6} {:>13} {:>9}  {}{}",
    truncate(&listing.id, 10),
    truncate(&listing.company_name, 28),
    format_price(listing.price_worker),
    format_rating(listing.rating),
    format_workers(listing.current_workers, listing.plan_workers),
    format_time(&listing.time_start, &listing.time_end),
    format_distance(distance),
    work,
    if listing.promotion_enabled { " *" } else { "" },
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::listing::Coordinate;

  fn loader() -> WorkType {
    WorkType {
      id: 1,
      display_name: "Грузчик".to_string(),
      name_one: "грузчик".to_string(),
      name_lt5: "грузчика".to_string(),
      name_gt5: "грузчиков".to_string(),
    }
  }

  #[test]
  fn test_format_price() {
    assert_eq!(format_price(2500.0), "2500 ₽");
    assert_eq!(format_price(0.0), "0 ₽");
    assert_eq!(format_price(1000000.0), "1000000 ₽");
    assert_eq!(format_price(99.5), "99.5 ₽");
  }

  #[test]
  fn test_format_rating() {
    assert_eq!(format_rating(Some(4.5)), "4.5");
    assert_eq!(format_rating(Some(5.0)), "5.0");
    assert_eq!(format_rating(Some(3.14)), "3.1");
    assert_eq!(format_rating(None), NO_RATING);
    assert_eq!(format_rating(Some(0.0)), NO_RATING);
  }

  #[test]
  fn test_format_workers_and_time() {
    assert_eq!(format_workers(2, 5), "2/5");
    assert_eq!(format_workers(0, 10), "0/10");
    assert_eq!(format_time("08:00", "18:00"), "08:00 - 18:00");
  }

  #[test]
  fn test_format_distance() {
    assert_eq!(format_distance(Some(1.234)), "1.2 км");
    assert_eq!(format_distance(Some(0.001)), "0.0 км");
    assert_eq!(format_distance(Some(10.567)), "10.6 км");
    assert_eq!(format_distance(Some(5.0)), "5.0 км");
    assert_eq!(format_distance(Some(f64::NAN)), "—");
    assert_eq!(format_distance(None), "—");
  }

  #[test]
  fn test_work_type_label_plurals() {
    let w = loader();
    assert_eq!(work_type_label(&w, 1), "грузчик");
    assert_eq!(work_type_label(&w, 3), "грузчика");
    assert_eq!(work_type_label(&w, 5), "грузчиков");
    assert_eq!(work_type_label(&w, 11), "грузчиков");
    assert_eq!(work_type_label(&w, 21), "грузчик");
    assert_eq!(work_type_label(&w, 0), "грузчиков");
  }

  #[test]
  fn test_work_type_label_without_forms() {
    let w = WorkType {
      name_one: String::new(),
      name_lt5: String::new(),
      name_gt5: String::new(),
      ..loader()
    };
    assert_eq!(work_type_label(&w, 2), "Грузчик");
  }

  #[test]
  fn test_truncate() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
    assert_eq!(truncate("hello world", 8), "hello...");
    // Multi-byte text is cut on character boundaries
    assert_eq!(truncate("Склад Южный", 8), "Склад...");
  }

  #[test]
  fn test_listing_line() {
    let listing = Listing {
      id: "abc".to_string(),
      company_name: "Склад Юг".to_string(),
      address: String::new(),
      logo: String::new(),
      coordinate: Coordinate::new(45.0, 39.0),
      date_start: "01.02.2024".to_string(),
      time_start: "09:00".to_string(),
      time_end: "18:00".to_string(),
      current_workers: 1,
      plan_workers: 3,
      work_types: vec![loader()],
      price_worker: 2500.0,
      bonus_price_worker: 0.0,
      feedback_count: String::new(),
      rating: Some(4.66),
      promotion_enabled: true,
    };

    let line = listing_line(&listing, Some(1.26));
    assert!(line.starts_with("abc"));
    assert!(line.contains("2500 ₽"));
    assert!(line.contains("4.7"));
    assert!(line.contains("1/3"));
    assert!(line.contains("09:00 - 18:00"));
    assert!(line.contains("1.3 км"));
    assert!(line.contains("грузчика"));
    assert!(line.ends_with(" *"));
  }
}
