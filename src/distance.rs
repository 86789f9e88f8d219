//! Great-circle distance between two points on the Earth's surface.
//!
//! Inputs are taken as-is: coordinates outside the valid latitude/longitude
//! ranges are not rejected. Any non-finite input (NaN or infinity) yields
//! `f64::NAN`, so callers must check `is_finite()` before presenting a value.
//! Missing coordinates are not representable here; see
//! [`crate::listing::Listing::distance_from`].

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between `(a_lat, a_lon)` and `(b_lat, b_lon)`.
pub fn distance_km(a_lat: f64, a_lon: f64, b_lat: f64, b_lon: f64) -> f64 {
  if ![a_lat, a_lon, b_lat, b_lon].iter().all(|v| v.is_finite()) {
    return f64::NAN;
  }

  let d_lat = (b_lat - a_lat).to_radians();
  let d_lon = (b_lon - a_lon).to_radians();

  let h = (d_lat / 2.0).sin().powi(2)
    + a_lat.to_radians().cos() * b_lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

  // Rounding can push h a hair outside [0, 1] for antipodal points.
  let h = h.clamp(0.0, 1.0);

  2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
