//! Geolocation collaborator contract and great-circle distance.

use serde::{Deserialize, Serialize};

/// Earth radius used for store-distance estimates, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
  pub lat: f64,
  pub lon: f64,
}

/// One-shot position source (device GPS, browser API, ...).
///
/// Absence is the expected failure mode: implementations return `None`
/// when the position is unavailable or permission was denied, never an
/// error. Callers must tolerate `None` on every read.
pub trait Locator: Send + Sync {
  fn current_position(&self) -> impl std::future::Future<Output = Option<GeoPoint>> + Send;
}

/// Great-circle distance between two points, in miles (haversine).
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
  let d_lat = (b.lat - a.lat).to_radians();
  let d_lon = (b.lon - a.lon).to_radians();
  let lat1 = a.lat.to_radians();
  let lat2 = b.lat.to_radians();

  let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
  2.0 * h.sqrt().asin() * EARTH_RADIUS_MILES
}
