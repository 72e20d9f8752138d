//! Fuel-cost estimate for a trip to one store.

use crate::geo::{haversine_miles, GeoPoint};
use crate::model::{StoreLocation, Vehicle};

/// Display values shown when distance cannot be measured. These mirror
/// the numbers the original client rendered in place of an estimate;
/// the enum keeps the unknown state explicit so callers can tell the
/// two apart (see DESIGN.md).
pub const PLACEHOLDER_MILES: f64 = 2.4;
pub const PLACEHOLDER_COST: f64 = 0.45;

/// Outcome of a trip-cost estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostEstimate {
  /// Real haversine distance and derived fuel cost.
  Measured { miles: f64, cost: f64 },
  /// User position or store coordinates unavailable; nothing measured.
  Placeholder,
}

impl CostEstimate {
  /// Miles to show in the UI, placeholder included.
  pub fn display_miles(&self) -> f64 {
    match self {
      CostEstimate::Measured { miles, .. } => *miles,
      CostEstimate::Placeholder => PLACEHOLDER_MILES,
    }
  }

  /// Cost to show in the UI, placeholder included.
  pub fn display_cost(&self) -> f64 {
    match self {
      CostEstimate::Measured { cost, .. } => *cost,
      CostEstimate::Placeholder => PLACEHOLDER_COST,
    }
  }

  pub fn is_measured(&self) -> bool {
    matches!(self, CostEstimate::Measured { .. })
  }
}

/// Estimate the fuel cost of driving to a store:
/// (distance / fuel economy) x current fuel price.
///
/// Missing user position or store coordinates yields
/// [`CostEstimate::Placeholder`]; no estimate is invented from partial
/// data.
pub fn estimate_trip_cost(
  user_pos: Option<GeoPoint>,
  store: &StoreLocation,
  vehicle: &Vehicle,
  fuel_price: f64,
) -> CostEstimate {
  let (Some(user), Some(dest)) = (user_pos, store.coord) else {
    return CostEstimate::Placeholder;
  };
  if vehicle.fuel_economy <= 0.0 {
    return CostEstimate::Placeholder;
  }

  let miles = haversine_miles(user, dest);
  CostEstimate::Measured {
    miles,
    cost: miles / vehicle.fuel_economy * fuel_price,
  }
}
