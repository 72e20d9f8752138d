//! Domain entity types shared by the cache, the sync coordinator, and the
//! decision engine.
//!
//! Every entity carries an opaque string id and is owned by a single user,
//! optionally pooled under a shared family scope. Records are always
//! replaced whole; there is no partial-field update anywhere in the crate.

pub mod taxonomy;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Reference from an inventory or shopping entry to a product.
///
/// `Manual` is the sentinel for rows entered by hand with no product link;
/// such rows still carry their own display name and unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductRef {
  Linked(String),
  Manual,
}

impl ProductRef {
  pub fn product_id(&self) -> Option<&str> {
    match self {
      ProductRef::Linked(id) => Some(id),
      ProductRef::Manual => None,
    }
  }
}

/// A single observed price for a product at a store.
///
/// The unit price (price / quantity) is never stored; see
/// [`crate::plan::unit_price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
  pub store: String,
  /// Currency units, always > 0.
  pub price: f64,
  /// Purchased amount in `unit`, always > 0.
  pub quantity: f64,
  /// Free-text token, normally drawn from [`taxonomy::UNITS`].
  pub unit: String,
  pub captured_at: DateTime<Utc>,
  pub image_url: Option<String>,
}

/// A tracked product with its price history.
///
/// `price_history` is newest-first on insert and never globally re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub owner: String,
  pub family_id: Option<String>,
  pub category: String,
  pub sub_category: String,
  pub item_name: String,
  pub variety: String,
  pub brand: String,
  pub barcode: Option<String>,
  pub price_history: Vec<PriceRecord>,
}

impl Product {
  /// Identity check against another product's naming triple,
  /// case-insensitive on all three fields.
  pub fn same_triple(&self, item_name: &str, variety: &str, brand: &str) -> bool {
    self.item_name.eq_ignore_ascii_case(item_name)
      && self.variety.eq_ignore_ascii_case(variety)
      && self.brand.eq_ignore_ascii_case(brand)
  }
}

/// Something currently on hand, stored somewhere in the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
  pub id: String,
  pub owner: String,
  pub product: ProductRef,
  pub name: String,
  pub category: String,
  pub sub_category: String,
  pub variety: String,
  pub location_id: String,
  pub sub_location: Option<String>,
  /// Clamped to a floor of 0 on every decrement.
  pub quantity: f64,
  pub unit: String,
  pub updated_at: DateTime<Utc>,
}

/// A shopping-list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
  pub id: String,
  pub product: ProductRef,
  pub name: String,
  pub quantity: f64,
  pub unit: String,
  pub completed: bool,
  /// Takes precedence over any derived store; see [`crate::plan::resolve_store`].
  pub store_override: Option<String>,
}

/// A named place things are kept (pantry, garage fridge, ...).
///
/// `sort_order` is a total order over a household's locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageLocation {
  pub id: String,
  pub name: String,
  pub sort_order: i64,
}

/// A shelf/drawer within a storage location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubLocation {
  pub id: String,
  pub name: String,
  pub location_id: String,
}

/// A physical store, optionally geocoded for trip-cost estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreLocation {
  pub id: String,
  pub name: String,
  pub address: Option<String>,
  pub phone: Option<String>,
  pub hours: Option<String>,
  pub coord: Option<GeoPoint>,
}

/// A household vehicle used for fuel-cost estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
  pub id: String,
  pub name: String,
  /// Miles per gallon, > 0.
  pub fuel_economy: f64,
}

/// Per-user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id: String,
  pub zip: Option<String>,
  /// Current fuel price per gallon.
  pub fuel_price: f64,
  /// Preferred category display order.
  pub category_order: Vec<String>,
  /// Presence gates shared-list / shared-taxonomy features.
  pub family_id: Option<String>,
  pub share_prices: bool,
}

/// Shared household scope; members join by invite code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
  pub id: String,
  pub invite_code: String,
}

/// Household-defined category layered on the default taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCategory {
  pub id: String,
  pub name: String,
}

/// Household-defined sub-category under a (default or custom) category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSubCategory {
  pub id: String,
  pub name: String,
  pub category: String,
}

/// One ingredient of a suggested meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealIngredient {
  pub name: String,
  /// True when the household does not currently stock it.
  pub missing: bool,
}

/// An externally generated meal suggestion; only the local lifecycle
/// (cook count, rating) is mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealIdea {
  pub id: String,
  pub title: String,
  /// 0..=100, percentage of ingredients on hand at generation time.
  pub match_percent: u8,
  pub ingredients: Vec<MealIngredient>,
  pub instructions: Vec<String>,
  pub cook_count: u32,
  pub last_cooked: Option<DateTime<Utc>>,
  pub rating: Option<u8>,
}

/// Beverage-cellar inventory variant with its own low-stock threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellarItem {
  pub id: String,
  pub name: String,
  pub quantity: f64,
  pub low_stock_threshold: f64,
  pub unit: String,
}

/// Append-only consumption history entry for a cellar item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionLog {
  pub id: String,
  pub cellar_item_id: String,
  pub amount: f64,
  pub consumed_at: DateTime<Utc>,
}
