//! Decision engine: pure derivations over the entity cache.
//!
//! Nothing in this module mutates state; every function recomputes from
//! the collections it is handed, so callers can re-run them on every
//! render without bookkeeping.

mod fuel;
mod meals;
mod price;
mod stock;
mod trip;

pub use fuel::{estimate_trip_cost, CostEstimate, PLACEHOLDER_COST, PLACEHOLDER_MILES};
pub use meals::{bucket_meals, MealBuckets};
pub use price::{best_price, unit_price};
pub use stock::{cellar_low_stock, is_low_stock};
pub use trip::{group_trips, resolve_store, UNKNOWN_STORE};

use crate::model::Product;

/// Resolve which existing product a new price entry belongs to.
///
/// A product matches when the barcode is equal, or when the
/// (item name, variety, brand) triple is equal case-insensitively.
/// No match means the caller should create a new product.
pub fn resolve_product<'a>(
  products: &'a [Product],
  barcode: Option<&str>,
  item_name: &str,
  variety: &str,
  brand: &str,
) -> Option<&'a Product> {
  if let Some(code) = barcode {
    if let Some(found) = products
      .iter()
      .find(|p| p.barcode.as_deref() == Some(code))
    {
      return Some(found);
    }
  }
  products
    .iter()
    .find(|p| p.same_triple(item_name, variety, brand))
}

/// Case-insensitive substring match of a typed name against known product
/// item names. First match in cache order wins. Empty queries match
/// nothing, so a blank input field never lights up a "price memory" hint.
pub fn fuzzy_match<'a>(products: &'a [Product], query: &str) -> Option<&'a Product> {
  let needle = query.trim().to_lowercase();
  if needle.is_empty() {
    return None;
  }
  products
    .iter()
    .find(|p| p.item_name.to_lowercase().contains(&needle))
}


#[cfg(test)]
mod tests {
  use super::fixtures::product;
  use super::*;

  #[test]
  fn barcode_match_takes_precedence_over_triple() {
    let mut by_code = product("p1", "Milk", vec![]);
    by_code.barcode = Some("012345".into());
    let by_name = product("p2", "Milk", vec![]);

    let products = [by_name, by_code.clone()];
    let found = resolve_product(&products, Some("012345"), "Other", "", "");
    assert_eq!(found.map(|p| p.id.as_str()), Some("p1"));
  }

  #[test]
  fn triple_match_is_case_insensitive() {
    let mut existing = product("p1", "Milk", vec![]);
    existing.variety = "2%".into();
    existing.brand = "StoreBrand".into();

    let products = [existing];
    let found = resolve_product(&products, None, "MILK", "2%", "storebrand");
    assert!(found.is_some());
  }

  #[test]
  fn no_match_means_new_product() {
    let existing = product("p1", "Milk", vec![]);
    assert!(resolve_product(&[existing], None, "Eggs", "", "").is_none());
  }

  #[test]
  fn fuzzy_match_is_substring_and_case_insensitive() {
    let products = vec![product("p1", "Whole Milk", vec![])];
    assert!(fuzzy_match(&products, "milk").is_some());
    assert!(fuzzy_match(&products, "MILK").is_some());
    assert!(fuzzy_match(&products, "bread").is_none());
  }

  #[test]
  fn fuzzy_match_ignores_empty_query() {
    let products = vec![product("p1", "Whole Milk", vec![])];
    assert!(fuzzy_match(&products, "").is_none());
    assert!(fuzzy_match(&products, "   ").is_none());
  }
}
