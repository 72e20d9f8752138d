//! Store resolution and trip grouping for the shopping list.

use std::collections::BTreeMap;

use super::{best_price, fuzzy_match};
use crate::model::{Product, ShoppingItem};

/// Bucket for items whose store cannot be derived.
pub const UNKNOWN_STORE: &str = "Unknown / Any Store";

/// Resolve where a shopping item is expected to be purchased.
///
/// Priority order, first match wins:
/// 1. explicit manual store override on the item;
/// 2. store of the cheapest price record of the linked product;
/// 3. store of the cheapest price record of a fuzzy name match;
/// 4. the [`UNKNOWN_STORE`] bucket.
pub fn resolve_store(item: &ShoppingItem, products: &[Product]) -> String {
  if let Some(store) = &item.store_override {
    return store.clone();
  }

  if let Some(id) = item.product.product_id() {
    if let Some(record) = products
      .iter()
      .find(|p| p.id == id)
      .and_then(best_price)
    {
      return record.store.clone();
    }
  }

  if let Some(record) = fuzzy_match(products, &item.name).and_then(best_price) {
    return record.store.clone();
  }

  UNKNOWN_STORE.to_string()
}

/// Partition all incomplete shopping items by resolved store.
///
/// Keys come back lexicographically sorted (BTreeMap) so trip cards
/// render in a stable order.
pub fn group_trips<'a>(
  items: &'a [ShoppingItem],
  products: &[Product],
) -> BTreeMap<String, Vec<&'a ShoppingItem>> {
  let mut groups: BTreeMap<String, Vec<&ShoppingItem>> = BTreeMap::new();
  for item in items.iter().filter(|i| !i.completed) {
    groups.entry(resolve_store(item, products)).or_default().push(item);
  }
  groups
}

#[cfg(test)]
mod tests {
  use super::super::fixtures::{product, record};
  use super::*;
  use crate::model::ProductRef;

  fn item(id: &str, name: &str, product: ProductRef) -> ShoppingItem {
    ShoppingItem {
      id: id.into(),
      product,
      name: name.into(),
      quantity: 1.0,
      unit: "each".into(),
      completed: false,
      store_override: None,
    }
  }

  #[test]
  fn manual_override_beats_linked_product() {
    let products = vec![product("p1", "Milk", vec![record("Walmart", 3.0, 1.0)])];
    let mut a = item("a", "Milk", ProductRef::Linked("p1".into()));
    a.store_override = Some("Costco".into());

    assert_eq!(resolve_store(&a, &products), "Costco");
  }

  #[test]
  fn linked_product_resolves_to_cheapest_store() {
    let products = vec![product(
      "p1",
      "Milk",
      vec![record("Target", 4.0, 1.0), record("Walmart", 3.0, 1.0)],
    )];
    let b = item("b", "Milk", ProductRef::Linked("p1".into()));

    assert_eq!(resolve_store(&b, &products), "Walmart");
  }

  #[test]
  fn fuzzy_fallback_when_unlinked() {
    let products = vec![product("p1", "Whole Milk", vec![record("Kroger", 3.5, 1.0)])];
    let c = item("c", "milk", ProductRef::Manual);

    assert_eq!(resolve_store(&c, &products), "Kroger");
  }

  #[test]
  fn grouping_matches_priority_rules() {
    let products = vec![product("p1", "Milk", vec![record("Walmart", 3.0, 1.0)])];
    let mut a = item("a", "Paper Towels", ProductRef::Manual);
    a.store_override = Some("Costco".into());
    let b = item("b", "Milk", ProductRef::Linked("p1".into()));
    let c = item("c", "Dragon Fruit", ProductRef::Manual);
    let items = vec![a, b, c];

    let groups = group_trips(&items, &products);
    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Costco", UNKNOWN_STORE, "Walmart"]);
    assert_eq!(groups["Costco"].len(), 1);
    assert_eq!(groups["Walmart"][0].id, "b");
    assert_eq!(groups[UNKNOWN_STORE][0].id, "c");
  }

  #[test]
  fn completed_items_are_excluded_from_trips() {
    let mut done = item("a", "Milk", ProductRef::Manual);
    done.completed = true;
    let items = [done];
    let groups = group_trips(&items, &[]);
    assert!(groups.is_empty());
  }
}
