//! Unit-price derivations over a product's price history.

use crate::model::{PriceRecord, Product};

/// Price per unit of quantity. Never stored, always recomputed.
pub fn unit_price(record: &PriceRecord) -> f64 {
  record.price / record.quantity
}

/// The cheapest record by unit price across a product's whole history.
///
/// Ties break toward the first minimum found in encounter order, i.e.
/// the earliest entry in the (newest-first) history list.
pub fn best_price(product: &Product) -> Option<&PriceRecord> {
  let mut best: Option<(&PriceRecord, f64)> = None;
  for record in &product.price_history {
    let candidate = unit_price(record);
    match best {
      Some((_, current)) if candidate >= current => {}
      _ => best = Some((record, candidate)),
    }
  }
  best.map(|(record, _)| record)
}

#[cfg(test)]
mod tests {
  use super::super::fixtures::{product, record};
  use super::*;

  #[test]
  fn best_price_is_minimum_unit_price_not_minimum_price() {
    // $4 for 2lb (2.0/lb) beats $3 for 1lb (3.0/lb) on absolute price
    // but loses on unit price.
    let p = product(
      "p1",
      "Flour",
      vec![record("Costco", 4.0, 2.0), record("Walmart", 3.0, 1.0)],
    );
    let best = best_price(&p).unwrap();
    assert_eq!(best.store, "Costco");
    assert_eq!(unit_price(best), 2.0);
  }

  #[test]
  fn larger_absolute_price_can_still_win() {
    let p = product(
      "p1",
      "Rice",
      vec![record("Bulk", 4.0, 2.0), record("Corner", 3.0, 1.0)],
    );
    let best = best_price(&p).unwrap();
    assert_eq!(best.store, "Bulk");
    assert_eq!(unit_price(best), 2.0);
  }

  #[test]
  fn ties_break_toward_first_encounter() {
    let p = product(
      "p1",
      "Beans",
      vec![record("First", 2.0, 1.0), record("Second", 4.0, 2.0)],
    );
    assert_eq!(best_price(&p).unwrap().store, "First");
  }

  #[test]
  fn empty_history_has_no_best_price() {
    let p = product("p1", "Mystery", vec![]);
    assert!(best_price(&p).is_none());
  }
}
