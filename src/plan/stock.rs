//! Low-stock detection.
//!
//! Unlike depletion (an edge-triggered event in the sync engine), low
//! stock is a level-triggered condition: it is re-evaluated on every
//! read and clears itself the moment the quantity rises past the
//! threshold.

use crate::model::CellarItem;

/// Whether a quantity is at or below its configured threshold.
pub fn is_low_stock(quantity: f64, threshold: f64) -> bool {
  quantity <= threshold
}

/// Cellar variant: each item carries its own threshold.
pub fn cellar_low_stock(items: &[CellarItem]) -> Vec<&CellarItem> {
  items
    .iter()
    .filter(|i| is_low_stock(i.quantity, i.low_stock_threshold))
    .collect()
}
