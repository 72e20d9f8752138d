//! Generative-suggestion collaborator contracts.
//!
//! Three independent request/response shapes, all single-shot (no
//! streaming). Transport and prompting live outside this crate. A failed
//! or empty response comes back as an error or `None`/empty collection;
//! callers show a "try again" message and never retry silently.

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::model::MealIdea;

/// How an uploaded image should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
  Barcode,
  Product,
  Tag,
}

/// Best-effort structured record extracted from an image.
/// Any field may be absent; the UI prefills what it can.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScannedRecord {
  pub category: Option<String>,
  pub item_name: Option<String>,
  pub variety: Option<String>,
  pub brand: Option<String>,
  pub barcode: Option<String>,
  pub price: Option<f64>,
  pub store: Option<String>,
  pub quantity: Option<f64>,
  pub unit: Option<String>,
}

/// One pantry line fed to meal-idea generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryLine {
  pub item_name: String,
  pub variety: String,
  pub quantity: f64,
  pub unit: String,
}

/// Free-text answer with source citations, for price/market and store
/// lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedAnswer {
  pub text: String,
  pub citations: Vec<String>,
}

/// The number of meal suggestions one generation round returns.
pub const MEAL_IDEAS_PER_ROUND: usize = 6;

/// External suggestion service.
pub trait SuggestionService: Send + Sync {
  /// Extract a structured record from an image. `Ok(None)` means the
  /// model could not read anything useful; the caller shows an explicit
  /// "try again", it is not an error.
  fn scan_image(
    &self,
    image: &[u8],
    mode: ScanMode,
  ) -> impl Future<Output = Result<Option<ScannedRecord>>> + Send;

  /// Generate [`MEAL_IDEAS_PER_ROUND`] meal suggestions from the pantry.
  fn suggest_meals(
    &self,
    pantry: &[PantryLine],
  ) -> impl Future<Output = Result<Vec<MealIdea>>> + Send;

  /// Answer an item or store description with citations.
  fn grounded_lookup(&self, query: &str) -> impl Future<Output = Result<GroundedAnswer>> + Send;
}
