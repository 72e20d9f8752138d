//! Meal-idea bucketing by ingredient match percentage.

use crate::model::MealIdea;

/// Meal ideas partitioned for display: ready to cook now, close, and
/// everything else.
#[derive(Debug, Default)]
pub struct MealBuckets<'a> {
  /// match = 100
  pub ready: Vec<&'a MealIdea>,
  /// 75 <= match < 100
  pub close: Vec<&'a MealIdea>,
  /// match < 75
  pub other: Vec<&'a MealIdea>,
}

/// Pure partition of meal ideas; relative order within a bucket follows
/// the input.
pub fn bucket_meals(ideas: &[MealIdea]) -> MealBuckets<'_> {
  let mut buckets = MealBuckets::default();
  for idea in ideas {
    match idea.match_percent {
      100.. => buckets.ready.push(idea),
      75..=99 => buckets.close.push(idea),
      _ => buckets.other.push(idea),
    }
  }
  buckets
}
