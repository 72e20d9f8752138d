//! Fixed default taxonomy and unit vocabulary.
//!
//! Households can extend this with `CustomCategory` / `CustomSubCategory`
//! entities; the defaults themselves are never persisted.

/// Default category tree: (category, sub-categories).
pub const DEFAULT_TAXONOMY: &[(&str, &[&str])] = &[
  ("Produce", &["Fruit", "Vegetables", "Herbs"]),
  ("Dairy", &["Milk", "Cheese", "Yogurt", "Butter"]),
  ("Meat & Seafood", &["Beef", "Pork", "Poultry", "Fish", "Shellfish"]),
  ("Bakery", &["Bread", "Pastries", "Tortillas"]),
  ("Pantry", &["Canned", "Pasta & Grains", "Baking", "Condiments", "Snacks"]),
  ("Frozen", &["Meals", "Vegetables", "Desserts"]),
  ("Beverages", &["Juice", "Soda", "Coffee & Tea", "Beer & Wine"]),
  ("Household", &["Cleaning", "Paper Goods", "Laundry"]),
  ("Personal Care", &["Hygiene", "Medicine"]),
  ("Pet", &["Food", "Supplies"]),
];

/// Fixed unit vocabulary for price records and inventory quantities.
pub const UNITS: &[&str] = &[
  "each", "lb", "oz", "kg", "g", "gal", "qt", "pt", "fl oz", "l", "ml", "pack", "case",
];

/// All category names visible to a household: defaults plus custom ones.
pub fn category_names<'a>(custom: impl IntoIterator<Item = &'a str>) -> Vec<String> {
  let mut names: Vec<String> = DEFAULT_TAXONOMY
    .iter()
    .map(|(cat, _)| (*cat).to_string())
    .collect();
  names.extend(custom.into_iter().map(String::from));
  names
}

/// Sub-categories of a default category, if it is one.
pub fn default_sub_categories(category: &str) -> Option<&'static [&'static str]> {
  DEFAULT_TAXONOMY
    .iter()
    .find(|(cat, _)| cat.eq_ignore_ascii_case(category))
    .map(|(_, subs)| *subs)
}

/// Whether a unit token is part of the fixed vocabulary.
pub fn is_known_unit(unit: &str) -> bool {
  UNITS.iter().any(|u| u.eq_ignore_ascii_case(unit))
}
