//! In-memory entity cache: the single source of truth the UI renders from.
//!
//! One collection per entity type. Reads are synchronous and always
//! reflect the latest mutation or reconciliation; mutations replace whole
//! records, never individual fields. Only two orderings are guaranteed:
//! storage locations stay sorted by `sort_order`, and a product's price
//! history is newest-first on insert.

use crate::model::{
  CellarItem, ConsumptionLog, CustomCategory, CustomSubCategory, Family, InventoryItem, MealIdea,
  Product, Profile, ShoppingItem, StorageLocation, StoreLocation, SubLocation, Vehicle,
};
use crate::remote::{EntityRecord, Snapshot, Table};

/// All locally cached state for one scope.
#[derive(Debug, Clone, Default)]
pub struct EntityCache {
  pub products: Vec<Product>,
  pub inventory: Vec<InventoryItem>,
  pub shopping: Vec<ShoppingItem>,
  pub storage_locations: Vec<StorageLocation>,
  pub sub_locations: Vec<SubLocation>,
  pub stores: Vec<StoreLocation>,
  pub vehicles: Vec<Vehicle>,
  pub profile: Option<Profile>,
  pub family: Option<Family>,
  pub categories: Vec<CustomCategory>,
  pub sub_categories: Vec<CustomSubCategory>,
  pub meal_ideas: Vec<MealIdea>,
  pub cellar: Vec<CellarItem>,
  pub consumption: Vec<ConsumptionLog>,
}

/// Upsert into a Vec by id: replace in place, else append.
fn upsert_by<T>(list: &mut Vec<T>, item: T, same: impl Fn(&T) -> bool) {
  match list.iter().position(|existing| same(existing)) {
    Some(idx) => list[idx] = item,
    None => list.push(item),
  }
}

impl EntityCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace every collection wholesale with an authoritative snapshot.
  /// This is the only conflict-resolution mechanism: last snapshot wins.
  pub fn replace_all(&mut self, snapshot: Snapshot) {
    let Snapshot {
      products,
      inventory,
      shopping,
      storage_locations,
      sub_locations,
      stores,
      vehicles,
      profile,
      family,
      categories,
      sub_categories,
      meal_ideas,
      cellar,
      consumption,
    } = snapshot;

    self.products = products;
    self.inventory = inventory;
    self.shopping = shopping;
    self.storage_locations = storage_locations;
    self.sub_locations = sub_locations;
    self.stores = stores;
    self.vehicles = vehicles;
    self.profile = profile;
    self.family = family;
    self.categories = categories;
    self.sub_categories = sub_categories;
    self.meal_ideas = meal_ideas;
    self.cellar = cellar;
    self.consumption = consumption;

    self.resort_locations();
  }

  /// Insert or replace one whole record.
  pub fn upsert(&mut self, record: EntityRecord) {
    match record {
      EntityRecord::Product(p) => {
        let id = p.id.clone();
        upsert_by(&mut self.products, p, |e| e.id == id);
      }
      EntityRecord::Inventory(i) => {
        let id = i.id.clone();
        upsert_by(&mut self.inventory, i, |e| e.id == id);
      }
      EntityRecord::Shopping(s) => {
        let id = s.id.clone();
        upsert_by(&mut self.shopping, s, |e| e.id == id);
      }
      EntityRecord::StorageLocation(l) => {
        let id = l.id.clone();
        upsert_by(&mut self.storage_locations, l, |e| e.id == id);
        self.resort_locations();
      }
      EntityRecord::SubLocation(l) => {
        let id = l.id.clone();
        upsert_by(&mut self.sub_locations, l, |e| e.id == id);
      }
      EntityRecord::Store(s) => {
        let id = s.id.clone();
        upsert_by(&mut self.stores, s, |e| e.id == id);
      }
      EntityRecord::Vehicle(v) => {
        let id = v.id.clone();
        upsert_by(&mut self.vehicles, v, |e| e.id == id);
      }
      EntityRecord::Profile(p) => self.profile = Some(p),
      EntityRecord::Family(f) => self.family = Some(f),
      EntityRecord::Category(c) => {
        let id = c.id.clone();
        upsert_by(&mut self.categories, c, |e| e.id == id);
      }
      EntityRecord::SubCategory(c) => {
        let id = c.id.clone();
        upsert_by(&mut self.sub_categories, c, |e| e.id == id);
      }
      EntityRecord::MealIdea(m) => {
        let id = m.id.clone();
        upsert_by(&mut self.meal_ideas, m, |e| e.id == id);
      }
      EntityRecord::Cellar(c) => {
        let id = c.id.clone();
        upsert_by(&mut self.cellar, c, |e| e.id == id);
      }
      EntityRecord::Consumption(c) => {
        let id = c.id.clone();
        upsert_by(&mut self.consumption, c, |e| e.id == id);
      }
    }
  }

  /// Remove one record by id. Unknown ids are a no-op.
  pub fn delete(&mut self, table: Table, id: &str) {
    match table {
      Table::Products => self.products.retain(|e| e.id != id),
      Table::Inventory => self.inventory.retain(|e| e.id != id),
      Table::ShoppingList => self.shopping.retain(|e| e.id != id),
      Table::StorageLocations => self.storage_locations.retain(|e| e.id != id),
      Table::SubLocations => self.sub_locations.retain(|e| e.id != id),
      Table::Stores => self.stores.retain(|e| e.id != id),
      Table::Vehicles => self.vehicles.retain(|e| e.id != id),
      Table::Profiles => {
        if self.profile.as_ref().is_some_and(|p| p.user_id == id) {
          self.profile = None;
        }
      }
      Table::Families => {
        if self.family.as_ref().is_some_and(|f| f.id == id) {
          self.family = None;
        }
      }
      Table::Categories => self.categories.retain(|e| e.id != id),
      Table::SubCategories => self.sub_categories.retain(|e| e.id != id),
      Table::MealIdeas => self.meal_ideas.retain(|e| e.id != id),
      Table::CellarItems => self.cellar.retain(|e| e.id != id),
      Table::ConsumptionLogs => self.consumption.retain(|e| e.id != id),
    }
  }

  pub fn product(&self, id: &str) -> Option<&Product> {
    self.products.iter().find(|p| p.id == id)
  }

  pub fn product_mut(&mut self, id: &str) -> Option<&mut Product> {
    self.products.iter_mut().find(|p| p.id == id)
  }

  pub fn inventory_item(&self, id: &str) -> Option<&InventoryItem> {
    self.inventory.iter().find(|i| i.id == id)
  }

  pub fn shopping_item(&self, id: &str) -> Option<&ShoppingItem> {
    self.shopping.iter().find(|s| s.id == id)
  }

  pub fn cellar_item(&self, id: &str) -> Option<&CellarItem> {
    self.cellar.iter().find(|c| c.id == id)
  }

  pub fn meal_idea(&self, id: &str) -> Option<&MealIdea> {
    self.meal_ideas.iter().find(|m| m.id == id)
  }

  fn resort_locations(&mut self) {
    self.storage_locations.sort_by_key(|l| l.sort_order);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn loc(id: &str, sort_order: i64) -> StorageLocation {
    StorageLocation {
      id: id.into(),
      name: id.to_uppercase(),
      sort_order,
    }
  }

  #[test]
  fn upsert_replaces_whole_record() {
    let mut cache = EntityCache::new();
    cache.upsert(EntityRecord::StorageLocation(loc("a", 0)));
    cache.upsert(EntityRecord::StorageLocation(StorageLocation {
      name: "Garage".into(),
      ..loc("a", 5)
    }));

    assert_eq!(cache.storage_locations.len(), 1);
    assert_eq!(cache.storage_locations[0].name, "Garage");
    assert_eq!(cache.storage_locations[0].sort_order, 5);
  }

  #[test]
  fn storage_locations_stay_sorted_by_sort_order() {
    let mut cache = EntityCache::new();
    cache.upsert(EntityRecord::StorageLocation(loc("b", 2)));
    cache.upsert(EntityRecord::StorageLocation(loc("a", 1)));
    cache.upsert(EntityRecord::StorageLocation(loc("c", 0)));

    let ids: Vec<&str> = cache
      .storage_locations
      .iter()
      .map(|l| l.id.as_str())
      .collect();
    assert_eq!(ids, ["c", "a", "b"]);
  }

  #[test]
  fn replace_all_discards_prior_state() {
    let mut cache = EntityCache::new();
    cache.upsert(EntityRecord::StorageLocation(loc("stale", 9)));

    cache.replace_all(Snapshot {
      storage_locations: vec![loc("fresh", 0)],
      ..Snapshot::default()
    });

    assert_eq!(cache.storage_locations.len(), 1);
    assert_eq!(cache.storage_locations[0].id, "fresh");
  }

  #[test]
  fn delete_unknown_id_is_noop() {
    let mut cache = EntityCache::new();
    cache.upsert(EntityRecord::StorageLocation(loc("a", 0)));
    cache.delete(Table::StorageLocations, "missing");
    assert_eq!(cache.storage_locations.len(), 1);
  }
}
