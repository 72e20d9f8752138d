//! Remote store contract: per-table request surface, authoritative
//! snapshots, and the coarse push-invalidation stream.
//!
//! The actual transport (HTTP, websocket, whatever backs the household's
//! account) lives outside this crate; the sync engine is generic over
//! [`RemoteGateway`] the same way the cache layer is generic over its
//! storage backend.

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::sync::mpsc;

use crate::model::{
  CellarItem, ConsumptionLog, CustomCategory, CustomSubCategory, Family, InventoryItem, MealIdea,
  Product, Profile, ShoppingItem, StorageLocation, StoreLocation, SubLocation, Vehicle,
};

/// One logical remote table per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
  Products,
  Inventory,
  ShoppingList,
  StorageLocations,
  SubLocations,
  Stores,
  Vehicles,
  Profiles,
  Families,
  Categories,
  SubCategories,
  MealIdeas,
  CellarItems,
  ConsumptionLogs,
}

impl Table {
  /// Tables whose push-invalidation signals trigger reconciliation.
  pub const WATCHED: &'static [Table] = &[
    Table::Inventory,
    Table::ShoppingList,
    Table::Categories,
    Table::SubCategories,
    Table::MealIdeas,
    Table::StorageLocations,
    Table::CellarItems,
    Table::ConsumptionLogs,
  ];

  pub fn is_watched(self) -> bool {
    Self::WATCHED.contains(&self)
  }
}

/// Ownership scope for every remote request: the authenticated user plus
/// the optional shared family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
  pub user_id: String,
  pub family_id: Option<String>,
}

impl Scope {
  pub fn solo(user_id: impl Into<String>) -> Self {
    Self {
      user_id: user_id.into(),
      family_id: None,
    }
  }
}

/// A whole record headed to or from the remote store.
///
/// The gateway surface is table-shaped rather than generic so that mock
/// implementations can record and replay calls without type gymnastics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRecord {
  Product(Product),
  Inventory(InventoryItem),
  Shopping(ShoppingItem),
  StorageLocation(StorageLocation),
  SubLocation(SubLocation),
  Store(StoreLocation),
  Vehicle(Vehicle),
  Profile(Profile),
  Family(Family),
  Category(CustomCategory),
  SubCategory(CustomSubCategory),
  MealIdea(MealIdea),
  Cellar(CellarItem),
  Consumption(ConsumptionLog),
}

impl EntityRecord {
  pub fn table(&self) -> Table {
    match self {
      EntityRecord::Product(_) => Table::Products,
      EntityRecord::Inventory(_) => Table::Inventory,
      EntityRecord::Shopping(_) => Table::ShoppingList,
      EntityRecord::StorageLocation(_) => Table::StorageLocations,
      EntityRecord::SubLocation(_) => Table::SubLocations,
      EntityRecord::Store(_) => Table::Stores,
      EntityRecord::Vehicle(_) => Table::Vehicles,
      EntityRecord::Profile(_) => Table::Profiles,
      EntityRecord::Family(_) => Table::Families,
      EntityRecord::Category(_) => Table::Categories,
      EntityRecord::SubCategory(_) => Table::SubCategories,
      EntityRecord::MealIdea(_) => Table::MealIdeas,
      EntityRecord::Cellar(_) => Table::CellarItems,
      EntityRecord::Consumption(_) => Table::ConsumptionLogs,
    }
  }

  pub fn id(&self) -> &str {
    match self {
      EntityRecord::Product(p) => &p.id,
      EntityRecord::Inventory(i) => &i.id,
      EntityRecord::Shopping(s) => &s.id,
      EntityRecord::StorageLocation(l) => &l.id,
      EntityRecord::SubLocation(l) => &l.id,
      EntityRecord::Store(s) => &s.id,
      EntityRecord::Vehicle(v) => &v.id,
      EntityRecord::Profile(p) => &p.user_id,
      EntityRecord::Family(f) => &f.id,
      EntityRecord::Category(c) => &c.id,
      EntityRecord::SubCategory(c) => &c.id,
      EntityRecord::MealIdea(m) => &m.id,
      EntityRecord::Cellar(c) => &c.id,
      EntityRecord::Consumption(c) => &c.id,
    }
  }
}

/// Full authoritative state for one scope; the cache is replaced with
/// this wholesale on every reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
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

/// Async request surface of the remote store.
///
/// Every method fails by rejecting; there are no sentinel error values.
/// The sync engine treats all rejections identically (log + reconcile).
pub trait RemoteGateway: Send + Sync {
  /// Fetch the full authoritative state for a scope.
  fn fetch_snapshot(&self, scope: &Scope) -> impl Future<Output = Result<Snapshot>> + Send;

  /// Insert or replace one record; returns the stored form.
  fn upsert(
    &self,
    scope: &Scope,
    record: EntityRecord,
  ) -> impl Future<Output = Result<EntityRecord>> + Send;

  /// Insert or replace a batch in one request (storage-location reorder
  /// is the only caller that needs this).
  fn bulk_upsert(
    &self,
    scope: &Scope,
    table: Table,
    records: Vec<EntityRecord>,
  ) -> impl Future<Output = Result<()>> + Send;

  /// Delete one record by id.
  fn delete(
    &self,
    scope: &Scope,
    table: Table,
    id: &str,
  ) -> impl Future<Output = Result<()>> + Send;
}

/// Push-invalidation fan-in: one signal per watched table, no payload.
///
/// The transport only says "something changed in this table"; the engine
/// responds with a full refetch, never a row-level patch.
pub struct Invalidations {
  tx: mpsc::UnboundedSender<Table>,
  rx: Option<mpsc::UnboundedReceiver<Table>>,
}

impl Invalidations {
  pub fn new() -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self { tx, rx: Some(rx) }
  }

  /// Sender handle for the transport to signal a changed table.
  /// Signals for unwatched tables are dropped at the source.
  pub fn notifier(&self) -> InvalidationNotifier {
    InvalidationNotifier {
      tx: self.tx.clone(),
    }
  }

  /// Take the receiving end; the host event loop drains it and calls
  /// `SyncEngine::handle_invalidation` per signal. Can be taken once.
  pub fn subscribe(&mut self) -> Option<mpsc::UnboundedReceiver<Table>> {
    self.rx.take()
  }
}

impl Default for Invalidations {
  fn default() -> Self {
    Self::new()
  }
}

/// Cloneable handle the transport uses to push signals.
#[derive(Clone)]
pub struct InvalidationNotifier {
  tx: mpsc::UnboundedSender<Table>,
}

impl InvalidationNotifier {
  pub fn notify(&self, table: Table) {
    if !table.is_watched() {
      return;
    }
    // Receiver gone means the engine shut down; nothing to do.
    let _ = self.tx.send(table);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn unwatched_tables_are_dropped_at_the_source() {
    let mut inv = Invalidations::new();
    let notifier = inv.notifier();
    let mut rx = inv.subscribe().unwrap();

    notifier.notify(Table::Vehicles);
    notifier.notify(Table::Inventory);

    assert_eq!(rx.recv().await, Some(Table::Inventory));
    assert!(rx.try_recv().is_err());
  }

  #[test]
  fn every_record_maps_to_its_table() {
    let rec = EntityRecord::StorageLocation(StorageLocation {
      id: "loc-1".into(),
      name: "Pantry".into(),
      sort_order: 0,
    });
    assert_eq!(rec.table(), Table::StorageLocations);
    assert_eq!(rec.id(), "loc-1");
  }

  #[test]
  fn wire_format_uses_snake_case_tags() {
    let rec = EntityRecord::StorageLocation(StorageLocation {
      id: "loc-1".into(),
      name: "Pantry".into(),
      sort_order: 0,
    });
    let value = serde_json::to_value(&rec).unwrap();
    assert!(value.get("storage_location").is_some());

    let back: EntityRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, rec);
  }
}
