//! Sync coordinator: optimistic local mutation, remote persistence,
//! debounced batch commits, and reconciliation on push invalidation.
//!
//! Every mutation goes through here; the UI never touches the cache
//! directly. The local write always happens before the remote call is
//! issued. A rejected remote write is not rolled back field-by-field:
//! the engine logs it and refetches the full authoritative state,
//! because concurrent remote changes may have landed in the interim.

mod reorder;

pub use reorder::{ReorderPhase, ReorderState, DEBOUNCE, SETTLE};

use chrono::Utc;
use color_eyre::Result;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::EntityCache;
use crate::model::{
  CellarItem, ConsumptionLog, InventoryItem, MealIdea, PriceRecord, Product, ShoppingItem,
};
use crate::plan;
use crate::remote::{EntityRecord, RemoteGateway, Scope, Table};

/// Invariant violations rejected before any cache mutation.
///
/// Remote failures never show up here; those are logged and recovered by
/// reconciliation, invisible to the caller.
#[derive(Debug, Error, PartialEq)]
pub enum SyncError {
  #[error("price and quantity must both be positive (got {price} / {quantity})")]
  InvalidPrice { price: f64, quantity: f64 },

  #[error("rating must be between 1 and 5 (got {0})")]
  InvalidRating(u8),

  #[error("category \"{name}\" is still used by {references} item(s)")]
  CategoryInUse { name: String, references: usize },

  #[error("no {table:?} record with id {id}")]
  NotFound { table: Table, id: String },
}

/// One-shot lifecycle notifications for the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
  /// An inventory decrement crossed from a positive quantity to zero.
  /// Fired exactly once per crossing; the UI typically offers to put the
  /// item back on the shopping list.
  Depleted { item_id: String, name: String },
}

/// Input for recording a newly observed price.
#[derive(Debug, Clone)]
pub struct NewPrice {
  pub category: String,
  pub sub_category: String,
  pub item_name: String,
  pub variety: String,
  pub brand: String,
  pub barcode: Option<String>,
  pub record: PriceRecord,
}

/// Sync coordinator for one user/family scope.
///
/// Owns the entity cache and the reorder reentrancy guard as plain
/// fields, so tests construct isolated instances; there is no
/// process-wide state anywhere.
pub struct SyncEngine<G: RemoteGateway> {
  cache: EntityCache,
  gateway: G,
  scope: Scope,
  reorder: ReorderState,
  events: mpsc::UnboundedSender<EngineEvent>,
}

/// What became of one push-invalidation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationOutcome {
  /// Triggered a reconciliation fetch.
  Reconciled,
  /// Dropped because the reorder guard was active. Not queued.
  Dropped,
  /// Table is not watched; nothing to do.
  Ignored,
}

impl<G: RemoteGateway> SyncEngine<G> {
  /// Create an engine plus the receiving end of its event stream.
  pub fn new(gateway: G, scope: Scope) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
    Self::with_reorder_windows(gateway, scope, DEBOUNCE, SETTLE)
  }

  /// Same, with explicit debounce/settle windows (see `config`).
  pub fn with_reorder_windows(
    gateway: G,
    scope: Scope,
    debounce: std::time::Duration,
    settle: std::time::Duration,
  ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
      Self {
        cache: EntityCache::new(),
        gateway,
        scope,
        reorder: ReorderState::new(debounce, settle),
        events: tx,
      },
      rx,
    )
  }

  /// Read access for the decision engine and the UI.
  pub fn cache(&self) -> &EntityCache {
    &self.cache
  }

  pub fn scope(&self) -> &Scope {
    &self.scope
  }

  // ---- reconciliation ----------------------------------------------------

  /// Fetch the full authoritative state and replace the cache wholesale.
  ///
  /// This is the only conflict-resolution mechanism: last reconciliation
  /// wins, no field-level merge. A rejected fetch leaves the cache
  /// untouched; the next invalidation or explicit call retries.
  pub async fn reconcile(&mut self) -> Result<()> {
    let snapshot = self.gateway.fetch_snapshot(&self.scope).await?;
    self.cache.replace_all(snapshot);
    debug!("cache reconciled from remote");
    Ok(())
  }

  /// Handle one coarse push-invalidation signal.
  ///
  /// Signals arriving while the reorder guard is active are dropped, not
  /// queued; coarse table-level invalidation means the next signal will
  /// refetch everything anyway.
  pub async fn handle_invalidation(&mut self, table: Table) -> InvalidationOutcome {
    if !table.is_watched() {
      return InvalidationOutcome::Ignored;
    }
    if self.reorder.suppresses_invalidation(Instant::now()) {
      debug!(?table, "invalidation dropped: reorder commit in flight");
      return InvalidationOutcome::Dropped;
    }
    if let Err(e) = self.reconcile().await {
      warn!(?table, error = %e, "reconciliation fetch failed");
    }
    InvalidationOutcome::Reconciled
  }

  // ---- generic optimistic mutations --------------------------------------

  /// Optimistically insert or replace one record.
  ///
  /// The cache is mutated before the remote call is issued; a remote
  /// rejection is logged and recovered by reconciliation, never surfaced
  /// to the caller.
  pub async fn upsert(&mut self, record: EntityRecord) {
    self.cache.upsert(record.clone());
    self.persist_upsert(record).await;
  }

  /// Optimistically delete one record.
  pub async fn delete(&mut self, table: Table, id: &str) {
    self.cache.delete(table, id);
    if let Err(e) = self.gateway.delete(&self.scope, table, id).await {
      warn!(?table, id, error = %e, "remote delete rejected");
      self.reconcile_after_failure().await;
    }
  }

  async fn persist_upsert(&mut self, record: EntityRecord) {
    let table = record.table();
    let id = record.id().to_string();
    match self.gateway.upsert(&self.scope, record).await {
      // The stored form may carry remote-assigned fields; fold it back in.
      Ok(stored) => self.cache.upsert(stored),
      Err(e) => {
        warn!(?table, %id, error = %e, "remote upsert rejected");
        self.reconcile_after_failure().await;
      }
    }
  }

  async fn reconcile_after_failure(&mut self) {
    if let Err(e) = self.reconcile().await {
      warn!(error = %e, "reconciliation after failed write also failed");
    }
  }

  // ---- prices ------------------------------------------------------------

  /// Record a newly observed price, resolving product identity first.
  ///
  /// Matches an existing product by barcode, or by case-insensitive
  /// (item name, variety, brand); otherwise creates a new product. The
  /// record is prepended so history stays newest-first. Returns the id
  /// of the product the record landed on.
  pub async fn record_price(&mut self, entry: NewPrice) -> Result<String, SyncError> {
    if entry.record.price <= 0.0 || entry.record.quantity <= 0.0 {
      return Err(SyncError::InvalidPrice {
        price: entry.record.price,
        quantity: entry.record.quantity,
      });
    }

    let existing = plan::resolve_product(
      &self.cache.products,
      entry.barcode.as_deref(),
      &entry.item_name,
      &entry.variety,
      &entry.brand,
    )
    .map(|p| p.id.clone());

    let product = match existing {
      Some(id) => {
        let mut product = match self.cache.product(&id) {
          Some(p) => p.clone(),
          None => {
            return Err(SyncError::NotFound {
              table: Table::Products,
              id,
            })
          }
        };
        product.price_history.insert(0, entry.record);
        if product.barcode.is_none() {
          product.barcode = entry.barcode;
        }
        product
      }
      None => Product {
        id: Uuid::new_v4().to_string(),
        owner: self.scope.user_id.clone(),
        family_id: self.scope.family_id.clone(),
        category: entry.category,
        sub_category: entry.sub_category,
        item_name: entry.item_name,
        variety: entry.variety,
        brand: entry.brand,
        barcode: entry.barcode,
        price_history: vec![entry.record],
      },
    };

    let id = product.id.clone();
    self.upsert(EntityRecord::Product(product)).await;
    Ok(id)
  }

  // ---- inventory ---------------------------------------------------------

  /// Adjust an inventory quantity by a signed delta.
  ///
  /// Decrements clamp at zero. A decrement that crosses from a positive
  /// quantity to exactly zero emits one `Depleted` event and deletes the
  /// item; depleted items are removed, not kept at zero.
  pub async fn adjust_inventory(&mut self, id: &str, delta: f64) -> Result<(), SyncError> {
    let item = self
      .cache
      .inventory_item(id)
      .cloned()
      .ok_or_else(|| SyncError::NotFound {
        table: Table::Inventory,
        id: id.to_string(),
      })?;

    let next = if delta < 0.0 {
      (item.quantity - delta.abs()).max(0.0)
    } else {
      item.quantity + delta
    };

    if item.quantity > 0.0 && next == 0.0 {
      let _ = self.events.send(EngineEvent::Depleted {
        item_id: item.id.clone(),
        name: item.name.clone(),
      });
      self.delete(Table::Inventory, id).await;
      return Ok(());
    }

    let updated = InventoryItem {
      quantity: next,
      updated_at: Utc::now(),
      ..item
    };
    self.upsert(EntityRecord::Inventory(updated)).await;
    Ok(())
  }

  // ---- shopping list -----------------------------------------------------

  /// Move a shopping item into a trip group by hand. Equivalent to
  /// setting (or clearing) the manual store override; the override takes
  /// precedence over any derived store from then on.
  pub async fn set_store_override(
    &mut self,
    id: &str,
    store: Option<String>,
  ) -> Result<(), SyncError> {
    let item = self
      .cache
      .shopping_item(id)
      .cloned()
      .ok_or_else(|| SyncError::NotFound {
        table: Table::ShoppingList,
        id: id.to_string(),
      })?;

    self
      .upsert(EntityRecord::Shopping(ShoppingItem {
        store_override: store,
        ..item
      }))
      .await;
    Ok(())
  }

  /// Import a batch of shopping items in one remote write.
  ///
  /// Unlike the fire-and-forget paths, a remote rejection here
  /// propagates to the caller (after reconciliation) so a multi-item
  /// import does not declare success it cannot back up.
  pub async fn import_shopping_items(&mut self, items: Vec<ShoppingItem>) -> Result<()> {
    for item in &items {
      self.cache.upsert(EntityRecord::Shopping(item.clone()));
    }
    let records = items.into_iter().map(EntityRecord::Shopping).collect();
    if let Err(e) = self
      .gateway
      .bulk_upsert(&self.scope, Table::ShoppingList, records)
      .await
    {
      warn!(error = %e, "shopping import rejected");
      self.reconcile_after_failure().await;
      return Err(e);
    }
    Ok(())
  }

  // ---- storage locations -------------------------------------------------

  /// Apply a new storage-location order to the cache immediately and
  /// start (or reset) the debounced bulk commit.
  ///
  /// Ids appear in display order; sort orders are rewritten to match.
  /// Ids not present in the cache are ignored.
  pub fn reorder_storage_locations(&mut self, ordered_ids: &[String]) {
    for (position, id) in ordered_ids.iter().enumerate() {
      if let Some(loc) = self
        .cache
        .storage_locations
        .iter_mut()
        .find(|l| &l.id == id)
      {
        loc.sort_order = position as i64;
      } else {
        debug!(%id, "reorder mentions unknown storage location");
      }
    }
    self.cache.storage_locations.sort_by_key(|l| l.sort_order);
    self.reorder.on_reorder(Instant::now());
  }

  /// Next wakeup for the host loop's reorder timer, if a commit is
  /// pending.
  pub fn reorder_deadline(&self) -> Option<Instant> {
    self.reorder.deadline()
  }

  pub fn reorder_phase(&self) -> ReorderPhase {
    self.reorder.phase()
  }

  /// Timer driver: issue the pending bulk commit if the quiet period has
  /// elapsed. Returns true when a commit was issued.
  ///
  /// The reentrancy guard is active from here until the remote call
  /// settles; invalidations arriving meanwhile are dropped.
  pub async fn flush_due_reorder(&mut self) -> bool {
    if !self.reorder.is_due(Instant::now()) {
      return false;
    }
    self.reorder.on_commit_start(Instant::now());

    let records = self
      .cache
      .storage_locations
      .iter()
      .cloned()
      .map(EntityRecord::StorageLocation)
      .collect();

    match self
      .gateway
      .bulk_upsert(&self.scope, Table::StorageLocations, records)
      .await
    {
      Ok(()) => self.reorder.on_commit_ack(Instant::now()),
      Err(e) => {
        warn!(error = %e, "storage-location reorder commit rejected");
        self.reorder.on_commit_failure();
        self.reconcile_after_failure().await;
      }
    }
    true
  }

  // ---- taxonomy ----------------------------------------------------------

  /// Delete a custom category unless products or inventory still
  /// reference its name. Rejection happens before any mutation.
  pub async fn delete_category(&mut self, id: &str) -> Result<(), SyncError> {
    let category = self
      .cache
      .categories
      .iter()
      .find(|c| c.id == id)
      .cloned()
      .ok_or_else(|| SyncError::NotFound {
        table: Table::Categories,
        id: id.to_string(),
      })?;

    let references = self
      .cache
      .products
      .iter()
      .filter(|p| p.category.eq_ignore_ascii_case(&category.name))
      .count()
      + self
        .cache
        .inventory
        .iter()
        .filter(|i| i.category.eq_ignore_ascii_case(&category.name))
        .count();

    if references > 0 {
      return Err(SyncError::CategoryInUse {
        name: category.name,
        references,
      });
    }

    self.delete(Table::Categories, id).await;
    Ok(())
  }

  /// Same guard for custom sub-categories.
  pub async fn delete_sub_category(&mut self, id: &str) -> Result<(), SyncError> {
    let sub = self
      .cache
      .sub_categories
      .iter()
      .find(|c| c.id == id)
      .cloned()
      .ok_or_else(|| SyncError::NotFound {
        table: Table::SubCategories,
        id: id.to_string(),
      })?;

    let references = self
      .cache
      .products
      .iter()
      .filter(|p| p.sub_category.eq_ignore_ascii_case(&sub.name))
      .count()
      + self
        .cache
        .inventory
        .iter()
        .filter(|i| i.sub_category.eq_ignore_ascii_case(&sub.name))
        .count();

    if references > 0 {
      return Err(SyncError::CategoryInUse {
        name: sub.name,
        references,
      });
    }

    self.delete(Table::SubCategories, id).await;
    Ok(())
  }

  // ---- meal ideas --------------------------------------------------------

  /// Local lifecycle: bump the cook count and stamp last-cooked.
  pub async fn mark_meal_cooked(&mut self, id: &str) -> Result<(), SyncError> {
    let idea = self
      .cache
      .meal_idea(id)
      .cloned()
      .ok_or_else(|| SyncError::NotFound {
        table: Table::MealIdeas,
        id: id.to_string(),
      })?;

    self
      .upsert(EntityRecord::MealIdea(MealIdea {
        cook_count: idea.cook_count + 1,
        last_cooked: Some(Utc::now()),
        ..idea
      }))
      .await;
    Ok(())
  }

  /// Local lifecycle: write a 1-5 star rating.
  pub async fn rate_meal(&mut self, id: &str, rating: u8) -> Result<(), SyncError> {
    if !(1..=5).contains(&rating) {
      return Err(SyncError::InvalidRating(rating));
    }
    let idea = self
      .cache
      .meal_idea(id)
      .cloned()
      .ok_or_else(|| SyncError::NotFound {
        table: Table::MealIdeas,
        id: id.to_string(),
      })?;

    self
      .upsert(EntityRecord::MealIdea(MealIdea {
        rating: Some(rating),
        ..idea
      }))
      .await;
    Ok(())
  }

  // ---- cellar ------------------------------------------------------------

  /// Consume from a cellar item: clamp the quantity at zero and append
  /// an entry to the append-only consumption history. Cellar items stay
  /// at zero rather than being removed; low stock is a level condition
  /// evaluated on read.
  pub async fn consume_cellar(&mut self, id: &str, amount: f64) -> Result<(), SyncError> {
    let item = self
      .cache
      .cellar_item(id)
      .cloned()
      .ok_or_else(|| SyncError::NotFound {
        table: Table::CellarItems,
        id: id.to_string(),
      })?;

    let next = (item.quantity - amount.abs()).max(0.0);
    let consumed = item.quantity - next;

    self
      .upsert(EntityRecord::Cellar(CellarItem {
        quantity: next,
        ..item
      }))
      .await;
    self
      .upsert(EntityRecord::Consumption(ConsumptionLog {
        id: Uuid::new_v4().to_string(),
        cellar_item_id: id.to_string(),
        amount: consumed,
        consumed_at: Utc::now(),
      }))
      .await;
    Ok(())
  }
}
