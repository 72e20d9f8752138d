//! larder: local-first synchronization and trip-decision engine for a
//! household grocery/price tracker.
//!
//! The crate keeps an in-memory per-entity cache consistent with a
//! remote store under optimistic, possibly-failing writes and coarse
//! push invalidations, and derives shopping decisions (best unit price,
//! trip grouping, fuel cost, depletion) from that cache. Storage, push
//! transport, AI suggestions, geolocation, and rendering are external
//! collaborators behind the traits in [`remote`], [`suggest`], and
//! [`geo`].

pub mod cache;
pub mod config;
pub mod geo;
pub mod logging;
pub mod model;
pub mod plan;
pub mod remote;
pub mod suggest;
pub mod sync;

pub use cache::EntityCache;
pub use config::Config;
pub use remote::{RemoteGateway, Scope, Snapshot, Table};
pub use sync::{EngineEvent, SyncEngine, SyncError};
