//! Engine catalog storage for engine-console.
//!
//! This crate owns the canonical engine, channel and resource-pool records for
//! the lifetime of the process. Records are loaded once from JSON fixtures and
//! then only changed through the edit controller operations on [`Store`].
//!
//! # Architecture
//!
//! - [`Catalog`]: an immutable snapshot of all records, each behind an `Arc`
//! - [`MemoryStore`]: holds the current snapshot and swaps in a new one per edit
//! - [`loader`]: reads the eight fixture documents (bundled or from a directory)
//! - [`patch`]: typed partial updates with explicit merge depth
//!
//! # Example
//!
//! ```
//! use engine_console_store::{EnginePatch, FixtureSource, MemoryStore, Store};
//! use engine_console_core::EngineId;
//!
//! let store = MemoryStore::load(&FixtureSource::Bundled);
//! let id = EngineId::new("trino-prod").unwrap();
//!
//! let patch = EnginePatch {
//!     display_name: Some("Trino (primary)".to_string()),
//!     ..EnginePatch::default()
//! };
//! assert!(store.update_engine(&id, &patch));
//! assert_eq!(store.get_engine(&id).unwrap().display_name, "Trino (primary)");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod error;
pub mod loader;
pub mod memory;
pub mod patch;

pub use catalog::Catalog;
pub use error::{Result, StoreError};
pub use loader::{load_catalog, FixtureSource};
pub use memory::MemoryStore;
pub use patch::{ChannelPatch, EnginePatch, PoolPatch};

use std::sync::Arc;

use engine_console_core::{Channel, ChannelId, Engine, EngineId, EngineType, PoolId, ResourcePool};

/// The storage trait defining catalog reads and the edit controller.
///
/// Lookups return `None` on a miss. Updates return whether a record matched;
/// a miss leaves the catalog untouched.
pub trait Store: Send + Sync {
    // =========================================================================
    // Snapshot
    // =========================================================================

    /// The current catalog snapshot.
    fn snapshot(&self) -> Arc<Catalog>;

    // =========================================================================
    // Edit controller
    // =========================================================================

    /// Patch an engine by id.
    fn update_engine(&self, id: &EngineId, patch: &EnginePatch) -> bool;

    /// Patch a channel of an engine.
    fn update_channel(&self, engine_id: &EngineId, channel_id: &ChannelId, patch: &ChannelPatch) -> bool;

    /// Patch a resource pool by id.
    fn update_pool(&self, id: &PoolId, patch: &PoolPatch) -> bool;

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get an engine by id.
    fn get_engine(&self, id: &EngineId) -> Option<Arc<Engine>> {
        self.snapshot().engine(id).cloned()
    }

    /// Get a pool by id.
    fn get_pool(&self, id: &PoolId) -> Option<Arc<ResourcePool>> {
        self.snapshot().pool(id).cloned()
    }

    /// Get a channel by engine and channel id.
    fn get_channel(&self, engine_id: &EngineId, channel_id: &ChannelId) -> Option<Channel> {
        self.snapshot().channel(engine_id, channel_id).cloned()
    }

    /// All engines of one type, in load order.
    fn engines_by_type(&self, engine_type: EngineType) -> Vec<Arc<Engine>> {
        self.snapshot().engines_of_type(engine_type).cloned().collect()
    }

    /// Distinct engine types in order of first appearance.
    fn engine_types(&self) -> Vec<EngineType> {
        self.snapshot().engine_types()
    }
}
