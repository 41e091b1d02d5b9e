//! In-memory store implementation.
//!
//! This module provides the `MemoryStore` implementation of the `Store` trait.

use std::sync::Arc;

use engine_console_core::{ChannelId, Engine, EngineId, PoolId, ResourcePool};
use parking_lot::RwLock;

use crate::catalog::Catalog;
use crate::loader::{load_catalog, FixtureSource};
use crate::patch::{ChannelPatch, EnginePatch, PoolPatch};
use crate::Store;

/// Catalog held behind a copy-on-write pointer.
///
/// Writers build a new [`Catalog`] and swap it in under the write lock;
/// readers clone the `Arc` and never observe a half-applied edit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: RwLock<Arc<Catalog>>,
}

impl MemoryStore {
    /// Create a store over an existing catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Create a store with no records.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the catalog from fixtures.
    ///
    /// A load failure is logged and yields an empty store so the console
    /// still comes up.
    #[must_use]
    pub fn load(source: &FixtureSource) -> Self {
        match load_catalog(source) {
            Ok(catalog) => {
                tracing::info!(
                    engines = catalog.engines().len(),
                    pools = catalog.pools().len(),
                    "Loaded engine catalog"
                );
                Self::new(catalog)
            }
            Err(e) => {
                tracing::error!(error = %e, ?source, "Failed to load engine catalog, starting empty");
                Self::empty()
            }
        }
    }

    /// Swap in the catalog produced by `edit`, if it produces one.
    fn replace(&self, edit: impl FnOnce(&Catalog) -> Option<Catalog>) -> bool {
        let mut current = self.catalog.write();
        match edit(&current) {
            Some(next) => {
                *current = Arc::new(next);
                true
            }
            None => false,
        }
    }
}

impl Store for MemoryStore {
    fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read())
    }

    fn update_engine(&self, id: &EngineId, patch: &EnginePatch) -> bool {
        let updated = self.replace(|catalog| {
            let index = catalog.engine_index(id)?;
            let mut engine = Engine::clone(&catalog.engines()[index]);
            patch.apply(&mut engine);
            Some(catalog.with_engine(index, engine))
        });

        if updated {
            tracing::info!(engine_id = %id, "Updated engine");
        } else {
            tracing::warn!(engine_id = %id, "Engine not found, update ignored");
        }
        updated
    }

    fn update_channel(&self, engine_id: &EngineId, channel_id: &ChannelId, patch: &ChannelPatch) -> bool {
        let updated = self.replace(|catalog| {
            let index = catalog.engine_index(engine_id)?;
            let position = catalog.engines()[index]
                .channels
                .iter()
                .position(|c| &c.id == channel_id)?;
            let mut engine = Engine::clone(&catalog.engines()[index]);
            patch.apply(&mut engine.channels[position]);
            Some(catalog.with_engine(index, engine))
        });

        if updated {
            tracing::info!(engine_id = %engine_id, channel_id = %channel_id, "Updated channel");
        } else {
            tracing::warn!(
                engine_id = %engine_id,
                channel_id = %channel_id,
                "Channel not found, update ignored"
            );
        }
        updated
    }

    fn update_pool(&self, id: &PoolId, patch: &PoolPatch) -> bool {
        let updated = self.replace(|catalog| {
            let index = catalog.pool_index(id)?;
            let mut pool = ResourcePool::clone(&catalog.pools()[index]);
            patch.apply(&mut pool);
            Some(catalog.with_pool(index, pool))
        });

        if updated {
            tracing::info!(pool_id = %id, "Updated resource pool");
        } else {
            tracing::warn!(pool_id = %id, "Resource pool not found, update ignored");
        }
        updated
    }
}
