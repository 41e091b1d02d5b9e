//! Immutable catalog snapshots.
//!
//! A [`Catalog`] is never mutated in place. Edits build a new catalog that
//! shares every untouched record with its predecessor, so readers holding an
//! older snapshot always see a fully formed state.

use std::collections::HashSet;
use std::sync::Arc;

use engine_console_core::{Channel, ChannelId, Engine, EngineId, EngineType, PoolId, ResourcePool};

use crate::error::{Result, StoreError};

/// The full set of engine and resource-pool records.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    engines: Vec<Arc<Engine>>,
    pools: Vec<Arc<ResourcePool>>,
}

impl Catalog {
    /// Build a catalog, preserving record order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEngine` or `StoreError::DuplicatePool` if
    /// an id occurs twice.
    pub fn new(engines: Vec<Engine>, pools: Vec<ResourcePool>) -> Result<Self> {
        let mut seen = HashSet::new();
        for engine in &engines {
            if !seen.insert(&engine.id) {
                return Err(StoreError::DuplicateEngine(engine.id.clone()));
            }
        }
        let mut seen = HashSet::new();
        for pool in &pools {
            if !seen.insert(&pool.id) {
                return Err(StoreError::DuplicatePool(pool.id.clone()));
            }
        }

        Ok(Self {
            engines: engines.into_iter().map(Arc::new).collect(),
            pools: pools.into_iter().map(Arc::new).collect(),
        })
    }

    /// All engines in load order.
    #[must_use]
    pub fn engines(&self) -> &[Arc<Engine>] {
        &self.engines
    }

    /// All pools in load order.
    #[must_use]
    pub fn pools(&self) -> &[Arc<ResourcePool>] {
        &self.pools
    }

    /// Whether the catalog holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty() && self.pools.is_empty()
    }

    /// Find an engine by id.
    #[must_use]
    pub fn engine(&self, id: &EngineId) -> Option<&Arc<Engine>> {
        self.engines.iter().find(|e| &e.id == id)
    }

    /// Find a pool by id.
    #[must_use]
    pub fn pool(&self, id: &PoolId) -> Option<&Arc<ResourcePool>> {
        self.pools.iter().find(|p| &p.id == id)
    }

    /// Find a channel within an engine.
    #[must_use]
    pub fn channel(&self, engine_id: &EngineId, channel_id: &ChannelId) -> Option<&Channel> {
        self.engine(engine_id)?.channel(channel_id)
    }

    /// Engines of one type, in load order.
    pub fn engines_of_type(&self, engine_type: EngineType) -> impl Iterator<Item = &Arc<Engine>> {
        self.engines
            .iter()
            .filter(move |e| e.engine_type == engine_type)
    }

    /// Distinct engine types in order of first appearance.
    #[must_use]
    pub fn engine_types(&self) -> Vec<EngineType> {
        let mut types = Vec::new();
        for engine in &self.engines {
            if !types.contains(&engine.engine_type) {
                types.push(engine.engine_type);
            }
        }
        types
    }

    /// Number of engines referencing a pool, regardless of visibility.
    #[must_use]
    pub fn pool_engine_count(&self, pool_id: &PoolId) -> usize {
        self.engines
            .iter()
            .filter(|e| e.resource_pool_id.as_ref() == Some(pool_id))
            .count()
    }

    pub(crate) fn engine_index(&self, id: &EngineId) -> Option<usize> {
        self.engines.iter().position(|e| &e.id == id)
    }

    pub(crate) fn pool_index(&self, id: &PoolId) -> Option<usize> {
        self.pools.iter().position(|p| &p.id == id)
    }

    /// A copy of this catalog with the engine at `index` replaced.
    pub(crate) fn with_engine(&self, index: usize, engine: Engine) -> Self {
        let mut engines = self.engines.clone();
        engines[index] = Arc::new(engine);
        Self {
            engines,
            pools: self.pools.clone(),
        }
    }

    /// A copy of this catalog with the pool at `index` replaced.
    pub(crate) fn with_pool(&self, index: usize, pool: ResourcePool) -> Self {
        let mut pools = self.pools.clone();
        pools[index] = Arc::new(pool);
        Self {
            engines: self.engines.clone(),
            pools,
        }
    }
}
