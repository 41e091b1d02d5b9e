//! Resource-pool header simulation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use engine_console_core::{PoolId, ResourcePool};
use parking_lot::Mutex;
use serde::Serialize;

use crate::rng_stream;
use crate::rules;
use crate::ticker::Ticker;

/// Pool headers refresh on this fixed period.
pub const POOL_REFRESH: Duration = Duration::from_secs(4);

/// A simulated `current / total` figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gauge {
    /// Simulated current value, always within `[0, total]`.
    pub current: u32,
    /// Capacity from the pool record.
    pub total: u32,
}

impl Gauge {
    fn clamped(current: u32, total: u32) -> Self {
        Self {
            current: current.min(total),
            total,
        }
    }
}

/// Live values shown in one pool header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolReading {
    /// Pool the header belongs to.
    pub pool_id: PoolId,
    /// Running CU.
    pub running_cu: Gauge,
    /// Queue occupancy.
    pub queue: Gauge,
    /// Task figure: the linked engine count, or the pool's seed when none.
    pub task_count: u32,
    /// When any value last changed.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
struct HeaderState {
    reading: PoolReading,
    task_seed: u32,
}

impl HeaderState {
    fn set_engine_count(&mut self, engine_count: usize) {
        self.reading.task_count = match u32::try_from(engine_count) {
            Ok(0) => self.task_seed,
            Ok(count) => count,
            Err(_) => u32::MAX,
        };
    }
}

/// The mounted simulator of one pool header.
#[derive(Debug)]
pub struct PoolHeaderMetrics {
    state: Arc<Mutex<HeaderState>>,
    _ticker: Ticker,
}

impl PoolHeaderMetrics {
    /// Mount a header with entropy-seeded randomness.
    #[must_use]
    pub fn mount(pool: &ResourcePool, engine_count: usize) -> Self {
        Self::mount_with(pool, engine_count, None)
    }

    /// Mount a header with a fixed seed.
    #[must_use]
    pub fn mount_seeded(pool: &ResourcePool, engine_count: usize, seed: u64) -> Self {
        Self::mount_with(pool, engine_count, Some(seed))
    }

    fn mount_with(pool: &ResourcePool, engine_count: usize, seed: Option<u64>) -> Self {
        let mut state = HeaderState {
            reading: PoolReading {
                pool_id: pool.id.clone(),
                running_cu: Gauge::clamped(pool.running_cu_metric.current, pool.running_cu_metric.total),
                queue: Gauge::clamped(pool.queue_metric.current, pool.queue_metric.total),
                task_count: pool.task_metric.current,
                updated_at: Utc::now(),
            },
            task_seed: pool.task_metric.current,
        };
        state.set_engine_count(engine_count);
        let state = Arc::new(Mutex::new(state));

        let mut rng = rng_stream(seed, 0);
        let ticker_state = Arc::clone(&state);
        let ticker = Ticker::every(POOL_REFRESH, move || {
            let mut state = ticker_state.lock();
            let reading = &mut state.reading;
            reading.running_cu.current =
                rules::drift_pool_cu(&mut rng, reading.running_cu.current, reading.running_cu.total);
            reading.queue.current =
                rules::drift_pool_queue(&mut rng, reading.queue.current, reading.queue.total);
            reading.updated_at = Utc::now();
        });

        tracing::debug!(pool_id = %pool.id, engine_count, "Mounted pool header");
        Self {
            state,
            _ticker: ticker,
        }
    }

    /// The current values.
    #[must_use]
    pub fn reading(&self) -> PoolReading {
        self.state.lock().reading.clone()
    }

    /// Pick up edited totals from the pool record.
    ///
    /// A current value above its new total is clamped right away rather than
    /// waiting for the next tick.
    pub fn retotal(&self, pool: &ResourcePool) {
        let mut state = self.state.lock();
        let reading = &mut state.reading;
        if reading.running_cu.total == pool.running_cu_metric.total
            && reading.queue.total == pool.queue_metric.total
        {
            return;
        }
        reading.running_cu = Gauge::clamped(reading.running_cu.current, pool.running_cu_metric.total);
        reading.queue = Gauge::clamped(reading.queue.current, pool.queue_metric.total);
        reading.updated_at = Utc::now();
        tracing::debug!(
            pool_id = %pool.id,
            running_cu_total = pool.running_cu_metric.total,
            queue_total = pool.queue_metric.total,
            "Pool header totals changed"
        );
    }

    /// Update the linked engine count.
    pub fn set_engine_count(&self, engine_count: usize) {
        self.state.lock().set_engine_count(engine_count);
    }
}
