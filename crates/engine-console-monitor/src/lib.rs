//! Simulated live metrics for engine-console.
//!
//! Nothing here reads real telemetry. Each mounted view element owns a small
//! simulator that perturbs the seed values from its record on a timer:
//!
//! - [`EngineCardMetrics`]: CPU, memory, node and task counts of one engine card,
//!   each on its own interval picked from 4, 8 or 12 seconds
//! - [`PoolHeaderMetrics`]: running CU and queue of one resource pool, every 4 seconds
//! - [`MetricsPanel`]: the selected engine's metrics with a 7-point history,
//!   every 5 seconds, plus a countdown and manual refresh
//!
//! Timers are [`Ticker`]s that abort on drop, and a [`Dashboard`] mounts and
//! drops simulators as the view changes. The value rules themselves live in
//! [`rules`] as pure functions over an injected random source.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod card;
pub mod dashboard;
pub mod panel;
pub mod pool;
pub mod rules;
pub mod ticker;

pub use card::{CardIntervals, CardReading, EngineCardMetrics};
pub use dashboard::{Dashboard, DashboardReadings, MountPlan, PoolMount, ReconcileSummary};
pub use panel::{MetricSeries, MetricsPanel, PanelReading};
pub use pool::{Gauge, PoolHeaderMetrics, PoolReading};
pub use rules::MetricKind;
pub use ticker::Ticker;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// A random source for one simulated value.
///
/// With a seed, each `stream` gets its own deterministic sequence.
pub(crate) fn rng_stream(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_mul(31).wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}
