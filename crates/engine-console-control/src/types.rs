//! Request types for console operations.
//!
//! Edit requests carry only the fields the user changed. They are applied to
//! a form draft, which rejects invalid values before anything reaches the
//! store.

use engine_console_core::TimeUnit;
use serde::{Deserialize, Serialize};

/// An autoscaling range as entered on the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRange {
    /// Lower bound.
    pub min: u32,
    /// Upper bound.
    pub max: u32,
}

/// Fields of the engine edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineEdit {
    /// New display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// New max concurrency.
    #[serde(default)]
    pub max_concurrency: Option<u32>,
    /// New minimum warmup, in CU.
    #[serde(default)]
    pub min_warmup: Option<u32>,
    /// New autoscaling range.
    #[serde(default)]
    pub worker_range: Option<WorkerRange>,
}

/// Fields of the channel edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEdit {
    /// New channel name.
    #[serde(default)]
    pub channel_name: Option<String>,
    /// New queue capacity.
    #[serde(default)]
    pub max_queue: Option<u32>,
    /// New concurrency rate percentage.
    #[serde(default)]
    pub concurrency_rate: Option<u32>,
    /// New queue timeout value.
    #[serde(default)]
    pub queue_timeout: Option<u32>,
    /// Unit of the queue timeout. Keeps the current unit when absent.
    #[serde(default)]
    pub queue_timeout_unit: Option<TimeUnit>,
}

/// Fields of the resource pool edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEdit {
    /// New display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// New running CU ceiling.
    #[serde(default, rename = "maxRunningCU")]
    pub max_running_cu: Option<u32>,
    /// New queue capacity.
    #[serde(default)]
    pub max_queue: Option<u32>,
}

/// Configuration for the console service.
#[derive(Debug, Clone, Default)]
pub struct ConsoleConfig {
    /// Fixed seed for the metrics simulators. Entropy when absent.
    pub metrics_seed: Option<u64>,
}

impl ConsoleConfig {
    /// Configuration with seeded simulators.
    #[must_use]
    pub const fn seeded(seed: u64) -> Self {
        Self {
            metrics_seed: Some(seed),
        }
    }
}
