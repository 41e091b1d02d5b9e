//! Core types and encodings for engine-console.
//!
//! This crate provides the foundational types used throughout the console:
//!
//! - **Identifiers**: Strongly-typed ids for engines, channels, pools and feature flags
//! - **Records**: Engines, channels, resource pools and metric seeds as loaded from fixtures
//! - **Encodings**: Queue timeouts (`5min`) and scale counts (`4~8`), with
//!   their own parse errors
//!
//! # Example
//!
//! ```
//! use engine_console_core::{EngineId, QueueTimeout, ScaleCount, TimeUnit};
//!
//! let id = EngineId::new("trino-prod-01").unwrap();
//! assert_eq!(id.as_str(), "trino-prod-01");
//!
//! let timeout: QueueTimeout = "5min".parse().unwrap();
//! assert_eq!(timeout.unit, TimeUnit::Minutes);
//!
//! let count = ScaleCount::from_bounds(2, 6).unwrap();
//! assert_eq!(count.to_string(), "2~6");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod encoding;
pub mod ids;
pub mod types;

pub use encoding::{EncodingError, QueueTimeout, ScaleCount, TimeUnit};
pub use ids::{ChannelId, EngineId, FeatureId, IdError, PoolId};
pub use types::{
    Channel, ChannelStatus, ClusterType, CreationType, Engine, EngineScale, EngineType,
    FeatureFlag, FlagGroup, FlinkSubType, MaxConcurrency, Metric, MetricValue, PoolKind,
    PoolStatus, Progress, ResourcePool, TaskMetric,
};
