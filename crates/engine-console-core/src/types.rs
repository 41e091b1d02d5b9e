//! Record types for engines, channels, resource pools and metrics.
//!
//! These mirror the fixture documents field for field (camelCase on the wire).

use serde::{Deserialize, Serialize};

use crate::encoding::{QueueTimeout, ScaleCount};
use crate::ids::{ChannelId, EngineId, FeatureId, PoolId};

/// Kind of compute or storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    /// Trino query engine.
    Trino,
    /// `StarRocks` analytical database.
    Starrocks,
    /// Flink stream/batch engine.
    Flink,
    /// Hive batch engine.
    Hive,
    /// `AutoMQ` message storage.
    Automq,
}

impl EngineType {
    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trino => "trino",
            Self::Starrocks => "starrocks",
            Self::Flink => "flink",
            Self::Hive => "hive",
            Self::Automq => "automq",
        }
    }

    /// Display label used for tabs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trino => "Trino",
            Self::Starrocks => "StarRocks",
            Self::Flink => "Flink",
            Self::Hive => "Hive",
            Self::Automq => "AutoMQ",
        }
    }

    /// Label of the node-count figure on engine cards.
    #[must_use]
    pub const fn node_unit(self) -> &'static str {
        match self {
            Self::Starrocks => "CN",
            Self::Flink => "TM",
            Self::Automq => "Instance",
            Self::Trino | Self::Hive => "Worker",
        }
    }
}

/// Flink-specific classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlinkSubType {
    /// Session cluster.
    #[default]
    Session,
    /// Engine running inside a realtime resource pool.
    ResourcePoolRealtime,
    /// Engine running inside a batch resource pool.
    ResourcePoolBatch,
}

impl FlinkSubType {
    /// The pool kind this sub-type lists, if it is a resource-pool sub-type.
    #[must_use]
    pub const fn pool_kind(self) -> Option<PoolKind> {
        match self {
            Self::Session => None,
            Self::ResourcePoolRealtime => Some(PoolKind::Realtime),
            Self::ResourcePoolBatch => Some(PoolKind::Batch),
        }
    }
}

/// How an engine came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreationType {
    /// Shipped with the warehouse.
    Preset,
    /// Created by a user.
    Custom,
}

/// Cluster deployment style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterType {
    /// Fixed-size cluster.
    Normal,
    /// Autoscaling cluster; the only kind whose scale range is editable.
    CloudNative,
}

/// Kind of a resource pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    /// Realtime (streaming) workloads.
    Realtime,
    /// Batch workloads.
    Batch,
}

/// Feature-flag grouping attached to pools and engines at load time.
///
/// Visibility rules key off this tag rather than id naming conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlagGroup {
    /// The realtime data-warehouse task pool, gated by `realtime-task`.
    RealtimeDwTask,
    /// Not gated by any feature.
    #[default]
    None,
}

/// Channel enablement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    /// Accepting work.
    #[default]
    Enabled,
    /// Not accepting work.
    Disabled,
}

/// A `current / total` pair, optionally with a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Current amount.
    pub current: u32,
    /// Capacity ceiling.
    pub total: u32,
    /// Explanation shown next to the figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl Progress {
    /// Create a progress pair without tooltip.
    #[must_use]
    pub const fn new(current: u32, total: u32) -> Self {
        Self {
            current,
            total,
            tooltip: None,
        }
    }
}

/// Node layout of an engine: `<spec> x <count>, <cu type>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineScale {
    /// Node specification, e.g. `4CU`.
    pub spec: String,
    /// Node count, fixed or a range.
    pub count: ScaleCount,
    /// CU type label.
    #[serde(rename = "type")]
    pub cu_type: String,
}

/// Maximum concurrency figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxConcurrency {
    /// Concurrency limit.
    pub value: u32,
    /// Explanation shown next to the figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

/// A metric's value as stored in the fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Numeric reading.
    Number(f64),
    /// Preformatted text.
    Text(String),
}

/// One entry of an engine's metrics panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Metric identifier.
    pub id: String,
    /// Display name; simulation rules key off keywords in it.
    pub name: String,
    /// Seed value.
    pub value: MetricValue,
    /// Unit label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Whether the card is highlighted.
    #[serde(default)]
    pub highlight: bool,
    /// Seed sparkline points.
    #[serde(default)]
    pub chart_data: Vec<f64>,
}

/// A queueing lane within an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Identifier, unique within the engine.
    pub id: ChannelId,
    /// Display name (max 48 characters when edited).
    pub channel_name: String,
    /// Display code.
    pub channel_code: String,
    /// Whether the channel was shipped with the engine.
    #[serde(default)]
    pub is_preset: bool,
    /// Application allowed to use the channel.
    pub available_app: String,
    /// Business mode label.
    pub business_mode: String,
    /// Queue timeout.
    pub queue_timeout: QueueTimeout,
    /// Creator name.
    pub creator: String,
    /// Enablement.
    #[serde(default)]
    pub status: ChannelStatus,
    /// Queue occupancy.
    pub queue_progress: Progress,
    /// Concurrency rate in percent (0-100).
    pub concurrency_rate: u8,
}

/// One compute or storage engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engine {
    /// Unique identifier.
    pub id: EngineId,
    /// Engine kind.
    pub engine_type: EngineType,
    /// Flink classification; only meaningful for Flink engines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flink_sub_type: Option<FlinkSubType>,
    /// Display name (max 48 characters when edited).
    pub display_name: String,
    /// Cluster name.
    pub engine_name: String,
    /// Preset or custom.
    pub creation_type: CreationType,
    /// Engine version label.
    pub version: String,
    /// Business mode label, e.g. `streaming compute`.
    pub business_mode: String,
    /// Deployment style.
    pub cluster_type: ClusterType,
    /// Seed CPU usage percent.
    pub cpu_usage: u8,
    /// Seed memory usage percent.
    pub memory_usage: u8,
    /// Maximum concurrency, when the engine has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<MaxConcurrency>,
    /// Flink maximum CU.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxCU")]
    pub max_cu: Option<u32>,
    /// Flink session maximum running CU.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxRunningCU")]
    pub max_running_cu: Option<u32>,
    /// Flink job manager spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jm_spec: Option<String>,
    /// Flink task manager spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tm_spec: Option<String>,
    /// Flink CU per parallelism.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "parallelCU")]
    pub parallel_cu: Option<String>,
    /// Flink session minimum warmup, encoded `<n>CU`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_warmup: Option<String>,
    /// Coordinator spec (non-Flink query engines).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinator_spec: Option<String>,
    /// Worker spec (non-Flink query engines).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_spec: Option<String>,
    /// `AutoMQ` controller spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_spec: Option<String>,
    /// `AutoMQ` broker spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_spec: Option<String>,
    /// Node layout.
    pub engine_scale: EngineScale,
    /// Seed worker (or CN / controller) count.
    pub worker_count: u32,
    /// Override for the worker count label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_count_label: Option<String>,
    /// Seed running task count, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u32>,
    /// Creator name.
    pub creator: String,
    /// Pool this engine runs in (lookup only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_pool_id: Option<PoolId>,
    /// Feature-flag grouping, inherited from the pool at load time.
    #[serde(default)]
    pub flag_group: FlagGroup,
    /// Queueing lanes.
    #[serde(default)]
    pub channels: Vec<Channel>,
    /// Metrics panel seeds.
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

impl Engine {
    /// Whether this is a Flink engine of the given sub-type.
    #[must_use]
    pub fn is_flink(&self, sub_type: FlinkSubType) -> bool {
        self.engine_type == EngineType::Flink && self.flink_sub_type == Some(sub_type)
    }

    /// Whether this engine runs inside a resource pool.
    #[must_use]
    pub fn is_resource_pool_engine(&self) -> bool {
        self.is_flink(FlinkSubType::ResourcePoolRealtime)
            || self.is_flink(FlinkSubType::ResourcePoolBatch)
    }

    /// Whether the detail panel shows a channel tab for this engine.
    #[must_use]
    pub const fn has_channels_tab(&self) -> bool {
        !matches!(self.engine_type, EngineType::Flink | EngineType::Automq)
    }

    /// Find a channel by id.
    #[must_use]
    pub fn channel(&self, channel_id: &ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|c| &c.id == channel_id)
    }

    /// Label of the worker count figure.
    #[must_use]
    pub fn worker_label(&self) -> String {
        self.worker_count_label
            .clone()
            .unwrap_or_else(|| format!("{} count", self.engine_type.node_unit()))
    }
}

/// Task figure of a resource pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetric {
    /// Task count.
    pub current: u32,
}

/// Status badge of a resource pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Badge text.
    pub text: String,
}

/// A shared capacity pool grouping Flink engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePool {
    /// Unique identifier.
    pub id: PoolId,
    /// Realtime or batch.
    pub pool_type: PoolKind,
    /// Display name (max 48 characters when edited).
    pub display_name: String,
    /// Display code.
    pub pool_code: String,
    /// Status badge.
    pub status: PoolStatus,
    /// Feature-flag grouping.
    #[serde(default)]
    pub flag_group: FlagGroup,
    /// Running CU against the CU ceiling.
    #[serde(rename = "runningCUMetric")]
    pub running_cu_metric: Progress,
    /// Queue occupancy.
    pub queue_metric: Progress,
    /// Task count seed, shown when no engines are linked.
    pub task_metric: TaskMetric,
}

/// A named warehouse feature switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlag {
    /// Flag identifier.
    pub id: FeatureId,
    /// Display name.
    pub name: String,
    /// Current state.
    pub enabled: bool,
    /// Spaces the feature has been rolled out to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled_spaces: Vec<String>,
    /// Application the feature belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_json() -> serde_json::Value {
        serde_json::json!({
            "id": "flink-rt-01",
            "engineType": "flink",
            "flinkSubType": "resource-pool-realtime",
            "displayName": "Realtime ETL",
            "engineName": "rt-etl",
            "creationType": "custom",
            "version": "1.17",
            "businessMode": "streaming compute",
            "clusterType": "cloud-native",
            "cpuUsage": 55,
            "memoryUsage": 61,
            "maxCU": 64,
            "engineScale": { "spec": "4CU", "count": "2~6", "type": "general" },
            "workerCount": 4,
            "taskCount": 12,
            "creator": "ops",
            "resourcePoolId": "pool-rt-dw",
            "metrics": [
                { "id": "m1", "name": "CPU usage", "value": 41, "unit": "%", "chartData": [40, 42] },
                { "id": "m2", "name": "Uptime", "value": "3d" }
            ]
        })
    }

    #[test]
    fn engine_deserializes_from_fixture_shape() {
        let engine: Engine = serde_json::from_value(engine_json()).unwrap();

        assert_eq!(engine.engine_type, EngineType::Flink);
        assert_eq!(engine.flink_sub_type, Some(FlinkSubType::ResourcePoolRealtime));
        assert_eq!(engine.engine_scale.count, ScaleCount::Range { min: 2, max: 6 });
        assert_eq!(engine.max_cu, Some(64));
        assert_eq!(engine.flag_group, FlagGroup::None);
        assert!(engine.channels.is_empty());
        assert_eq!(engine.metrics[0].value, MetricValue::Number(41.0));
        assert_eq!(engine.metrics[1].value, MetricValue::Text("3d".into()));
        assert!(engine.is_resource_pool_engine());
        assert!(!engine.has_channels_tab());
    }

    #[test]
    fn engine_serializes_camel_case() {
        let engine: Engine = serde_json::from_value(engine_json()).unwrap();
        let value = serde_json::to_value(&engine).unwrap();

        assert_eq!(value["engineScale"]["count"], "2~6");
        assert_eq!(value["engineScale"]["type"], "general");
        assert_eq!(value["maxCU"], 64);
        assert_eq!(value["flagGroup"], "none");
        assert!(value.get("jmSpec").is_none());
    }

    #[test]
    fn worker_label_defaults_by_type() {
        let mut engine: Engine = serde_json::from_value(engine_json()).unwrap();
        assert_eq!(engine.worker_label(), "TM count");

        engine.worker_count_label = Some("Slots".into());
        assert_eq!(engine.worker_label(), "Slots");
    }

    #[test]
    fn sub_type_pool_kind() {
        assert_eq!(FlinkSubType::Session.pool_kind(), None);
        assert_eq!(
            FlinkSubType::ResourcePoolBatch.pool_kind(),
            Some(PoolKind::Batch)
        );
    }
}
