//! Feature-flag visibility rules.
//!
//! | engine                                            | visible when                     |
//! |---------------------------------------------------|----------------------------------|
//! | Flink session, business mode `streaming compute`  | `realtime-task` on               |
//! | Flink session, business mode `warmup batch integration` | `warmup-batch-integration` on |
//! | `AutoMQ`                                          | `realtime-task` on               |
//! | Flink realtime pool engine in the DW task group   | `realtime-task` on               |
//! | anything else                                     | always                           |
//!
//! A pool in the realtime DW task group is disabled (shown, but not editable)
//! while `realtime-task` is off. Group membership comes from the record's
//! [`FlagGroup`], never from its id.

use engine_console_core::{Engine, EngineType, FeatureId, FlagGroup, FlinkSubType, ResourcePool};

use crate::features::FeatureRegistry;

/// Business mode of streaming Flink sessions.
pub const STREAMING_COMPUTE: &str = "streaming compute";

/// Business mode of warmup Flink sessions.
pub const WARMUP_BATCH_INTEGRATION: &str = "warmup batch integration";

/// Whether an engine passes the feature-flag rules.
#[must_use]
pub fn is_engine_visible(engine: &Engine, features: &FeatureRegistry) -> bool {
    let realtime = features.is_enabled(FeatureId::RealtimeTask);

    match (engine.engine_type, engine.flink_sub_type) {
        (EngineType::Automq, _) => realtime,
        (EngineType::Flink, Some(FlinkSubType::Session)) => match engine.business_mode.as_str() {
            STREAMING_COMPUTE => realtime,
            WARMUP_BATCH_INTEGRATION => features.is_enabled(FeatureId::WarmupBatchIntegration),
            _ => true,
        },
        (EngineType::Flink, Some(FlinkSubType::ResourcePoolRealtime)) => {
            engine.flag_group != FlagGroup::RealtimeDwTask || realtime
        }
        _ => true,
    }
}

/// Whether a pool's controls are suppressed.
#[must_use]
pub fn is_pool_disabled(pool: &ResourcePool, features: &FeatureRegistry) -> bool {
    pool.flag_group == FlagGroup::RealtimeDwTask && !features.is_enabled(FeatureId::RealtimeTask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine(engine_type: &str, sub_type: Option<&str>, mode: &str, group: &str) -> Engine {
        serde_json::from_value(json!({
            "id": "e1",
            "engineType": engine_type,
            "flinkSubType": sub_type,
            "displayName": "E1",
            "engineName": "e1",
            "creationType": "custom",
            "version": "1",
            "businessMode": mode,
            "clusterType": "normal",
            "cpuUsage": 50,
            "memoryUsage": 50,
            "engineScale": { "spec": "4CU", "count": "2", "type": "general" },
            "workerCount": 2,
            "creator": "test",
            "flagGroup": group
        }))
        .unwrap()
    }

    fn pool(group: &str) -> ResourcePool {
        serde_json::from_value(json!({
            "id": "pool-x",
            "poolType": "realtime",
            "displayName": "X",
            "poolCode": "x",
            "status": { "text": "Running" },
            "flagGroup": group,
            "runningCUMetric": { "current": 1, "total": 2 },
            "queueMetric": { "current": 1, "total": 2 },
            "taskMetric": { "current": 0 }
        }))
        .unwrap()
    }

    fn registry(realtime: bool, warmup: bool) -> FeatureRegistry {
        FeatureRegistry::default()
            .set(FeatureId::RealtimeTask, realtime)
            .set(FeatureId::WarmupBatchIntegration, warmup)
    }

    #[test]
    fn visibility_table() {
        let cases = [
            // (engine, visible for [(off,off), (on,off), (off,on), (on,on)])
            (engine("flink", Some("session"), STREAMING_COMPUTE, "none"), [false, true, false, true]),
            (engine("flink", Some("session"), WARMUP_BATCH_INTEGRATION, "none"), [false, false, true, true]),
            (engine("flink", Some("session"), "batch compute", "none"), [true; 4]),
            (engine("automq", None, "message storage", "none"), [false, true, false, true]),
            (engine("flink", Some("resource-pool-realtime"), STREAMING_COMPUTE, "realtime-dw-task"), [false, true, false, true]),
            (engine("flink", Some("resource-pool-realtime"), STREAMING_COMPUTE, "none"), [true; 4]),
            (engine("flink", Some("resource-pool-batch"), "batch compute", "realtime-dw-task"), [true; 4]),
            (engine("trino", None, STREAMING_COMPUTE, "none"), [true; 4]),
            (engine("starrocks", None, "realtime analytics", "none"), [true; 4]),
            (engine("hive", None, "batch compute", "none"), [true; 4]),
        ];
        let flags = [(false, false), (true, false), (false, true), (true, true)];

        for (engine, expected) in &cases {
            for ((realtime, warmup), want) in flags.iter().zip(expected) {
                assert_eq!(
                    is_engine_visible(engine, &registry(*realtime, *warmup)),
                    *want,
                    "{:?}/{:?}/{} realtime={realtime} warmup={warmup}",
                    engine.engine_type,
                    engine.flink_sub_type,
                    engine.business_mode,
                );
            }
        }
    }

    #[test]
    fn streaming_session_flips_with_realtime_flag() {
        let session = engine("flink", Some("session"), STREAMING_COMPUTE, "none");
        let off = FeatureRegistry::default();

        assert!(!is_engine_visible(&session, &off));
        assert!(is_engine_visible(&session, &off.toggle(FeatureId::RealtimeTask)));
    }

    #[test]
    fn only_dw_task_pools_are_disabled() {
        let dw = pool("realtime-dw-task");
        let general = pool("none");

        assert!(is_pool_disabled(&dw, &registry(false, true)));
        assert!(!is_pool_disabled(&dw, &registry(true, false)));
        assert!(!is_pool_disabled(&general, &registry(false, false)));
        assert!(!is_pool_disabled(&general, &registry(true, true)));
    }
}
