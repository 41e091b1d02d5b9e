//! Console state and its transitions.
//!
//! [`reduce`] is the only way state changes: it takes the current state and an
//! [`Action`] and returns the next state. Catalog records are not part of the
//! state; selections hold ids and are resolved against the catalog when a
//! view is built.

use engine_console_core::{EngineId, EngineType, FeatureId, FlinkSubType, PoolId};
use serde::{Deserialize, Serialize};

use crate::features::FeatureRegistry;

/// Top-level console page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    /// Compute engines grouped by type.
    #[default]
    ComputeEngine,
    /// Storage engines.
    StorageResource,
    /// Feature flag management.
    WarehouseFeatures,
}

/// Everything the user has selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleState {
    /// Active page.
    pub page: Page,
    /// Active engine-type tab.
    pub active_tab: EngineType,
    /// Selected Flink sub-type. Only meaningful on the Flink tab.
    pub flink_sub_type: FlinkSubType,
    /// Search text as entered.
    pub search: String,
    /// Engine open in the detail panel.
    pub selected_engine: Option<EngineId>,
    /// Pool open in the edit dialog.
    pub editing_pool: Option<PoolId>,
    /// Feature flags.
    pub features: FeatureRegistry,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            page: Page::default(),
            active_tab: EngineType::Trino,
            flink_sub_type: FlinkSubType::Session,
            search: String::new(),
            selected_engine: None,
            editing_pool: None,
            features: FeatureRegistry::default(),
        }
    }
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Action {
    /// Switch page.
    SelectPage {
        /// Target page.
        page: Page,
    },
    /// Switch engine-type tab.
    SelectTab {
        /// Target tab.
        tab: EngineType,
    },
    /// Switch Flink sub-type.
    SelectFlinkSubType {
        /// Target sub-type.
        sub_type: FlinkSubType,
    },
    /// Replace the search text.
    SetSearch {
        /// New search text.
        query: String,
    },
    /// Open an engine's detail panel.
    SelectEngine {
        /// Engine to show.
        engine_id: EngineId,
    },
    /// Close the detail panel.
    CloseDetail,
    /// Flip a feature flag.
    ToggleFeature {
        /// Flag to flip.
        feature_id: FeatureId,
    },
    /// Open a pool's edit dialog.
    OpenPoolEditor {
        /// Pool to edit.
        pool_id: PoolId,
    },
    /// Close the pool edit dialog.
    ClosePoolEditor,
}

/// Apply one action.
#[must_use]
pub fn reduce(state: &ConsoleState, action: &Action) -> ConsoleState {
    let mut next = state.clone();

    match action {
        Action::SelectPage { page } => next.page = *page,
        Action::SelectTab { tab } => {
            next.active_tab = *tab;
            next.selected_engine = None;
            next.editing_pool = None;
            next.search.clear();
            if *tab == EngineType::Flink {
                next.flink_sub_type = FlinkSubType::Session;
            }
        }
        Action::SelectFlinkSubType { sub_type } => {
            if !state.features.disabled_flink_sub_types().contains(sub_type) {
                next.flink_sub_type = *sub_type;
                next.selected_engine = None;
                next.editing_pool = None;
            }
        }
        Action::SetSearch { query } => next.search.clone_from(query),
        Action::SelectEngine { engine_id } => next.selected_engine = Some(engine_id.clone()),
        Action::CloseDetail => next.selected_engine = None,
        Action::ToggleFeature { feature_id } => next.features = state.features.toggle(*feature_id),
        Action::OpenPoolEditor { pool_id } => next.editing_pool = Some(pool_id.clone()),
        Action::ClosePoolEditor => next.editing_pool = None,
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_id(id: &str) -> EngineId {
        EngineId::new(id).unwrap()
    }

    #[test]
    fn initial_state() {
        let state = ConsoleState::default();

        assert_eq!(state.page, Page::ComputeEngine);
        assert_eq!(state.active_tab, EngineType::Trino);
        assert_eq!(state.flink_sub_type, FlinkSubType::Session);
        assert!(state.search.is_empty());
        assert!(state.selected_engine.is_none());
        assert!(state.editing_pool.is_none());
        assert_eq!(state.features, FeatureRegistry::default());
    }

    #[test]
    fn reduce_leaves_input_untouched() {
        let state = ConsoleState::default();
        let next = reduce(&state, &Action::SetSearch { query: "dev".into() });

        assert_eq!(next.search, "dev");
        assert_eq!(state, ConsoleState::default());
    }

    #[test]
    fn select_tab_resets_selection_and_search() {
        let mut state = ConsoleState::default();
        state.search = "prod".into();
        state.selected_engine = Some(engine_id("trino-prod"));
        state.flink_sub_type = FlinkSubType::ResourcePoolBatch;

        let next = reduce(&state, &Action::SelectTab { tab: EngineType::Hive });
        assert_eq!(next.active_tab, EngineType::Hive);
        assert!(next.search.is_empty());
        assert!(next.selected_engine.is_none());
        assert_eq!(next.flink_sub_type, FlinkSubType::ResourcePoolBatch);

        let next = reduce(&state, &Action::SelectTab { tab: EngineType::Flink });
        assert_eq!(next.flink_sub_type, FlinkSubType::Session);
    }

    #[test]
    fn disabled_sub_type_is_ignored() {
        let state = reduce(&ConsoleState::default(), &Action::SelectTab { tab: EngineType::Flink });
        let realtime = Action::SelectFlinkSubType {
            sub_type: FlinkSubType::ResourcePoolRealtime,
        };

        assert_eq!(reduce(&state, &realtime), state);

        let enabled = reduce(
            &state,
            &Action::ToggleFeature {
                feature_id: FeatureId::RealtimeTask,
            },
        );
        let next = reduce(&enabled, &realtime);
        assert_eq!(next.flink_sub_type, FlinkSubType::ResourcePoolRealtime);
    }

    #[test]
    fn sub_type_change_clears_selection() {
        let mut state = ConsoleState::default();
        state.active_tab = EngineType::Flink;
        state.selected_engine = Some(engine_id("flink-session-adhoc"));

        let next = reduce(
            &state,
            &Action::SelectFlinkSubType {
                sub_type: FlinkSubType::ResourcePoolBatch,
            },
        );
        assert_eq!(next.flink_sub_type, FlinkSubType::ResourcePoolBatch);
        assert!(next.selected_engine.is_none());
    }

    #[test]
    fn detail_and_pool_editor() {
        let pool_id = PoolId::new("pool-batch-default").unwrap();
        let state = reduce(
            &ConsoleState::default(),
            &Action::SelectEngine {
                engine_id: engine_id("trino-dev"),
            },
        );
        assert_eq!(state.selected_engine, Some(engine_id("trino-dev")));

        let state = reduce(&state, &Action::OpenPoolEditor { pool_id: pool_id.clone() });
        assert_eq!(state.editing_pool, Some(pool_id));

        let state = reduce(&reduce(&state, &Action::CloseDetail), &Action::ClosePoolEditor);
        assert!(state.selected_engine.is_none());
        assert!(state.editing_pool.is_none());
    }

    #[test]
    fn toggle_feature_twice_restores_registry() {
        let toggle = Action::ToggleFeature {
            feature_id: FeatureId::WarmupBatchIntegration,
        };
        let once = reduce(&ConsoleState::default(), &toggle);
        assert!(once.features.is_enabled(FeatureId::WarmupBatchIntegration));

        assert_eq!(reduce(&once, &toggle), ConsoleState::default());
    }

    #[test]
    fn actions_use_tagged_json() {
        let action: Action = serde_json::from_str(
            r#"{"type":"select-flink-sub-type","subType":"resource-pool-batch"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::SelectFlinkSubType {
                sub_type: FlinkSubType::ResourcePoolBatch
            }
        );

        let action: Action =
            serde_json::from_str(r#"{"type":"select-engine","engineId":"trino-dev"}"#).unwrap();
        assert_eq!(
            action,
            Action::SelectEngine {
                engine_id: engine_id("trino-dev")
            }
        );

        let action: Action = serde_json::from_str(r#"{"type":"close-detail"}"#).unwrap();
        assert_eq!(action, Action::CloseDetail);

        let json = serde_json::to_value(Action::ToggleFeature {
            feature_id: FeatureId::RealtimeTask,
        })
        .unwrap();
        assert_eq!(json["type"], "toggle-feature");
        assert_eq!(json["featureId"], "realtime-task");
    }
}
