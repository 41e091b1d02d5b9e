//! Filtering and aggregation over the catalog.
//!
//! Everything here is a deterministic function of a catalog snapshot and the
//! console state. Filters keep the catalog's record order.

use std::sync::Arc;

use engine_console_core::{Engine, EngineType, FeatureFlag, FlinkSubType, PoolId, ResourcePool};
use engine_console_store::Catalog;
use serde::Serialize;

use crate::features::FeatureRegistry;
use crate::state::{ConsoleState, Page};
use crate::visibility::{is_engine_visible, is_pool_disabled};

/// Engine count shown on one type tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabCount {
    /// Engine type of the tab.
    pub engine_type: EngineType,
    /// Tab label.
    pub label: &'static str,
    /// Engines of this type passing the feature rules.
    pub count: usize,
}

/// Number of engines referencing a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEngineCount {
    /// Pool id.
    pub pool_id: PoolId,
    /// Referencing engines, ignoring search and feature rules.
    pub count: usize,
}

/// A pool as shown in the pool header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolView {
    /// The pool record.
    pub pool: Arc<ResourcePool>,
    /// Referencing engines.
    pub engine_count: usize,
    /// Whether editing is suppressed by a feature flag.
    pub disabled: bool,
}

/// Engines hidden only by feature flags, for the "feature not enabled" guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenByFeatures {
    /// Engines of the current tab and sub-type removed by the feature rules.
    pub count: usize,
    /// Features currently off.
    pub features: Vec<FeatureFlag>,
}

/// Everything the compute-engine page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleView {
    /// Active page.
    pub page: Page,
    /// Active engine-type tab.
    pub active_tab: EngineType,
    /// Selected Flink sub-type; present only on the Flink tab.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flink_sub_type: Option<FlinkSubType>,
    /// Flink sub-types that cannot be selected.
    pub disabled_flink_sub_types: Vec<FlinkSubType>,
    /// Search text as entered.
    pub search: String,
    /// One entry per engine type in the catalog.
    pub tabs: Vec<TabCount>,
    /// Engines to show as cards.
    pub engines: Vec<Arc<Engine>>,
    /// Pool headers to show (resource-pool sub-types only).
    pub pools: Vec<PoolView>,
    /// Engine counts for every pool in the catalog.
    pub pool_engine_counts: Vec<PoolEngineCount>,
    /// Feature-hidden engines in the current tab.
    pub hidden_by_features: HiddenByFeatures,
    /// Engine open in the detail panel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_engine: Option<Arc<Engine>>,
    /// Pool open in the edit dialog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing_pool: Option<Arc<ResourcePool>>,
    /// All feature flags.
    pub features: Vec<FeatureFlag>,
}

fn in_scope(engine: &Engine, tab: EngineType, sub_type: FlinkSubType) -> bool {
    engine.engine_type == tab
        && (tab != EngineType::Flink || engine.flink_sub_type == Some(sub_type))
}

/// Whether an engine matches the search text.
///
/// The query is trimmed and compared case-insensitively against the display
/// name and the engine name. An empty query matches everything.
#[must_use]
pub fn matches_search(engine: &Engine, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || engine.display_name.to_lowercase().contains(&query)
        || engine.engine_name.to_lowercase().contains(&query)
}

/// Engines shown as cards for a tab, sub-type and search.
#[must_use]
pub fn visible_engines(
    catalog: &Catalog,
    tab: EngineType,
    sub_type: FlinkSubType,
    search: &str,
    features: &FeatureRegistry,
) -> Vec<Arc<Engine>> {
    catalog
        .engines()
        .iter()
        .filter(|e| in_scope(e, tab, sub_type))
        .filter(|e| is_engine_visible(e, features))
        .filter(|e| matches_search(e, search))
        .cloned()
        .collect()
}

/// Pools listed for a tab and sub-type.
///
/// Empty unless the tab is Flink and the sub-type is a resource-pool one.
#[must_use]
pub fn visible_pools(catalog: &Catalog, tab: EngineType, sub_type: FlinkSubType) -> Vec<Arc<ResourcePool>> {
    let Some(kind) = sub_type.pool_kind().filter(|_| tab == EngineType::Flink) else {
        return Vec::new();
    };
    catalog
        .pools()
        .iter()
        .filter(|p| p.pool_type == kind)
        .cloned()
        .collect()
}

/// Visible engine count per engine type, in first-appearance order.
///
/// Search text does not affect these counts.
#[must_use]
pub fn tab_counts(catalog: &Catalog, features: &FeatureRegistry) -> Vec<TabCount> {
    catalog
        .engine_types()
        .into_iter()
        .map(|engine_type| TabCount {
            engine_type,
            label: engine_type.label(),
            count: catalog
                .engines_of_type(engine_type)
                .filter(|e| is_engine_visible(e, features))
                .count(),
        })
        .collect()
}

/// Engine count per pool, for every pool in the catalog.
#[must_use]
pub fn pool_engine_counts(catalog: &Catalog) -> Vec<PoolEngineCount> {
    catalog
        .pools()
        .iter()
        .map(|p| PoolEngineCount {
            pool_id: p.id.clone(),
            count: catalog.pool_engine_count(&p.id),
        })
        .collect()
}

/// Engines of a tab and sub-type removed only by the feature rules.
#[must_use]
pub fn hidden_by_features(
    catalog: &Catalog,
    tab: EngineType,
    sub_type: FlinkSubType,
    features: &FeatureRegistry,
) -> HiddenByFeatures {
    HiddenByFeatures {
        count: catalog
            .engines()
            .iter()
            .filter(|e| in_scope(e, tab, sub_type) && !is_engine_visible(e, features))
            .count(),
        features: features.disabled(),
    }
}

/// `AutoMQ` engines passing the feature rules, for the storage page.
#[must_use]
pub fn storage_engines(catalog: &Catalog, features: &FeatureRegistry) -> Vec<Arc<Engine>> {
    catalog
        .engines_of_type(EngineType::Automq)
        .filter(|e| is_engine_visible(e, features))
        .cloned()
        .collect()
}

/// Resolve a pool into its header view.
#[must_use]
pub fn pool_view(catalog: &Catalog, pool: &Arc<ResourcePool>, features: &FeatureRegistry) -> PoolView {
    PoolView {
        pool: Arc::clone(pool),
        engine_count: catalog.pool_engine_count(&pool.id),
        disabled: is_pool_disabled(pool, features),
    }
}

/// Build the full view for the current state.
#[must_use]
pub fn build_view(catalog: &Catalog, state: &ConsoleState) -> ConsoleView {
    let features = &state.features;
    let tab = state.active_tab;
    let sub_type = state.flink_sub_type;

    ConsoleView {
        page: state.page,
        active_tab: tab,
        flink_sub_type: (tab == EngineType::Flink).then_some(sub_type),
        disabled_flink_sub_types: features.disabled_flink_sub_types(),
        search: state.search.clone(),
        tabs: tab_counts(catalog, features),
        engines: visible_engines(catalog, tab, sub_type, &state.search, features),
        pools: visible_pools(catalog, tab, sub_type)
            .iter()
            .map(|p| pool_view(catalog, p, features))
            .collect(),
        pool_engine_counts: pool_engine_counts(catalog),
        hidden_by_features: hidden_by_features(catalog, tab, sub_type, features),
        selected_engine: state
            .selected_engine
            .as_ref()
            .and_then(|id| catalog.engine(id))
            .cloned(),
        editing_pool: state
            .editing_pool
            .as_ref()
            .and_then(|id| catalog.pool(id))
            .cloned(),
        features: features.flags().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_console_core::{EngineId, FeatureId};
    use engine_console_store::{load_catalog, FixtureSource};

    fn catalog() -> Catalog {
        load_catalog(&FixtureSource::Bundled).unwrap()
    }

    fn ids(engines: &[Arc<Engine>]) -> Vec<&str> {
        engines.iter().map(|e| e.id.as_str()).collect()
    }

    fn count_for(tabs: &[TabCount], engine_type: EngineType) -> usize {
        tabs.iter()
            .find(|t| t.engine_type == engine_type)
            .map_or(0, |t| t.count)
    }

    #[test]
    fn search_is_trimmed_and_case_insensitive() {
        let catalog = catalog();
        let features = FeatureRegistry::default();
        let trino = |q| {
            visible_engines(&catalog, EngineType::Trino, FlinkSubType::Session, q, &features)
        };

        assert_eq!(ids(&trino("dev")), vec!["trino-dev"]);
        assert_eq!(ids(&trino("  DEV ")), vec!["trino-dev"]);
        assert_eq!(ids(&trino("")), vec!["trino-prod", "trino-dev"]);
        assert_eq!(ids(&trino("prod-cluster")), vec!["trino-prod"]);
        assert!(trino("nothing").is_empty());
    }

    #[test]
    fn flink_engines_filter_by_sub_type_and_flags() {
        let catalog = catalog();
        let off = FeatureRegistry::default();
        let on = off.set(FeatureId::RealtimeTask, true).set(FeatureId::WarmupBatchIntegration, true);
        let flink = |sub, f: &FeatureRegistry| visible_engines(&catalog, EngineType::Flink, sub, "", f);

        assert_eq!(ids(&flink(FlinkSubType::Session, &off)), vec!["flink-session-adhoc"]);
        assert_eq!(
            ids(&flink(FlinkSubType::Session, &on)),
            vec!["flink-session-streaming", "flink-session-warmup", "flink-session-adhoc"]
        );
        assert_eq!(ids(&flink(FlinkSubType::ResourcePoolRealtime, &off)), vec!["flink-rt-cdc"]);
        assert_eq!(
            ids(&flink(FlinkSubType::ResourcePoolRealtime, &on)),
            vec!["flink-rt-dw-etl", "flink-rt-cdc"]
        );
        assert_eq!(ids(&flink(FlinkSubType::ResourcePoolBatch, &off)), vec!["flink-batch-nightly"]);
    }

    #[test]
    fn sub_type_is_ignored_outside_flink() {
        let catalog = catalog();
        let features = FeatureRegistry::default();

        let hive = visible_engines(
            &catalog,
            EngineType::Hive,
            FlinkSubType::ResourcePoolBatch,
            "",
            &features,
        );
        assert_eq!(ids(&hive), vec!["hive-dw-batch"]);
        assert!(visible_pools(&catalog, EngineType::Hive, FlinkSubType::ResourcePoolBatch).is_empty());
    }

    #[test]
    fn pools_follow_sub_type() {
        let catalog = catalog();
        let pool_ids = |sub| {
            visible_pools(&catalog, EngineType::Flink, sub)
                .iter()
                .map(|p| p.id.to_string())
                .collect::<Vec<_>>()
        };

        assert!(pool_ids(FlinkSubType::Session).is_empty());
        assert_eq!(
            pool_ids(FlinkSubType::ResourcePoolRealtime),
            vec!["pool-realtime-dw-task", "pool-realtime-general"]
        );
        assert_eq!(
            pool_ids(FlinkSubType::ResourcePoolBatch),
            vec!["pool-batch-default", "pool-batch-archive"]
        );
    }

    #[test]
    fn tab_counts_follow_flags_not_search() {
        let catalog = catalog();
        let off = FeatureRegistry::default();
        let tabs = tab_counts(&catalog, &off);

        let order: Vec<_> = tabs.iter().map(|t| t.engine_type).collect();
        assert_eq!(order, catalog.engine_types());
        assert_eq!(count_for(&tabs, EngineType::Trino), 2);
        assert_eq!(count_for(&tabs, EngineType::Flink), 3);
        assert_eq!(count_for(&tabs, EngineType::Automq), 0);

        let on = tab_counts(&catalog, &off.set(FeatureId::RealtimeTask, true));
        assert_eq!(count_for(&on, EngineType::Flink), 5);
        assert_eq!(count_for(&on, EngineType::Automq), 1);

        for query in ["", "dev", "zzz", "  Trino "] {
            let mut state = ConsoleState::default();
            state.search = query.to_string();
            assert_eq!(build_view(&catalog, &state).tabs, tabs);
        }
    }

    #[test]
    fn pool_engine_counts_ignore_visibility() {
        let catalog = catalog();
        let counts = pool_engine_counts(&catalog);

        for entry in &counts {
            let expected = catalog
                .engines()
                .iter()
                .filter(|e| e.resource_pool_id.as_ref() == Some(&entry.pool_id))
                .count();
            assert_eq!(entry.count, expected);
        }
        let dw = counts
            .iter()
            .find(|c| c.pool_id.as_str() == "pool-realtime-dw-task")
            .unwrap();
        assert_eq!(dw.count, 1);
        let archive = counts
            .iter()
            .find(|c| c.pool_id.as_str() == "pool-batch-archive")
            .unwrap();
        assert_eq!(archive.count, 0);
    }

    #[test]
    fn hidden_by_features_counts_gated_engines() {
        let catalog = catalog();
        let off = FeatureRegistry::default();

        let hidden = hidden_by_features(&catalog, EngineType::Flink, FlinkSubType::Session, &off);
        assert_eq!(hidden.count, 2);
        assert_eq!(hidden.features.len(), 2);

        let hidden = hidden_by_features(&catalog, EngineType::Trino, FlinkSubType::Session, &off);
        assert_eq!(hidden.count, 0);
    }

    #[test]
    fn storage_page_lists_visible_automq() {
        let catalog = catalog();
        let off = FeatureRegistry::default();

        assert!(storage_engines(&catalog, &off).is_empty());
        let on = off.toggle(FeatureId::RealtimeTask);
        assert_eq!(ids(&storage_engines(&catalog, &on)), vec!["automq-main"]);
    }

    #[test]
    fn view_resolves_selection_and_pool_state() {
        let catalog = catalog();
        let mut state = ConsoleState::default();
        state.active_tab = EngineType::Flink;
        state.flink_sub_type = FlinkSubType::ResourcePoolRealtime;
        state.selected_engine = Some(EngineId::new("flink-rt-cdc").unwrap());

        let view = build_view(&catalog, &state);
        assert_eq!(view.flink_sub_type, Some(FlinkSubType::ResourcePoolRealtime));
        assert_eq!(view.selected_engine.unwrap().id.as_str(), "flink-rt-cdc");
        assert_eq!(view.pools.len(), 2);
        assert!(view.pools[0].disabled);
        assert_eq!(view.pools[0].engine_count, 1);
        assert!(!view.pools[1].disabled);

        state.selected_engine = Some(EngineId::new("gone").unwrap());
        assert!(build_view(&catalog, &state).selected_engine.is_none());
    }

    #[test]
    fn empty_catalog_yields_empty_view() {
        let view = build_view(&Catalog::default(), &ConsoleState::default());

        assert!(view.tabs.is_empty());
        assert!(view.engines.is_empty());
        assert!(view.pools.is_empty());
        assert_eq!(view.hidden_by_features.count, 0);
        assert_eq!(view.flink_sub_type, None);
    }
}
