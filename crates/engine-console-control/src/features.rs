//! Warehouse feature registry.

use engine_console_core::{FeatureFlag, FeatureId, FlinkSubType};
use serde::{Deserialize, Serialize};

/// Application label attached to the default features.
pub const DATA_DEVELOPMENT_PLATFORM: &str = "Data development platform";

/// The set of feature flags and their current state.
///
/// Registries are values: [`toggle`](Self::toggle) and [`set`](Self::set)
/// return a new registry and leave this one untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRegistry {
    flags: Vec<FeatureFlag>,
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::new(vec![
            FeatureFlag {
                id: FeatureId::RealtimeTask,
                name: "Realtime tasks".to_string(),
                enabled: false,
                enabled_spaces: vec![
                    "Default".to_string(),
                    "Dev space 1".to_string(),
                    "Dev space 2".to_string(),
                ],
                application: Some(DATA_DEVELOPMENT_PLATFORM.to_string()),
            },
            FeatureFlag {
                id: FeatureId::WarmupBatchIntegration,
                name: "Warmup batch integration".to_string(),
                enabled: false,
                enabled_spaces: Vec::new(),
                application: None,
            },
        ])
    }
}

impl FeatureRegistry {
    /// Create a registry from an explicit flag list.
    #[must_use]
    pub const fn new(flags: Vec<FeatureFlag>) -> Self {
        Self { flags }
    }

    /// All flags in registry order.
    #[must_use]
    pub fn flags(&self) -> &[FeatureFlag] {
        &self.flags
    }

    /// Look up a flag.
    #[must_use]
    pub fn get(&self, id: FeatureId) -> Option<&FeatureFlag> {
        self.flags.iter().find(|f| f.id == id)
    }

    /// Whether a flag is on. Flags missing from the registry are off.
    #[must_use]
    pub fn is_enabled(&self, id: FeatureId) -> bool {
        self.get(id).is_some_and(|f| f.enabled)
    }

    /// A registry with one flag flipped.
    #[must_use]
    pub fn toggle(&self, id: FeatureId) -> Self {
        self.set(id, !self.is_enabled(id))
    }

    /// A registry with one flag set to `enabled`.
    ///
    /// Ids missing from the registry leave it unchanged.
    #[must_use]
    pub fn set(&self, id: FeatureId, enabled: bool) -> Self {
        let mut next = self.clone();
        if let Some(flag) = next.flags.iter_mut().find(|f| f.id == id) {
            flag.enabled = enabled;
        }
        next
    }

    /// The flags that are currently off.
    #[must_use]
    pub fn disabled(&self) -> Vec<FeatureFlag> {
        self.flags.iter().filter(|f| !f.enabled).cloned().collect()
    }

    /// Flink sub-types that cannot be selected under the current flags.
    #[must_use]
    pub fn disabled_flink_sub_types(&self) -> Vec<FlinkSubType> {
        if self.is_enabled(FeatureId::RealtimeTask) {
            Vec::new()
        } else {
            vec![FlinkSubType::ResourcePoolRealtime]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_disabled() {
        let registry = FeatureRegistry::default();

        let ids: Vec<_> = registry.flags().iter().map(|f| f.id).collect();
        assert_eq!(ids, FeatureId::ALL.to_vec());
        assert!(!registry.is_enabled(FeatureId::RealtimeTask));
        assert!(!registry.is_enabled(FeatureId::WarmupBatchIntegration));
        assert_eq!(registry.disabled().len(), 2);

        let realtime = registry.get(FeatureId::RealtimeTask).unwrap();
        assert_eq!(realtime.enabled_spaces.len(), 3);
        assert_eq!(realtime.application.as_deref(), Some(DATA_DEVELOPMENT_PLATFORM));
    }

    #[test]
    fn toggle_returns_a_new_registry() {
        let before = FeatureRegistry::default();
        let after = before.toggle(FeatureId::RealtimeTask);

        assert!(!before.is_enabled(FeatureId::RealtimeTask));
        assert!(after.is_enabled(FeatureId::RealtimeTask));
        assert!(!after.is_enabled(FeatureId::WarmupBatchIntegration));
        assert_eq!(after.toggle(FeatureId::RealtimeTask), before);
    }

    #[test]
    fn set_on_missing_flag_is_a_no_op() {
        let registry = FeatureRegistry::new(Vec::new());
        let next = registry.set(FeatureId::RealtimeTask, true);

        assert_eq!(next, registry);
        assert!(!next.is_enabled(FeatureId::RealtimeTask));
    }

    #[test]
    fn realtime_sub_type_follows_flag() {
        let registry = FeatureRegistry::default();
        assert_eq!(
            registry.disabled_flink_sub_types(),
            vec![FlinkSubType::ResourcePoolRealtime]
        );

        let enabled = registry.set(FeatureId::RealtimeTask, true);
        assert!(enabled.disabled_flink_sub_types().is_empty());
        assert_eq!(enabled.disabled().len(), 1);
    }

    #[test]
    fn serializes_as_flag_list() {
        let json = serde_json::to_value(FeatureRegistry::default()).unwrap();
        assert_eq!(json[0]["id"], "realtime-task");
        assert_eq!(json[0]["enabled"], false);
        assert_eq!(json[0]["enabledSpaces"][1], "Dev space 1");
        assert_eq!(json[0]["application"], DATA_DEVELOPMENT_PLATFORM);
        assert_eq!(json[1]["id"], "warmup-batch-integration");
        assert!(json[1].get("enabledSpaces").is_none());
        assert!(json[1].get("application").is_none());
    }
}
