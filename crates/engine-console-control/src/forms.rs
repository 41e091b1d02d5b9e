//! Edit form drafts.
//!
//! A draft starts from the current record and takes field edits through
//! setters. A rejected edit leaves the draft as it was, so whatever reaches
//! [`EngineDraft::into_patch`] and friends is already valid and the store
//! can apply it without checking again.

use engine_console_core::{
    Channel, ClusterType, Engine, FlinkSubType, QueueTimeout, ResourcePool, ScaleCount, TimeUnit,
};
use engine_console_store::{ChannelPatch, EnginePatch, PoolPatch};
use thiserror::Error;

use crate::types::{ChannelEdit, EngineEdit, PoolEdit};

/// Longest accepted display name, in characters.
pub const MAX_NAME_LEN: usize = 48;

/// Smallest worker count on the autoscaling slider.
pub const MIN_WORKERS: u32 = 1;

/// Largest worker count on the autoscaling slider.
pub const MAX_WORKERS: u32 = 12;

/// A rejected form edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A name was empty or too long.
    #[error("{field} must be 1 to {MAX_NAME_LEN} characters")]
    NameLength {
        /// Form field.
        field: &'static str,
    },

    /// A number was below the field's minimum.
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        /// Form field.
        field: &'static str,
        /// Smallest accepted value.
        min: u32,
        /// Rejected value.
        value: u32,
    },

    /// A number was outside the field's range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Form field.
        field: &'static str,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
        /// Rejected value.
        value: u32,
    },

    /// A range had its lower bound above its upper bound.
    #[error("range {min}~{max} is inverted")]
    InvertedRange {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },

    /// The field does not exist for this record.
    #[error("{field} cannot be edited here")]
    NotEditable {
        /// Form field.
        field: &'static str,
    },
}

fn check_name(field: &'static str, name: &str) -> Result<String, FormError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(FormError::NameLength { field });
    }
    Ok(name.to_string())
}

const fn check_min(field: &'static str, min: u32, value: u32) -> Result<u32, FormError> {
    if value < min {
        return Err(FormError::BelowMinimum { field, min, value });
    }
    Ok(value)
}

const fn check_range(field: &'static str, min: u32, max: u32, value: u32) -> Result<u32, FormError> {
    if value < min || value > max {
        return Err(FormError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(value)
}

fn leading_number(encoded: &str) -> Option<u32> {
    let digits: String = encoded
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

// =============================================================================
// Engine
// =============================================================================

/// Edit state of the engine dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineDraft {
    display_name: Option<String>,
    max_concurrency: Option<u32>,
    flink_session: bool,
    min_warmup: Option<u32>,
    worker_range: Option<(u32, u32)>,
}

impl EngineDraft {
    /// Start a draft from an engine.
    #[must_use]
    pub fn new(engine: &Engine) -> Self {
        let cloud_native = engine.cluster_type == ClusterType::CloudNative;
        let flink_session = engine.is_flink(FlinkSubType::Session);
        Self {
            display_name: (!engine.is_resource_pool_engine()).then(|| engine.display_name.clone()),
            max_concurrency: engine.max_concurrency.as_ref().map(|m| m.value),
            flink_session,
            min_warmup: engine
                .min_warmup
                .as_deref()
                .filter(|_| flink_session)
                .and_then(leading_number),
            worker_range: cloud_native
                .then(|| (engine.engine_scale.count.min(), engine.engine_scale.count.max())),
        }
    }

    /// Current display name, if the engine's name is editable.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Current worker range, if the engine autoscales.
    #[must_use]
    pub const fn worker_range(&self) -> Option<(u32, u32)> {
        self.worker_range
    }

    /// Set the display name.
    ///
    /// # Errors
    ///
    /// `NotEditable` on resource-pool engines, `NameLength` for empty or
    /// overlong names.
    pub fn set_display_name(&mut self, name: &str) -> Result<(), FormError> {
        if self.display_name.is_none() {
            return Err(FormError::NotEditable { field: "displayName" });
        }
        self.display_name = Some(check_name("displayName", name)?);
        Ok(())
    }

    /// Set the max concurrency value.
    ///
    /// # Errors
    ///
    /// `NotEditable` if the engine has no max concurrency, `BelowMinimum`
    /// below 1.
    pub fn set_max_concurrency(&mut self, value: u32) -> Result<(), FormError> {
        if self.max_concurrency.is_none() {
            return Err(FormError::NotEditable { field: "maxConcurrency" });
        }
        self.max_concurrency = Some(check_min("maxConcurrency", 1, value)?);
        Ok(())
    }

    /// Set the minimum warmup CU.
    ///
    /// # Errors
    ///
    /// `NotEditable` unless the engine is a Flink session, `BelowMinimum`
    /// below 1.
    pub fn set_min_warmup(&mut self, cu: u32) -> Result<(), FormError> {
        if !self.flink_session {
            return Err(FormError::NotEditable { field: "minWarmup" });
        }
        self.min_warmup = Some(check_min("minWarmup", 1, cu)?);
        Ok(())
    }

    /// Set the autoscaling range.
    ///
    /// # Errors
    ///
    /// `NotEditable` unless the cluster is cloud-native, `OutOfRange` for
    /// bounds outside 1 to 12, `InvertedRange` when `min > max`.
    pub fn set_worker_range(&mut self, min: u32, max: u32) -> Result<(), FormError> {
        if self.worker_range.is_none() {
            return Err(FormError::NotEditable { field: "workerRange" });
        }
        let min = check_range("workerRange.min", MIN_WORKERS, MAX_WORKERS, min)?;
        let max = check_range("workerRange.max", MIN_WORKERS, MAX_WORKERS, max)?;
        if min > max {
            return Err(FormError::InvertedRange { min, max });
        }
        self.worker_range = Some((min, max));
        Ok(())
    }

    /// Apply every field present in a request.
    ///
    /// Fields are applied in order and the first rejection stops the edit.
    ///
    /// # Errors
    ///
    /// The first setter error.
    pub fn apply(&mut self, edit: &EngineEdit) -> Result<(), FormError> {
        if let Some(name) = &edit.display_name {
            self.set_display_name(name)?;
        }
        if let Some(value) = edit.max_concurrency {
            self.set_max_concurrency(value)?;
        }
        if let Some(cu) = edit.min_warmup {
            self.set_min_warmup(cu)?;
        }
        if let Some(range) = edit.worker_range {
            self.set_worker_range(range.min, range.max)?;
        }
        Ok(())
    }

    /// The patch this form saves.
    #[must_use]
    pub fn into_patch(self) -> EnginePatch {
        let scale = self
            .worker_range
            .and_then(|(min, max)| ScaleCount::from_bounds(min, max).ok());
        EnginePatch {
            display_name: self.display_name,
            max_concurrency_value: self.max_concurrency,
            min_warmup: self.min_warmup.map(|cu| format!("{cu}CU")),
            scale_count: scale,
            worker_count: scale.map(|count| count.max()),
        }
    }
}

// =============================================================================
// Channel
// =============================================================================

/// Edit state of the channel dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDraft {
    channel_name: String,
    max_queue: u32,
    concurrency_rate: u8,
    timeout_value: u32,
    timeout_unit: TimeUnit,
}

impl ChannelDraft {
    /// Start a draft from a channel.
    #[must_use]
    pub fn new(channel: &Channel) -> Self {
        Self {
            channel_name: channel.channel_name.clone(),
            max_queue: channel.queue_progress.total,
            concurrency_rate: channel.concurrency_rate,
            timeout_value: channel.queue_timeout.value,
            timeout_unit: channel.queue_timeout.unit,
        }
    }

    /// Set the channel name.
    ///
    /// # Errors
    ///
    /// `NameLength` for empty or overlong names.
    pub fn set_channel_name(&mut self, name: &str) -> Result<(), FormError> {
        self.channel_name = check_name("channelName", name)?;
        Ok(())
    }

    /// Set the queue capacity.
    ///
    /// # Errors
    ///
    /// `BelowMinimum` below 1.
    pub fn set_max_queue(&mut self, total: u32) -> Result<(), FormError> {
        self.max_queue = check_min("maxQueue", 1, total)?;
        Ok(())
    }

    /// Set the concurrency rate percentage.
    ///
    /// # Errors
    ///
    /// `OutOfRange` above 100.
    pub fn set_concurrency_rate(&mut self, rate: u32) -> Result<(), FormError> {
        let rate = check_range("concurrencyRate", 0, 100, rate)?;
        self.concurrency_rate = u8::try_from(rate).unwrap_or(100);
        Ok(())
    }

    /// Set the queue timeout.
    ///
    /// # Errors
    ///
    /// `BelowMinimum` when `value` is 0.
    pub fn set_queue_timeout(&mut self, value: u32, unit: TimeUnit) -> Result<(), FormError> {
        self.timeout_value = check_min("queueTimeout", 1, value)?;
        self.timeout_unit = unit;
        Ok(())
    }

    /// Apply every field present in a request.
    ///
    /// # Errors
    ///
    /// The first setter error.
    pub fn apply(&mut self, edit: &ChannelEdit) -> Result<(), FormError> {
        if let Some(name) = &edit.channel_name {
            self.set_channel_name(name)?;
        }
        if let Some(total) = edit.max_queue {
            self.set_max_queue(total)?;
        }
        if let Some(rate) = edit.concurrency_rate {
            self.set_concurrency_rate(rate)?;
        }
        if let Some(value) = edit.queue_timeout {
            self.set_queue_timeout(value, edit.queue_timeout_unit.unwrap_or(self.timeout_unit))?;
        } else if let Some(unit) = edit.queue_timeout_unit {
            self.timeout_unit = unit;
        }
        Ok(())
    }

    /// The patch this form saves.
    #[must_use]
    pub fn into_patch(self) -> ChannelPatch {
        ChannelPatch {
            channel_name: Some(self.channel_name),
            concurrency_rate: Some(self.concurrency_rate),
            queue_timeout: Some(QueueTimeout::new(self.timeout_value, self.timeout_unit)),
            queue_total: Some(self.max_queue),
        }
    }
}

// =============================================================================
// Resource pool
// =============================================================================

/// Edit state of the pool dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDraft {
    display_name: String,
    max_running_cu: u32,
    max_queue: u32,
}

impl PoolDraft {
    /// Start a draft from a pool.
    #[must_use]
    pub fn new(pool: &ResourcePool) -> Self {
        Self {
            display_name: pool.display_name.clone(),
            max_running_cu: pool.running_cu_metric.total,
            max_queue: pool.queue_metric.total,
        }
    }

    /// Set the pool name.
    ///
    /// # Errors
    ///
    /// `NameLength` for empty or overlong names.
    pub fn set_display_name(&mut self, name: &str) -> Result<(), FormError> {
        self.display_name = check_name("displayName", name)?;
        Ok(())
    }

    /// Set the running CU ceiling.
    ///
    /// # Errors
    ///
    /// `BelowMinimum` below 1.
    pub fn set_max_running_cu(&mut self, total: u32) -> Result<(), FormError> {
        self.max_running_cu = check_min("maxRunningCU", 1, total)?;
        Ok(())
    }

    /// Set the queue capacity.
    ///
    /// # Errors
    ///
    /// `BelowMinimum` below 1.
    pub fn set_max_queue(&mut self, total: u32) -> Result<(), FormError> {
        self.max_queue = check_min("maxQueue", 1, total)?;
        Ok(())
    }

    /// Apply every field present in a request.
    ///
    /// # Errors
    ///
    /// The first setter error.
    pub fn apply(&mut self, edit: &PoolEdit) -> Result<(), FormError> {
        if let Some(name) = &edit.display_name {
            self.set_display_name(name)?;
        }
        if let Some(total) = edit.max_running_cu {
            self.set_max_running_cu(total)?;
        }
        if let Some(total) = edit.max_queue {
            self.set_max_queue(total)?;
        }
        Ok(())
    }

    /// The patch this form saves.
    #[must_use]
    pub fn into_patch(self) -> PoolPatch {
        PoolPatch {
            display_name: Some(self.display_name),
            running_cu_total: Some(self.max_running_cu),
            queue_total: Some(self.max_queue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_console_core::EngineId;
    use engine_console_store::{load_catalog, Catalog, FixtureSource};

    fn catalog() -> Catalog {
        load_catalog(&FixtureSource::Bundled).unwrap()
    }

    fn engine(catalog: &Catalog, id: &str) -> Engine {
        catalog
            .engine(&EngineId::new(id).unwrap())
            .map(|e| (**e).clone())
            .unwrap()
    }

    #[test]
    fn name_limits() {
        let catalog = catalog();
        let mut draft = EngineDraft::new(&engine(&catalog, "trino-prod"));

        assert_eq!(
            draft.set_display_name(""),
            Err(FormError::NameLength { field: "displayName" })
        );
        assert!(draft.set_display_name(&"x".repeat(49)).is_err());
        assert!(draft.set_display_name(&"x".repeat(48)).is_ok());
        assert_eq!(draft.display_name(), Some("x".repeat(48).as_str()));
    }

    #[test]
    fn rejected_edit_leaves_draft_unchanged() {
        let catalog = catalog();
        let mut draft = EngineDraft::new(&engine(&catalog, "trino-dev"));
        let before = draft.clone();

        assert!(draft.set_worker_range(5, 3).is_err());
        assert!(draft.set_worker_range(0, 3).is_err());
        assert!(draft.set_worker_range(2, 13).is_err());
        assert_eq!(draft, before);
    }

    #[test]
    fn cloud_native_range_writes_scale_and_worker_count() {
        let catalog = catalog();
        let mut draft = EngineDraft::new(&engine(&catalog, "trino-dev"));
        assert_eq!(draft.worker_range(), Some((2, 6)));

        draft.set_worker_range(3, 9).unwrap();
        let patch = draft.clone().into_patch();
        assert_eq!(patch.scale_count, Some(ScaleCount::Range { min: 3, max: 9 }));
        assert_eq!(patch.worker_count, Some(9));

        draft.set_worker_range(4, 4).unwrap();
        let patch = draft.into_patch();
        assert_eq!(patch.scale_count, Some(ScaleCount::Fixed(4)));
        assert_eq!(patch.scale_count.map(|c| c.to_string()), Some("4".to_string()));
    }

    #[test]
    fn normal_cluster_has_no_range() {
        let catalog = catalog();
        let mut draft = EngineDraft::new(&engine(&catalog, "trino-prod"));

        assert_eq!(draft.worker_range(), None);
        assert_eq!(
            draft.set_worker_range(1, 2),
            Err(FormError::NotEditable { field: "workerRange" })
        );
        let patch = draft.into_patch();
        assert!(patch.scale_count.is_none());
        assert!(patch.worker_count.is_none());
    }

    #[test]
    fn min_warmup_is_flink_session_only() {
        let catalog = catalog();
        let mut session = EngineDraft::new(&engine(&catalog, "flink-session-adhoc"));
        session.set_min_warmup(3).unwrap();
        assert!(session.set_min_warmup(0).is_err());
        assert_eq!(session.into_patch().min_warmup.as_deref(), Some("3CU"));

        let mut trino = EngineDraft::new(&engine(&catalog, "trino-prod"));
        assert_eq!(
            trino.set_min_warmup(3),
            Err(FormError::NotEditable { field: "minWarmup" })
        );
    }

    #[test]
    fn resource_pool_engine_name_is_locked() {
        let catalog = catalog();
        let mut draft = EngineDraft::new(&engine(&catalog, "flink-rt-cdc"));

        assert_eq!(draft.display_name(), None);
        assert!(matches!(
            draft.set_display_name("renamed"),
            Err(FormError::NotEditable { .. })
        ));
        assert!(draft.into_patch().display_name.is_none());
    }

    #[test]
    fn max_concurrency_requires_existing_value() {
        let catalog = catalog();
        let mut with = EngineDraft::new(&engine(&catalog, "trino-prod"));
        with.set_max_concurrency(30).unwrap();
        assert!(with.set_max_concurrency(0).is_err());
        assert_eq!(with.into_patch().max_concurrency_value, Some(30));

        let mut without = EngineDraft::new(&engine(&catalog, "automq-main"));
        assert!(without.set_max_concurrency(30).is_err());
        assert!(without.into_patch().max_concurrency_value.is_none());
    }

    #[test]
    fn channel_rate_and_timeout() {
        let catalog = catalog();
        let trino = engine(&catalog, "trino-prod");
        let mut draft = ChannelDraft::new(&trino.channels[0]);

        assert!(draft.set_concurrency_rate(101).is_err());
        draft.set_concurrency_rate(100).unwrap();
        draft.set_concurrency_rate(0).unwrap();
        assert!(draft.set_queue_timeout(0, TimeUnit::Seconds).is_err());
        draft.set_queue_timeout(5, TimeUnit::Minutes).unwrap();
        assert!(draft.set_max_queue(0).is_err());
        draft.set_max_queue(80).unwrap();

        let patch = draft.into_patch();
        assert_eq!(patch.concurrency_rate, Some(0));
        assert_eq!(patch.queue_timeout.map(|t| t.to_string()), Some("5min".to_string()));
        assert_eq!(patch.queue_total, Some(80));
        assert_eq!(patch.channel_name.as_deref(), Some(trino.channels[0].channel_name.as_str()));
    }

    #[test]
    fn pool_draft_starts_from_totals() {
        let catalog = catalog();
        let pool = catalog.pools()[0].clone();
        let mut draft = PoolDraft::new(&pool);

        assert!(draft.set_max_running_cu(0).is_err());
        draft.set_max_queue(20).unwrap();
        let patch = draft.into_patch();
        assert_eq!(patch.running_cu_total, Some(pool.running_cu_metric.total));
        assert_eq!(patch.queue_total, Some(20));
        assert_eq!(patch.display_name.as_deref(), Some(pool.display_name.as_str()));
    }

    #[test]
    fn apply_stops_at_first_error() {
        let catalog = catalog();
        let mut draft = PoolDraft::new(&catalog.pools()[0]);
        let edit = PoolEdit {
            display_name: Some("Renamed".into()),
            max_running_cu: Some(0),
            max_queue: Some(9),
        };

        assert!(matches!(
            draft.apply(&edit),
            Err(FormError::BelowMinimum { field: "maxRunningCU", .. })
        ));
        let patch = draft.into_patch();
        assert_eq!(patch.display_name.as_deref(), Some("Renamed"));
        assert_ne!(patch.queue_total, Some(9));
    }
}
