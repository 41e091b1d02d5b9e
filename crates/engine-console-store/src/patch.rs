//! Partial-field patches applied by the edit controller.
//!
//! Every field is optional. Each field documents its merge depth: it either
//! replaces the record field outright or merges into one member of a nested
//! value, leaving the sibling members as they were.

use engine_console_core::{Channel, Engine, QueueTimeout, ResourcePool, ScaleCount};

/// Changes to an engine record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnginePatch {
    /// Replaces `display_name`.
    pub display_name: Option<String>,
    /// Merges into `max_concurrency.value`; the tooltip is kept.
    /// Ignored when the engine has no max concurrency.
    pub max_concurrency_value: Option<u32>,
    /// Replaces `min_warmup` (encoded `<n>CU`).
    pub min_warmup: Option<String>,
    /// Merges into `engine_scale.count`; spec and CU type are kept.
    pub scale_count: Option<ScaleCount>,
    /// Replaces `worker_count`.
    pub worker_count: Option<u32>,
}

impl EnginePatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to an engine.
    pub fn apply(&self, engine: &mut Engine) {
        if let Some(name) = &self.display_name {
            engine.display_name.clone_from(name);
        }
        if let (Some(value), Some(max)) = (self.max_concurrency_value, engine.max_concurrency.as_mut()) {
            max.value = value;
        }
        if let Some(warmup) = &self.min_warmup {
            engine.min_warmup = Some(warmup.clone());
        }
        if let Some(count) = self.scale_count {
            engine.engine_scale.count = count;
        }
        if let Some(workers) = self.worker_count {
            engine.worker_count = workers;
        }
    }
}

/// Changes to a channel record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPatch {
    /// Replaces `channel_name`.
    pub channel_name: Option<String>,
    /// Replaces `concurrency_rate`.
    pub concurrency_rate: Option<u8>,
    /// Replaces `queue_timeout`.
    pub queue_timeout: Option<QueueTimeout>,
    /// Merges into `queue_progress.total`.
    pub queue_total: Option<u32>,
}

impl ChannelPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a channel.
    pub fn apply(&self, channel: &mut Channel) {
        if let Some(name) = &self.channel_name {
            channel.channel_name.clone_from(name);
        }
        if let Some(rate) = self.concurrency_rate {
            channel.concurrency_rate = rate;
        }
        if let Some(timeout) = self.queue_timeout {
            channel.queue_timeout = timeout;
        }
        if let Some(total) = self.queue_total {
            channel.queue_progress.total = total;
        }
    }
}

/// Changes to a resource-pool record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolPatch {
    /// Replaces `display_name`.
    pub display_name: Option<String>,
    /// Merges into `running_cu_metric.total`.
    pub running_cu_total: Option<u32>,
    /// Merges into `queue_metric.total`.
    pub queue_total: Option<u32>,
}

impl PoolPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a pool.
    ///
    /// Current values are left alone even when they now exceed the total;
    /// the pool header clamps its simulated reading instead.
    pub fn apply(&self, pool: &mut ResourcePool) {
        if let Some(name) = &self.display_name {
            pool.display_name.clone_from(name);
        }
        if let Some(total) = self.running_cu_total {
            pool.running_cu_metric.total = total;
        }
        if let Some(total) = self.queue_total {
            pool.queue_metric.total = total;
        }
    }
}
