//! Value generation rules.
//!
//! Every rule is a pure function of the previous value and an injected random
//! source, so bounds can be checked with a seeded generator.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

/// CPU and memory usage percentages are drawn from this range.
pub const USAGE_RANGE: RangeInclusive<u32> = 40..=80;

/// Per-instance refresh intervals for engine cards.
pub const REFRESH_CHOICES: [Duration; 3] = [
    Duration::from_secs(4),
    Duration::from_secs(8),
    Duration::from_secs(12),
];

const WORKER_DRIFT: i64 = 2;
const TASK_DRIFT: i64 = 5;
const POOL_CU_DRIFT: i64 = 5;
const POOL_QUEUE_DRIFT: i64 = 10;

/// A fresh CPU or memory percentage.
pub fn usage<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(USAGE_RANGE)
}

/// Pick one of [`REFRESH_CHOICES`].
pub fn refresh_interval<R: Rng + ?Sized>(rng: &mut R) -> Duration {
    REFRESH_CHOICES
        .choose(rng)
        .copied()
        .unwrap_or(REFRESH_CHOICES[0])
}

fn drift<R: Rng + ?Sized>(rng: &mut R, previous: u32, spread: i64, floor: i64, ceiling: i64) -> u32 {
    let next = i64::from(previous) + rng.gen_range(-spread..=spread);
    // Clamped into u32 bounds, so the conversion cannot fail.
    u32::try_from(next.clamp(floor, ceiling)).unwrap_or_default()
}

/// Worker or controller count: previous ±2, never below 1.
pub fn drift_workers<R: Rng + ?Sized>(rng: &mut R, previous: u32) -> u32 {
    drift(rng, previous, WORKER_DRIFT, 1, i64::from(u32::MAX))
}

/// Engine task count: previous ±5, never below 0.
pub fn drift_tasks<R: Rng + ?Sized>(rng: &mut R, previous: u32) -> u32 {
    drift(rng, previous, TASK_DRIFT, 0, i64::from(u32::MAX))
}

/// Pool running CU: previous ±5 within `[0, total]`.
pub fn drift_pool_cu<R: Rng + ?Sized>(rng: &mut R, previous: u32, total: u32) -> u32 {
    drift(rng, previous.min(total), POOL_CU_DRIFT, 0, i64::from(total))
}

/// Pool queue occupancy: previous ±10 within `[0, total]`.
pub fn drift_pool_queue<R: Rng + ?Sized>(rng: &mut R, previous: u32, total: u32) -> u32 {
    drift(rng, previous.min(total), POOL_QUEUE_DRIFT, 0, i64::from(total))
}

/// How a metrics-panel entry is simulated, chosen from its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    /// CPU or memory percentage.
    Usage,
    /// Worker, CN, slot or task-manager count.
    NodeCount,
    /// Scan throughput.
    Scan,
    /// Running, waiting or total task count.
    TaskCount,
    /// Anything else.
    Other,
}

impl MetricKind {
    /// Classify a metric by keywords in its name.
    ///
    /// Keywords are matched case-insensitively, except `CN` which must be
    /// upper case so that it is not found inside ordinary words.
    #[must_use]
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if has(&["cpu", "memory"]) {
            Self::Usage
        } else if has(&["worker", "slot", "task manager"]) || name.contains("CN") {
            Self::NodeCount
        } else if has(&["scan"]) {
            Self::Scan
        } else if has(&["running task", "waiting task", "task count"]) {
            Self::TaskCount
        } else {
            Self::Other
        }
    }

    /// The inclusive range a new value is drawn from.
    #[must_use]
    pub const fn range(self) -> RangeInclusive<u32> {
        match self {
            Self::Usage => USAGE_RANGE,
            Self::NodeCount => 4..=6,
            Self::Scan => 2..=5,
            Self::TaskCount => 2..=6,
            Self::Other => 0..=50,
        }
    }

    /// Draw a new value.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        rng.gen_range(self.range())
    }
}
