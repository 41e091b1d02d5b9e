//! Engine card simulation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use engine_console_core::{Engine, EngineId};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::rules;
use crate::rng_stream;
use crate::ticker::Ticker;

/// Delay before a freshly mounted card first refreshes.
pub const FIRST_REFRESH: Duration = Duration::from_millis(100);

/// Live values shown on one engine card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReading {
    /// Engine the card belongs to.
    pub engine_id: EngineId,
    /// CPU percentage.
    pub cpu_usage: u32,
    /// Memory percentage.
    pub memory_usage: u32,
    /// Worker, CN, TM or controller count.
    pub node_count: u32,
    /// Running tasks, for engines that report them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u32>,
    /// When any value last changed.
    pub updated_at: DateTime<Utc>,
}

impl CardReading {
    fn seed(engine: &Engine) -> Self {
        Self {
            engine_id: engine.id.clone(),
            cpu_usage: u32::from(engine.cpu_usage),
            memory_usage: u32::from(engine.memory_usage),
            node_count: engine.worker_count.max(1),
            task_count: engine.task_count,
            updated_at: Utc::now(),
        }
    }
}

/// Refresh interval picked for each value at mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardIntervals {
    /// CPU refresh interval.
    pub cpu: Duration,
    /// Memory refresh interval.
    pub memory: Duration,
    /// Node count refresh interval.
    pub nodes: Duration,
    /// Task count refresh interval, if the card has one.
    pub tasks: Option<Duration>,
}

/// The mounted simulator of one engine card.
///
/// Each value runs on its own ticker; dropping the card stops all of them.
#[derive(Debug)]
pub struct EngineCardMetrics {
    reading: Arc<Mutex<CardReading>>,
    intervals: CardIntervals,
    _tickers: Vec<Ticker>,
}

fn value_ticker<F>(reading: &Arc<Mutex<CardReading>>, every: Duration, mut rng: StdRng, update: F) -> Ticker
where
    F: Fn(&mut CardReading, &mut StdRng) + Send + 'static,
{
    let reading = Arc::clone(reading);
    Ticker::with_first(FIRST_REFRESH, every, move || {
        let mut current = reading.lock();
        update(&mut current, &mut rng);
        current.updated_at = Utc::now();
    })
}

impl EngineCardMetrics {
    /// Mount a card with entropy-seeded randomness.
    #[must_use]
    pub fn mount(engine: &Engine) -> Self {
        Self::mount_with(engine, None)
    }

    /// Mount a card with a fixed seed.
    #[must_use]
    pub fn mount_seeded(engine: &Engine, seed: u64) -> Self {
        Self::mount_with(engine, Some(seed))
    }

    fn mount_with(engine: &Engine, seed: Option<u64>) -> Self {
        let reading = Arc::new(Mutex::new(CardReading::seed(engine)));
        let mut picker = rng_stream(seed, 0);

        let intervals = CardIntervals {
            cpu: rules::refresh_interval(&mut picker),
            memory: rules::refresh_interval(&mut picker),
            nodes: rules::refresh_interval(&mut picker),
            tasks: engine
                .task_count
                .map(|_| rules::refresh_interval(&mut picker)),
        };

        let mut tickers = vec![
            value_ticker(&reading, intervals.cpu, rng_stream(seed, 1), |r, rng| {
                r.cpu_usage = rules::usage(rng);
            }),
            value_ticker(&reading, intervals.memory, rng_stream(seed, 2), |r, rng| {
                r.memory_usage = rules::usage(rng);
            }),
            value_ticker(&reading, intervals.nodes, rng_stream(seed, 3), |r, rng| {
                r.node_count = rules::drift_workers(rng, r.node_count);
            }),
        ];
        if let Some(every) = intervals.tasks {
            tickers.push(value_ticker(&reading, every, rng_stream(seed, 4), |r, rng| {
                r.task_count = r.task_count.map(|tasks| rules::drift_tasks(rng, tasks));
            }));
        }

        tracing::debug!(engine_id = %engine.id, ?intervals, "Mounted engine card");
        Self {
            reading,
            intervals,
            _tickers: tickers,
        }
    }

    /// The engine this card belongs to.
    #[must_use]
    pub fn engine_id(&self) -> EngineId {
        self.reading.lock().engine_id.clone()
    }

    /// The current values.
    #[must_use]
    pub fn reading(&self) -> CardReading {
        self.reading.lock().clone()
    }

    /// The intervals picked at mount.
    #[must_use]
    pub const fn intervals(&self) -> &CardIntervals {
        &self.intervals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::engine;

    #[tokio::test(start_paused = true)]
    async fn seed_values_before_first_refresh() {
        let card = EngineCardMetrics::mount_seeded(&engine("trino-a", Some(10)), 1);
        let reading = card.reading();

        assert_eq!(reading.engine_id.as_str(), "trino-a");
        assert_eq!(reading.cpu_usage, 12);
        assert_eq!(reading.memory_usage, 95);
        assert_eq!(reading.node_count, 3);
        assert_eq!(reading.task_count, Some(10));
    }

    #[tokio::test(start_paused = true)]
    async fn first_refresh_after_100ms() {
        let card = EngineCardMetrics::mount_seeded(&engine("trino-a", Some(10)), 2);

        tokio::time::sleep(Duration::from_millis(150)).await;
        let reading = card.reading();
        assert!(rules::USAGE_RANGE.contains(&reading.cpu_usage));
        assert!(rules::USAGE_RANGE.contains(&reading.memory_usage));
    }

    #[tokio::test(start_paused = true)]
    async fn values_stay_bounded_over_many_refreshes() {
        let card = EngineCardMetrics::mount_seeded(&engine("trino-a", Some(1)), 3);

        for _ in 0..60 {
            tokio::time::sleep(Duration::from_secs(2)).await;
            let reading = card.reading();
            assert!(rules::USAGE_RANGE.contains(&reading.cpu_usage));
            assert!(rules::USAGE_RANGE.contains(&reading.memory_usage));
            assert!(reading.node_count >= 1);
            assert!(reading.task_count.is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn intervals_are_picked_from_choices() {
        let card = EngineCardMetrics::mount_seeded(&engine("trino-a", None), 4);
        let intervals = card.intervals();

        assert!(rules::REFRESH_CHOICES.contains(&intervals.cpu));
        assert!(rules::REFRESH_CHOICES.contains(&intervals.memory));
        assert!(rules::REFRESH_CHOICES.contains(&intervals.nodes));
        assert_eq!(intervals.tasks, None);
        assert_eq!(card.reading().task_count, None);
    }
}
