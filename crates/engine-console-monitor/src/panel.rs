//! Metrics panel simulation for the selected engine.
//!
//! The panel shows the first [`PANEL_METRICS`] metrics of an engine. Every
//! [`PANEL_REFRESH`] each of them gets a new value from its [`MetricKind`]
//! rule, appended to a history of at most [`HISTORY_LEN`] points. A countdown
//! to the next refresh ticks once a second.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use engine_console_core::{Engine, EngineId, Metric, MetricValue};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::rng_stream;
use crate::rules::MetricKind;
use crate::ticker::Ticker;

/// Number of metrics the panel simulates.
pub const PANEL_METRICS: usize = 6;
/// Points kept per metric history.
pub const HISTORY_LEN: usize = 7;
/// Automatic refresh period.
pub const PANEL_REFRESH: Duration = Duration::from_secs(5);
/// Countdown value right after a refresh.
pub const COUNTDOWN_START: u32 = 5;

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// One simulated metric with its recent history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    /// Metric id from the engine record.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Whether the card is highlighted.
    pub highlight: bool,
    /// Simulation rule.
    pub kind: MetricKind,
    /// Latest value; the fixture seed until the first refresh.
    pub value: MetricValue,
    /// Oldest first, at most [`HISTORY_LEN`] points.
    pub history: Vec<f64>,
}

impl MetricSeries {
    fn seed(metric: &Metric) -> Self {
        let skip = metric.chart_data.len().saturating_sub(HISTORY_LEN);
        Self {
            id: metric.id.clone(),
            name: metric.name.clone(),
            unit: metric.unit.clone(),
            highlight: metric.highlight,
            kind: MetricKind::classify(&metric.name),
            value: metric.value.clone(),
            history: metric.chart_data[skip..].to_vec(),
        }
    }

    fn push(&mut self, value: u32) {
        let value = f64::from(value);
        self.value = MetricValue::Number(value);
        self.history.push(value);
        if self.history.len() > HISTORY_LEN {
            let excess = self.history.len() - HISTORY_LEN;
            self.history.drain(..excess);
        }
    }
}

/// Snapshot of the metrics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelReading {
    /// Engine shown in the panel.
    pub engine_id: EngineId,
    /// Simulated metrics in record order.
    pub metrics: Vec<MetricSeries>,
    /// Seconds until the next automatic refresh.
    pub countdown: u32,
    /// Number of refresh cycles so far.
    pub refreshes: u64,
    /// When the last refresh ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct PanelState {
    reading: PanelReading,
    rng: StdRng,
}

impl PanelState {
    fn refresh(&mut self) {
        for series in &mut self.reading.metrics {
            let value = series.kind.sample(&mut self.rng);
            series.push(value);
        }
        self.reading.countdown = COUNTDOWN_START;
        self.reading.refreshes += 1;
        self.reading.refreshed_at = Some(Utc::now());
    }

    fn count_down(&mut self) {
        let countdown = &mut self.reading.countdown;
        *countdown = if *countdown <= 1 {
            COUNTDOWN_START
        } else {
            *countdown - 1
        };
    }
}

/// The mounted metrics panel of one engine.
#[derive(Debug)]
pub struct MetricsPanel {
    state: Arc<Mutex<PanelState>>,
    _refresh: Ticker,
    _countdown: Ticker,
}

impl MetricsPanel {
    /// Mount a panel with entropy-seeded randomness.
    #[must_use]
    pub fn mount(engine: &Engine) -> Self {
        Self::mount_with(engine, None)
    }

    /// Mount a panel with a fixed seed.
    #[must_use]
    pub fn mount_seeded(engine: &Engine, seed: u64) -> Self {
        Self::mount_with(engine, Some(seed))
    }

    fn mount_with(engine: &Engine, seed: Option<u64>) -> Self {
        let state = Arc::new(Mutex::new(PanelState {
            reading: PanelReading {
                engine_id: engine.id.clone(),
                metrics: engine
                    .metrics
                    .iter()
                    .take(PANEL_METRICS)
                    .map(MetricSeries::seed)
                    .collect(),
                countdown: COUNTDOWN_START,
                refreshes: 0,
                refreshed_at: None,
            },
            rng: rng_stream(seed, 0),
        }));

        let refresh_state = Arc::clone(&state);
        let refresh = Ticker::every(PANEL_REFRESH, move || refresh_state.lock().refresh());
        let countdown_state = Arc::clone(&state);
        let countdown = Ticker::every(COUNTDOWN_TICK, move || countdown_state.lock().count_down());

        tracing::debug!(engine_id = %engine.id, "Mounted metrics panel");
        Self {
            state,
            _refresh: refresh,
            _countdown: countdown,
        }
    }

    /// The engine shown in the panel.
    #[must_use]
    pub fn engine_id(&self) -> EngineId {
        self.state.lock().reading.engine_id.clone()
    }

    /// The current snapshot.
    #[must_use]
    pub fn reading(&self) -> PanelReading {
        self.state.lock().reading.clone()
    }

    /// Run one refresh cycle now and restart the countdown.
    pub fn refresh_now(&self) -> PanelReading {
        let mut state = self.state.lock();
        state.refresh();
        tracing::debug!(engine_id = %state.reading.engine_id, "Metrics panel refreshed on request");
        state.reading.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{engine_with_metrics, metric};

    fn number(series: &MetricSeries) -> f64 {
        match series.value {
            MetricValue::Number(n) => n,
            MetricValue::Text(_) => panic!("expected a number"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_first_six_metrics_are_mounted() {
        let metrics = (0..8).map(|i| metric(&format!("m{i}"), "Queries", &[])).collect();
        let panel = MetricsPanel::mount_seeded(&engine_with_metrics("e1", metrics), 1);

        let reading = panel.reading();
        assert_eq!(reading.metrics.len(), PANEL_METRICS);
        assert_eq!(reading.metrics[5].id, "m5");
        assert_eq!(reading.countdown, COUNTDOWN_START);
        assert_eq!(reading.refreshes, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn history_is_seeded_from_chart_data() {
        let chart: Vec<f64> = (1..=9).map(f64::from).collect();
        let panel = MetricsPanel::mount_seeded(
            &engine_with_metrics("e1", vec![metric("cpu", "CPU usage", &chart)]),
            1,
        );

        assert_eq!(panel.reading().metrics[0].history, vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn history_keeps_the_seven_latest_values() {
        let panel = MetricsPanel::mount_seeded(
            &engine_with_metrics("e1", vec![metric("cpu", "CPU usage", &[50.0])]),
            7,
        );

        // Sample just after each refresh.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let mut produced = Vec::new();
        for _ in 0..10 {
            tokio::time::sleep(PANEL_REFRESH).await;
            produced.push(number(&panel.reading().metrics[0]));
        }

        let reading = panel.reading();
        assert_eq!(reading.refreshes, 10);
        let series = &reading.metrics[0];
        assert_eq!(series.history.len(), HISTORY_LEN);
        assert_eq!(series.history, produced[produced.len() - HISTORY_LEN..]);
        assert!(series.history.iter().all(|v| (40.0..=80.0).contains(v)));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_and_resets() {
        let panel = MetricsPanel::mount_seeded(
            &engine_with_metrics("e1", vec![metric("w", "Worker count", &[])]),
            3,
        );

        // Sample halfway between ticks.
        tokio::time::sleep(Duration::from_millis(500)).await;
        let mut seen = Vec::new();
        for _ in 0..6 {
            tokio::time::sleep(Duration::from_secs(2)).await;
            seen.push(panel.reading().countdown);
        }
        assert_eq!(seen, vec![3, 1, 4, 2, 5, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_refresh_runs_a_cycle_and_resets_countdown() {
        let panel = MetricsPanel::mount_seeded(
            &engine_with_metrics("e1", vec![metric("s", "Scan rate", &[2.0])]),
            5,
        );

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(panel.reading().countdown, 3);

        let reading = panel.refresh_now();
        assert_eq!(reading.countdown, COUNTDOWN_START);
        assert_eq!(reading.refreshes, 1);
        assert_eq!(reading.metrics[0].history.len(), 2);
        assert!((2.0..=5.0).contains(&number(&reading.metrics[0])));
        assert!(reading.refreshed_at.is_some());
    }
}
