//! Mount reconciliation.
//!
//! The [`Dashboard`] owns every mounted simulator. After each view change it
//! is handed the engines, pools and selected engine on screen; simulators for
//! entities that left the view are dropped (stopping their tickers), new ones
//! are mounted, and the rest keep running undisturbed.

use std::collections::HashMap;
use std::sync::Arc;

use engine_console_core::{Engine, EngineId, PoolId, ResourcePool};
use serde::Serialize;

use crate::card::{CardReading, EngineCardMetrics};
use crate::panel::{MetricsPanel, PanelReading};
use crate::pool::{PoolHeaderMetrics, PoolReading};

/// A pool header to keep mounted, with its linked engine count.
#[derive(Debug, Clone)]
pub struct PoolMount {
    /// Current pool record.
    pub pool: Arc<ResourcePool>,
    /// Engines referencing the pool.
    pub engine_count: usize,
}

/// Everything that should be mounted after a view change.
#[derive(Debug, Clone, Default)]
pub struct MountPlan<'a> {
    /// Engine cards on screen, in display order.
    pub cards: &'a [Arc<Engine>],
    /// Pool headers on screen, in display order.
    pub pools: &'a [PoolMount],
    /// Engine whose metrics panel is open.
    pub panel: Option<&'a Engine>,
}

/// Counts of simulators started and stopped by one reconcile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Simulators started.
    pub mounted: usize,
    /// Simulators stopped.
    pub unmounted: usize,
}

/// Live readings of every mounted card and pool header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReadings {
    /// Engine cards in display order.
    pub cards: Vec<CardReading>,
    /// Pool headers in display order.
    pub pools: Vec<PoolReading>,
}

/// Owner of all mounted simulators.
#[derive(Debug, Default)]
pub struct Dashboard {
    cards: Vec<EngineCardMetrics>,
    pools: Vec<(PoolId, PoolHeaderMetrics)>,
    panel: Option<MetricsPanel>,
    seed: Option<u64>,
    mounts: u64,
}

impl Dashboard {
    /// An empty dashboard using entropy-seeded randomness.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty dashboard whose simulators derive fixed seeds from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    fn next_seed(&mut self) -> Option<u64> {
        self.mounts += 1;
        self.seed.map(|seed| seed.wrapping_add(self.mounts))
    }

    /// Bring the mounted simulators in line with `plan`.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn reconcile(&mut self, plan: &MountPlan<'_>) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        let mut cards: HashMap<EngineId, EngineCardMetrics> = self
            .cards
            .drain(..)
            .map(|card| (card.engine_id(), card))
            .collect();
        for engine in plan.cards {
            let card = if let Some(card) = cards.remove(&engine.id) {
                card
            } else {
                summary.mounted += 1;
                match self.next_seed() {
                    Some(seed) => EngineCardMetrics::mount_seeded(engine, seed),
                    None => EngineCardMetrics::mount(engine),
                }
            };
            self.cards.push(card);
        }
        summary.unmounted += cards.len();

        let mut pools: HashMap<PoolId, PoolHeaderMetrics> = self.pools.drain(..).collect();
        for mount in plan.pools {
            let header = if let Some(header) = pools.remove(&mount.pool.id) {
                header.retotal(&mount.pool);
                header.set_engine_count(mount.engine_count);
                header
            } else {
                summary.mounted += 1;
                match self.next_seed() {
                    Some(seed) => PoolHeaderMetrics::mount_seeded(&mount.pool, mount.engine_count, seed),
                    None => PoolHeaderMetrics::mount(&mount.pool, mount.engine_count),
                }
            };
            self.pools.push((mount.pool.id.clone(), header));
        }
        summary.unmounted += pools.len();

        let keep_panel = matches!(
            (&self.panel, plan.panel),
            (Some(panel), Some(engine)) if panel.engine_id() == engine.id
        );
        if !keep_panel {
            if self.panel.take().is_some() {
                summary.unmounted += 1;
            }
            if let Some(engine) = plan.panel {
                summary.mounted += 1;
                self.panel = Some(match self.next_seed() {
                    Some(seed) => MetricsPanel::mount_seeded(engine, seed),
                    None => MetricsPanel::mount(engine),
                });
            }
        }

        if summary != ReconcileSummary::default() {
            tracing::debug!(
                mounted = summary.mounted,
                unmounted = summary.unmounted,
                cards = self.cards.len(),
                pools = self.pools.len(),
                panel = self.panel.is_some(),
                "Reconciled metric simulators"
            );
        }
        summary
    }

    /// Readings of all mounted cards and pool headers.
    #[must_use]
    pub fn readings(&self) -> DashboardReadings {
        DashboardReadings {
            cards: self.cards.iter().map(EngineCardMetrics::reading).collect(),
            pools: self.pools.iter().map(|(_, header)| header.reading()).collect(),
        }
    }

    /// The mounted card of an engine.
    #[must_use]
    pub fn card(&self, engine_id: &EngineId) -> Option<&EngineCardMetrics> {
        self.cards.iter().find(|card| &card.engine_id() == engine_id)
    }

    /// The mounted header of a pool.
    #[must_use]
    pub fn pool(&self, pool_id: &PoolId) -> Option<&PoolHeaderMetrics> {
        self.pools
            .iter()
            .find(|(id, _)| id == pool_id)
            .map(|(_, header)| header)
    }

    /// The open metrics panel.
    #[must_use]
    pub const fn panel(&self) -> Option<&MetricsPanel> {
        self.panel.as_ref()
    }

    /// Snapshot of the open metrics panel.
    #[must_use]
    pub fn panel_reading(&self) -> Option<PanelReading> {
        self.panel.as_ref().map(MetricsPanel::reading)
    }

    /// Number of mounted simulators.
    #[must_use]
    pub fn mounted(&self) -> usize {
        self.cards.len() + self.pools.len() + usize::from(self.panel.is_some())
    }
}
