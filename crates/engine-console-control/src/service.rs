//! Console service implementation.
//!
//! This module provides the `Console` trait and the `ConsoleService`
//! implementation that ties the store, the console state and the metrics
//! dashboard together.

use std::sync::Arc;

use async_trait::async_trait;
use engine_console_core::{Channel, ChannelId, Engine, EngineId, FeatureFlag, FeatureId, PoolId};
use engine_console_monitor::{
    Dashboard, DashboardReadings, MetricsPanel, MountPlan, PanelReading, PoolMount,
};
use engine_console_store::{Catalog, Store};
use parking_lot::{Mutex, RwLock};

use crate::error::{ControlError, Result};
use crate::forms::{ChannelDraft, EngineDraft, PoolDraft};
use crate::state::{reduce, Action, ConsoleState, Page};
use crate::types::{ChannelEdit, ConsoleConfig, EngineEdit, PoolEdit};
use crate::view::{self, build_view, ConsoleView, PoolView};
use crate::visibility::is_pool_disabled;

/// Trait defining the console operations.
///
/// Every operation leaves the mounted metric simulators in line with what
/// the current view shows.
#[async_trait]
pub trait Console: Send + Sync {
    // =========================================================================
    // View & State
    // =========================================================================

    /// The view for the current state.
    async fn view(&self) -> ConsoleView;

    /// Apply a user action and return the resulting view.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::EngineNotFound` or `ControlError::PoolNotFound`
    /// when the action names a missing record, and
    /// `ControlError::PoolDisabled` when opening the editor of a disabled pool.
    async fn dispatch(&self, action: Action) -> Result<ConsoleView>;

    // =========================================================================
    // Features
    // =========================================================================

    /// All feature flags.
    async fn features(&self) -> Vec<FeatureFlag>;

    /// Flip a feature flag and return the new flag list.
    async fn toggle_feature(&self, id: FeatureId) -> Vec<FeatureFlag>;

    // =========================================================================
    // Records & Edits
    // =========================================================================

    /// Get an engine by id.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::EngineNotFound` if the engine doesn't exist.
    async fn get_engine(&self, id: &EngineId) -> Result<Arc<Engine>>;

    /// Validate and save an engine edit.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::EngineNotFound` for a missing engine and
    /// `ControlError::Form` for a rejected field.
    async fn edit_engine(&self, id: &EngineId, edit: EngineEdit) -> Result<Arc<Engine>>;

    /// Validate and save a channel edit.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::EngineNotFound` or `ControlError::ChannelNotFound`
    /// for a missing record and `ControlError::Form` for a rejected field.
    async fn edit_channel(
        &self,
        engine_id: &EngineId,
        channel_id: &ChannelId,
        edit: ChannelEdit,
    ) -> Result<Channel>;

    /// Get a pool with its engine count and disabled state.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::PoolNotFound` if the pool doesn't exist.
    async fn get_pool(&self, id: &PoolId) -> Result<PoolView>;

    /// Validate and save a pool edit.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::PoolNotFound` for a missing pool,
    /// `ControlError::PoolDisabled` while a feature flag suppresses its
    /// controls, and `ControlError::Form` for a rejected field.
    async fn edit_pool(&self, id: &PoolId, edit: PoolEdit) -> Result<PoolView>;

    /// `AutoMQ` engines shown on the storage page.
    async fn storage_engines(&self) -> Vec<Arc<Engine>>;

    // =========================================================================
    // Metrics
    // =========================================================================

    /// Live readings of the mounted engine cards and pool headers.
    async fn metrics(&self) -> DashboardReadings;

    /// Live reading of the selected engine's metrics panel.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::NoEngineSelected` when no panel is open.
    async fn metrics_panel(&self) -> Result<PanelReading>;

    /// Refresh the metrics panel now and reset its countdown.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::NoEngineSelected` when no panel is open.
    async fn refresh_metrics_panel(&self) -> Result<PanelReading>;
}

/// The main console service implementation.
pub struct ConsoleService<S: Store> {
    store: Arc<S>,
    state: RwLock<ConsoleState>,
    dashboard: Mutex<Dashboard>,
}

impl<S: Store> ConsoleService<S> {
    /// Create a new console service.
    ///
    /// Simulators are mounted lazily by the first operation, which must run
    /// inside a Tokio runtime.
    #[must_use]
    pub fn new(store: Arc<S>, config: &ConsoleConfig) -> Self {
        let dashboard = match config.metrics_seed {
            Some(seed) => Dashboard::seeded(seed),
            None => Dashboard::new(),
        };
        Self {
            store,
            state: RwLock::new(ConsoleState::default()),
            dashboard: Mutex::new(dashboard),
        }
    }

    /// Create with default configuration.
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, &ConsoleConfig::default())
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// A copy of the current state.
    #[must_use]
    pub fn state(&self) -> ConsoleState {
        self.state.read().clone()
    }

    /// Build the view and bring the dashboard in line with it.
    fn render(&self) -> ConsoleView {
        let state = self.state.read();
        self.render_locked(&state)
    }

    /// Render while the caller holds the state lock.
    ///
    /// The catalog snapshot is taken under the dashboard lock, so the last
    /// reconcile always sees the newest catalog and state.
    fn render_locked(&self, state: &ConsoleState) -> ConsoleView {
        let mut dashboard = self.dashboard.lock();
        let catalog = self.store.snapshot();
        let view = build_view(&catalog, state);
        Self::mount(&mut dashboard, &catalog, state, &view);
        view
    }

    fn mount(dashboard: &mut Dashboard, catalog: &Catalog, state: &ConsoleState, view: &ConsoleView) {
        let storage;
        let (cards, pools): (&[Arc<Engine>], Vec<PoolMount>) = match state.page {
            Page::ComputeEngine => (
                view.engines.as_slice(),
                view.pools
                    .iter()
                    .map(|p| PoolMount {
                        pool: Arc::clone(&p.pool),
                        engine_count: p.engine_count,
                    })
                    .collect(),
            ),
            Page::StorageResource => {
                storage = view::storage_engines(catalog, &state.features);
                (storage.as_slice(), Vec::new())
            }
            Page::WarehouseFeatures => (&[][..], Vec::new()),
        };

        dashboard.reconcile(&MountPlan {
            cards,
            pools: &pools,
            panel: view.selected_engine.as_deref(),
        });
    }

    /// Check an action against the catalog and the state it will apply to.
    fn check_action(catalog: &Catalog, state: &ConsoleState, action: &Action) -> Result<()> {
        match action {
            Action::SelectEngine { engine_id } if catalog.engine(engine_id).is_none() => {
                Err(ControlError::EngineNotFound(engine_id.clone()))
            }
            Action::OpenPoolEditor { pool_id } => {
                let pool = catalog
                    .pool(pool_id)
                    .ok_or_else(|| ControlError::PoolNotFound(pool_id.clone()))?;
                if is_pool_disabled(pool, &state.features) {
                    return Err(ControlError::PoolDisabled(pool_id.clone()));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Reduce an action, closing the pool editor if its pool became disabled.
    fn transition(catalog: &Catalog, state: &ConsoleState, action: &Action) -> ConsoleState {
        let mut next = reduce(state, action);
        let disabled = next
            .editing_pool
            .as_ref()
            .and_then(|id| catalog.pool(id))
            .is_some_and(|pool| is_pool_disabled(pool, &next.features));
        if disabled {
            next.editing_pool = None;
        }
        next
    }

    /// Check, reduce and render under one write guard.
    fn apply(&self, action: &Action) -> Result<ConsoleView> {
        let mut state = self.state.write();
        let catalog = self.store.snapshot();
        Self::check_action(&catalog, &state, action)?;
        *state = Self::transition(&catalog, &state, action);
        Ok(self.render_locked(&state))
    }

    fn pool_view_locked(&self, id: &PoolId, state: &ConsoleState) -> Result<PoolView> {
        let catalog = self.store.snapshot();
        let pool = catalog
            .pool(id)
            .ok_or_else(|| ControlError::PoolNotFound(id.clone()))?;
        Ok(view::pool_view(&catalog, pool, &state.features))
    }
}

#[async_trait]
impl<S: Store + 'static> Console for ConsoleService<S> {
    // =========================================================================
    // View & State
    // =========================================================================

    async fn view(&self) -> ConsoleView {
        self.render()
    }

    async fn dispatch(&self, action: Action) -> Result<ConsoleView> {
        let view = self.apply(&action)?;

        tracing::debug!(action = ?action, "Applied console action");

        Ok(view)
    }

    // =========================================================================
    // Features
    // =========================================================================

    async fn features(&self) -> Vec<FeatureFlag> {
        self.state.read().features.flags().to_vec()
    }

    async fn toggle_feature(&self, id: FeatureId) -> Vec<FeatureFlag> {
        let flags = {
            let mut state = self.state.write();
            let catalog = self.store.snapshot();
            *state = Self::transition(&catalog, &state, &Action::ToggleFeature { feature_id: id });
            self.render_locked(&state);
            state.features.flags().to_vec()
        };

        tracing::info!(
            feature_id = %id.as_str(),
            enabled = flags.iter().any(|f| f.id == id && f.enabled),
            "Toggled feature"
        );

        flags
    }

    // =========================================================================
    // Records & Edits
    // =========================================================================

    async fn get_engine(&self, id: &EngineId) -> Result<Arc<Engine>> {
        self.store
            .get_engine(id)
            .ok_or_else(|| ControlError::EngineNotFound(id.clone()))
    }

    async fn edit_engine(&self, id: &EngineId, edit: EngineEdit) -> Result<Arc<Engine>> {
        let engine = self.get_engine(id).await?;
        let mut draft = EngineDraft::new(&engine);
        draft.apply(&edit)?;

        if !self.store.update_engine(id, &draft.into_patch()) {
            return Err(ControlError::EngineNotFound(id.clone()));
        }
        self.render();

        self.get_engine(id).await
    }

    async fn edit_channel(
        &self,
        engine_id: &EngineId,
        channel_id: &ChannelId,
        edit: ChannelEdit,
    ) -> Result<Channel> {
        let not_found = || ControlError::ChannelNotFound {
            engine_id: engine_id.clone(),
            channel_id: channel_id.clone(),
        };
        let engine = self.get_engine(engine_id).await?;
        let channel = engine.channel(channel_id).ok_or_else(not_found)?;
        let mut draft = ChannelDraft::new(channel);
        draft.apply(&edit)?;

        if !self.store.update_channel(engine_id, channel_id, &draft.into_patch()) {
            return Err(not_found());
        }
        self.render();

        self.store
            .get_channel(engine_id, channel_id)
            .ok_or_else(not_found)
    }

    async fn get_pool(&self, id: &PoolId) -> Result<PoolView> {
        self.pool_view_locked(id, &self.state.read())
    }

    async fn edit_pool(&self, id: &PoolId, edit: PoolEdit) -> Result<PoolView> {
        // Held until the edit is saved so a flag toggle cannot disable the
        // pool in between.
        let state = self.state.read();
        let current = self.pool_view_locked(id, &state)?;
        if current.disabled {
            return Err(ControlError::PoolDisabled(id.clone()));
        }
        let mut draft = PoolDraft::new(&current.pool);
        draft.apply(&edit)?;

        if !self.store.update_pool(id, &draft.into_patch()) {
            return Err(ControlError::PoolNotFound(id.clone()));
        }
        self.render_locked(&state);

        self.pool_view_locked(id, &state)
    }

    async fn storage_engines(&self) -> Vec<Arc<Engine>> {
        let catalog = self.store.snapshot();
        view::storage_engines(&catalog, &self.state.read().features)
    }

    // =========================================================================
    // Metrics
    // =========================================================================

    async fn metrics(&self) -> DashboardReadings {
        self.render();
        self.dashboard.lock().readings()
    }

    async fn metrics_panel(&self) -> Result<PanelReading> {
        self.render();
        self.dashboard
            .lock()
            .panel_reading()
            .ok_or(ControlError::NoEngineSelected)
    }

    async fn refresh_metrics_panel(&self) -> Result<PanelReading> {
        self.render();
        let reading = self
            .dashboard
            .lock()
            .panel()
            .map(MetricsPanel::refresh_now)
            .ok_or(ControlError::NoEngineSelected)?;

        tracing::debug!(engine_id = %reading.engine_id, "Refreshed metrics panel");

        Ok(reading)
    }
}
