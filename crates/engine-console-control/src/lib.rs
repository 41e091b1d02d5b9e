//! Console logic for engine-console.
//!
//! This crate holds the rules that decide what the console shows and the
//! service that the gateway drives. Records come from the store; live
//! figures come from the monitor's simulators.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Gateway (HTTP)                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ConsoleService                         │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │  reduce     │ │ build_view  │ │   Edit drafts       │    │
//! │  │  (state)    │ │ + features  │ │   (validation)      │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                ┌─────────────┴─────────────┐
//!                ▼                           ▼
//!         ┌──────────────┐           ┌──────────────┐
//!         │    Store     │           │  Dashboard   │
//!         │  (catalog)   │           │ (simulators) │
//!         └──────────────┘           └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use engine_console_control::{Action, Console, ConsoleService};
//! use engine_console_core::EngineType;
//! use engine_console_store::{FixtureSource, MemoryStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::load(&FixtureSource::Bundled));
//! let console = ConsoleService::with_defaults(store);
//!
//! let view = console.dispatch(Action::SelectTab { tab: EngineType::Flink }).await?;
//! for engine in &view.engines {
//!     println!("{} ({})", engine.display_name, engine.business_mode);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Visibility
//!
//! Two warehouse features gate parts of the catalog. See [`visibility`] for
//! the rules and [`features`] for the registry.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod features;
pub mod forms;
pub mod service;
pub mod state;
pub mod types;
pub mod view;
pub mod visibility;

pub use error::{ControlError, Result};
pub use features::FeatureRegistry;
pub use forms::{ChannelDraft, EngineDraft, FormError, PoolDraft};
pub use service::{Console, ConsoleService};
pub use state::{reduce, Action, ConsoleState, Page};
pub use types::{ChannelEdit, ConsoleConfig, EngineEdit, PoolEdit, WorkerRange};
pub use view::{build_view, ConsoleView, HiddenByFeatures, PoolEngineCount, PoolView, TabCount};
pub use visibility::{is_engine_visible, is_pool_disabled};

// Re-export the types callers need to drive the service.
pub use engine_console_core::{ChannelId, EngineId, EngineType, FeatureId, FlinkSubType, PoolId};
pub use engine_console_monitor::{DashboardReadings, PanelReading};
