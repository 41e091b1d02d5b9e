//! HTTP gateway for the engine-console configuration console.
//!
//! This crate exposes the console service as a JSON API for the browser
//! front end:
//!
//! - the compute-engine view and the actions that change it
//! - feature flags
//! - engine, channel and resource pool edits
//! - simulated live metrics
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Browser front end                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  engine-console-gateway                     │
//! │          Router + Handlers + ApiError mapping               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ConsoleService (control)                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use engine_console_control::ConsoleService;
//! use engine_console_gateway::{create_router, GatewayConfig, GatewayState};
//! use engine_console_store::{FixtureSource, MemoryStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::load(&FixtureSource::Bundled));
//! let console = Arc::new(ConsoleService::with_defaults(store));
//!
//! let state = GatewayState::new(console, GatewayConfig::default());
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
