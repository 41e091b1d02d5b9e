//! Engine Console Gateway
//!
//! Loads the engine catalog, starts the console service and serves the HTTP
//! API.
//!
//! # Environment
//!
//! - `LISTEN_ADDR`: listen address, default `0.0.0.0:8080`
//! - `FIXTURE_DIR`: directory holding the fixture documents; the bundled set
//!   is used when unset
//! - `METRICS_SEED`: fixed seed for the metric simulators; entropy when unset
//! - `RUST_LOG`: log filter, default `info,engine_console=debug`

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use engine_console_control::{ConsoleConfig, ConsoleService};
use engine_console_gateway::{create_router, GatewayConfig, GatewayState};
use engine_console_store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,engine_console=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Engine Console Gateway");

    let config = GatewayConfig::from_env();
    let source = config.fixture_source();

    tracing::info!(
        listen_addr = %config.listen_addr,
        fixtures = ?source,
        metrics_seed = ?config.metrics_seed,
        "Gateway configuration loaded"
    );

    // A load failure is logged by the store and leaves the catalog empty.
    let store = Arc::new(MemoryStore::load(&source));
    let console = Arc::new(ConsoleService::new(
        store,
        &ConsoleConfig {
            metrics_seed: config.metrics_seed,
        },
    ));

    let listen_addr = config.listen_addr.clone();
    let app = create_router(GatewayState::new(console, config));
    tracing::info!("Router configured with all API endpoints");

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
