//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::map_response_body::MapResponseBodyLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use engine_console_control::Console;

use crate::handlers::{console, engines, features, health, metrics, pools};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
///
/// ## Console
/// - `GET /v1/console` - Current view
/// - `POST /v1/console/actions` - Apply an action, returns the new view
/// - `GET /v1/storage` - Storage page engines
///
/// ## Features
/// - `GET /v1/features` - List flags
/// - `POST /v1/features/{id}/toggle` - Flip a flag
///
/// ## Records
/// - `GET|PATCH /v1/engines/{id}` - Get or edit an engine
/// - `PATCH /v1/engines/{id}/channels/{channel_id}` - Edit a channel
/// - `GET|PATCH /v1/pools/{id}` - Get or edit a resource pool
///
/// ## Metrics
/// - `GET /v1/metrics` - Card and pool header readings
/// - `GET /v1/metrics/panel` - Metrics panel of the selected engine
/// - `POST /v1/metrics/panel/refresh` - Refresh the panel now
pub fn create_router<C>(state: GatewayState<C>) -> Router
where
    C: Console + 'static,
{
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health::health))
        // Console
        .route("/v1/console", get(console::get_view::<C>))
        .route("/v1/console/actions", post(console::dispatch::<C>))
        .route("/v1/storage", get(console::storage::<C>))
        // Features
        .route("/v1/features", get(features::list_features::<C>))
        .route(
            "/v1/features/{feature_id}/toggle",
            post(features::toggle_feature::<C>),
        )
        // Records
        .route(
            "/v1/engines/{engine_id}",
            get(engines::get_engine::<C>).patch(engines::edit_engine::<C>),
        )
        .route(
            "/v1/engines/{engine_id}/channels/{channel_id}",
            axum::routing::patch(engines::edit_channel::<C>),
        )
        .route(
            "/v1/pools/{pool_id}",
            get(pools::get_pool::<C>).patch(pools::edit_pool::<C>),
        )
        // Metrics
        .route("/v1/metrics", get(metrics::get_metrics::<C>))
        .route("/v1/metrics/panel", get(metrics::get_panel::<C>))
        .route("/v1/metrics/panel/refresh", post(metrics::refresh_panel::<C>))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(MapResponseBodyLayer::new(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(max_body_bytes))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
