//! Simulated metrics endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use engine_console_control::{Console, DashboardReadings};

use crate::error::ApiError;
use crate::state::GatewayState;

/// Readings of every mounted engine card and pool header.
pub async fn get_metrics<C>(State(state): State<Arc<GatewayState<C>>>) -> Json<DashboardReadings>
where
    C: Console + 'static,
{
    Json(state.console.metrics().await)
}

/// The selected engine's metrics panel.
///
/// # Errors
///
/// Returns 404 when no engine is selected.
pub async fn get_panel<C>(
    State(state): State<Arc<GatewayState<C>>>,
) -> Result<impl IntoResponse, ApiError>
where
    C: Console + 'static,
{
    let reading = state.console.metrics_panel().await?;
    Ok(Json(reading))
}

/// Refresh the metrics panel now.
///
/// # Errors
///
/// Returns 404 when no engine is selected.
pub async fn refresh_panel<C>(
    State(state): State<Arc<GatewayState<C>>>,
) -> Result<impl IntoResponse, ApiError>
where
    C: Console + 'static,
{
    let reading = state.console.refresh_metrics_panel().await?;
    Ok(Json(reading))
}
