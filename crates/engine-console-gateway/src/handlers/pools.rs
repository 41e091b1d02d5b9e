//! Resource pool endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use engine_console_control::{Console, PoolEdit};

use super::parse_pool_id;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Get a pool with its engine count and disabled state.
///
/// # Errors
///
/// Returns 404 if the pool doesn't exist.
pub async fn get_pool<C>(
    State(state): State<Arc<GatewayState<C>>>,
    Path(pool_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    C: Console + 'static,
{
    let pool_id = parse_pool_id(&pool_id)?;
    let pool = state.console.get_pool(&pool_id).await?;
    Ok(Json(pool))
}

/// Save the pool edit dialog.
///
/// # Errors
///
/// Returns 404 if the pool doesn't exist, 409 while a feature flag disables
/// it and 400 if a field is rejected.
pub async fn edit_pool<C>(
    State(state): State<Arc<GatewayState<C>>>,
    Path(pool_id): Path<String>,
    body: Result<Json<PoolEdit>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    C: Console + 'static,
{
    let pool_id = parse_pool_id(&pool_id)?;
    let Json(body) = body?;
    let pool = state.console.edit_pool(&pool_id, body).await?;

    tracing::info!(pool_id = %pool_id, "Pool edited via API");

    Ok(Json(pool))
}
