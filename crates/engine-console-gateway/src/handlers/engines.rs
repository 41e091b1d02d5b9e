//! Engine and channel endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use engine_console_control::{ChannelEdit, Console, EngineEdit};

use super::{parse_channel_id, parse_engine_id};
use crate::error::ApiError;
use crate::state::GatewayState;

/// Get an engine record.
///
/// # Errors
///
/// Returns 404 if the engine doesn't exist.
pub async fn get_engine<C>(
    State(state): State<Arc<GatewayState<C>>>,
    Path(engine_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    C: Console + 'static,
{
    let engine_id = parse_engine_id(&engine_id)?;
    let engine = state.console.get_engine(&engine_id).await?;
    Ok(Json(engine))
}

/// Save the engine edit dialog.
///
/// # Errors
///
/// Returns 404 if the engine doesn't exist and 400 if a field is rejected.
pub async fn edit_engine<C>(
    State(state): State<Arc<GatewayState<C>>>,
    Path(engine_id): Path<String>,
    body: Result<Json<EngineEdit>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    C: Console + 'static,
{
    let engine_id = parse_engine_id(&engine_id)?;
    let Json(body) = body?;
    let engine = state.console.edit_engine(&engine_id, body).await?;

    tracing::info!(engine_id = %engine_id, "Engine edited via API");

    Ok(Json(engine))
}

/// Save the channel edit dialog.
///
/// # Errors
///
/// Returns 404 if the engine or channel doesn't exist and 400 if a field is
/// rejected.
pub async fn edit_channel<C>(
    State(state): State<Arc<GatewayState<C>>>,
    Path((engine_id, channel_id)): Path<(String, String)>,
    body: Result<Json<ChannelEdit>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    C: Console + 'static,
{
    let engine_id = parse_engine_id(&engine_id)?;
    let channel_id = parse_channel_id(&channel_id)?;
    let Json(body) = body?;
    let channel = state
        .console
        .edit_channel(&engine_id, &channel_id, body)
        .await?;

    tracing::info!(engine_id = %engine_id, channel_id = %channel_id, "Channel edited via API");

    Ok(Json(channel))
}
