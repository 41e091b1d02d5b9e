//! Console view and action endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use engine_console_control::{Action, Console, ConsoleView};
use engine_console_core::Engine;

use crate::error::ApiError;
use crate::state::GatewayState;

/// Response for the storage page.
#[derive(Debug, Serialize)]
pub struct StorageResponse {
    /// `AutoMQ` engines passing the feature rules.
    pub engines: Vec<Arc<Engine>>,
}

/// Current console view.
pub async fn get_view<C>(State(state): State<Arc<GatewayState<C>>>) -> Json<ConsoleView>
where
    C: Console + 'static,
{
    Json(state.console.view().await)
}

/// Apply a user action and return the new view.
///
/// # Errors
///
/// Returns 404 when the action names a missing engine or pool and 409 when
/// opening the editor of a disabled pool. An unknown action is a 400.
pub async fn dispatch<C>(
    State(state): State<Arc<GatewayState<C>>>,
    action: Result<Json<Action>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    C: Console + 'static,
{
    let Json(action) = action?;
    let view = state.console.dispatch(action).await?;
    Ok(Json(view))
}

/// Storage-resource page engines.
pub async fn storage<C>(State(state): State<Arc<GatewayState<C>>>) -> Json<StorageResponse>
where
    C: Console + 'static,
{
    Json(StorageResponse {
        engines: state.console.storage_engines().await,
    })
}
