//! Feature flag endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use engine_console_control::Console;
use engine_console_core::FeatureFlag;

use super::parse_feature_id;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Response for the feature list.
#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    /// All flags in registry order.
    pub features: Vec<FeatureFlag>,
}

/// List feature flags.
pub async fn list_features<C>(State(state): State<Arc<GatewayState<C>>>) -> Json<FeaturesResponse>
where
    C: Console + 'static,
{
    Json(FeaturesResponse {
        features: state.console.features().await,
    })
}

/// Flip a feature flag.
///
/// # Errors
///
/// Returns 404 for a flag the registry doesn't know.
pub async fn toggle_feature<C>(
    State(state): State<Arc<GatewayState<C>>>,
    Path(feature_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    C: Console + 'static,
{
    let feature_id = parse_feature_id(&feature_id)?;
    Ok(Json(FeaturesResponse {
        features: state.console.toggle_feature(feature_id).await,
    }))
}
