//! HTTP request handlers.
//!
//! This module contains all the endpoint handlers for the gateway API.

pub mod console;
pub mod engines;
pub mod features;
pub mod health;
pub mod metrics;
pub mod pools;

use engine_console_control::{ChannelId, EngineId, FeatureId, PoolId};

use crate::error::ApiError;

/// Parse an engine ID from a path segment.
fn parse_engine_id(s: &str) -> Result<EngineId, ApiError> {
    EngineId::new(s).map_err(|_| ApiError::BadRequest(format!("invalid engine ID: {s}")))
}

/// Parse a channel ID from a path segment.
fn parse_channel_id(s: &str) -> Result<ChannelId, ApiError> {
    ChannelId::new(s).map_err(|_| ApiError::BadRequest(format!("invalid channel ID: {s}")))
}

/// Parse a pool ID from a path segment.
fn parse_pool_id(s: &str) -> Result<PoolId, ApiError> {
    PoolId::new(s).map_err(|_| ApiError::BadRequest(format!("invalid pool ID: {s}")))
}

/// Parse a feature flag name. Unknown flags are not found.
fn parse_feature_id(s: &str) -> Result<FeatureId, ApiError> {
    s.parse()
        .map_err(|_| ApiError::NotFound(format!("unknown feature: {s}")))
}
