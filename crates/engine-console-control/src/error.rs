//! Error types for console operations.

use engine_console_core::{ChannelId, EngineId, PoolId};
use thiserror::Error;

use crate::forms::FormError;

/// A result type using `ControlError`.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Errors that can occur in console operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The requested engine was not found.
    #[error("engine not found: {0}")]
    EngineNotFound(EngineId),

    /// The requested channel was not found on the engine.
    #[error("channel {channel_id} not found on engine {engine_id}")]
    ChannelNotFound {
        /// Engine searched.
        engine_id: EngineId,
        /// Missing channel.
        channel_id: ChannelId,
    },

    /// The requested resource pool was not found.
    #[error("resource pool not found: {0}")]
    PoolNotFound(PoolId),

    /// The metrics panel was requested with no engine selected.
    #[error("no engine is selected")]
    NoEngineSelected,

    /// The pool's controls are disabled by a feature flag.
    #[error("resource pool {0} is disabled by a feature flag")]
    PoolDisabled(PoolId),

    /// An edit was rejected by the form.
    #[error("invalid edit: {0}")]
    Form(#[from] FormError),
}

impl ControlError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EngineNotFound(_)
            | Self::ChannelNotFound { .. }
            | Self::PoolNotFound(_)
            | Self::NoEngineSelected => 404,
            Self::PoolDisabled(_) => 409,
            Self::Form(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        let engine_id = EngineId::new("trino-prod").unwrap();
        let pool_id = PoolId::new("pool-realtime-dw-task").unwrap();

        assert_eq!(
            ControlError::EngineNotFound(engine_id.clone()).http_status_code(),
            404
        );
        assert_eq!(
            ControlError::ChannelNotFound {
                engine_id,
                channel_id: ChannelId::new("ch-x").unwrap(),
            }
            .http_status_code(),
            404
        );
        assert_eq!(ControlError::PoolNotFound(pool_id.clone()).http_status_code(), 404);
        assert_eq!(ControlError::NoEngineSelected.http_status_code(), 404);
        assert_eq!(ControlError::PoolDisabled(pool_id).http_status_code(), 409);
        assert_eq!(
            ControlError::from(FormError::NameLength { field: "displayName" }).http_status_code(),
            400
        );
    }

    #[test]
    fn form_errors_keep_their_message() {
        let err = ControlError::from(FormError::InvertedRange { min: 5, max: 3 });
        assert_eq!(err.to_string(), "invalid edit: range 5~3 is inverted");
    }
}
