//! Error types for the storage layer.

use engine_console_core::{EngineId, PoolId};
use thiserror::Error;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while loading the catalog.
///
/// Lookups and updates never fail; a miss is reported as absence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A fixture document is not part of the bundled set.
    #[error("unknown fixture document: {0}")]
    UnknownDocument(String),

    /// A fixture document could not be read.
    #[error("failed to read fixture {document}: {source}")]
    Io {
        /// Document file name.
        document: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A fixture document did not match the expected shape.
    #[error("malformed fixture {document}: {source}")]
    Serialization {
        /// Document file name.
        document: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Two engines share an id.
    #[error("duplicate engine id: {0}")]
    DuplicateEngine(EngineId),

    /// Two pools share an id.
    #[error("duplicate pool id: {0}")]
    DuplicatePool(PoolId),
}
