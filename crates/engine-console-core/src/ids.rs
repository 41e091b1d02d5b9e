//! Identifier types for engine-console.
//!
//! Engines, channels and resource pools are keyed by the string ids found in
//! the fixture documents. Feature flags are a closed set and get an enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier was empty (or only whitespace).
    #[error("identifier must not be empty")]
    Empty,

    /// The identifier contained a character that is not allowed.
    #[error("invalid character {0:?} in identifier")]
    InvalidCharacter(char),

    /// The feature flag name is not one the registry knows.
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
}

/// Validate a raw record identifier.
///
/// Ids are used as URL path segments, so whitespace and `/` are rejected.
fn validate(raw: &str) -> Result<(), IdError> {
    if raw.trim().is_empty() {
        return Err(IdError::Empty);
    }
    if let Some(c) = raw.chars().find(|c| c.is_whitespace() || *c == '/') {
        return Err(IdError::InvalidCharacter(c));
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the string is empty or contains whitespace or `/`.
            pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
                let raw = raw.into();
                validate(&raw)?;
                Ok(Self(raw))
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Unique identifier of an engine across the whole catalog.
    EngineId
}

string_id! {
    /// Identifier of a channel, unique within its engine's channel list.
    ChannelId
}

string_id! {
    /// Unique identifier of a resource pool.
    PoolId
}

/// The warehouse feature flags known to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureId {
    /// Realtime tasks: gates streaming Flink sessions, `AutoMQ` and the
    /// realtime DW task pool.
    RealtimeTask,
    /// Warmup batch integration: gates warmup Flink sessions.
    WarmupBatchIntegration,
}

impl FeatureId {
    /// All feature ids in registry order.
    pub const ALL: [Self; 2] = [Self::RealtimeTask, Self::WarmupBatchIntegration];

    /// The wire name of the feature.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RealtimeTask => "realtime-task",
            Self::WarmupBatchIntegration => "warmup-batch-integration",
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| IdError::UnknownFeature(s.to_string()))
    }
}
