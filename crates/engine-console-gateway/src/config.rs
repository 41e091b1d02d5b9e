//! Gateway configuration types.

use std::path::PathBuf;
use std::time::Duration;

use engine_console_store::FixtureSource;
use serde::Deserialize;

/// Configuration for the gateway service.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    #[serde(default = "GatewayConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Allowed CORS origins.
    #[serde(default = "GatewayConfig::default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Directory to load fixtures from instead of the bundled set.
    #[serde(default)]
    pub fixture_dir: Option<PathBuf>,

    /// Fixed seed for the metrics simulators.
    #[serde(default)]
    pub metrics_seed: Option<u64>,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    fn default_cors_origins() -> Vec<String> {
        vec!["*".to_string()]
    }

    const fn default_max_body() -> usize {
        64 * 1024 // 64 KB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Where to load fixtures from.
    #[must_use]
    pub fn fixture_source(&self) -> FixtureSource {
        self.fixture_dir
            .clone()
            .map_or(FixtureSource::Bundled, FixtureSource::Directory)
    }

    /// Apply `LISTEN_ADDR`, `FIXTURE_DIR` and `METRICS_SEED` overrides.
    ///
    /// A seed that is not an unsigned integer is logged and ignored.
    #[must_use]
    pub fn with_env_overrides(
        self,
        listen_addr: Option<String>,
        fixture_dir: Option<String>,
        metrics_seed: Option<String>,
    ) -> Self {
        let metrics_seed = metrics_seed.and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "Ignoring invalid METRICS_SEED");
                None
            }
        });

        Self {
            listen_addr: listen_addr.unwrap_or(self.listen_addr),
            fixture_dir: fixture_dir.map(PathBuf::from).or(self.fixture_dir),
            metrics_seed: metrics_seed.or(self.metrics_seed),
            ..self
        }
    }

    /// Read overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(
            std::env::var("LISTEN_ADDR").ok(),
            std::env::var("FIXTURE_DIR").ok(),
            std::env::var("METRICS_SEED").ok(),
        )
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            cors_origins: Self::default_cors_origins(),
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
            fixture_dir: None,
            metrics_seed: None,
        }
    }
}
