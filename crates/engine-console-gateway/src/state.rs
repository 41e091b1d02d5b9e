//! Gateway application state.

use std::sync::Arc;

use engine_console_control::Console;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
pub struct GatewayState<C>
where
    C: Console,
{
    /// The console service.
    pub console: Arc<C>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<C> GatewayState<C>
where
    C: Console,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(console: Arc<C>, config: GatewayConfig) -> Self {
        Self { console, config }
    }
}

impl<C> Clone for GatewayState<C>
where
    C: Console,
{
    fn clone(&self) -> Self {
        Self {
            console: Arc::clone(&self.console),
            config: self.config.clone(),
        }
    }
}
