//! Shared application state.

use std::sync::Arc;

use relay_core::relay::RelayService;
use relay_infra::config::RelayConfig;
use relay_infra::llm::create_provider;

/// State shared by all handlers. Cloned per request; the service is immutable.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

impl AppState {
    /// Wire the relay service from resolved configuration.
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(RelayService::new(create_provider(config), config.model.clone()))
    }

    pub fn new(relay: RelayService) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}
