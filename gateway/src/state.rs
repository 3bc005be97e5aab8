//! Shared application state.

use std::sync::Arc;

use store::StoreClient;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// State carried by every handler. The store client is constructed once here
/// and injected, never reached through a global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreClient>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let store = StoreClient::new(config.store.clone())
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        Ok(Self {
            store: Arc::new(store),
            config: Arc::new(config),
        })
    }
}
