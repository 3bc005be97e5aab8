//! Environment-driven configuration.

use store::StoreConfig;

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind the server to.
    pub host: String,
    /// Port to bind the server to.
    pub port: u16,
    /// Connection settings for the backing vector store.
    pub store: StoreConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            store: StoreConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Reads configuration from the environment. Missing or unparsable
    /// values fall back to defaults rather than fail.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(3000),
            store: StoreConfig::from_env(),
        }
    }

    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }
}
