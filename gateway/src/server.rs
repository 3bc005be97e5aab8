//! Server setup and lifecycle.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::routes::create_router;
use crate::state::AppState;

/// The gateway HTTP server.
pub struct GatewayServer {
    state: AppState,
}

impl GatewayServer {
    /// Creates a new server instance with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    /// Creates a server instance from an existing `AppState`.
    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    /// Runs the HTTP server.
    ///
    /// This method blocks until the server is shut down (e.g., via Ctrl+C).
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.state.config.host, self.state.config.port)
            .parse()
            .map_err(|e| GatewayError::Configuration(format!("invalid bind address: {e}")))?;

        let router = create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| GatewayError::Server(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(%addr, "gateway listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Server(format!("server error: {e}")))?;

        tracing::info!("gateway stopped");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Signal handler for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        },
        () = terminate => {
            tracing::info!("received terminate signal, shutting down");
        },
    }
}

/// Entry point for running the server from an explicit configuration.
pub async fn run_server(config: GatewayConfig) -> Result<()> {
    GatewayServer::new(config)?.run().await
}

/// Entry point for containerized deployments: environment configuration plus
/// tracing initialization.
pub async fn run_from_env() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    run_server(GatewayConfig::from_env()).await
}
