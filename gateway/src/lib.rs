//! # Personal-data API gateway
//!
//! Exposes a uniform REST surface over ten entity kinds while delegating all
//! durable storage, full-text/embedding search and ranking to the external
//! vector store. The interesting parts live in `routes`: the generic CRUD
//! router instantiated once per kind, the ID-prefix resolver, and the
//! multi-kind search fan-out with a global rank merge.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use routes::create_router;
pub use state::AppState;
