//! # Store client
//!
//! The sole channel to the external vector-store service. All durable
//! storage, indexing and ranking live behind that HTTP surface; the gateway
//! only ever reaches it through [`StoreClient`].

pub mod client;
pub mod error;
pub mod types;

pub use client::{StoreClient, StoreConfig};
pub use error::StoreError;
pub use types::{IndexStats, SearchMode, SearchOptions, SearchPage};
