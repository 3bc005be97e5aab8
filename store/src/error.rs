//! Error types for the store client.

use thiserror::Error;

/// Errors surfaced by [`StoreClient`](crate::StoreClient) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected a write with a non-2xx response.
    #[error("store write failed ({status}): {body}")]
    Write { status: u16, body: String },

    /// The store rejected a read with a non-2xx, non-404 response.
    #[error("store read failed ({status}): {body}")]
    Read { status: u16, body: String },

    /// The store rejected a search with a non-2xx response.
    #[error("store search failed ({status}): {body}")]
    Search { status: u16, body: String },

    /// The request never produced a usable response.
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a body this client cannot decode.
    #[error("store returned a malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Client-side configuration is unusable.
    #[error("store configuration error: {0}")]
    Configuration(String),
}
