//! Error taxonomy and HTTP mapping for the gateway.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use entities::{EntityKind, ValidationError};
use serde::Serialize;
use store::StoreError;
use thiserror::Error;

/// Result type alias for the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by gateway handlers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed or incomplete caller input.
    #[error("{0}")]
    InvalidInput(String),

    /// A write body failed the kind's validation rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The ID's prefix matches no known kind.
    #[error("unrecognized id prefix: {id}")]
    UnknownPrefix { id: String },

    /// The kind resolved but no record exists.
    #[error("{kind} not found")]
    NotFound { kind: EntityKind },

    /// A store call failed. The upstream detail is logged, never echoed.
    #[error("failed to {action} {kind}")]
    Upstream {
        action: &'static str,
        kind: EntityKind,
        #[source]
        source: StoreError,
    },

    /// Unusable service configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Server startup or runtime failure.
    #[error("server error: {0}")]
    Server(String),
}

impl GatewayError {
    pub fn upstream(action: &'static str, kind: EntityKind, source: StoreError) -> Self {
        Self::Upstream {
            action,
            kind,
            source,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnknownPrefix { .. } | Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upstream { .. } | Self::Configuration(_) | Self::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error envelope returned to callers.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if let Self::Upstream {
            action,
            kind,
            ref source,
        } = self
        {
            tracing::error!(%action, %kind, error = %source, "store call failed");
        }

        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = GatewayError::Validation(ValidationError::MissingTitle);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn unknown_prefixes_are_distinct_from_absent_records() {
        let unknown = GatewayError::UnknownPrefix {
            id: "zzz_1".to_string(),
        };
        let absent = GatewayError::NotFound {
            kind: EntityKind::Task,
        };
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(absent.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(unknown.to_string(), "unrecognized id prefix: zzz_1");
        assert_eq!(absent.to_string(), "task not found");
    }

    #[test]
    fn upstream_errors_hide_the_store_detail() {
        let err = GatewayError::upstream(
            "create",
            EntityKind::Event,
            StoreError::Write {
                status: 500,
                body: "secret internal state".to_string(),
            },
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "failed to create event");
    }
}
