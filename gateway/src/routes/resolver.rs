//! Unified entity operations.
//!
//! Callers address any record by opaque ID alone; the kind is resolved from
//! the ID prefix through the schema registry, never stated explicitly.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use entities::{Entity, EntityKind};

use crate::error::{GatewayError, Result};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entities/{id}", get(fetch).delete(remove))
        .route("/entities/delete", post(remove_batch))
}

fn resolve(id: &str) -> Result<EntityKind> {
    EntityKind::from_id(id).ok_or_else(|| GatewayError::UnknownPrefix { id: id.to_string() })
}

/// `GET /api/entities/{id}` — an unresolvable prefix is distinct from a
/// resolvable prefix with no record behind it.
async fn fetch(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Entity>> {
    let kind = resolve(&id)?;

    let entity = state
        .store
        .get(kind, &id)
        .await
        .map_err(|e| GatewayError::upstream("get", kind, e))?
        .ok_or(GatewayError::NotFound { kind })?;

    Ok(Json(entity))
}

/// `DELETE /api/entities/{id}`
async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let kind = resolve(&id)?;

    state
        .store
        .delete(kind, std::slice::from_ref(&id))
        .await
        .map_err(|e| GatewayError::upstream("delete", kind, e))?;

    Ok(Json(json!({ "success": true, "deleted": id, "type": kind })))
}

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    success: bool,
    deleted: Vec<String>,
    errors: Vec<BatchDeleteError>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteError {
    id: String,
    error: String,
}

/// `POST /api/entities/delete` — accepts `{id}` or `{ids: [...]}`. Each ID
/// is resolved and deleted independently; one bad ID never aborts the rest,
/// and partial success is a valid terminal state (HTTP 200 with `errors`).
async fn remove_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchDeleteRequest>,
) -> Result<Json<BatchDeleteResponse>> {
    let ids = request
        .ids
        .or_else(|| request.id.map(|id| vec![id]))
        .unwrap_or_default();

    if ids.is_empty() {
        return Err(GatewayError::InvalidInput(
            "id or ids is required".to_string(),
        ));
    }

    let mut deleted = Vec::new();
    let mut errors = Vec::new();

    for id in ids {
        let Some(kind) = EntityKind::from_id(&id) else {
            errors.push(BatchDeleteError {
                id,
                error: "Invalid ID format".to_string(),
            });
            continue;
        };

        match state.store.delete(kind, std::slice::from_ref(&id)).await {
            Ok(()) => deleted.push(id),
            Err(e) => {
                tracing::warn!(%kind, %id, error = %e, "batch delete entry failed");
                errors.push(BatchDeleteError {
                    id,
                    error: "Delete failed".to_string(),
                });
            }
        }
    }

    Ok(Json(BatchDeleteResponse {
        success: errors.is_empty(),
        deleted,
        errors,
    }))
}
