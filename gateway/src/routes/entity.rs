//! The generic CRUD router, instantiated once per concrete entity kind.
//!
//! Each instance is parameterized by the kind, its ID prefix and its
//! validation rule; every handler body is shared across kinds.

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;

use entities::{Entity, EntityDraft, EntityKind, Validator, id as ids};
use store::SearchOptions;

use crate::error::{GatewayError, Result};
use crate::state::AppState;

/// Per-kind routing parameters, injected into every handler.
#[derive(Debug, Clone, Copy)]
pub struct KindRoute {
    pub kind: EntityKind,
    pub prefix: &'static str,
    pub validator: Validator,
}

/// Builds the CRUD router for `kind`; `None` for search-only kinds.
pub fn routes(kind: EntityKind) -> Option<Router<AppState>> {
    let prefix = kind.prefix()?;
    let route = KindRoute {
        kind,
        prefix,
        validator: kind.validator(),
    };

    Some(
        Router::new()
            .route("/", get(list).post(create))
            .route(
                "/{id}",
                get(fetch).put(replace).patch(merge).delete(remove),
            )
            .layer(Extension(route)),
    )
}

/// `GET /` — ranked list/search within the kind's namespace. Query params
/// other than `q` and `limit` become equality filters; empty values are
/// dropped.
async fn list(
    State(state): State<AppState>,
    Extension(route): Extension<KindRoute>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let mut params = params;
    let query = params.remove("q");
    let limit = params
        .remove("limit")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(SearchOptions::DEFAULT_LIMIT);

    let filters: HashMap<String, Value> = params
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    let options = SearchOptions {
        query,
        filters,
        limit,
        ..SearchOptions::default()
    };

    let page = state
        .store
        .search(route.kind, &options)
        .await
        .map_err(|e| GatewayError::upstream("list", route.kind, e))?;

    Ok(Json(json!({
        "results": page.results,
        "total": page.total,
    })))
}

/// `GET /{id}`
async fn fetch(
    State(state): State<AppState>,
    Extension(route): Extension<KindRoute>,
    Path(id): Path<String>,
) -> Result<Json<Entity>> {
    let entity = state
        .store
        .get(route.kind, &id)
        .await
        .map_err(|e| GatewayError::upstream("get", route.kind, e))?
        .ok_or(GatewayError::NotFound { kind: route.kind })?;

    Ok(Json(entity))
}

/// `POST /` — validates before any store call and generates an ID when the
/// caller omitted one.
async fn create(
    State(state): State<AppState>,
    Extension(route): Extension<KindRoute>,
    Json(draft): Json<EntityDraft>,
) -> Result<impl IntoResponse> {
    draft.validate(route.kind, route.validator)?;

    let id = match draft.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => ids::generate(route.prefix),
    };

    let entity = draft.into_entity(id);
    let created = state
        .store
        .upsert(route.kind, entity)
        .await
        .map_err(|e| GatewayError::upstream("create", route.kind, e))?;

    tracing::info!(kind = %route.kind, id = %created.id, "entity created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /{id}` — full replace. The stored record becomes the request body;
/// the path ID always wins over any `id` in the payload, `created_at`
/// survives from the existing record, and fields absent from the body are
/// cleared.
async fn replace(
    State(state): State<AppState>,
    Extension(route): Extension<KindRoute>,
    Path(id): Path<String>,
    Json(draft): Json<EntityDraft>,
) -> Result<Json<Entity>> {
    let existing = state
        .store
        .get(route.kind, &id)
        .await
        .map_err(|e| GatewayError::upstream("update", route.kind, e))?
        .ok_or(GatewayError::NotFound { kind: route.kind })?;

    draft.validate(route.kind, route.validator)?;

    let mut replacement = draft.into_entity(id);
    replacement.created_at = existing.created_at;

    let updated = state
        .store
        .upsert(route.kind, replacement)
        .await
        .map_err(|e| GatewayError::upstream("update", route.kind, e))?;

    Ok(Json(updated))
}

/// `PATCH /{id}` — shallow overlay; unmentioned fields are retained and the
/// kind rule is not re-run (the required field survives the merge).
async fn merge(
    State(state): State<AppState>,
    Extension(route): Extension<KindRoute>,
    Path(id): Path<String>,
    Json(patch): Json<EntityDraft>,
) -> Result<Json<Entity>> {
    let existing = state
        .store
        .get(route.kind, &id)
        .await
        .map_err(|e| GatewayError::upstream("update", route.kind, e))?
        .ok_or(GatewayError::NotFound { kind: route.kind })?;

    let merged = existing.merge(patch);

    let updated = state
        .store
        .upsert(route.kind, merged)
        .await
        .map_err(|e| GatewayError::upstream("update", route.kind, e))?;

    Ok(Json(updated))
}

/// `DELETE /{id}` — idempotent from the caller's view: 204 whether or not
/// the record existed.
async fn remove(
    State(state): State<AppState>,
    Extension(route): Extension<KindRoute>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state
        .store
        .delete(route.kind, std::slice::from_ref(&id))
        .await
        .map_err(|e| GatewayError::upstream("delete", route.kind, e))?;

    tracing::debug!(kind = %route.kind, %id, "entity deleted");
    Ok(StatusCode::NO_CONTENT)
}
