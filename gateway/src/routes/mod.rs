//! Route assembly for the gateway's public surface.

mod entity;
mod resolver;
mod search;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::future::join_all;
use serde_json::{Value, json};
use strum::IntoEnumIterator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use entities::EntityKind;
use store::IndexStats;

use crate::state::AppState;

/// Builds the complete router: one CRUD resource per concrete kind, the
/// unified entity endpoints, unified search, and the service endpoints.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api = Router::new()
        .merge(search::routes())
        .merge(resolver::routes())
        .route("/stats", get(stats));

    for kind in EntityKind::iter() {
        if let Some(routes) = entity::routes(kind) {
            api = api.nest(&format!("/{}", kind.collection()), routes);
        }
    }

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": "personal-data gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "stats": "GET /api/stats",
            "search": "POST /api/search",
            "entities": "GET /api/entities/{id}",
            "collections": EntityKind::iter()
                .filter(|kind| !kind.is_search_only())
                .map(|kind| format!("/api/{}", kind.collection()))
                .collect::<Vec<_>>(),
        },
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// `GET /api/stats` — best-effort store statistics, one namespace per kind.
/// A failing namespace reports zeros rather than failing the endpoint.
async fn stats(State(state): State<AppState>) -> Json<Value> {
    let lookups = EntityKind::iter().map(|kind| {
        let store = state.store.clone();
        async move { (kind, store.stats(kind).await) }
    });

    let mut kinds = serde_json::Map::new();
    let mut total = 0;
    for (kind, outcome) in join_all(lookups).await {
        let stats = match outcome {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(%kind, error = %e, "stats lookup failed");
                IndexStats::default()
            }
        };
        total += stats.total;
        kinds.insert(kind.to_string(), json!(stats));
    }

    Json(json!({ "total": total, "kinds": kinds }))
}
