//! Unified multi-kind search.
//!
//! One concurrent store query per requested kind, then a single rank merge
//! across the combined result set. Truncation happens only after the merge;
//! truncating per kind first would bias results toward kinds with more
//! matches.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use strum::IntoEnumIterator;

use entities::{EntityKind, SearchHit};
use store::{SearchMode, SearchOptions};

use crate::error::{GatewayError, Result};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/search", get(search_simple).post(search))
}

/// `types` arrives as an array or a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KindSelector {
    List(Vec<String>),
    Csv(String),
}

impl KindSelector {
    /// Valid kinds in request order; unknown tokens are silently dropped.
    fn resolve(&self) -> Vec<EntityKind> {
        let tokens: Vec<String> = match self {
            Self::List(tokens) => tokens.clone(),
            Self::Csv(raw) => raw.split(',').map(|token| token.trim().to_string()).collect(),
        };
        tokens
            .iter()
            .filter_map(|token| token.parse::<EntityKind>().ok())
            .collect()
    }
}

/// `limit` arrives as a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    Number(u64),
    Text(String),
}

impl Limit {
    fn resolve(&self) -> usize {
        let parsed = match self {
            Self::Number(n) => *n as usize,
            Self::Text(raw) => raw.parse().unwrap_or(0),
        };
        if parsed == 0 {
            SearchOptions::DEFAULT_LIMIT
        } else {
            parsed
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    types: Option<KindSelector>,
    #[serde(default)]
    filters: Option<HashMap<String, Value>>,
    #[serde(default)]
    limit: Option<Limit>,
    #[serde(default)]
    search_type: Option<SearchMode>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub types: Vec<EntityKind>,
    pub total: usize,
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_types: Vec<EntityKind>,
}

/// `POST /api/search`
async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let query = match request.query.as_deref() {
        Some(q) if !q.trim().is_empty() => q.to_string(),
        _ => return Err(GatewayError::InvalidInput("query is required".to_string())),
    };

    let kinds = effective_kinds(request.types.as_ref());
    let limit = request
        .limit
        .map_or(SearchOptions::DEFAULT_LIMIT, |l| l.resolve());

    let options = SearchOptions::new(query.clone())
        .with_filters(request.filters.unwrap_or_default())
        .with_limit(limit)
        .with_mode(request.search_type.unwrap_or_default());

    Ok(Json(fan_out(&state, query, kinds, options, limit).await))
}

#[derive(Debug, Deserialize)]
pub struct SimpleSearchParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    types: Option<String>,
    #[serde(default)]
    limit: Option<String>,
}

/// `GET /api/search?q=&types=&limit=` — same semantics as the POST form with
/// filters omitted and the ranking mode defaulted.
async fn search_simple(
    State(state): State<AppState>,
    Query(params): Query<SimpleSearchParams>,
) -> Result<Json<SearchResponse>> {
    let query = match params.q.as_deref() {
        Some(q) if !q.trim().is_empty() => q.to_string(),
        _ => {
            return Err(GatewayError::InvalidInput(
                "q (query) parameter is required".to_string(),
            ));
        }
    };

    let selector = params.types.map(KindSelector::Csv);
    let kinds = effective_kinds(selector.as_ref());
    let limit = params
        .limit
        .map_or(SearchOptions::DEFAULT_LIMIT, |raw| Limit::Text(raw).resolve());

    let options = SearchOptions::new(query.clone()).with_limit(limit);

    Ok(Json(fan_out(&state, query, kinds, options, limit).await))
}

/// The requested kinds, or every known kind when none of them are valid.
fn effective_kinds(selector: Option<&KindSelector>) -> Vec<EntityKind> {
    let requested = selector.map(KindSelector::resolve).unwrap_or_default();
    if requested.is_empty() {
        EntityKind::iter().collect()
    } else {
        requested
    }
}

/// One concurrent per-kind query. A failing kind contributes nothing and is
/// reported in the diagnostic list instead of failing the whole request.
async fn fan_out(
    state: &AppState,
    query: String,
    kinds: Vec<EntityKind>,
    options: SearchOptions,
    limit: usize,
) -> SearchResponse {
    let searches = kinds.iter().map(|&kind| {
        let store = state.store.clone();
        let options = options.clone();
        async move { (kind, store.search(kind, &options).await) }
    });

    let mut hits: Vec<SearchHit> = Vec::new();
    let mut failed_types = Vec::new();

    for (kind, outcome) in join_all(searches).await {
        match outcome {
            Ok(page) => {
                for mut hit in page.results {
                    hit.entity_type.get_or_insert(kind);
                    hits.push(hit);
                }
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "per-kind search failed");
                failed_types.push(kind);
            }
        }
    }

    rank(&mut hits);
    let total = hits.len();
    hits.truncate(limit);

    SearchResponse {
        query,
        types: kinds,
        total,
        results: hits,
        failed_types,
    }
}

/// Orders the merged sequence: relevance score descending with scored hits
/// ahead of unscored ones, then `updated_at` descending with missing
/// timestamps last. One comparator for the whole sequence, never per kind.
fn rank(hits: &mut [SearchHit]) {
    hits.sort_by(compare);
}

fn compare(a: &SearchHit, b: &SearchHit) -> Ordering {
    let score_a = a.score.unwrap_or(f64::NEG_INFINITY);
    let score_b = b.score.unwrap_or(f64::NEG_INFINITY);
    score_b
        .total_cmp(&score_a)
        .then_with(|| updated_millis(b).cmp(&updated_millis(a)))
}

fn updated_millis(hit: &SearchHit) -> i64 {
    hit.entity
        .updated_at
        .as_deref()
        .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
        .map_or(i64::MIN, |ts| ts.timestamp_millis())
}
