//! Request and response shapes for the store's product API.

use entities::SearchHit;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Ranking mode forwarded to the store's search endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    Hybrid,
    OpenaiDense,
    BgeM3Dense,
    BgeM3Sparse,
}

/// Parameters for a single-kind ranked query.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub query: Option<String>,
    pub filters: HashMap<String, Value>,
    pub limit: usize,
    pub mode: SearchMode,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: None,
            filters: HashMap::new(),
            limit: Self::DEFAULT_LIMIT,
            mode: SearchMode::default(),
        }
    }
}

impl SearchOptions {
    pub const DEFAULT_LIMIT: usize = 10;

    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: HashMap<String, Value>) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// One page of ranked results from a single namespace.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub results: Vec<SearchHit>,
    pub total: usize,
}

/// Best-effort namespace statistics. A namespace the store has never seen
/// reports zeros, which is a normal state rather than a fault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub total: usize,
    pub has_data: bool,
}
