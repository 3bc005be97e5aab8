//! The sole integration point with the external vector store.
//!
//! Every kind maps to its own namespace, named `<prefix><collection>` (e.g.
//! `assistant_` + `tasks` gives `assistant_tasks`), so a search scoped to one
//! kind cannot leak another kind's records even when the store's own
//! filtering is imperfect.

use chrono::Utc;
use entities::{Entity, EntityKind};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::StoreError;
use crate::types::{IndexStats, SearchOptions, SearchPage};

/// Connection settings for the vector-store service.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the product API.
    pub base_url: String,
    /// Bearer token sent with every request when set.
    pub api_key: Option<String>,
    /// Prefix namespacing every collection.
    pub index_prefix: String,
}

impl StoreConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api/products";
    pub const DEFAULT_INDEX_PREFIX: &'static str = "assistant_";

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            index_prefix: Self::DEFAULT_INDEX_PREFIX.to_string(),
        }
    }

    /// Reads connection settings from the environment, falling back to the
    /// local defaults. An empty API key counts as unset.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("VECTOR_STORE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("VECTOR_STORE_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            index_prefix: std::env::var("INDEX_PREFIX")
                .unwrap_or_else(|_| Self::DEFAULT_INDEX_PREFIX.to_string()),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_index_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.index_prefix = prefix.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

/// HTTP client for the store's product API. Stateless apart from its
/// immutable configuration; construct once and share.
pub struct StoreClient {
    http: Client,
    config: StoreConfig,
}

impl StoreClient {
    /// Builds a client, installing the bearer token as a default header.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        if let Some(ref api_key) = config.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {api_key}"))
                    .map_err(|e| StoreError::Configuration(e.to_string()))?,
            );
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(StoreError::Transport)?;

        Ok(Self { http, config })
    }

    /// The namespace holding records of `kind`.
    pub fn index_for(&self, kind: EntityKind) -> String {
        format!("{}{}", self.config.index_prefix, kind.collection())
    }

    /// Writes `entity` under the kind's namespace, stamping
    /// `updated_at = now` and, on first persistence, `created_at = now`.
    /// Returns the entity as persisted, server-stamped fields included.
    pub async fn upsert(&self, kind: EntityKind, entity: Entity) -> Result<Entity, StoreError> {
        let now = Utc::now().to_rfc3339();
        let mut record = entity;
        if record.created_at.is_none() {
            record.created_at = Some(now.clone());
        }
        record.updated_at = Some(now);
        record
            .extra
            .insert("entity_type".to_string(), json!(kind));

        let mut payload = serde_json::to_value(&record)?;
        payload["index"] = json!(self.index_for(kind));

        let url = format!("{}/product", self.config.base_url);
        let resp = self.http.post(&url).json(&payload).send().await?;

        if !resp.status().is_success() {
            return Err(write_failure(resp).await);
        }

        tracing::debug!(%kind, id = %record.id, "record upserted");
        Ok(record)
    }

    /// Fetches one record by ID within the kind's namespace. A store 404 is
    /// "absent", never an error.
    pub async fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Entity>, StoreError> {
        let url = format!(
            "{}/product?index={}&id={}",
            self.config.base_url,
            urlencoding::encode(&self.index_for(kind)),
            urlencoding::encode(id)
        );

        let resp = self.http.get(&url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(read_failure(resp).await);
        }

        let entity = resp.json::<Entity>().await?;
        Ok(Some(entity))
    }

    /// Batched fetch. An empty `ids` slice resolves without a network call.
    /// The store may answer with a single object or an array.
    pub async fn get_many(
        &self,
        kind: EntityKind,
        ids: &[String],
    ) -> Result<Vec<Entity>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/product?index={}&id={}",
            self.config.base_url,
            urlencoding::encode(&self.index_for(kind)),
            urlencoding::encode(&ids.join(","))
        );

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(read_failure(resp).await);
        }

        let body = resp.json::<Value>().await?;
        let entities = match body {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<Entity>, _>>()?,
            other => vec![serde_json::from_value(other)?],
        };
        Ok(entities)
    }

    /// Deletes records by ID. Deleting an absent ID is indistinguishable from
    /// deleting a present one; only a real store failure surfaces.
    pub async fn delete(&self, kind: EntityKind, ids: &[String]) -> Result<(), StoreError> {
        let url = format!("{}/product", self.config.base_url);
        let body = json!({ "index": self.index_for(kind), "ids": ids });

        let resp = self.http.delete(&url).json(&body).send().await?;

        if resp.status().is_success() || resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(write_failure(resp).await)
    }

    /// Issues one ranked query scoped to the kind's namespace.
    ///
    /// The query text is lower-cased here, and only here, so the same token
    /// always lands in the same ranking bucket upstream. Results are pinned
    /// to the kind with an `entity_type` equality filter on top of the
    /// namespace isolation.
    pub async fn search(
        &self,
        kind: EntityKind,
        options: &SearchOptions,
    ) -> Result<SearchPage, StoreError> {
        let mut filters = serde_json::Map::new();
        for (key, value) in &options.filters {
            filters.insert(key.clone(), value.clone());
        }
        filters.insert("entity_type".to_string(), json!(kind));

        let body = json!({
            "index": self.index_for(kind),
            "query": options.query.as_deref().map(str::to_lowercase),
            "filters": filters,
            "limit": options.limit,
            "type": options.mode,
        });

        let url = format!("{}/search", self.config.base_url);
        let resp = self.http.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            return Err(search_failure(resp).await);
        }

        let raw = resp.json::<Value>().await?;
        Ok(decode_page(raw)?)
    }

    /// Best-effort namespace statistics. Any non-2xx answer (the namespace
    /// may simply not exist yet) reports zeros instead of an error.
    pub async fn stats(&self, kind: EntityKind) -> Result<IndexStats, StoreError> {
        let url = format!(
            "{}/stats/{}",
            self.config.base_url,
            urlencoding::encode(&self.index_for(kind))
        );

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Ok(IndexStats::default());
        }

        let raw = resp.json::<StatsResponse>().await?;
        Ok(IndexStats {
            total: raw.total_products,
            has_data: raw.has_data,
        })
    }
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    total_products: usize,
    #[serde(default)]
    has_data: bool,
}

/// The search endpoint answers either `{results, total}` or a bare array.
fn decode_page(raw: Value) -> Result<SearchPage, serde_json::Error> {
    match raw {
        Value::Array(items) => {
            let results = items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<_>, _>>()?;
            let total = results.len();
            Ok(SearchPage { results, total })
        }
        Value::Object(mut fields) => {
            let results: Vec<entities::SearchHit> = match fields.remove("results") {
                Some(value) => serde_json::from_value(value)?,
                None => Vec::new(),
            };
            let total = fields
                .get("total")
                .and_then(Value::as_u64)
                .map_or(results.len(), |t| t as usize);
            Ok(SearchPage { results, total })
        }
        _ => Ok(SearchPage::default()),
    }
}

async fn write_failure(resp: Response) -> StoreError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    StoreError::Write { status, body }
}

async fn read_failure(resp: Response) -> StoreError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    StoreError::Read { status, body }
}

async fn search_failure(resp: Response) -> StoreError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    StoreError::Search { status, body }
}
