//! Remote engine adapter.
//!
//! The remote backend keeps its index on an Elasticsearch-compatible
//! engine. Bootstrap only has to make sure the named index exists: creation
//! is attempted unconditionally and "already exists" counts as success, so
//! the step is safe on every restart.
//!
//! Connection, authorization and every other engine error are fatal. There
//! is no retry at this layer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notefold_core::{Error, Item, ItemId, Result};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde_json::{Value, json};

use crate::backend::{ActiveIndex, SearchBackend};
use crate::config::SearchConfig;

/// Error types the engine reports when creating an index that exists
/// (6.x and later, then 5.x).
const ALREADY_EXISTS_ERRORS: &[&str] = &[
    "resource_already_exists_exception",
    "index_already_exists_exception",
];

/// Outcome of an index creation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The index was created by this call.
    Created,
    /// The index was already present.
    AlreadyExists,
}

/// Operations the application needs from a remote search engine.
#[async_trait]
pub trait RemoteEngine: Send + Sync {
    /// Create index `name` with the given settings/mappings document.
    async fn create_index(&self, name: &str, schema: &Value) -> Result<CreateOutcome>;

    /// Insert or replace one item in index `name`.
    async fn index_item(&self, name: &str, item: &Item) -> Result<()>;

    /// Remove one item from index `name`. Removing a missing item succeeds.
    async fn remove_item(&self, name: &str, id: &ItemId) -> Result<()>;
}

/// HTTP client for an Elasticsearch-compatible engine.
#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    http: reqwest::Client,
    base_url: Url,
    user: Option<String>,
    password: Option<String>,
}

impl ElasticsearchClient {
    /// Create a client for the engine at `url` without auth or timeout.
    pub fn new(url: &str) -> Result<Self> {
        Self::build(url, None, None, None)
    }

    /// Create a client from the search configuration.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::build(
            &config.url,
            config.es_user.clone(),
            config.es_password.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(
        url: &str,
        user: Option<String>,
        password: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = Url::parse(url)
            .map_err(|e| Error::config(format!("Invalid search.url '{url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("Invalid search.url '{url}'")));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::operation(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            user,
            password,
        })
    }

    /// Base URL of the engine.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.http.request(method, self.url(segments));
        match self.user {
            Some(ref user) => builder.basic_auth(user, self.password.as_ref()),
            None => builder,
        }
    }
}

#[async_trait]
impl RemoteEngine for ElasticsearchClient {
    async fn create_index(&self, name: &str, schema: &Value) -> Result<CreateOutcome> {
        let response = self
            .request(Method::PUT, &[name])
            .json(schema)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(CreateOutcome::Created);
        }

        let body = response.text().await.map_err(transport_error)?;
        if is_already_exists(status, &body) {
            return Ok(CreateOutcome::AlreadyExists);
        }

        Err(Error::remote(Some(status.as_u16()), body))
    }

    async fn index_item(&self, name: &str, item: &Item) -> Result<()> {
        let id = item.id.to_string();
        let response = self
            .request(Method::PUT, &[name, "_doc", &id])
            .json(&json!({ "title": item.title, "content": item.content }))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.map_err(transport_error)?;
        Err(Error::remote(Some(status.as_u16()), body))
    }

    async fn remove_item(&self, name: &str, id: &ItemId) -> Result<()> {
        let id = id.to_string();
        let response = self
            .request(Method::DELETE, &[name, "_doc", &id])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.text().await.map_err(transport_error)?;
        Err(Error::remote(Some(status.as_u16()), body))
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    Error::remote(e.status().map(|s| s.as_u16()), e.to_string())
}

/// Returns `true` if an index-creation response means "index already exists".
///
/// Only a 400 whose `error.type` names the existing-resource condition
/// qualifies; other 400s (bad mappings, bad settings) are real errors.
pub fn is_already_exists(status: StatusCode, body: &str) -> bool {
    if status != StatusCode::BAD_REQUEST {
        return false;
    }
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("type"))
                .and_then(|t| t.as_str())
                .map(|t| ALREADY_EXISTS_ERRORS.contains(&t))
        })
        .unwrap_or(false)
}

/// Backend that keeps the index on a remote engine.
pub struct RemoteSearchBackend {
    engine: Arc<dyn RemoteEngine>,
    index_name: String,
    schema: Value,
}

impl RemoteSearchBackend {
    /// Create a backend for index `index_name` with the given schema document.
    pub fn new(engine: Arc<dyn RemoteEngine>, index_name: &str, schema: Value) -> Self {
        Self {
            engine,
            index_name: index_name.to_string(),
            schema,
        }
    }
}

#[async_trait]
impl SearchBackend for RemoteSearchBackend {
    async fn bootstrap(&self) -> Result<ActiveIndex> {
        let created = match self.engine.create_index(&self.index_name, &self.schema).await? {
            CreateOutcome::Created => {
                log::info!("Created search index '{}'", self.index_name);
                true
            }
            CreateOutcome::AlreadyExists => {
                log::info!("Search index '{}' already created", self.index_name);
                false
            }
        };

        Ok(ActiveIndex::Remote {
            index_name: self.index_name.clone(),
            created,
        })
    }

    fn name(&self) -> &str {
        "remote"
    }
}

impl std::fmt::Debug for RemoteSearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSearchBackend")
            .field("index_name", &self.index_name)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
