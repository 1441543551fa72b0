//! Shared harness: item fixtures, a call-counting engine, and an in-process
//! mock of the Elasticsearch index API.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::put;
use axum::{Json, Router};
use notefold_core::{Item, ItemId, Result};
use notefold_search::{CreateOutcome, RemoteEngine};
use serde_json::{Value, json};

/// The two-item snapshot used throughout the suite.
pub fn recipe_items() -> Vec<Item> {
    vec![
        Item::new(1, "Recipe", "flour sugar"),
        Item::new(2, "Notes", "recipe for flour bread"),
    ]
}

// ============================================================================
// Counting engine
// ============================================================================

/// Engine that succeeds and counts every call it receives.
#[derive(Debug, Default)]
pub struct CountingEngine {
    calls: AtomicUsize,
}

impl CountingEngine {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteEngine for CountingEngine {
    async fn create_index(&self, _name: &str, _schema: &Value) -> Result<CreateOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CreateOutcome::Created)
    }

    async fn index_item(&self, _name: &str, _item: &Item) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove_item(&self, _name: &str, _id: &ItemId) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Mock Elasticsearch server
// ============================================================================

#[derive(Debug, Default)]
pub struct EsState {
    /// Reject requests without an `Authorization` header with 401.
    pub require_auth: bool,
    pub indexes: Mutex<BTreeSet<String>>,
    pub documents: Mutex<BTreeMap<(String, String), Value>>,
    pub requests: AtomicUsize,
}

/// A running mock engine bound to an ephemeral localhost port.
pub struct MockEs {
    pub addr: SocketAddr,
    pub state: Arc<EsState>,
}

impl MockEs {
    pub async fn start() -> Self {
        Self::start_with(EsState::default()).await
    }

    pub async fn start_with_auth() -> Self {
        Self::start_with(EsState {
            require_auth: true,
            ..Default::default()
        })
        .await
    }

    async fn start_with(state: EsState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/{index}", put(create_index))
            .route("/{index}/_doc/{id}", put(put_document).delete(delete_document))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn index_count(&self) -> usize {
        self.state.indexes.lock().unwrap().len()
    }

    pub fn document_count(&self) -> usize {
        self.state.documents.lock().unwrap().len()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

/// A localhost URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn unauthorized(state: &EsState, headers: &HeaderMap) -> Option<(StatusCode, Json<Value>)> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if state.require_auth && !headers.contains_key(header::AUTHORIZATION) {
        return Some((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {"type": "security_exception", "reason": "missing authentication credentials"},
                "status": 401
            })),
        ));
    }
    None
}

async fn create_index(
    State(state): State<Arc<EsState>>,
    Path(index): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(rejection) = unauthorized(&state, &headers) {
        return rejection;
    }

    if body.get("mappings").is_some_and(|m| !m.is_object()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {"type": "mapper_parsing_exception", "reason": "Failed to parse mapping"},
                "status": 400
            })),
        );
    }

    let mut indexes = state.indexes.lock().unwrap();
    if !indexes.insert(index.clone()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "root_cause": [{"type": "resource_already_exists_exception"}],
                    "type": "resource_already_exists_exception",
                    "reason": format!("index [{index}/abc123] already exists"),
                    "index": index
                },
                "status": 400
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({"acknowledged": true, "shards_acknowledged": true, "index": index})),
    )
}

async fn put_document(
    State(state): State<Arc<EsState>>,
    Path((index, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(rejection) = unauthorized(&state, &headers) {
        return rejection;
    }

    let previous = state
        .documents
        .lock()
        .unwrap()
        .insert((index.clone(), id.clone()), body);
    let (status, result) = match previous {
        Some(_) => (StatusCode::OK, "updated"),
        None => (StatusCode::CREATED, "created"),
    };
    (status, Json(json!({"_index": index, "_id": id, "result": result})))
}

async fn delete_document(
    State(state): State<Arc<EsState>>,
    Path((index, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if let Some(rejection) = unauthorized(&state, &headers) {
        return rejection;
    }

    let removed = state
        .documents
        .lock()
        .unwrap()
        .remove(&(index.clone(), id.clone()));
    match removed {
        Some(_) => (
            StatusCode::OK,
            Json(json!({"_index": index, "_id": id, "result": "deleted"})),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"_index": index, "_id": id, "result": "not_found"})),
        ),
    }
}
