//! Search index bootstrap for Notefold.
//!
//! At process start the knowledge base must bring its full-text index to a
//! consistent, queryable state. Two structurally different backends are
//! supported behind one trait, and exactly one is active per process.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     notefold-search                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchBootstrap (Uninitialized → Ready)                    │
//! │  create_search_backend (config → at most one backend)       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchBackend trait                                        │
//! │  ├── RemoteSearchBackend (Elasticsearch-compatible engine)  │
//! │  └── LocalSearchBackend  (index.json in the internal dir)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RemoteEngine trait / ElasticsearchClient                   │
//! │  LocalIndexBuilder / LocalIndex / FieldSpec / Analyzer      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Consistency
//!
//! After bootstrap completes the index reflects the item snapshot taken at
//! that moment. Keeping it in step with later edits is up to callers
//! (for the remote engine, via [`RemoteEngine::index_item`] and
//! [`RemoteEngine::remove_item`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use notefold_core::DirectoryItemSource;
//! use notefold_search::{BackendContext, SearchBootstrap};
//!
//! let items = Arc::new(DirectoryItemSource::new(user_dir.join("data")));
//! let context = BackendContext::new(&internal_dir, items);
//! let mut bootstrap = SearchBootstrap::new(search_config, context);
//!
//! let active = bootstrap.run().await?;
//! println!("search backend: {}", active.name());
//! ```

pub mod backend;
pub mod bootstrap;
pub mod config;
pub mod local;
pub mod remote;

// Re-exports
pub use backend::{ActiveIndex, BackendContext, SearchBackend, create_search_backend};
pub use bootstrap::{IndexState, SearchBootstrap, bootstrap};
pub use config::{Engine, SearchConfig, default_search_conf};
pub use local::{
    FieldSpec, INDEX_FILE, IndexStats, ItemField, LocalIndex, LocalIndexBuilder,
    LocalSearchBackend, SearchHit, index_path,
};
pub use remote::{CreateOutcome, ElasticsearchClient, RemoteEngine, RemoteSearchBackend};
