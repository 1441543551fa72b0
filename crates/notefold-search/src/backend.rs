//! Search backend trait and selector.
//!
//! This module defines the `SearchBackend` trait that both index backends
//! satisfy, and `create_search_backend`, which turns a [`SearchConfig`] into
//! exactly one backend (or none when search is disabled).
//!
//! # Backends
//!
//! - `RemoteSearchBackend`: ensures the index exists on an Elasticsearch-compatible engine
//! - `LocalSearchBackend`: builds `index.json` from the current item snapshot
//!
//! # Example
//!
//! ```rust,ignore
//! use notefold_search::{BackendContext, create_search_backend};
//!
//! let context = BackendContext::new(&internal_dir, item_source);
//! if let Some(backend) = create_search_backend(&config, &context)? {
//!     let active = backend.bootstrap().await?;
//!     println!("search ready: {}", active.name());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use notefold_core::{ItemSource, Result};
use serde::Serialize;

use crate::config::{Engine, SearchConfig};
use crate::local::{LocalIndexBuilder, LocalSearchBackend};
use crate::remote::{ElasticsearchClient, RemoteEngine, RemoteSearchBackend};

/// The index a completed bootstrap left behind.
///
/// Callers use this to know which backend answers queries; the two index
/// representations are never interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum ActiveIndex {
    /// Search is disabled; no index exists.
    Disabled,
    /// Index lives on the remote engine.
    Remote {
        /// Remote index name.
        index_name: String,
        /// `false` when the index was already present.
        created: bool,
    },
    /// Index snapshot written to disk.
    Local {
        /// Path of the snapshot file.
        path: PathBuf,
        /// Number of documents in the snapshot.
        documents: usize,
    },
}

impl ActiveIndex {
    /// Returns `true` if search queries can be served.
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Short backend name for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Self::Disabled => "disabled",
            Self::Remote { .. } => "remote",
            Self::Local { .. } => "local",
        }
    }
}

/// Abstract search backend.
///
/// A backend knows how to bring its index to a queryable state. Bootstrap
/// is idempotent: running it on every process start must not corrupt or
/// duplicate index state.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Bring the index to a ready state.
    async fn bootstrap(&self) -> Result<ActiveIndex>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Collaborators the backends need besides the configuration.
#[derive(Clone)]
pub struct BackendContext {
    internal_dir: PathBuf,
    items: Arc<dyn ItemSource>,
    remote: Option<Arc<dyn RemoteEngine>>,
    builder: LocalIndexBuilder,
}

impl BackendContext {
    /// Create a context writing local snapshots under `internal_dir` and
    /// reading items from `items`.
    pub fn new(internal_dir: impl AsRef<Path>, items: Arc<dyn ItemSource>) -> Self {
        Self {
            internal_dir: internal_dir.as_ref().to_path_buf(),
            items,
            remote: None,
            builder: LocalIndexBuilder::new(),
        }
    }

    /// Use this engine instead of an `ElasticsearchClient` built from config.
    pub fn with_remote_engine(mut self, engine: Arc<dyn RemoteEngine>) -> Self {
        self.remote = Some(engine);
        self
    }

    /// Use a custom local index builder (field policy).
    pub fn with_local_builder(mut self, builder: LocalIndexBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Directory holding the local snapshot.
    pub fn internal_dir(&self) -> &Path {
        &self.internal_dir
    }
}

impl std::fmt::Debug for BackendContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendContext")
            .field("internal_dir", &self.internal_dir)
            .field("remote_override", &self.remote.is_some())
            .field("builder", &self.builder)
            .finish()
    }
}

/// Select the backend for `config`.
///
/// Returns `None` when search is disabled: nothing is constructed, no
/// client is built and no file is touched. Otherwise exactly one backend
/// variant is constructed; constructing it performs no I/O.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the remote client
/// cannot be built.
pub fn create_search_backend(
    config: &SearchConfig,
    context: &BackendContext,
) -> Result<Option<Box<dyn SearchBackend>>> {
    if !config.enabled {
        return Ok(None);
    }

    config.validate()?;

    let backend: Box<dyn SearchBackend> = match config.engine {
        Engine::Remote => {
            let engine = match context.remote {
                Some(ref engine) => Arc::clone(engine),
                None => Arc::new(ElasticsearchClient::from_config(config)?),
            };
            Box::new(RemoteSearchBackend::new(
                engine,
                &config.index_name,
                config.search_conf.clone(),
            ))
        }
        Engine::Local => Box::new(LocalSearchBackend::new(
            context.builder.clone(),
            &context.internal_dir,
            Arc::clone(&context.items),
        )),
    };

    log::debug!("Selected {} search backend", backend.name());
    Ok(Some(backend))
}

// ============================================================================
// Tests
// ============================================================================
