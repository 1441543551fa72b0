//! Startup bootstrap of the search index.
//!
//! Bootstrap is a one-shot transition, `Uninitialized → Ready`, run once
//! during process startup before any request is served. There is no
//! degraded or rebuilding state: if bootstrap fails the state stays
//! `Uninitialized`, the error goes to the caller, and search must not be
//! offered.
//!
//! # Usage
//!
//! ```rust,ignore
//! use notefold_search::{BackendContext, SearchBootstrap};
//!
//! let context = BackendContext::new(&internal_dir, items);
//! let mut bootstrap = SearchBootstrap::new(config.search.clone(), context);
//! let active = bootstrap.run().await?;
//! ```

use notefold_core::{Error, Result};

use crate::backend::{ActiveIndex, BackendContext, create_search_backend};
use crate::config::SearchConfig;

/// Where the index is in its startup lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndexState {
    /// Bootstrap has not completed.
    #[default]
    Uninitialized,
    /// Bootstrap completed; the index reflects the snapshot taken then.
    Ready(ActiveIndex),
}

impl IndexState {
    /// Returns `true` once bootstrap has completed.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The active index, if bootstrap has completed.
    pub fn active(&self) -> Option<&ActiveIndex> {
        match self {
            Self::Ready(active) => Some(active),
            Self::Uninitialized => None,
        }
    }
}

impl std::fmt::Display for IndexState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Ready(active) => write!(f, "ready ({})", active.name()),
        }
    }
}

/// Drives the startup bootstrap for one process.
#[derive(Debug)]
pub struct SearchBootstrap {
    config: SearchConfig,
    context: BackendContext,
    state: IndexState,
}

impl SearchBootstrap {
    /// Create a bootstrap for the given immutable configuration.
    pub fn new(config: SearchConfig, context: BackendContext) -> Self {
        Self {
            config,
            context,
            state: IndexState::Uninitialized,
        }
    }

    /// Current state.
    pub fn state(&self) -> &IndexState {
        &self.state
    }

    /// Run the bootstrap.
    ///
    /// Selects the configured backend and brings its index to a ready
    /// state. Once ready, further calls return the recorded result without
    /// touching any backend.
    ///
    /// # Errors
    ///
    /// Any remote engine error other than "index already exists", and any
    /// local build or write failure. The state stays `Uninitialized`.
    pub async fn run(&mut self) -> Result<&ActiveIndex> {
        if self.state.is_ready() {
            log::debug!("Search index already bootstrapped");
        } else {
            let active = bootstrap(&self.config, &self.context).await?;
            self.state = IndexState::Ready(active);
        }

        self.state
            .active()
            .ok_or_else(|| Error::operation("search index not ready"))
    }
}

/// Bootstrap the search index described by `config`.
///
/// With search disabled this is a no-op returning [`ActiveIndex::Disabled`]:
/// no client is built, no network call is made and no file is written.
pub async fn bootstrap(config: &SearchConfig, context: &BackendContext) -> Result<ActiveIndex> {
    match create_search_backend(config, context)? {
        Some(backend) => backend.bootstrap().await,
        None => {
            log::debug!("Search disabled, skipping index bootstrap");
            Ok(ActiveIndex::Disabled)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
