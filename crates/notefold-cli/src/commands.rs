//! Command handlers.

use std::sync::Arc;

use notefold_core::{DirectoryItemSource, Error, Result};
use notefold_search::{
    ActiveIndex, BackendContext, Engine, LocalIndex, SearchBootstrap, SearchHit, index_path,
};

use crate::config::AppConfig;

/// Run the startup bootstrap: create directories, then bring the search
/// index to a ready state.
pub async fn cmd_bootstrap(config: &AppConfig) -> Result<ActiveIndex> {
    config.ensure_dirs()?;

    let items = Arc::new(DirectoryItemSource::new(config.data_dir()));
    let context = BackendContext::new(&config.internal_dir, items);
    let mut bootstrap = SearchBootstrap::new(config.search.clone(), context);

    let active = bootstrap.run().await?.clone();
    log::debug!("Index state: {}", bootstrap.state());
    Ok(active)
}

/// Query the local snapshot written by the last bootstrap.
pub fn cmd_search(config: &AppConfig, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    if !config.search.enabled {
        return Err(Error::config("search is disabled (search.enabled = false)"));
    }
    if config.search.engine != Engine::Local {
        return Err(Error::config(format!(
            "the search command reads the local index; configured engine is {}",
            config.search.engine
        )));
    }

    let index = LocalIndex::load(&index_path(&config.internal_dir))?;
    let mut hits = index.search(query);
    hits.truncate(limit);
    Ok(hits)
}
