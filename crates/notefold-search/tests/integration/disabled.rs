//! Disabled search performs no I/O at all.

use std::sync::Arc;

use notefold_core::MemoryItemSource;
use notefold_search::{
    ActiveIndex, BackendContext, Engine, SearchBootstrap, SearchConfig, bootstrap,
    create_search_backend,
};
use tempfile::TempDir;

use crate::common::{CountingEngine, recipe_items};

fn counting_context(dir: &TempDir, engine: &Arc<CountingEngine>) -> BackendContext {
    BackendContext::new(dir.path(), Arc::new(MemoryItemSource::new(recipe_items())))
        .with_remote_engine(engine.clone())
}

#[tokio::test]
async fn test_disabled_remote_makes_no_calls() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(CountingEngine::default());
    let config = SearchConfig {
        enabled: false,
        engine: Engine::Remote,
        ..Default::default()
    };

    let active = bootstrap(&config, &counting_context(&dir, &engine)).await.unwrap();

    assert_eq!(active, ActiveIndex::Disabled);
    assert!(!active.is_available());
    assert_eq!(engine.calls(), 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_disabled_local_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(CountingEngine::default());
    let config = SearchConfig {
        enabled: false,
        engine: Engine::Local,
        ..Default::default()
    };

    let mut bootstrap = SearchBootstrap::new(config, counting_context(&dir, &engine));
    assert_eq!(*bootstrap.run().await.unwrap(), ActiveIndex::Disabled);

    assert_eq!(engine.calls(), 0);
    assert!(!dir.path().join("index.json").exists());
}

#[test]
fn test_disabled_ignores_invalid_remote_settings() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(CountingEngine::default());
    let config = SearchConfig {
        enabled: false,
        engine: Engine::Remote,
        index_name: String::new(),
        url: String::new(),
        ..Default::default()
    };

    let backend = create_search_backend(&config, &counting_context(&dir, &engine)).unwrap();
    assert!(backend.is_none());
}

#[tokio::test]
async fn test_enabled_remote_uses_injected_engine_once() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(CountingEngine::default());
    let config = SearchConfig {
        enabled: true,
        engine: Engine::Remote,
        ..Default::default()
    };

    let active = bootstrap(&config, &counting_context(&dir, &engine)).await.unwrap();

    assert_eq!(active.name(), "remote");
    assert_eq!(engine.calls(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
