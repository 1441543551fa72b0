//! ElasticsearchClient and remote bootstrap against the mock engine.

use std::sync::Arc;

use notefold_core::{Error, Item, ItemId, MemoryItemSource};
use notefold_search::{
    ActiveIndex, BackendContext, CreateOutcome, ElasticsearchClient, Engine, RemoteEngine,
    SearchBootstrap, SearchConfig, default_search_conf,
};
use serde_json::json;
use tempfile::TempDir;

use crate::common::{MockEs, recipe_items, refused_url};

fn remote_config(url: String) -> SearchConfig {
    SearchConfig {
        enabled: true,
        engine: Engine::Remote,
        url,
        ..Default::default()
    }
}

fn context(dir: &TempDir) -> BackendContext {
    BackendContext::new(dir.path(), Arc::new(MemoryItemSource::new(recipe_items())))
}

#[tokio::test]
async fn test_create_index_then_already_exists() {
    let es = MockEs::start().await;
    let client = ElasticsearchClient::new(&es.url()).unwrap();

    let first = client.create_index("dataobj", &default_search_conf()).await.unwrap();
    assert_eq!(first, CreateOutcome::Created);

    let second = client.create_index("dataobj", &default_search_conf()).await.unwrap();
    assert_eq!(second, CreateOutcome::AlreadyExists);

    assert_eq!(es.index_count(), 1);
}

#[tokio::test]
async fn test_bad_mapping_is_an_error() {
    let es = MockEs::start().await;
    let client = ElasticsearchClient::new(&es.url()).unwrap();

    let err = client
        .create_index("dataobj", &json!({"mappings": "nope"}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("mapper_parsing_exception"));
    assert_eq!(es.index_count(), 0);
}

#[tokio::test]
async fn test_bootstrap_on_each_restart() {
    let es = MockEs::start().await;
    let dir = TempDir::new().unwrap();

    // First process start creates the index.
    let mut first = SearchBootstrap::new(remote_config(es.url()), context(&dir));
    let active = first.run().await.unwrap().clone();
    assert_eq!(
        active,
        ActiveIndex::Remote {
            index_name: "dataobj".to_string(),
            created: true
        }
    );

    // Next start finds it and still succeeds.
    let mut second = SearchBootstrap::new(remote_config(es.url()), context(&dir));
    let active = second.run().await.unwrap().clone();
    assert_eq!(
        active,
        ActiveIndex::Remote {
            index_name: "dataobj".to_string(),
            created: false
        }
    );

    assert_eq!(es.index_count(), 1);
    // Remote bootstrap never writes a local snapshot.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unauthorized_is_fatal() {
    let es = MockEs::start_with_auth().await;
    let dir = TempDir::new().unwrap();

    let mut bootstrap = SearchBootstrap::new(remote_config(es.url()), context(&dir));
    let err = bootstrap.run().await.unwrap_err();

    assert!(matches!(err, Error::Remote { status: Some(401), .. }));
    assert!(!bootstrap.state().is_ready());
    assert_eq!(es.index_count(), 0);
}

#[tokio::test]
async fn test_basic_auth_credentials_sent() {
    let es = MockEs::start_with_auth().await;
    let dir = TempDir::new().unwrap();

    let config = SearchConfig {
        es_user: Some("elastic".to_string()),
        es_password: Some("changeme".to_string()),
        ..remote_config(es.url())
    };
    let mut bootstrap = SearchBootstrap::new(config, context(&dir));

    assert!(bootstrap.run().await.is_ok());
    assert_eq!(es.index_count(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = SearchConfig {
        timeout_secs: Some(5),
        ..remote_config(refused_url().await)
    };

    let mut bootstrap = SearchBootstrap::new(config, context(&dir));
    let err = bootstrap.run().await.unwrap_err();

    assert!(matches!(err, Error::Remote { status: None, .. }));
    assert!(!bootstrap.state().is_ready());
}

#[tokio::test]
async fn test_item_write_hooks() {
    let es = MockEs::start().await;
    let client = ElasticsearchClient::new(&es.url()).unwrap();
    client.create_index("dataobj", &default_search_conf()).await.unwrap();

    for item in recipe_items() {
        client.index_item("dataobj", &item).await.unwrap();
    }
    assert_eq!(es.document_count(), 2);

    // Replacing an item keeps one document per id.
    client
        .index_item("dataobj", &Item::new(1, "Recipe", "flour sugar eggs"))
        .await
        .unwrap();
    assert_eq!(es.document_count(), 2);

    client.remove_item("dataobj", &ItemId::Int(1)).await.unwrap();
    assert_eq!(es.document_count(), 1);

    // Removing a missing item is not an error.
    client.remove_item("dataobj", &ItemId::Int(1)).await.unwrap();
    assert_eq!(es.document_count(), 1);
}

#[tokio::test]
async fn test_bootstrap_does_not_push_items() {
    let es = MockEs::start().await;
    let dir = TempDir::new().unwrap();

    let mut bootstrap = SearchBootstrap::new(remote_config(es.url()), context(&dir));
    bootstrap.run().await.unwrap();

    assert_eq!(es.request_count(), 1);
    assert_eq!(es.document_count(), 0);
}
