//! Search configuration.
//!
//! `SearchConfig` is loaded once at startup (the `[search]` table of the
//! application config) and handed by value to the backend selector. It is
//! never mutated afterwards.

use notefold_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Which search engine backs the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// Remote Elasticsearch-compatible engine.
    #[serde(alias = "elasticsearch")]
    Remote,
    /// In-process inverted index persisted to `index.json`.
    #[default]
    Local,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => f.write_str("remote"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Whether search is available at all.
    #[serde(default)]
    pub enabled: bool,

    /// Engine backing the index.
    #[serde(default)]
    pub engine: Engine,

    /// Name of the remote index.
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Base URL of the remote engine.
    #[serde(default = "default_url")]
    pub url: String,

    /// Basic-auth user for the remote engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es_user: Option<String>,

    /// Basic-auth password for the remote engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es_password: Option<String>,

    /// Request timeout for remote calls. `None` waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Index settings and mappings sent when creating the remote index.
    #[serde(default = "default_search_conf")]
    pub search_conf: Value,
}

fn default_index_name() -> String {
    "dataobj".to_string()
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

/// Default index settings and mappings for the remote engine.
///
/// `title` and `content` are analyzed text with position offsets so the
/// engine can highlight matches.
pub fn default_search_conf() -> Value {
    let text_field = json!({
        "type": "text",
        "analyzer": "rebuilt_standard",
        "term_vector": "with_positions_offsets"
    });

    json!({
        "settings": {
            "analysis": {
                "analyzer": {
                    "rebuilt_standard": {
                        "tokenizer": "standard",
                        "filter": ["lowercase", "kstem", "trim", "unique"]
                    }
                }
            }
        },
        "mappings": {
            "properties": {
                "title": text_field.clone(),
                "content": text_field
            }
        }
    })
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            engine: Engine::default(),
            index_name: default_index_name(),
            url: default_url(),
            es_user: None,
            es_password: None,
            timeout_secs: None,
            search_conf: default_search_conf(),
        }
    }
}

impl SearchConfig {
    /// Check the configuration for values the selected engine cannot use.
    ///
    /// A disabled configuration is always valid.
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.engine == Engine::Remote {
            if self.index_name.is_empty() {
                return Err(Error::config("search.index_name must not be empty"));
            }
            if self.index_name != self.index_name.to_lowercase()
                || self.index_name.contains(char::is_whitespace)
            {
                return Err(Error::config(format!(
                    "search.index_name '{}' must be lowercase without whitespace",
                    self.index_name
                )));
            }
            if self.url.trim().is_empty() {
                return Err(Error::config("search.url must not be empty"));
            }
            if !self.search_conf.is_object() {
                return Err(Error::config("search.search_conf must be a table"));
            }
            if self.es_password.is_some() && self.es_user.is_none() {
                return Err(Error::config("search.es_password is set without search.es_user"));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
