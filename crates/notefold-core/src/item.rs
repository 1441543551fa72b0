//! Knowledge-base items and the sources that supply them.
//!
//! An [`Item`] is a single note: a stable identifier, a title and a body.
//! The search crates never mutate items; they ask an [`ItemSource`] for the
//! full current snapshot and index that.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Stable item identifier, used as the primary key in every search index.
///
/// Notes created by the application carry integer ids; imported notes may
/// carry string ids. Both serialize as their bare JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Numeric identifier.
    Int(i64),
    /// Free-form string identifier.
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A single note in the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique, stable identifier.
    pub id: ItemId,
    /// Note title.
    pub title: String,
    /// Note body.
    pub content: String,
}

impl Item {
    /// Create a new item.
    pub fn new(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Supplier of the current item snapshot.
///
/// Implementations return every indexable item, never a partial page.
/// Order is unspecified; consumers that need determinism sort by id.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Return the full current set of items.
    async fn items(&self) -> Result<Vec<Item>>;
}

/// Item source backed by a fixed, in-memory vector.
#[derive(Debug, Clone, Default)]
pub struct MemoryItemSource {
    items: Vec<Item>,
}

impl MemoryItemSource {
    /// Create a source that always returns `items`.
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ItemSource for MemoryItemSource {
    async fn items(&self) -> Result<Vec<Item>> {
        Ok(self.items.clone())
    }
}
