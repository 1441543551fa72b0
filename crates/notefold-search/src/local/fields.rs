//! Field policy for the local index.
//!
//! Which item attribute feeds which index field, and with what boost, is
//! plain data ([`FieldSpec`]) rather than closures, so the policy can be
//! inspected, tested, and recorded in the snapshot.
//!
//! | Field | Source | Boost |
//! |-------|--------|-------|
//! | `title` | `Item::title` | 10.0 |
//! | `body` | `Item::content` | 1.0 |

use notefold_core::Item;
use serde::{Deserialize, Serialize};

/// Boost applied to the title field.
pub const TITLE_BOOST: f64 = 10.0;

/// Boost applied to the body field.
pub const BODY_BOOST: f64 = 1.0;

/// Item attribute a field extracts its text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    /// `Item::title`.
    Title,
    /// `Item::content`.
    Content,
}

impl ItemField {
    /// Extract this attribute's text from an item.
    pub fn extract<'a>(&self, item: &'a Item) -> &'a str {
        match self {
            Self::Title => &item.title,
            Self::Content => &item.content,
        }
    }
}

/// One indexed field: its name, its text source, and its boost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name in the index.
    pub name: String,
    /// Item attribute the text comes from.
    pub source: ItemField,
    /// Multiplicative weight of matches in this field.
    pub boost: f64,
}

impl FieldSpec {
    /// Create a field with boost 1.0.
    pub fn new(name: impl Into<String>, source: ItemField) -> Self {
        Self {
            name: name.into(),
            source,
            boost: 1.0,
        }
    }

    /// Set the boost.
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }
}

/// The default field policy: title boosted 10×, body from content at 1×.
pub fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("title", ItemField::Title).with_boost(TITLE_BOOST),
        FieldSpec::new("body", ItemField::Content).with_boost(BODY_BOOST),
    ]
}

// ============================================================================
// Tests
// ============================================================================
