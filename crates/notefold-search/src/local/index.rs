//! Local inverted index snapshot.
//!
//! `LocalIndex` is the structure written to `<internal_dir>/index.json`.
//! All maps are `BTreeMap`s, so the serialized form depends only on the
//! indexed items, never on their order or on hash seeds.
//!
//! # Layout
//!
//! ```json
//! {
//!   "version": 2,
//!   "analyzer": "en_stem_stop",
//!   "fields": [{"name": "title", "source": "title", "boost": 10.0}, ...],
//!   "documents": {
//!     "i:1": {"id": 1, "fields": {"title": {"recip": 13.863}, "body": {...}}}
//!   },
//!   "inverted_index": {"flour": {"body": ["i:1", "i:2"]}}
//! }
//! ```
//!
//! Documents are keyed by a reference that keeps the id's type (`i:` for
//! integers, `s:` for strings), so `1` and `"1"` stay distinct.
//!
//! Term weights are precomputed at build time (BM25 × field boost), so a
//! query only sums stored weights.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use notefold_core::{Error, ItemId, Result};
use serde::{Deserialize, Serialize};

use crate::local::analyzer::{ANALYZER_NAME, Analyzer};
use crate::local::fields::FieldSpec;

/// Snapshot format version.
///
/// Increment when the layout changes; readers reject other versions.
pub const FORMAT_VERSION: u32 = 2;

/// Snapshot key of an item id.
pub(crate) fn document_ref(id: &ItemId) -> String {
    match id {
        ItemId::Int(n) => format!("i:{n}"),
        ItemId::Text(s) => format!("s:{s}"),
    }
}

/// Per-document term weights, grouped by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVector {
    /// Item identifier.
    pub id: ItemId,
    /// Field name → term → weight.
    pub fields: BTreeMap<String, BTreeMap<String, f64>>,
}

impl DocumentVector {
    /// Weight of `term` in `field`, or 0.0.
    pub fn weight(&self, field: &str, term: &str) -> f64 {
        self.fields
            .get(field)
            .and_then(|terms| terms.get(term))
            .copied()
            .unwrap_or(0.0)
    }
}

/// A ranked query match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Matching item.
    pub id: ItemId,
    /// Summed weight of matched terms (higher is better).
    pub score: f64,
}

/// A complete local index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalIndex {
    pub(crate) version: u32,
    pub(crate) analyzer: String,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) documents: BTreeMap<String, DocumentVector>,
    pub(crate) inverted_index: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl LocalIndex {
    /// An index over `fields` with no documents.
    pub(crate) fn empty(fields: Vec<FieldSpec>) -> Self {
        Self {
            version: FORMAT_VERSION,
            analyzer: ANALYZER_NAME.to_string(),
            fields,
            documents: BTreeMap::new(),
            inverted_index: BTreeMap::new(),
        }
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.inverted_index.len()
    }

    /// Field policy the index was built with.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Stored vector for a document, by item id.
    pub fn document(&self, id: &ItemId) -> Option<&DocumentVector> {
        self.documents.get(&document_ref(id))
    }

    /// Search the index with the English analysis pipeline.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.search_with(&mut Analyzer::english(), query)
    }

    /// Search the index, analyzing `query` with `analyzer`.
    ///
    /// Every document containing at least one query term matches. Results
    /// are ordered by score (descending), ties by item id.
    pub fn search_with(&self, analyzer: &mut Analyzer, query: &str) -> Vec<SearchHit> {
        let terms: BTreeSet<String> = analyzer.terms(query).into_iter().collect();
        let mut scores: BTreeMap<&str, f64> = BTreeMap::new();

        for term in &terms {
            let Some(postings) = self.inverted_index.get(term) else {
                continue;
            };
            for (field, refs) in postings {
                for reference in refs {
                    if let Some(doc) = self.documents.get(reference) {
                        *scores.entry(reference.as_str()).or_insert(0.0) += doc.weight(field, term);
                    }
                }
            }
        }

        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .filter_map(|(reference, score)| {
                self.documents.get(reference).map(|doc| SearchHit {
                    id: doc.id.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits
    }

    /// Serialize to the snapshot's JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write the snapshot to `path`, replacing any previous file.
    ///
    /// The JSON is written and fsynced to a sibling temporary file, then
    /// renamed over `path`, so readers never observe a half-written
    /// snapshot. On failure the temporary file is removed.
    pub fn save(&self, path: &Path) -> Result<usize> {
        let json = self
            .to_json()
            .map_err(|e| Error::operation(format!("Failed to serialize index: {e}")))?;

        let tmp_path = path.with_extension("json.tmp");
        let result = write_synced(&tmp_path, json.as_bytes()).and_then(|()| {
            std::fs::rename(&tmp_path, path).map_err(|e| Error::io_with_path(e, path))
        });

        if let Err(e) = result {
            if let Err(cleanup) = std::fs::remove_file(&tmp_path)
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                log::warn!("Failed to remove {:?}: {}", tmp_path, cleanup);
            }
            return Err(e);
        }

        Ok(json.len())
    }

    /// Load a snapshot written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// was written with a different format version or analyzer.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;

        let index: Self = serde_json::from_str(&content)
            .map_err(|e| Error::parse(format!("Invalid index JSON: {e}")))?;

        if index.version != FORMAT_VERSION {
            return Err(Error::parse(format!(
                "Unsupported index version: stored={}, current={}",
                index.version, FORMAT_VERSION
            )));
        }
        if index.analyzer != ANALYZER_NAME {
            return Err(Error::parse(format!(
                "Unsupported index analyzer '{}'",
                index.analyzer
            )));
        }

        Ok(index)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| Error::io_with_path(e, path))?;
    file.write_all(bytes).map_err(|e| Error::io_with_path(e, path))?;
    file.sync_all().map_err(|e| Error::io_with_path(e, path))
}

// ============================================================================
// Tests
// ============================================================================
