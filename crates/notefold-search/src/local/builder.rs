//! Local index construction.
//!
//! This module provides `LocalIndexBuilder`, which turns a full item
//! snapshot into a [`LocalIndex`] and writes it to disk, and
//! `LocalSearchBackend`, the bootstrap backend that drives it.
//!
//! # Scoring
//!
//! Each (document, field, term) gets a precomputed weight:
//!
//! ```text
//! idf    = ln(1 + |(N - df + 0.5) / (df + 0.5)|)
//! tf'    = ((k1 + 1) · tf) / (k1 · (1 - b + b · len / avg_len) + tf)
//! weight = round3(idf · tf' · boost)
//! ```
//!
//! with `k1 = 1.2`, `b = 0.75`, `N` the document count and `df` the number
//! of documents containing the term in any field.
//!
//! # Usage
//!
//! ```rust,ignore
//! use notefold_search::LocalIndexBuilder;
//!
//! let builder = LocalIndexBuilder::new();
//! let stats = builder.write(&items, &internal_dir.join("index.json"))?;
//! println!("Indexed {} documents", stats.documents_indexed);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use notefold_core::{Error, Item, ItemId, ItemSource, Result};

use crate::backend::{ActiveIndex, SearchBackend};
use crate::local::analyzer::Analyzer;
use crate::local::fields::{FieldSpec, default_fields};
use crate::local::index::{DocumentVector, LocalIndex, document_ref};

/// File name of the snapshot inside the internal directory.
pub const INDEX_FILE: &str = "index.json";

/// BM25 term-frequency saturation.
const K1: f64 = 1.2;

/// BM25 length normalization.
const B: f64 = 0.75;

/// Path of the snapshot for a given internal directory.
pub fn index_path(internal_dir: &Path) -> PathBuf {
    internal_dir.join(INDEX_FILE)
}

/// Statistics about a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of documents in the snapshot.
    pub documents_indexed: usize,
    /// Number of distinct terms.
    pub terms: usize,
    /// Items dropped because their id was already indexed.
    pub duplicates_skipped: usize,
    /// Size of the written snapshot in bytes.
    pub bytes_written: usize,
}

/// Analyzed text of one document, before weighting.
struct AnalyzedDocument {
    id: ItemId,
    /// Field name → (field length in terms, term → frequency).
    fields: BTreeMap<String, (usize, BTreeMap<String, usize>)>,
}

/// Builds a [`LocalIndex`] from an item snapshot.
#[derive(Debug, Clone)]
pub struct LocalIndexBuilder {
    fields: Vec<FieldSpec>,
}

impl LocalIndexBuilder {
    /// Create a builder with the default field policy (title 10×, body 1×).
    pub fn new() -> Self {
        Self {
            fields: default_fields(),
        }
    }

    /// Replace the field policy.
    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    /// Field policy in use.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn validate_fields(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::config("local index needs at least one field"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::config(format!(
                    "duplicate local index field '{}'",
                    field.name
                )));
            }
            if !field.boost.is_finite() || field.boost <= 0.0 {
                return Err(Error::config(format!(
                    "field '{}' has invalid boost {}",
                    field.name, field.boost
                )));
            }
        }

        Ok(())
    }

    /// Build an index over the full item snapshot.
    ///
    /// The result depends only on the set of items: input order does not
    /// matter. An empty snapshot yields a valid empty index. When two items
    /// share an id, the first in id/title/content order wins.
    pub fn build(&self, items: &[Item]) -> Result<LocalIndex> {
        self.build_with_stats(items).map(|(index, _)| index)
    }

    fn build_with_stats(&self, items: &[Item]) -> Result<(LocalIndex, IndexStats)> {
        self.validate_fields()?;

        let mut sorted: Vec<&Item> = items.iter().collect();
        sorted.sort_by(|a, b| {
            a.id.cmp(&b.id)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.content.cmp(&b.content))
        });

        let mut analyzer = Analyzer::english();
        let mut analyzed: BTreeMap<String, AnalyzedDocument> = BTreeMap::new();
        let mut stats = IndexStats::default();

        for item in sorted {
            let reference = document_ref(&item.id);
            if analyzed.contains_key(&reference) {
                log::warn!("Duplicate item id {}, keeping the first occurrence", item.id);
                stats.duplicates_skipped += 1;
                continue;
            }

            let mut fields = BTreeMap::new();
            for spec in &self.fields {
                let terms = analyzer.terms(spec.source.extract(item));
                let mut frequencies: BTreeMap<String, usize> = BTreeMap::new();
                for term in &terms {
                    *frequencies.entry(term.clone()).or_insert(0) += 1;
                }
                fields.insert(spec.name.clone(), (terms.len(), frequencies));
            }

            analyzed.insert(
                reference,
                AnalyzedDocument {
                    id: item.id.clone(),
                    fields,
                },
            );
        }

        let document_count = analyzed.len() as f64;

        // Average field length, per field.
        let mut average_length: BTreeMap<&str, f64> = BTreeMap::new();
        for spec in &self.fields {
            let total: usize = analyzed
                .values()
                .filter_map(|doc| doc.fields.get(&spec.name))
                .map(|(len, _)| *len)
                .sum();
            let average = if analyzed.is_empty() {
                0.0
            } else {
                total as f64 / document_count
            };
            average_length.insert(spec.name.as_str(), average);
        }

        // Document frequency of each term across all fields.
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in analyzed.values() {
            let terms: BTreeSet<&str> = doc
                .fields
                .values()
                .flat_map(|(_, frequencies)| frequencies.keys().map(String::as_str))
                .collect();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let mut index = LocalIndex::empty(self.fields.clone());

        for (reference, doc) in &analyzed {
            let mut vector = DocumentVector {
                id: doc.id.clone(),
                fields: BTreeMap::new(),
            };

            for spec in &self.fields {
                let Some((length, frequencies)) = doc.fields.get(&spec.name) else {
                    continue;
                };
                let average = average_length.get(spec.name.as_str()).copied().unwrap_or(0.0);

                let mut weights = BTreeMap::new();
                for (term, tf) in frequencies {
                    let df = document_frequency.get(term.as_str()).copied().unwrap_or(0);
                    let weight = idf(document_count, df as f64)
                        * saturated_tf(*tf as f64, *length as f64, average)
                        * spec.boost;
                    weights.insert(term.clone(), round3(weight));

                    index
                        .inverted_index
                        .entry(term.clone())
                        .or_default()
                        .entry(spec.name.clone())
                        .or_default()
                        .insert(reference.clone());
                }

                if !weights.is_empty() {
                    vector.fields.insert(spec.name.clone(), weights);
                }
            }

            index.documents.insert(reference.clone(), vector);
        }

        stats.documents_indexed = index.document_count();
        stats.terms = index.term_count();

        Ok((index, stats))
    }

    /// Build the index and write it to `path`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns an error if the field policy is invalid or the snapshot
    /// cannot be serialized or written. The parent directory must exist.
    pub fn write(&self, items: &[Item], path: &Path) -> Result<IndexStats> {
        let (index, mut stats) = self.build_with_stats(items)?;
        stats.bytes_written = index.save(path)?;

        log::info!(
            "Indexed {} documents ({} terms, {} bytes) into {:?}",
            stats.documents_indexed,
            stats.terms,
            stats.bytes_written,
            path
        );

        Ok(stats)
    }
}

impl Default for LocalIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn idf(document_count: f64, document_frequency: f64) -> f64 {
    (1.0 + ((document_count - document_frequency + 0.5) / (document_frequency + 0.5)).abs()).ln()
}

fn saturated_tf(tf: f64, length: f64, average_length: f64) -> f64 {
    let relative_length = if average_length > 0.0 {
        length / average_length
    } else {
        1.0
    };
    ((K1 + 1.0) * tf) / (K1 * (1.0 - B + B * relative_length) + tf)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Backend that rebuilds `index.json` from the item snapshot.
pub struct LocalSearchBackend {
    builder: LocalIndexBuilder,
    internal_dir: PathBuf,
    items: Arc<dyn ItemSource>,
}

impl LocalSearchBackend {
    /// Create a backend writing to `<internal_dir>/index.json`.
    pub fn new(
        builder: LocalIndexBuilder,
        internal_dir: impl AsRef<Path>,
        items: Arc<dyn ItemSource>,
    ) -> Self {
        Self {
            builder,
            internal_dir: internal_dir.as_ref().to_path_buf(),
            items,
        }
    }

    /// Path the snapshot is written to.
    pub fn index_path(&self) -> PathBuf {
        index_path(&self.internal_dir)
    }
}

#[async_trait]
impl SearchBackend for LocalSearchBackend {
    async fn bootstrap(&self) -> Result<ActiveIndex> {
        let items = self.items.items().await?;
        let path = self.index_path();
        let stats = self.builder.write(&items, &path)?;

        Ok(ActiveIndex::Local {
            path,
            documents: stats.documents_indexed,
        })
    }

    fn name(&self) -> &str {
        "local"
    }
}

impl std::fmt::Debug for LocalSearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSearchBackend")
            .field("internal_dir", &self.internal_dir)
            .field("fields", &self.builder.fields.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
