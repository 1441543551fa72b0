//! Local, file-persisted inverted index.
//!
//! - [`analyzer`]: tokenization, stopwords, stemming
//! - [`fields`]: which item attribute feeds which field, and its boost
//! - [`index`]: the snapshot structure, persistence, and querying
//! - [`builder`]: snapshot construction and the bootstrap backend

pub mod analyzer;
pub mod builder;
pub mod fields;
pub mod index;

pub use analyzer::Analyzer;
pub use builder::{INDEX_FILE, IndexStats, LocalIndexBuilder, LocalSearchBackend, index_path};
pub use fields::{FieldSpec, ItemField, default_fields};
pub use index::{LocalIndex, SearchHit};
