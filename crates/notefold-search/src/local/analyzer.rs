//! Text analysis pipeline for the local index.
//!
//! Documents and queries go through the same pipeline, so a query term
//! matches exactly the terms produced at build time:
//!
//! SimpleTokenizer → RemoveLongFilter → LowerCaser → StopWordFilter → Stemmer(English)
//!
//! The stopword list comes from the `stop-words` crate (English).

use stop_words::{LANGUAGE, get};
use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
    TextAnalyzer, TokenStream,
};

/// Name recorded in the snapshot so readers can reject incompatible files.
pub const ANALYZER_NAME: &str = "en_stem_stop";

/// Tokens longer than this (in bytes) are dropped.
const MAX_TOKEN_LENGTH: usize = 40;

/// English analysis pipeline.
#[derive(Clone)]
pub struct Analyzer {
    inner: TextAnalyzer,
}

impl Analyzer {
    /// Build the English pipeline with stopword removal and stemming.
    pub fn english() -> Self {
        let stopwords: Vec<String> = get(LANGUAGE::English)
            .iter()
            .map(|s| s.to_lowercase())
            .collect();

        let inner = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
            .filter(LowerCaser)
            .filter(StopWordFilter::remove(stopwords))
            .filter(Stemmer::new(Language::English))
            .build();

        Self { inner }
    }

    /// Split `text` into index terms, in order, duplicates included.
    pub fn terms(&mut self, text: &str) -> Vec<String> {
        let mut terms = Vec::new();
        let mut stream = self.inner.token_stream(text);
        while stream.advance() {
            terms.push(stream.token().text.clone());
        }
        terms
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::english()
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("name", &ANALYZER_NAME)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
