//! Retrieval-service and collection-statistics traits.
//!
//! The expansion pipeline never touches an inverted index directly. It
//! depends on two capability traits: [`CollectionStats`] supplies the
//! corpus-level numbers that Dirichlet smoothing needs, and [`SearchIndex`]
//! adds query evaluation and document lookup on top. Any engine that can
//! answer a weighted-term query with a ranked list of documents can sit
//! behind these traits.
//!
//! Two implementations ship with the crate: [`memory::MemoryIndex`], a small
//! in-memory query-likelihood index used by tests and the demo binary, and
//! [`cached::CachedVectorIndex`], a wrapper that memoizes feature-vector
//! lookups in a bounded LRU cache.

pub mod cached;
pub mod memory;

use crate::document::Document;
use crate::error::Result;
use crate::vector::TermVector;

/// Corpus-level statistics used for language-model smoothing.
pub trait CollectionStats: Send + Sync {
    /// Total number of documents in the collection.
    fn doc_count(&self) -> u64;

    /// Number of documents containing `term`.
    fn doc_frequency(&self, term: &str) -> u64;

    /// Total occurrences of `term` across the collection.
    fn term_count(&self, term: &str) -> f64;

    /// Total term occurrences across the collection.
    fn total_terms(&self) -> f64;

    /// Collection language-model probability of `term`.
    ///
    /// Zero for an empty collection rather than NaN.
    fn collection_probability(&self, term: &str) -> f64 {
        let total = self.total_terms();
        if total > 0.0 {
            self.term_count(term) / total
        } else {
            0.0
        }
    }
}

/// An opaque retrieval service over one index.
pub trait SearchIndex: CollectionStats {
    /// Evaluate a weighted-term query, returning at most `cutoff` documents
    /// ordered by descending score, with feature vectors attached.
    fn run_query(&self, query: &TermVector, cutoff: usize) -> Result<Vec<Document>>;

    /// The stored feature vector of a document.
    fn feature_vector(&self, doc_id: u64) -> Result<TermVector>;

    /// Resolve an external docno to an internal id.
    fn doc_id(&self, docno: &str) -> Option<u64>;

    /// Resolve an internal id to an external docno.
    fn docno(&self, doc_id: u64) -> Option<String>;
}
