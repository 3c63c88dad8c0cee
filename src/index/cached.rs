//! Feature-vector caching wrapper.
//!
//! Re-fetching a document's feature vector is one of the hottest lookups in
//! an expansion run (every expansion document of every pseudo-query needs
//! one). [`CachedVectorIndex`] wraps any [`SearchIndex`] and memoizes
//! vectors in a bounded LRU cache.

use crate::cache::BoundedCache;
use crate::document::Document;
use crate::error::Result;
use crate::index::{CollectionStats, SearchIndex};
use crate::vector::TermVector;

/// Default maximum number of cached feature vectors.
pub const DEFAULT_VECTOR_CACHE_SIZE: usize = 10_000;

/// A [`SearchIndex`] wrapper that caches feature-vector lookups.
pub struct CachedVectorIndex<I> {
    inner: I,
    vectors: BoundedCache<u64, TermVector>,
}

impl<I: SearchIndex> CachedVectorIndex<I> {
    /// Wrap an index with the default cache size.
    pub fn new(inner: I) -> Self {
        CachedVectorIndex {
            inner,
            vectors: BoundedCache::new(DEFAULT_VECTOR_CACHE_SIZE),
        }
    }

    /// Wrap an index with a custom cache size.
    pub fn with_capacity(inner: I, capacity: usize) -> Self {
        CachedVectorIndex {
            inner,
            vectors: BoundedCache::new(capacity),
        }
    }

    /// The wrapped index.
    pub fn inner(&self) -> &I {
        &self.inner
    }

    /// Number of currently cached vectors.
    pub fn cached_vectors(&self) -> usize {
        self.vectors.len()
    }
}

impl<I: SearchIndex> CollectionStats for CachedVectorIndex<I> {
    fn doc_count(&self) -> u64 {
        self.inner.doc_count()
    }

    fn doc_frequency(&self, term: &str) -> u64 {
        self.inner.doc_frequency(term)
    }

    fn term_count(&self, term: &str) -> f64 {
        self.inner.term_count(term)
    }

    fn total_terms(&self) -> f64 {
        self.inner.total_terms()
    }
}

impl<I: SearchIndex> SearchIndex for CachedVectorIndex<I> {
    fn run_query(&self, query: &TermVector, cutoff: usize) -> Result<Vec<Document>> {
        self.inner.run_query(query, cutoff)
    }

    fn feature_vector(&self, doc_id: u64) -> Result<TermVector> {
        if let Some(vector) = self.vectors.get(&doc_id) {
            return Ok(vector);
        }
        let vector = self.inner.feature_vector(doc_id)?;
        self.vectors.insert(doc_id, vector.clone());
        Ok(vector)
    }

    fn doc_id(&self, docno: &str) -> Option<u64> {
        self.inner.doc_id(docno)
    }

    fn docno(&self, doc_id: u64) -> Option<String> {
        self.inner.docno(doc_id)
    }
}
