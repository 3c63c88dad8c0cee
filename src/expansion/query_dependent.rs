//! Query-dependent document expansion.
//!
//! When expansion runs inside a retrieval loop, the pseudo-query can be
//! biased toward the query being processed: the query's own (stopped,
//! normalized) vector is interpolated with the frequency-based
//! pseudo-query before retrieval. Because the pseudo-query now depends on
//! the interpolation weight, cached expansion sets are keyed jointly by
//! document identity and weight.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::SingleFlightCache;
use crate::document::{DocKey, Document};
use crate::expansion::expander::{
    CachedExpansion, DocumentExpander, expand_cached, frequency_pseudo_query,
    release_cached_vectors,
};
use crate::expansion::{DEFAULT_MAX_NUM_DOCS, DEFAULT_NUM_TERMS};
use crate::index::SearchIndex;
use crate::stop::StopList;
use crate::vector::TermVector;

/// Cache keys quantize the query weight so that bitwise-close weights from
/// a sweep land on the same entry.
fn weight_key(weight: f64) -> i64 {
    (weight * 1_000_000.0).round() as i64
}

/// A document expander whose pseudo-query blends in the current query.
pub struct QueryDependentExpander {
    index: Arc<dyn SearchIndex>,
    num_terms: usize,
    stoplist: Option<StopList>,
    max_num_docs: usize,
    query: RwLock<TermVector>,
    query_weight: RwLock<f64>,
    cache: SingleFlightCache<(DocKey, i64), CachedExpansion>,
}

impl QueryDependentExpander {
    /// Create an expander with default settings and no stoplist.
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        QueryDependentExpander::with_params(index, DEFAULT_NUM_TERMS, None)
    }

    /// Create an expander with a custom pseudo-query size and stoplist.
    pub fn with_params(
        index: Arc<dyn SearchIndex>,
        num_terms: usize,
        stoplist: Option<StopList>,
    ) -> Self {
        QueryDependentExpander {
            index,
            num_terms,
            stoplist,
            max_num_docs: DEFAULT_MAX_NUM_DOCS,
            query: RwLock::new(TermVector::new()),
            query_weight: RwLock::new(0.0),
            cache: SingleFlightCache::new(),
        }
    }

    /// Set the current query. Typically called once per query episode.
    pub fn set_query(&self, query: TermVector) {
        *self.query.write() = query;
    }

    /// Set the interpolation weight given to the query vector.
    pub fn set_query_weight(&self, weight: f64) {
        *self.query_weight.write() = weight;
    }

    /// The current interpolation weight.
    pub fn query_weight(&self) -> f64 {
        *self.query_weight.read()
    }

    /// Set the retrieval cutoff floor for cache misses.
    pub fn set_max_num_docs(&mut self, max_num_docs: usize) {
        self.max_num_docs = max_num_docs;
    }
}

impl DocumentExpander for QueryDependentExpander {
    fn expand(&self, document: &Document, num_docs: usize) -> Vec<Document> {
        if num_docs == 0 {
            return Vec::new();
        }
        let key = (document.key(), weight_key(self.query_weight()));
        expand_cached(
            &self.cache,
            key,
            num_docs,
            self.max_num_docs,
            |cutoff| {
                let pseudo_query = self.pseudo_query(document);
                if pseudo_query.is_empty() {
                    return Ok(Vec::new());
                }
                self.index.run_query(&pseudo_query, cutoff)
            },
            document.docno(),
        )
    }

    fn pseudo_query(&self, document: &Document) -> TermVector {
        // Copy the query vector so stopping cannot leak back to the caller.
        let mut query_vector = self.query.read().clone();
        if let Some(stoplist) = &self.stoplist {
            query_vector.apply_stoplist(stoplist);
        }
        query_vector.normalize();

        let mut doc_query = frequency_pseudo_query(document, self.stoplist.as_ref(), self.num_terms);
        doc_query.normalize();

        TermVector::interpolate(&query_vector, &doc_query, self.query_weight())
    }

    fn index(&self) -> Arc<dyn SearchIndex> {
        Arc::clone(&self.index)
    }

    fn release_vectors(&self, document: &Document) {
        // A sweep caches one entry per weight for the same identity;
        // release all of them, not just the weight currently set.
        let doc_key = document.key();
        for key in self.cache.keys() {
            if key.0 == doc_key {
                release_cached_vectors(&self.cache, key);
            }
        }
    }
}
