//! Expansion with premade pseudo-queries.
//!
//! Pseudo-query vectors are supplied up front (one per docno), bypassing
//! frequency-based construction entirely; retrieval and caching work as in
//! [`RetrievalExpander`](crate::expansion::RetrievalExpander).

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;

use crate::cache::SingleFlightCache;
use crate::document::{DocKey, Document};
use crate::error::Result;
use crate::expansion::DEFAULT_MAX_NUM_DOCS;
use crate::expansion::expander::{
    CachedExpansion, DocumentExpander, expand_cached, release_cached_vectors,
};
use crate::index::SearchIndex;
use crate::input;
use crate::vector::TermVector;

/// A document expander whose pseudo-queries were built offline.
pub struct PremadePseudoQueryExpander {
    index: Arc<dyn SearchIndex>,
    queries: AHashMap<String, TermVector>,
    max_num_docs: usize,
    cache: SingleFlightCache<DocKey, CachedExpansion>,
}

impl PremadePseudoQueryExpander {
    /// Create an expander over docno-keyed pseudo-query vectors.
    pub fn new(index: Arc<dyn SearchIndex>, queries: AHashMap<String, TermVector>) -> Self {
        PremadePseudoQueryExpander {
            index,
            queries,
            max_num_docs: DEFAULT_MAX_NUM_DOCS,
            cache: SingleFlightCache::new(),
        }
    }

    /// Load pseudo-queries from a delimited `(docno, term, weight)` file.
    pub fn from_file<P: AsRef<Path>>(
        index: Arc<dyn SearchIndex>,
        path: P,
        delimiter: char,
    ) -> Result<Self> {
        let queries = input::read_pseudo_queries(path, delimiter)?;
        Ok(PremadePseudoQueryExpander::new(index, queries))
    }

    /// Number of supplied pseudo-queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether any pseudo-queries were supplied.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Set the retrieval cutoff floor for cache misses.
    pub fn set_max_num_docs(&mut self, max_num_docs: usize) {
        self.max_num_docs = max_num_docs;
    }
}

impl DocumentExpander for PremadePseudoQueryExpander {
    fn expand(&self, document: &Document, num_docs: usize) -> Vec<Document> {
        if num_docs == 0 {
            return Vec::new();
        }
        expand_cached(
            &self.cache,
            document.key(),
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
        match self.queries.get(document.docno()) {
            Some(query) => query.clone(),
            None => {
                log::warn!("no premade pseudo-query for {}", document.docno());
                TermVector::new()
            }
        }
    }

    fn index(&self) -> Arc<dyn SearchIndex> {
        Arc::clone(&self.index)
    }

    fn release_vectors(&self, document: &Document) {
        release_cached_vectors(&self.cache, document.key());
    }
}
