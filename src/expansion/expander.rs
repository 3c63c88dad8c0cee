//! The expander capability and the retrieval-backed implementation.

use std::hash::Hash;
use std::sync::Arc;

use crate::cache::SingleFlightCache;
use crate::document::{DocKey, Document};
use crate::error::Result;
use crate::expansion::{DEFAULT_MAX_NUM_DOCS, DEFAULT_NUM_TERMS};
use crate::index::SearchIndex;
use crate::stop::StopList;
use crate::vector::TermVector;

/// Capability of expanding a document into an ordered set of related
/// documents.
pub trait DocumentExpander: Send + Sync {
    /// The first `num_docs` expansion documents for `document`, ordered by
    /// descending retrieval score.
    ///
    /// Requesting zero documents returns an empty set without querying.
    /// Failures are logged and degrade to an empty set; they never reach
    /// the caller as an error.
    fn expand(&self, document: &Document, num_docs: usize) -> Vec<Document>;

    /// The pseudo-query this expander would issue for `document`.
    fn pseudo_query(&self, document: &Document) -> TermVector;

    /// The expansion index backing this expander.
    fn index(&self) -> Arc<dyn SearchIndex>;

    /// Drop the cached expansion documents' term vectors for `document`.
    ///
    /// Called after the expansion set has contributed to an aggregate
    /// (e.g. an expansion language model); the vectors are memory-heavy
    /// and are not needed again once the aggregate is memoized.
    fn release_vectors(&self, document: &Document) {
        let _ = document;
    }
}

/// A cached expansion set together with the cutoff it was retrieved at.
#[derive(Debug, Clone)]
pub(crate) struct CachedExpansion {
    pub hits: Arc<Vec<Document>>,
    pub cutoff: usize,
}

/// Build a frequency-based pseudo-query: deep-copy the document's vector,
/// drop stopwords, clip to the top `num_terms` terms by weight.
pub(crate) fn frequency_pseudo_query(
    document: &Document,
    stoplist: Option<&StopList>,
    num_terms: usize,
) -> TermVector {
    let mut vector = match document.vector() {
        Some(vector) => vector.clone(),
        None => {
            log::warn!(
                "document {} has no feature vector; pseudo-query is empty",
                document.docno()
            );
            TermVector::new()
        }
    };
    if let Some(stoplist) = stoplist {
        vector.apply_stoplist(stoplist);
    }
    vector.clip(num_terms);
    vector
}

/// Serve an expansion request from the cache, retrieving on a miss and
/// re-retrieving (for this key only) when the requested cutoff outgrows
/// the cached one.
pub(crate) fn expand_cached<K, F>(
    cache: &SingleFlightCache<K, CachedExpansion>,
    key: K,
    num_docs: usize,
    floor: usize,
    retrieve: F,
    label: &str,
) -> Vec<Document>
where
    K: Eq + Hash + Clone,
    F: Fn(usize) -> Result<Vec<Document>>,
{
    let mut cutoff = num_docs.max(floor);
    loop {
        let entry = cache.get_or_try_compute(key.clone(), || {
            retrieve(cutoff).map(|hits| CachedExpansion {
                hits: Arc::new(hits),
                cutoff,
            })
        });
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("error getting expanded document {label} from the cache: {e}");
                return Vec::new();
            }
        };

        // The cached list satisfies the request when it was retrieved at a
        // large enough cutoff, or when the index itself ran out of hits.
        if num_docs <= entry.cutoff || entry.hits.len() < entry.cutoff {
            return entry.hits.iter().take(num_docs).cloned().collect();
        }

        cutoff = num_docs.max(entry.cutoff);
        cache.invalidate(&key);
    }
}

/// Strip the term vectors out of a cached expansion set, keeping identity
/// and score so that priors still work.
pub(crate) fn release_cached_vectors<K>(cache: &SingleFlightCache<K, CachedExpansion>, key: K)
where
    K: Eq + Hash + Clone,
{
    if let Some(entry) = cache.get(&key) {
        let stripped: Vec<Document> = entry
            .hits
            .iter()
            .map(|doc| {
                let mut doc = doc.clone();
                doc.take_vector();
                doc
            })
            .collect();
        cache.replace(
            key,
            CachedExpansion {
                hits: Arc::new(stripped),
                cutoff: entry.cutoff,
            },
        );
    }
}

/// Frequency-based document expander with live retrieval.
pub struct RetrievalExpander {
    index: Arc<dyn SearchIndex>,
    num_terms: usize,
    stoplist: Option<StopList>,
    max_num_docs: usize,
    cache: SingleFlightCache<DocKey, CachedExpansion>,
}

impl RetrievalExpander {
    /// Create an expander with default settings and no stoplist.
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        RetrievalExpander::with_params(index, DEFAULT_NUM_TERMS, None)
    }

    /// Create an expander with a custom pseudo-query size and stoplist.
    pub fn with_params(
        index: Arc<dyn SearchIndex>,
        num_terms: usize,
        stoplist: Option<StopList>,
    ) -> Self {
        RetrievalExpander {
            index,
            num_terms,
            stoplist,
            max_num_docs: DEFAULT_MAX_NUM_DOCS,
            cache: SingleFlightCache::new(),
        }
    }

    /// Set the retrieval cutoff floor for cache misses.
    pub fn set_max_num_docs(&mut self, max_num_docs: usize) {
        self.max_num_docs = max_num_docs;
    }

    /// Number of pseudo-query terms.
    pub fn num_terms(&self) -> usize {
        self.num_terms
    }

    /// Number of documents with a cached expansion set.
    pub fn cached_expansions(&self) -> usize {
        self.cache.len()
    }
}

impl DocumentExpander for RetrievalExpander {
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
        frequency_pseudo_query(document, self.stoplist.as_ref(), self.num_terms)
    }

    fn index(&self) -> Arc<dyn SearchIndex> {
        Arc::clone(&self.index)
    }

    fn release_vectors(&self, document: &Document) {
        release_cached_vectors(&self.cache, document.key());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::DocexError;
    use crate::index::CollectionStats;
    use crate::index::memory::MemoryIndex;

    fn sample_index() -> Arc<MemoryIndex> {
        let mut index = MemoryIndex::new();
        index.add_document("doc1", "the quick brown fox jumps over the lazy dog");
        index.add_document("doc2", "the quick red fox runs through the green forest");
        index.add_document("doc3", "a lazy dog sleeps beside the brown fox");
        index.add_document("doc4", "stock markets fell sharply in early trading");
        index.add_document("doc5", "bond markets rallied while stock traders slept");
        Arc::new(index)
    }

    fn document_from(index: &MemoryIndex, docno: &str) -> Document {
        let doc_id = index.doc_id(docno).unwrap();
        let mut doc = Document::new(docno);
        doc.set_doc_id(doc_id);
        doc.set_vector(index.feature_vector(doc_id).unwrap());
        doc
    }

    #[test]
    fn test_pseudo_query_copies_and_clips() {
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let expander = RetrievalExpander::with_params(
            index.clone(),
            3,
            Some(StopList::from_words(["the", "over"])),
        );

        let pseudo_query = expander.pseudo_query(&doc);
        assert!(pseudo_query.num_terms() <= 3);
        assert!(!pseudo_query.contains("the"));
        // The source document vector is untouched.
        assert!(doc.vector().unwrap().contains("the"));
    }

    #[test]
    fn test_expand_zero_docs_is_free() {
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let expander = RetrievalExpander::new(index);
        assert!(expander.expand(&doc, 0).is_empty());
        assert_eq!(expander.cached_expansions(), 0);
    }

    #[test]
    fn test_expand_crops_cached_result() {
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let expander = RetrievalExpander::new(index);

        let five = expander.expand(&doc, 5);
        let two = expander.expand(&doc, 2);

        assert_eq!(two.len(), 2);
        assert_eq!(two, five[..2].to_vec());
        assert_eq!(expander.cached_expansions(), 1);
    }

    #[test]
    fn test_expansion_ordered_by_score() {
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let expander = RetrievalExpander::new(index);

        let hits = expander.expand(&doc, 5);
        assert!(!hits.is_empty());
        for pair in hits.windows(2) {
            assert!(pair[0].score() >= pair[1].score());
        }
    }

    struct CountingIndex {
        inner: MemoryIndex,
        queries: AtomicUsize,
    }

    impl CollectionStats for CountingIndex {
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

    impl SearchIndex for CountingIndex {
        fn run_query(&self, query: &TermVector, cutoff: usize) -> Result<Vec<Document>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.run_query(query, cutoff)
        }
        fn feature_vector(&self, doc_id: u64) -> Result<TermVector> {
            self.inner.feature_vector(doc_id)
        }
        fn doc_id(&self, docno: &str) -> Option<u64> {
            self.inner.doc_id(docno)
        }
        fn docno(&self, doc_id: u64) -> Option<String> {
            self.inner.docno(doc_id)
        }
    }

    #[test]
    fn test_growing_cutoff_recomputes_once() {
        let mut inner = MemoryIndex::new();
        for i in 0..10 {
            inner.add_document(format!("doc{i}"), "shared terms for every document here");
        }
        let doc_id = inner.doc_id("doc0").unwrap();
        let mut doc = Document::new("doc0");
        doc.set_doc_id(doc_id);
        doc.set_vector(inner.feature_vector(doc_id).unwrap());

        let index = Arc::new(CountingIndex {
            inner,
            queries: AtomicUsize::new(0),
        });
        let mut expander = RetrievalExpander::new(index.clone());
        expander.set_max_num_docs(3);

        // First request retrieves at the floor of 3.
        expander.expand(&doc, 2);
        assert_eq!(index.queries.load(Ordering::SeqCst), 1);

        // Within the cached cutoff: no new retrieval.
        expander.expand(&doc, 3);
        assert_eq!(index.queries.load(Ordering::SeqCst), 1);

        // Growing past the cutoff invalidates this key and re-retrieves.
        let hits = expander.expand(&doc, 6);
        assert_eq!(hits.len(), 6);
        assert_eq!(index.queries.load(Ordering::SeqCst), 2);

        // The grown cutoff is now cached.
        expander.expand(&doc, 5);
        assert_eq!(index.queries.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_pseudo_query_skips_retrieval() {
        let index = Arc::new(CountingIndex {
            inner: MemoryIndex::new(),
            queries: AtomicUsize::new(0),
        });
        let expander = RetrievalExpander::new(index.clone());

        // No feature vector means an empty pseudo-query; the index is
        // never consulted.
        let doc = Document::new("phantom");
        assert!(expander.expand(&doc, 5).is_empty());
        assert_eq!(index.queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_retrieval_failure_degrades_to_empty() {
        struct FailingIndex;

        impl CollectionStats for FailingIndex {
            fn doc_count(&self) -> u64 {
                0
            }
            fn doc_frequency(&self, _term: &str) -> u64 {
                0
            }
            fn term_count(&self, _term: &str) -> f64 {
                0.0
            }
            fn total_terms(&self) -> f64 {
                0.0
            }
        }

        impl SearchIndex for FailingIndex {
            fn run_query(&self, _query: &TermVector, _cutoff: usize) -> Result<Vec<Document>> {
                Err(DocexError::index("simulated retrieval failure"))
            }
            fn feature_vector(&self, _doc_id: u64) -> Result<TermVector> {
                Err(DocexError::index("no vectors"))
            }
            fn doc_id(&self, _docno: &str) -> Option<u64> {
                None
            }
            fn docno(&self, _doc_id: u64) -> Option<String> {
                None
            }
        }

        let expander = RetrievalExpander::new(Arc::new(FailingIndex));
        let doc =
            Document::new("doc1").with_vector(TermVector::from_pairs(vec![("term", 1.0)]));
        assert!(expander.expand(&doc, 5).is_empty());
        // The failure was not cached; the key is free to retry.
        assert_eq!(expander.cached_expansions(), 0);
    }

    #[test]
    fn test_release_vectors_keeps_identity_and_score() {
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let expander = RetrievalExpander::new(index);

        let before = expander.expand(&doc, 3);
        assert!(before.iter().all(|d| d.vector().is_some()));

        expander.release_vectors(&doc);
        let after = expander.expand(&doc, 3);
        assert_eq!(before, after);
        assert!(after.iter().all(|d| d.vector().is_none()));
        assert_eq!(before[0].score(), after[0].score());
    }
}
