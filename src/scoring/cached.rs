//! Memoizing scorer wrapper.

use crate::cache::BoundedCache;
use crate::document::{DocKey, Document};
use crate::scoring::DocScorer;

/// Default maximum number of memoized (term, document) scores.
pub const DEFAULT_SCORE_CACHE_SIZE: usize = 100_000;

/// A [`DocScorer`] wrapper that memoizes scores per (term, document
/// identity) in a bounded LRU cache.
///
/// Within one query episode, the same expansion documents are scored for
/// every vocabulary term; the memo keeps those Dirichlet computations from
/// repeating.
pub struct CachedDocScorer<S> {
    inner: S,
    scores: BoundedCache<(String, DocKey), f64>,
}

impl<S: DocScorer> CachedDocScorer<S> {
    /// Wrap a scorer with the default cache size.
    pub fn new(inner: S) -> Self {
        CachedDocScorer::with_capacity(inner, DEFAULT_SCORE_CACHE_SIZE)
    }

    /// Wrap a scorer with a custom cache size.
    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        CachedDocScorer {
            inner,
            scores: BoundedCache::new(capacity),
        }
    }

    /// The wrapped scorer.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: DocScorer> DocScorer for CachedDocScorer<S> {
    fn score_term(&self, term: &str, document: &Document) -> f64 {
        let key = (term.to_string(), document.key());
        self.scores
            .get_or_compute(key, || self.inner.score_term(term, document))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::vector::TermVector;

    struct CountingScorer {
        calls: AtomicUsize,
    }

    impl DocScorer for CountingScorer {
        fn score_term(&self, _term: &str, document: &Document) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            document.vector().map(|v| v.weight("x")).unwrap_or(0.0)
        }
    }

    #[test]
    fn test_scores_are_memoized_by_identity() {
        let scorer = CachedDocScorer::new(CountingScorer {
            calls: AtomicUsize::new(0),
        });

        let doc = Document::new("doc1").with_vector(TermVector::from_pairs(vec![("x", 4.0)]));
        assert_eq!(scorer.score_term("x", &doc), 4.0);
        assert_eq!(scorer.score_term("x", &doc), 4.0);
        assert_eq!(scorer.inner().calls.load(Ordering::SeqCst), 1);

        // Same identity, different handle: still a cache hit.
        let same = Document::new("doc1").with_score(9.9);
        assert_eq!(scorer.score_term("x", &same), 4.0);
        assert_eq!(scorer.inner().calls.load(Ordering::SeqCst), 1);

        // Different term recomputes.
        assert_eq!(scorer.score_term("y", &doc), 4.0);
        assert_eq!(scorer.inner().calls.load(Ordering::SeqCst), 2);
    }
}
