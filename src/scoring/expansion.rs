//! Scoring a term against a document's expansion set.

use std::sync::Arc;

use crate::document::Document;
use crate::expansion::DocumentExpander;
use crate::index::CollectionStats;
use crate::scoring::cached::CachedDocScorer;
use crate::scoring::dirichlet::{DEFAULT_MU, DirichletScorer};
use crate::scoring::prior::{PriorKind, compute_priors};
use crate::scoring::DocScorer;

/// Default number of expansion documents consulted per score.
pub const DEFAULT_EXPANSION_DOCS: usize = 5;

/// A [`DocScorer`] that estimates `P(term | expanded document)` as a
/// prior-weighted sum over the document's expansion set:
///
/// `P(t | d*) = sum_e P(t | e) * P(e | pseudo-query(d))`
///
/// where each `P(t | e)` is Dirichlet-smoothed against the expansion
/// index's collection statistics, and the priors come from the configured
/// [`PriorKind`].
pub struct ExpansionDocScorer {
    expander: Arc<dyn DocumentExpander>,
    dirichlet: CachedDocScorer<DirichletScorer>,
    prior: PriorKind,
    num_docs: usize,
}

impl ExpansionDocScorer {
    /// Create a scorer with defaults: mu 2500, 5 expansion documents,
    /// softmax priors.
    pub fn new(expander: Arc<dyn DocumentExpander>) -> Self {
        ExpansionDocScorer::with_params(
            DEFAULT_MU,
            expander,
            DEFAULT_EXPANSION_DOCS,
            PriorKind::default(),
        )
    }

    /// Create a scorer with a custom expansion-set cutoff.
    pub fn with_num_docs(expander: Arc<dyn DocumentExpander>, num_docs: usize) -> Self {
        ExpansionDocScorer::with_params(DEFAULT_MU, expander, num_docs, PriorKind::default())
    }

    /// Create a fully configured scorer.
    pub fn with_params(
        mu: f64,
        expander: Arc<dyn DocumentExpander>,
        num_docs: usize,
        prior: PriorKind,
    ) -> Self {
        let stats: Arc<dyn CollectionStats> = expander.index();
        ExpansionDocScorer {
            expander,
            dirichlet: CachedDocScorer::new(DirichletScorer::with_mu(mu, stats)),
            prior,
            num_docs,
        }
    }

    /// The expansion documents this scorer consults for `document`.
    pub fn expansion_docs(&self, document: &Document) -> Vec<Document> {
        self.expander.expand(document, self.num_docs)
    }

    /// Release the cached expansion-document vectors for `document`.
    pub fn release_expansion_vectors(&self, document: &Document) {
        self.expander.release_vectors(document);
    }

    /// The expansion-set cutoff.
    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    /// The prior strategy in use.
    pub fn prior(&self) -> PriorKind {
        self.prior
    }
}

impl DocScorer for ExpansionDocScorer {
    fn score_term(&self, term: &str, document: &Document) -> f64 {
        let expansion_docs = self.expansion_docs(document);
        if expansion_docs.is_empty() {
            return 0.0;
        }

        let priors = compute_priors(self.prior, &expansion_docs);
        let total: f64 = expansion_docs
            .iter()
            .zip(priors.iter())
            .map(|(doc, prior)| prior * self.dirichlet.score_term(term, doc))
            .sum();

        if total.is_finite() { total } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::expansion::RetrievalExpander;
    use crate::index::SearchIndex;
    use crate::index::memory::MemoryIndex;

    fn sample_index() -> Arc<MemoryIndex> {
        let mut index = MemoryIndex::new();
        index.add_document("doc1", "quick brown fox and lazy dog");
        index.add_document("doc2", "quick red fox in the deep forest");
        index.add_document("doc3", "the lazy dog and the quick fox");
        index.add_document("doc4", "stock markets fell in early trading");
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
    fn test_score_is_prior_weighted_probability() {
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let expander = Arc::new(RetrievalExpander::new(index));
        let scorer = ExpansionDocScorer::with_params(10.0, expander, 3, PriorKind::Softmax);

        let fox = scorer.score_term("fox", &doc);
        let markets = scorer.score_term("markets", &doc);

        // Probabilities, and the on-topic term dominates.
        assert!(fox > 0.0 && fox <= 1.0);
        assert!(fox > markets);
    }

    #[test]
    fn test_softmax_priors_bound_the_estimate() {
        // With priors summing to 1 and each P(t|e) <= 1, the aggregate is
        // a valid probability.
        let index = sample_index();
        let doc = document_from(&index, "doc2");
        let expander = Arc::new(RetrievalExpander::new(index));
        let scorer = ExpansionDocScorer::new(expander);

        let score = scorer.score_term("fox", &doc);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_empty_expansion_set_scores_zero() {
        // A document with no vector produces an empty pseudo-query, which
        // retrieves nothing.
        let index = sample_index();
        let expander = Arc::new(RetrievalExpander::new(index));
        let scorer = ExpansionDocScorer::new(expander);

        let doc = Document::new("phantom");
        assert_eq!(scorer.score_term("fox", &doc), 0.0);
    }

    #[test]
    fn test_scores_reflect_expansion_not_document() {
        // The term need not occur in the original document at all; its
        // probability comes from the expansion documents.
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let expander = Arc::new(RetrievalExpander::new(index));
        let scorer = ExpansionDocScorer::with_params(100.0, expander, 3, PriorKind::Softmax);

        // "forest" occurs only in doc2, a likely expansion neighbor.
        let forest = scorer.score_term("forest", &doc);
        assert!(forest > 0.0);
        assert!(!doc.vector().unwrap().contains("forest"));
    }
}
