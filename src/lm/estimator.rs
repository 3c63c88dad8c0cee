//! Language-model estimation.
//!
//! Three models, built to compose: the original document model, the
//! expansion-only model, and their weighted combination. The first two are
//! memoized in a [`LanguageModels`] side table owned by the caller (never
//! stashed on the document itself), so a sweep over interpolation weights
//! recomputes only the combination.

use std::collections::BTreeSet;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::document::{DocKey, Document};
use crate::lm::divergence::vocabulary;
use crate::scoring::DocScorer;
use crate::scoring::expansion::ExpansionDocScorer;
use crate::vector::TermVector;

/// The language model of a document's own terms.
///
/// Each term already present in the document's vector is scored with the
/// given scorer (typically Dirichlet against the target collection).
pub fn original_language_model(document: &Document, scorer: &dyn DocScorer) -> TermVector {
    let mut lm = TermVector::new();
    if let Some(vector) = document.vector() {
        for term in vector.terms() {
            lm.set_weight(term, scorer.score_term(term, document));
        }
    }
    lm
}

/// The language model of a document's expansion set.
///
/// The vocabulary is the union of terms across the expansion documents,
/// or `included_terms` when supplied (avoiding a full union scan). Each
/// vocabulary term's probability comes from the expansion scorer's
/// prior-weighted aggregate. Afterwards the expansion documents' cached
/// term vectors are released; they are memory-heavy and the memoized model
/// makes them unnecessary.
pub fn expansion_language_model(
    document: &Document,
    scorer: &ExpansionDocScorer,
    included_terms: Option<&BTreeSet<String>>,
) -> TermVector {
    let mut lm = TermVector::new();
    match included_terms {
        Some(terms) => {
            for term in terms {
                lm.set_weight(term.as_str(), scorer.score_term(term, document));
            }
        }
        None => {
            let expansion_docs = scorer.expansion_docs(document);
            let vectors: Vec<&TermVector> = expansion_docs
                .iter()
                .filter_map(|doc| doc.vector())
                .collect();
            for term in vocabulary(vectors.into_iter()) {
                let probability = scorer.score_term(&term, document);
                lm.set_weight(term, probability);
            }
        }
    }
    scorer.release_expansion_vectors(document);
    lm
}

/// Weighted linear combination of two language models over their union
/// vocabulary: `lm1_weight * lm1[t] + (1 - lm1_weight) * lm2[t]`.
///
/// Terms whose combined weight is zero are omitted, so a weight of 1.0
/// recovers `lm1` exactly and 0.0 recovers `lm2` exactly.
pub fn combined_language_model(
    lm1: &TermVector,
    lm2: &TermVector,
    lm1_weight: f64,
) -> TermVector {
    let mut lm = TermVector::new();
    for term in vocabulary([lm1, lm2]) {
        let weight = lm1_weight * lm1.weight(&term) + (1.0 - lm1_weight) * lm2.weight(&term);
        if weight != 0.0 {
            lm.set_weight(term, weight);
        }
    }
    lm
}

#[derive(Debug, Default, Clone)]
struct DocModels {
    original: Option<TermVector>,
    expansion: Option<TermVector>,
}

/// A side table memoizing per-document language models.
///
/// Keyed by document identity; safe to share across worker threads.
#[derive(Debug, Default)]
pub struct LanguageModels {
    models: Mutex<AHashMap<DocKey, DocModels>>,
}

impl LanguageModels {
    /// Create an empty side table.
    pub fn new() -> Self {
        LanguageModels::default()
    }

    /// The document's own language model, computed once per identity.
    pub fn original_language_model(
        &self,
        document: &Document,
        scorer: &dyn DocScorer,
    ) -> TermVector {
        let key = document.key();
        if let Some(lm) = self
            .models
            .lock()
            .get(&key)
            .and_then(|models| models.original.clone())
        {
            return lm;
        }
        let lm = original_language_model(document, scorer);
        self.models.lock().entry(key).or_default().original = Some(lm.clone());
        lm
    }

    /// The document's expansion language model, computed once per identity.
    pub fn expansion_language_model(
        &self,
        document: &Document,
        scorer: &ExpansionDocScorer,
        included_terms: Option<&BTreeSet<String>>,
    ) -> TermVector {
        let key = document.key();
        if let Some(lm) = self
            .models
            .lock()
            .get(&key)
            .and_then(|models| models.expansion.clone())
        {
            return lm;
        }
        let lm = expansion_language_model(document, scorer, included_terms);
        self.models.lock().entry(key).or_default().expansion = Some(lm.clone());
        lm
    }

    /// Number of documents with at least one memoized model.
    pub fn len(&self) -> usize {
        self.models.lock().len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.models.lock().is_empty()
    }

    /// Drop all memoized models.
    pub fn clear(&self) {
        self.models.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::expansion::RetrievalExpander;
    use crate::index::SearchIndex;
    use crate::index::memory::MemoryIndex;
    use crate::scoring::dirichlet::DirichletScorer;

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
    fn test_original_lm_covers_document_terms() {
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let scorer = DirichletScorer::with_mu(0.0, index.clone());

        let lm = original_language_model(&doc, &scorer);
        assert_eq!(lm.num_terms(), doc.vector().unwrap().num_terms());
        // mu = 0: pure maximum likelihood, so the model is a distribution.
        assert!((lm.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_expansion_lm_covers_expansion_vocabulary() {
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let expander = Arc::new(RetrievalExpander::new(index));
        let scorer = ExpansionDocScorer::with_num_docs(expander, 3);

        let lm = expansion_language_model(&doc, &scorer, None);
        assert!(!lm.is_empty());
        // Expansion terms the document itself lacks still get mass.
        assert!(lm.weight("forest") > 0.0);
    }

    #[test]
    fn test_expansion_lm_included_terms_restrict_vocabulary() {
        let index = sample_index();
        let doc = document_from(&index, "doc1");
        let expander = Arc::new(RetrievalExpander::new(index));
        let scorer = ExpansionDocScorer::with_num_docs(expander, 3);

        let included: BTreeSet<String> =
            ["fox".to_string(), "dog".to_string()].into_iter().collect();
        let lm = expansion_language_model(&doc, &scorer, Some(&included));
        assert_eq!(lm.num_terms(), 2);
        assert!(lm.contains("fox"));
    }

    #[test]
    fn test_combined_identity_and_endpoints() {
        let lm1 = TermVector::from_pairs(vec![("a", 0.7), ("b", 0.3)]);
        let lm2 = TermVector::from_pairs(vec![("b", 0.4), ("c", 0.6)]);

        // Identical inputs are a fixed point for any weight.
        for w in [0.0, 0.3, 1.0] {
            assert_eq!(combined_language_model(&lm1, &lm1, w), lm1);
        }
        assert_eq!(combined_language_model(&lm1, &lm2, 1.0), lm1);
        assert_eq!(combined_language_model(&lm1, &lm2, 0.0), lm2);
    }

    #[test]
    fn test_combined_mixes_union_vocabulary() {
        let lm1 = TermVector::from_pairs(vec![("a", 0.8), ("b", 0.2)]);
        let lm2 = TermVector::from_pairs(vec![("b", 0.5), ("c", 0.5)]);

        let combined = combined_language_model(&lm1, &lm2, 0.5);
        assert!((combined.weight("a") - 0.4).abs() < 1e-12);
        assert!((combined.weight("b") - 0.35).abs() < 1e-12);
        assert!((combined.weight("c") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_side_table_memoizes_by_identity() {
        struct CountingScorer {
            calls: AtomicUsize,
        }
        impl DocScorer for CountingScorer {
            fn score_term(&self, _term: &str, _document: &Document) -> f64 {
                self.calls.fetch_add(1, Ordering::SeqCst);
                0.5
            }
        }

        let models = LanguageModels::new();
        let scorer = CountingScorer {
            calls: AtomicUsize::new(0),
        };
        let doc =
            Document::new("doc1").with_vector(TermVector::from_pairs(vec![("a", 1.0), ("b", 2.0)]));

        let first = models.original_language_model(&doc, &scorer);
        let calls_after_first = scorer.calls.load(Ordering::SeqCst);
        let second = models.original_language_model(&doc, &scorer);

        assert_eq!(first, second);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), calls_after_first);
        assert_eq!(models.len(), 1);
    }

    #[test]
    fn test_sweep_reuses_memoized_models() {
        let index = sample_index();
        let doc = document_from(&index, "doc2");
        let expander = Arc::new(RetrievalExpander::new(index.clone()));
        let exp_scorer = ExpansionDocScorer::with_num_docs(expander, 3);
        let orig_scorer = DirichletScorer::new(index);

        let models = LanguageModels::new();
        let original = models.original_language_model(&doc, &orig_scorer);
        let expansion = models.expansion_language_model(&doc, &exp_scorer, None);

        // The per-weight step never touches the index again; it only mixes
        // the two memoized models.
        for combination in crate::lm::weights(2) {
            let combined = combined_language_model(&original, &expansion, combination[0]);
            if combination[0] == 1.0 {
                assert_eq!(combined, original);
            }
            if combination[0] == 0.0 {
                assert_eq!(combined, expansion);
            }
        }
    }
}
