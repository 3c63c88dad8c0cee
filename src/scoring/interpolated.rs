//! Weighted blending of several scorers.

use crate::document::Document;
use crate::scoring::DocScorer;

/// A [`DocScorer`] that blends component scorers linearly:
/// `score(t, d) = sum_i weight_i * scorer_i(t, d)`.
///
/// Used by relevance-model consumers to mix an original-document scorer
/// with one or more expansion scorers without re-touching the index.
pub struct InterpolatedDocScorer {
    components: Vec<(Box<dyn DocScorer>, f64)>,
}

impl InterpolatedDocScorer {
    /// Create an empty interpolation.
    pub fn new() -> Self {
        InterpolatedDocScorer {
            components: Vec::new(),
        }
    }

    /// Add a scorer with its interpolation weight.
    pub fn add(mut self, scorer: Box<dyn DocScorer>, weight: f64) -> Self {
        self.components.push((scorer, weight));
        self
    }

    /// Number of component scorers.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether there are no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Default for InterpolatedDocScorer {
    fn default() -> Self {
        InterpolatedDocScorer::new()
    }
}

impl DocScorer for InterpolatedDocScorer {
    fn score_term(&self, term: &str, document: &Document) -> f64 {
        self.components
            .iter()
            .map(|(scorer, weight)| weight * scorer.score_term(term, document))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstScorer(f64);

    impl DocScorer for ConstScorer {
        fn score_term(&self, _term: &str, _document: &Document) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_interpolation_is_weighted_sum() {
        let scorer = InterpolatedDocScorer::new()
            .add(Box::new(ConstScorer(0.4)), 0.75)
            .add(Box::new(ConstScorer(0.8)), 0.25);

        let doc = Document::new("doc1");
        let score = scorer.score_term("t", &doc);
        assert!((score - (0.75 * 0.4 + 0.25 * 0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_interpolation_scores_zero() {
        let scorer = InterpolatedDocScorer::new();
        assert_eq!(scorer.score_term("t", &Document::new("d")), 0.0);
    }
}
