//! Dirichlet-smoothed language-model scoring.

use std::sync::Arc;

use crate::document::Document;
use crate::index::CollectionStats;
use crate::scoring::DocScorer;

/// Default Dirichlet smoothing parameter.
pub const DEFAULT_MU: f64 = 2500.0;

/// Dirichlet-smoothed term probability:
///
/// `P(t|d) = (tf(t,d) + mu * P(t|C)) / (|d| + mu)`
///
/// With `mu = 0` this degenerates to the maximum-likelihood estimate.
/// An empty document with `mu = 0` scores 0.0 rather than NaN.
pub fn dirichlet_probability(
    term: &str,
    document: &Document,
    mu: f64,
    stats: &dyn CollectionStats,
) -> f64 {
    let (tf, doc_len) = match document.vector() {
        Some(vector) => (vector.weight(term), vector.length()),
        None => (0.0, 0.0),
    };
    let denom = doc_len + mu;
    if denom <= 0.0 {
        return 0.0;
    }
    (tf + mu * stats.collection_probability(term)) / denom
}

/// A [`DocScorer`] computing Dirichlet-smoothed term probabilities against
/// a fixed statistics source.
pub struct DirichletScorer {
    mu: f64,
    stats: Arc<dyn CollectionStats>,
}

impl DirichletScorer {
    /// Create a scorer with the default `mu` of 2500.
    pub fn new(stats: Arc<dyn CollectionStats>) -> Self {
        DirichletScorer::with_mu(DEFAULT_MU, stats)
    }

    /// Create a scorer with a custom `mu`.
    pub fn with_mu(mu: f64, stats: Arc<dyn CollectionStats>) -> Self {
        DirichletScorer { mu, stats }
    }

    /// The smoothing parameter.
    pub fn mu(&self) -> f64 {
        self.mu
    }
}

impl DocScorer for DirichletScorer {
    fn score_term(&self, term: &str, document: &Document) -> f64 {
        dirichlet_probability(term, document, self.mu, self.stats.as_ref())
    }
}
