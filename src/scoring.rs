//! Term-level document scoring.
//!
//! Everything that assigns a probability-like score to a (term, document)
//! pair implements the [`DocScorer`] capability. Scorers compose: the
//! Dirichlet scorer smooths a single document's term frequencies, the
//! cached scorer memoizes any scorer, the expansion scorer aggregates
//! Dirichlet scores across a document's expansion set under a prior, and
//! the interpolated scorer blends several scorers by weight.

pub mod cached;
pub mod dirichlet;
pub mod expansion;
pub mod interpolated;
pub mod prior;

pub use cached::CachedDocScorer;
pub use dirichlet::DirichletScorer;
pub use expansion::ExpansionDocScorer;
pub use interpolated::InterpolatedDocScorer;
pub use prior::PriorKind;

use crate::document::Document;

/// Capability of scoring a term against a document.
pub trait DocScorer: Send + Sync {
    /// The score (usually a smoothed probability) of `term` in `document`.
    fn score_term(&self, term: &str, document: &Document) -> f64;
}
