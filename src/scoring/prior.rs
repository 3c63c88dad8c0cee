//! Document priors over an expansion set.
//!
//! A prior is a per-document weight (not term-specific) applied before
//! summing term contributions across an expansion set. The strategies here
//! are configuration, not subclasses: pick a [`PriorKind`] and call
//! [`compute_priors`].

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Strategy for turning stored retrieval scores into document priors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorKind {
    /// Softmax-normalize the stored scores so priors sum to 1.0.
    ///
    /// Retrieval engines report log-likelihoods, so exponentiation recovers
    /// relative probabilities; the maximum score is subtracted first for
    /// numerical stability.
    #[default]
    Softmax,
    /// Use each document's stored retrieval score directly as its prior.
    StoredScore,
    /// Use the document's current score field as-is, logging each value.
    Passthrough,
}

/// Compute one prior per document, aligned with `documents`.
///
/// An empty slice yields an empty vector; no division by zero occurs.
pub fn compute_priors(kind: PriorKind, documents: &[Document]) -> Vec<f64> {
    match kind {
        PriorKind::Softmax => softmax_priors(documents),
        PriorKind::StoredScore => documents.iter().map(|d| d.score()).collect(),
        PriorKind::Passthrough => documents
            .iter()
            .map(|d| {
                log::debug!("prior score of document ({}): {}", d.docno(), d.score());
                d.score()
            })
            .collect(),
    }
}

fn softmax_priors(documents: &[Document]) -> Vec<f64> {
    if documents.is_empty() {
        return Vec::new();
    }

    let max_score = documents
        .iter()
        .map(|d| d.score())
        .fold(f64::NEG_INFINITY, f64::max);

    let mut priors: Vec<f64> = documents
        .iter()
        .map(|d| (d.score() - max_score).exp())
        .collect();

    let sum: f64 = priors.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        for prior in &mut priors {
            *prior /= sum;
        }
    } else {
        // Degenerate scores (all -inf, NaN): fall back to uniform.
        let uniform = 1.0 / documents.len() as f64;
        for prior in &mut priors {
            *prior = uniform;
        }
    }
    priors
}
