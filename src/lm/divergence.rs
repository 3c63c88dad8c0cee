//! Vocabulary alignment and distribution comparison.
//!
//! Two sparse language models can only be compared once they are projected
//! onto one shared vocabulary. [`vocabulary`] builds the sorted union of
//! term sets; [`probability_vector`] projects a sparse model onto it as a
//! dense, index-aligned array. The divergence functions then work over
//! aligned arrays.

use crate::vector::TermVector;

/// The sorted, deduplicated union of terms across the given vectors.
pub fn vocabulary<'a, I>(vectors: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a TermVector>,
{
    let mut terms: Vec<String> = vectors
        .into_iter()
        .flat_map(|vector| vector.terms().map(|t| t.to_string()))
        .collect();
    terms.sort();
    terms.dedup();
    terms
}

/// Project a sparse model onto a sorted vocabulary as a dense array.
///
/// Positions absent from the model are zero. A term of the model missing
/// from the vocabulary is a data-integrity problem in the caller's
/// vocabulary construction; it is logged and skipped so the comparison can
/// continue.
pub fn probability_vector(lm: &TermVector, vocabulary: &[String]) -> Vec<f64> {
    let mut probabilities = vec![0.0; vocabulary.len()];
    for (term, weight) in lm.iter() {
        match vocabulary.binary_search_by(|v| v.as_str().cmp(term)) {
            Ok(i) => probabilities[i] = weight,
            Err(_) => {
                log::warn!("term {term} is not in the vocabulary; skipping");
            }
        }
    }
    probabilities
}

/// Kullback-Leibler divergence `KL(p || q)` over aligned distributions,
/// in nats.
///
/// Positions where `p` is zero contribute nothing; a position where `p` is
/// positive but `q` is zero makes the divergence infinite.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> f64 {
    let mut divergence = 0.0;
    for (&pi, &qi) in p.iter().zip(q.iter()) {
        if pi <= 0.0 {
            continue;
        }
        if qi <= 0.0 {
            return f64::INFINITY;
        }
        divergence += pi * (pi / qi).ln();
    }
    divergence
}

/// Jensen-Shannon divergence over aligned distributions: the mean KL
/// divergence of each distribution from their midpoint. Always finite for
/// valid inputs.
pub fn jensen_shannon(p: &[f64], q: &[f64]) -> f64 {
    let midpoint: Vec<f64> = p
        .iter()
        .zip(q.iter())
        .map(|(&pi, &qi)| 0.5 * (pi + qi))
        .collect();
    0.5 * kl_divergence(p, &midpoint) + 0.5 * kl_divergence(q, &midpoint)
}

/// KL divergence between two sparse language models, aligning them first.
pub fn language_models_kl(lm1: &TermVector, lm2: &TermVector) -> f64 {
    let vocabulary = vocabulary([lm1, lm2]);
    let p = probability_vector(lm1, &vocabulary);
    let q = probability_vector(lm2, &vocabulary);
    kl_divergence(&p, &q)
}

/// Jensen-Shannon divergence between two sparse language models.
pub fn language_models_js(lm1: &TermVector, lm2: &TermVector) -> f64 {
    let vocabulary = vocabulary([lm1, lm2]);
    let p = probability_vector(lm1, &vocabulary);
    let q = probability_vector(lm2, &vocabulary);
    jensen_shannon(&p, &q)
}

/// Perplexity of a language model over a sample of text.
///
/// `sample` holds term frequencies; `model` holds probabilities. Sample
/// terms the model assigns zero probability make the perplexity infinite.
/// An empty sample has perplexity 1 (zero cross-entropy).
pub fn perplexity(sample: &TermVector, model: &TermVector) -> f64 {
    let sample_length = sample.length();
    if sample_length <= 0.0 {
        return 1.0;
    }

    let mut log_likelihood = 0.0;
    for (term, frequency) in sample.iter() {
        let p = model.weight(term);
        if p <= 0.0 {
            return f64::INFINITY;
        }
        log_likelihood += frequency * p.log2();
    }

    let cross_entropy = -log_likelihood / sample_length;
    cross_entropy.exp2()
}
