//! Language-model estimation and comparison.
//!
//! The estimator builds three models per document: its own Dirichlet
//! language model, an expansion-only model over the terms of its expansion
//! set, and a weighted combination of the two. Both base models are
//! expensive (the expansion model touches the index once per vocabulary
//! term), so they are memoized per document; a parameter sweep then only
//! pays for the cheap per-weight combination.

pub mod divergence;
pub mod estimator;
pub mod weights;

pub use divergence::{
    jensen_shannon, kl_divergence, language_models_js, language_models_kl, perplexity,
    probability_vector, vocabulary,
};
pub use estimator::{
    LanguageModels, combined_language_model, expansion_language_model, original_language_model,
};
pub use weights::{weight_sum, weights};
