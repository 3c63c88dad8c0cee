//! # docexp
//!
//! Pseudo-relevance-feedback document expansion for information retrieval.
//!
//! Given a document and a separate expansion index, docexp retrieves
//! semantically related documents via a pseudo-query, builds a language
//! model from them, and blends it with the document's own model to produce
//! an improved term-weight vector for re-scoring or query reformulation.
//!
//! ## Features
//!
//! - Pseudo-query construction and single-flight cached retrieval of
//!   expansion documents
//! - Dirichlet-smoothed term scoring with configurable document priors
//! - Original, expansion, and combined language-model estimation with
//!   per-document memoization
//! - Drift-free enumeration of interpolation weights for parameter sweeps
//! - Vocabulary alignment and KL / Jensen-Shannon comparison of models
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use docexp::expansion::RetrievalExpander;
//! use docexp::index::SearchIndex;
//! use docexp::index::memory::MemoryIndex;
//! use docexp::lm::{LanguageModels, combined_language_model};
//! use docexp::prelude::*;
//! use docexp::scoring::{DirichletScorer, ExpansionDocScorer};
//!
//! let mut index = MemoryIndex::new();
//! index.add_document("doc1", "quick brown fox and lazy dog");
//! index.add_document("doc2", "quick red fox in the forest");
//! index.add_document("doc3", "stock markets fell in early trading");
//! let index = Arc::new(index);
//!
//! let doc_id = index.doc_id("doc1").unwrap();
//! let mut doc = Document::new("doc1");
//! doc.set_doc_id(doc_id);
//! doc.set_vector(index.feature_vector(doc_id).unwrap());
//!
//! let expander = Arc::new(RetrievalExpander::new(index.clone()));
//! let scorer = ExpansionDocScorer::with_num_docs(expander, 2);
//!
//! let models = LanguageModels::new();
//! let original = models.original_language_model(&doc, &DirichletScorer::new(index));
//! let expansion = models.expansion_language_model(&doc, &scorer, None);
//! let improved = combined_language_model(&original, &expansion, 0.7);
//! assert!(!improved.is_empty());
//! ```

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod expansion;
pub mod index;
pub mod input;
pub mod lm;
pub mod scoring;
pub mod stop;
pub mod util;
pub mod vector;

pub mod prelude {
    //! Commonly used types, re-exported.
    pub use crate::config::ExpansionConfig;
    pub use crate::document::{DocKey, Document};
    pub use crate::error::{DocexError, Result};
    pub use crate::expansion::DocumentExpander;
    pub use crate::scoring::DocScorer;
    pub use crate::stop::StopList;
    pub use crate::vector::TermVector;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
