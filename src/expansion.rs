//! Document expansion.
//!
//! An expander turns a document into an ordered set of related documents
//! by building a pseudo-query from the document's own terms and running it
//! against an expansion index. Retrieval is the expensive step, so results
//! are cached per document identity with single-flight semantics, and
//! smaller requests are served by cropping the cached list.
//!
//! Four variants cover the ways expansion sets come to exist:
//!
//! - [`RetrievalExpander`]: frequency-based pseudo-query, live retrieval.
//! - [`QueryDependentExpander`]: blends the current query into the
//!   pseudo-query before retrieval.
//! - [`PreExpandedExpander`]: expansion sets supplied up front (e.g. from
//!   a precomputed neighbor file), no retrieval at all.
//! - [`PremadePseudoQueryExpander`]: pseudo-queries supplied up front,
//!   retrieval still live.

pub mod expander;
pub mod pre_expanded;
pub mod premade;
pub mod query_dependent;

pub use expander::{DocumentExpander, RetrievalExpander};
pub use pre_expanded::PreExpandedExpander;
pub use premade::PremadePseudoQueryExpander;
pub use query_dependent::QueryDependentExpander;

/// Default number of pseudo-query terms.
pub const DEFAULT_NUM_TERMS: usize = 20;

/// Default retrieval cutoff floor for cached expansion sets.
///
/// The first retrieval for a document fetches at least this many hits so
/// that later requests for larger (but still modest) cutoffs are served
/// from the cache instead of re-querying.
pub const DEFAULT_MAX_NUM_DOCS: usize = 50;
