//! Pre-expanded document expansion.
//!
//! Expansion sets computed offline (e.g. a nearest-neighbor file) are
//! supplied up front and looked up by document identity; no retrieval
//! happens at expansion time. A missing identity logs a warning and yields
//! an empty set rather than failing the batch.

use std::sync::Arc;

use ahash::AHashMap;

use crate::document::{DocKey, Document};
use crate::expansion::DEFAULT_NUM_TERMS;
use crate::expansion::expander::{DocumentExpander, frequency_pseudo_query};
use crate::index::SearchIndex;
use crate::stop::StopList;
use crate::vector::TermVector;

/// A document expander backed by precomputed expansion sets.
pub struct PreExpandedExpander {
    index: Arc<dyn SearchIndex>,
    num_terms: usize,
    stoplist: Option<StopList>,
    sets: AHashMap<DocKey, Vec<Document>>,
}

impl PreExpandedExpander {
    /// Create an expander over precomputed sets keyed by identity.
    pub fn new(index: Arc<dyn SearchIndex>, sets: AHashMap<DocKey, Vec<Document>>) -> Self {
        PreExpandedExpander {
            index,
            num_terms: DEFAULT_NUM_TERMS,
            stoplist: None,
            sets,
        }
    }

    /// Create an expander from docno-keyed neighbor lists, optionally
    /// capping each list at `max_neighbors`.
    pub fn from_neighbors(
        index: Arc<dyn SearchIndex>,
        neighbors: AHashMap<String, Vec<Document>>,
        max_neighbors: Option<usize>,
    ) -> Self {
        let sets = neighbors
            .into_iter()
            .map(|(docno, mut docs)| {
                if let Some(cap) = max_neighbors {
                    docs.truncate(cap);
                }
                (DocKey::Docno(docno), docs)
            })
            .collect();
        PreExpandedExpander::new(index, sets)
    }

    /// Number of documents with a supplied expansion set.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether any expansion sets were supplied.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl DocumentExpander for PreExpandedExpander {
    fn expand(&self, document: &Document, num_docs: usize) -> Vec<Document> {
        if num_docs == 0 {
            return Vec::new();
        }
        match self.sets.get(&document.key()) {
            Some(docs) => docs.iter().take(num_docs).cloned().collect(),
            None => {
                log::warn!("no expansion docs for {}", document.docno());
                Vec::new()
            }
        }
    }

    fn pseudo_query(&self, document: &Document) -> TermVector {
        frequency_pseudo_query(document, self.stoplist.as_ref(), self.num_terms)
    }

    fn index(&self) -> Arc<dyn SearchIndex> {
        Arc::clone(&self.index)
    }
}
