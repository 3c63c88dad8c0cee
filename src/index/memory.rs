//! In-memory query-likelihood index.
//!
//! A deliberately small [`SearchIndex`] implementation holding every
//! feature vector in memory and scoring queries with Dirichlet-smoothed
//! query likelihood. It exists for tests and the demo binary; production
//! deployments put a real engine behind the same trait.

use ahash::AHashMap;

use crate::document::Document;
use crate::error::{DocexError, Result};
use crate::index::{CollectionStats, SearchIndex};
use crate::vector::TermVector;

/// Default Dirichlet smoothing parameter for query-likelihood ranking.
pub const DEFAULT_RANKING_MU: f64 = 2500.0;

/// An in-memory document collection with query-likelihood retrieval.
///
/// Internal ids are assigned sequentially starting at 1; 0 stays reserved
/// for "unassigned" handles.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docnos: Vec<String>,
    vectors: Vec<TermVector>,
    docno_to_id: AHashMap<String, u64>,
    doc_freqs: AHashMap<String, u64>,
    term_counts: AHashMap<String, f64>,
    total_terms: f64,
    mu: f64,
}

impl MemoryIndex {
    /// Create an empty index with the default ranking smoothing.
    pub fn new() -> Self {
        MemoryIndex {
            mu: DEFAULT_RANKING_MU,
            ..MemoryIndex::default()
        }
    }

    /// Create an empty index with a custom ranking smoothing parameter.
    pub fn with_mu(mu: f64) -> Self {
        MemoryIndex {
            mu,
            ..MemoryIndex::default()
        }
    }

    /// Add a document from raw text, tokenizing on non-alphanumeric
    /// characters and lowercasing. Returns the assigned internal id.
    pub fn add_document<S: Into<String>>(&mut self, docno: S, text: &str) -> u64 {
        let mut vector = TermVector::new();
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            vector.add_weight(token.to_lowercase(), 1.0);
        }
        self.add_vector(docno, vector)
    }

    /// Add a document from a prebuilt frequency vector. Returns the
    /// assigned internal id.
    pub fn add_vector<S: Into<String>>(&mut self, docno: S, vector: TermVector) -> u64 {
        let docno = docno.into();
        for (term, weight) in vector.iter() {
            *self.doc_freqs.entry(term.to_string()).or_insert(0) += 1;
            *self.term_counts.entry(term.to_string()).or_insert(0.0) += weight;
            self.total_terms += weight;
        }
        self.docnos.push(docno.clone());
        self.vectors.push(vector);
        let doc_id = self.docnos.len() as u64;
        self.docno_to_id.insert(docno, doc_id);
        doc_id
    }

    /// Iterate over all (doc_id, docno) pairs.
    pub fn documents(&self) -> impl Iterator<Item = (u64, &str)> {
        self.docnos
            .iter()
            .enumerate()
            .map(|(i, docno)| ((i + 1) as u64, docno.as_str()))
    }

    /// Dirichlet-smoothed log query likelihood of `vector` given the
    /// document at `idx`.
    fn log_likelihood(&self, query: &TermVector, idx: usize) -> f64 {
        let doc = &self.vectors[idx];
        let doc_len = doc.length();
        let denom = doc_len + self.mu;
        let mut score = 0.0;
        for (term, q_weight) in query.iter() {
            let p = (doc.weight(term) + self.mu * self.collection_probability(term)) / denom;
            if p > 0.0 {
                score += q_weight * p.ln();
            } else {
                // Unsmoothed unseen term: the document cannot generate the
                // query at all.
                return f64::NEG_INFINITY;
            }
        }
        score
    }
}

impl CollectionStats for MemoryIndex {
    fn doc_count(&self) -> u64 {
        self.docnos.len() as u64
    }

    fn doc_frequency(&self, term: &str) -> u64 {
        self.doc_freqs.get(term).copied().unwrap_or(0)
    }

    fn term_count(&self, term: &str) -> f64 {
        self.term_counts.get(term).copied().unwrap_or(0.0)
    }

    fn total_terms(&self) -> f64 {
        self.total_terms
    }
}

impl SearchIndex for MemoryIndex {
    fn run_query(&self, query: &TermVector, cutoff: usize) -> Result<Vec<Document>> {
        if query.is_empty() || cutoff == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f64)> = (0..self.vectors.len())
            .map(|idx| (idx, self.log_likelihood(query, idx)))
            .filter(|(_, score)| score.is_finite())
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(cutoff);

        Ok(scored
            .into_iter()
            .map(|(idx, score)| {
                let mut doc = Document::new(self.docnos[idx].clone());
                doc.set_doc_id((idx + 1) as u64);
                doc.set_vector(self.vectors[idx].clone());
                doc.set_score(score);
                doc
            })
            .collect())
    }

    fn feature_vector(&self, doc_id: u64) -> Result<TermVector> {
        let idx = doc_id
            .checked_sub(1)
            .map(|i| i as usize)
            .filter(|i| *i < self.vectors.len())
            .ok_or_else(|| DocexError::index(format!("unknown doc id {doc_id}")))?;
        Ok(self.vectors[idx].clone())
    }

    fn doc_id(&self, docno: &str) -> Option<u64> {
        self.docno_to_id.get(docno).copied()
    }

    fn docno(&self, doc_id: u64) -> Option<String> {
        doc_id
            .checked_sub(1)
            .map(|i| i as usize)
            .filter(|i| *i < self.docnos.len())
            .map(|i| self.docnos[i].clone())
    }
}
