//! Sparse term-weight vectors.
//!
//! A [`TermVector`] is a sparse mapping from term to non-negative weight.
//! The same type represents raw frequency counts, pseudo-queries, and
//! normalized language models; callers track which interpretation applies.
//! Cloning a vector is the deep copy required before any in-place mutation
//! (stopping, clipping, normalizing) that must not leak back to the source.

use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::stop::StopList;

/// A sparse term-to-weight mapping.
///
/// Weights are finite and non-negative. Lookup of an absent term yields 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: AHashMap<String, f64>,
}

impl TermVector {
    /// Create an empty term vector.
    pub fn new() -> Self {
        TermVector {
            weights: AHashMap::new(),
        }
    }

    /// Build a vector from (term, weight) pairs. Duplicate terms accumulate.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut vector = TermVector::new();
        for (term, weight) in pairs {
            vector.add_weight(term.into(), weight);
        }
        vector
    }

    /// Get the weight of a term, or 0.0 if absent.
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    /// Set the weight of a term, replacing any existing weight.
    pub fn set_weight<S: Into<String>>(&mut self, term: S, weight: f64) {
        self.weights.insert(term.into(), weight);
    }

    /// Add to the weight of a term (inserting it if absent).
    pub fn add_weight<S: Into<String>>(&mut self, term: S, weight: f64) {
        *self.weights.entry(term.into()).or_insert(0.0) += weight;
    }

    /// Remove a term from the vector.
    pub fn remove(&mut self, term: &str) -> Option<f64> {
        self.weights.remove(term)
    }

    /// Whether the vector contains a term.
    pub fn contains(&self, term: &str) -> bool {
        self.weights.contains_key(term)
    }

    /// Number of distinct terms.
    pub fn num_terms(&self) -> usize {
        self.weights.len()
    }

    /// Whether the vector has no terms.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights. For a raw-count vector this is the document length.
    pub fn length(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Iterate over the terms.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(|t| t.as_str())
    }

    /// Iterate over (term, weight) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }

    /// The set of terms, sorted.
    pub fn term_set(&self) -> BTreeSet<String> {
        self.weights.keys().cloned().collect()
    }

    /// Remove all stopwords from the vector.
    pub fn apply_stoplist(&mut self, stoplist: &StopList) {
        self.weights.retain(|term, _| !stoplist.contains(term));
    }

    /// Keep only the `k` highest-weighted terms.
    ///
    /// Ties are broken by term order so that clipping is deterministic.
    pub fn clip(&mut self, k: usize) {
        if self.weights.len() <= k {
            return;
        }
        let mut ranked: Vec<(String, f64)> = self.weights.drain().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(k);
        self.weights = ranked.into_iter().collect();
    }

    /// The `k` highest-weighted terms with their weights, best first.
    pub fn top_terms(&self, k: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> =
            self.weights.iter().map(|(t, w)| (t.clone(), *w)).collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(k);
        ranked
    }

    /// Scale weights so they sum to 1.0. A zero or empty vector is unchanged.
    pub fn normalize(&mut self) {
        let total = self.length();
        if total > 0.0 {
            for weight in self.weights.values_mut() {
                *weight /= total;
            }
        }
    }

    /// Linear interpolation of two vectors over their union vocabulary:
    /// `a_weight * a[t] + (1 - a_weight) * b[t]`, with absent terms
    /// contributing 0.
    pub fn interpolate(a: &TermVector, b: &TermVector, a_weight: f64) -> TermVector {
        let mut combined = TermVector::new();
        for (term, weight) in a.iter() {
            combined.add_weight(term, a_weight * weight);
        }
        for (term, weight) in b.iter() {
            combined.add_weight(term, (1.0 - a_weight) * weight);
        }
        combined
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TermVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        TermVector::from_pairs(iter)
    }
}
