//! Expansion pipeline configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expansion::{DEFAULT_MAX_NUM_DOCS, DEFAULT_NUM_TERMS};
use crate::scoring::dirichlet::DEFAULT_MU;
use crate::scoring::expansion::DEFAULT_EXPANSION_DOCS;
use crate::scoring::prior::PriorKind;

/// Parameters of an expansion run, loadable from JSON.
///
/// Every field has a default, so a partial configuration file (or none at
/// all) is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Number of top terms kept in a frequency-based pseudo-query.
    pub num_terms: usize,
    /// Number of expansion documents consulted per term score.
    pub num_docs: usize,
    /// Retrieval cutoff floor for cached expansion sets.
    pub max_num_docs: usize,
    /// Dirichlet smoothing parameter.
    pub mu: f64,
    /// Prior strategy over expansion documents.
    pub prior: PriorKind,
    /// Optional stopword file (one word per line).
    pub stoplist_path: Option<PathBuf>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        ExpansionConfig {
            num_terms: DEFAULT_NUM_TERMS,
            num_docs: DEFAULT_EXPANSION_DOCS,
            max_num_docs: DEFAULT_MAX_NUM_DOCS,
            mu: DEFAULT_MU,
            prior: PriorKind::default(),
            stoplist_path: None,
        }
    }
}

impl ExpansionConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
