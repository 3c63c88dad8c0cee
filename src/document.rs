//! Document handles.
//!
//! A [`Document`] is a reference to a retrievable document: its identity
//! (internal id and/or external docno), an optional sparse feature vector,
//! and a mutable score field used during ranking. Equality and hashing are
//! by identity only, so two handles for the same document are cache-compatible
//! regardless of their current score or whether a vector is attached.

use std::hash::{Hash, Hasher};

use crate::vector::TermVector;

/// Identity of a document, used as a cache key.
///
/// External docnos are preferred; handles that only carry an internal id
/// fall back to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocKey {
    /// External collection-assigned document number.
    Docno(String),
    /// Internal index-assigned document id.
    Id(u64),
}

/// A handle to a retrievable document.
#[derive(Debug, Clone)]
pub struct Document {
    doc_id: u64,
    docno: String,
    vector: Option<TermVector>,
    score: f64,
}

impl Document {
    /// Create a handle from an external docno.
    pub fn new<S: Into<String>>(docno: S) -> Self {
        Document {
            doc_id: 0,
            docno: docno.into(),
            vector: None,
            score: 0.0,
        }
    }

    /// Create a handle from an internal document id.
    pub fn with_id(doc_id: u64) -> Self {
        Document {
            doc_id,
            docno: String::new(),
            vector: None,
            score: 0.0,
        }
    }

    /// Internal document id (0 if unassigned).
    pub fn doc_id(&self) -> u64 {
        self.doc_id
    }

    /// Set the internal document id.
    pub fn set_doc_id(&mut self, doc_id: u64) {
        self.doc_id = doc_id;
    }

    /// External docno (empty if unassigned).
    pub fn docno(&self) -> &str {
        &self.docno
    }

    /// Set the external docno.
    pub fn set_docno<S: Into<String>>(&mut self, docno: S) {
        self.docno = docno.into();
    }

    /// The document's identity, used for cache keys and equality.
    pub fn key(&self) -> DocKey {
        if self.docno.is_empty() {
            DocKey::Id(self.doc_id)
        } else {
            DocKey::Docno(self.docno.clone())
        }
    }

    /// The attached feature vector, if any.
    pub fn vector(&self) -> Option<&TermVector> {
        self.vector.as_ref()
    }

    /// Mutable access to the attached feature vector.
    pub fn vector_mut(&mut self) -> Option<&mut TermVector> {
        self.vector.as_mut()
    }

    /// Attach a feature vector.
    pub fn set_vector(&mut self, vector: TermVector) {
        self.vector = Some(vector);
    }

    /// Detach and return the feature vector, releasing its memory hold.
    pub fn take_vector(&mut self) -> Option<TermVector> {
        self.vector.take()
    }

    /// Builder-style: attach a vector.
    pub fn with_vector(mut self, vector: TermVector) -> Self {
        self.vector = Some(vector);
        self
    }

    /// Builder-style: set a score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Current ranking score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Set the ranking score.
    ///
    /// Only the single scoring pass that owns this handle may call this;
    /// score fields are not shared across concurrent writers.
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
