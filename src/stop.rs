//! Stopword lists.

use std::fs;
use std::path::Path;

use ahash::AHashSet;

use crate::error::Result;

/// A set of stopwords to drop from pseudo-queries and feature vectors.
#[derive(Debug, Clone, Default)]
pub struct StopList {
    words: AHashSet<String>,
}

impl StopList {
    /// Create an empty stoplist.
    pub fn new() -> Self {
        StopList {
            words: AHashSet::new(),
        }
    }

    /// Build a stoplist from an iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopList {
            words: words.into_iter().map(|w| w.into()).collect(),
        }
    }

    /// Load a stoplist from a file with one word per line.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let words = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.to_string())
            .collect();
        Ok(StopList { words })
    }

    /// Whether the given term is a stopword.
    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    /// Number of stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the stoplist is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_from_words() {
        let stoplist = StopList::from_words(["the", "of", "and"]);
        assert_eq!(stoplist.len(), 3);
        assert!(stoplist.contains("the"));
        assert!(!stoplist.contains("apple"));
    }

    #[test]
    fn test_from_file_skips_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "the").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "of").unwrap();
        file.flush().unwrap();

        let stoplist = StopList::from_file(file.path()).unwrap();
        assert_eq!(stoplist.len(), 2);
        assert!(stoplist.contains("of"));
        assert!(!stoplist.contains("# comment"));
    }
}
