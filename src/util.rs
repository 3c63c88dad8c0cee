//! Sampling utilities.
//!
//! Weighted term sampling is used to build randomized pseudo-queries for
//! robustness experiments: instead of always taking the top terms, draw
//! terms with probability proportional to their weight.

use std::collections::BTreeSet;

use ahash::AHashSet;
use rand::Rng;

use crate::stop::StopList;
use crate::vector::TermVector;

/// Draw one term from a weighted vector, with probability proportional to
/// its weight. Returns `None` for an empty or zero-mass vector.
pub fn weighted_sample<R: Rng>(rng: &mut R, weighted: &TermVector) -> Option<String> {
    let total = weighted.length();
    if weighted.is_empty() || total <= 0.0 {
        return None;
    }

    let target = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last = None;
    for (term, weight) in weighted.iter() {
        cumulative += weight;
        last = Some(term);
        if cumulative > target {
            return Some(term.to_string());
        }
    }
    // Rounding can leave the target just past the final cumulative sum.
    last.map(|term| term.to_string())
}

/// Sample up to `count` distinct terms from a vector, weight-proportional
/// and without replacement. Stopwords and excluded terms are never drawn.
pub fn sample_terms<R: Rng>(
    rng: &mut R,
    count: usize,
    vector: &TermVector,
    stoplist: Option<&StopList>,
    exclude: &AHashSet<String>,
) -> BTreeSet<String> {
    let mut pool = vector.clone();
    if let Some(stoplist) = stoplist {
        pool.apply_stoplist(stoplist);
    }
    for term in exclude {
        pool.remove(term);
    }

    let mut selected = BTreeSet::new();
    let draws = count.min(pool.num_terms());
    for _ in 0..draws {
        let Some(term) = weighted_sample(rng, &pool) else {
            break;
        };
        pool.remove(&term);
        selected.insert(term);
    }
    selected
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_weighted_sample_empty_vector() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(weighted_sample(&mut rng, &TermVector::new()).is_none());
    }

    #[test]
    fn test_weighted_sample_respects_support() {
        let mut rng = StdRng::seed_from_u64(7);
        let vector = TermVector::from_pairs(vec![("only", 2.0)]);
        for _ in 0..10 {
            assert_eq!(weighted_sample(&mut rng, &vector).as_deref(), Some("only"));
        }
    }

    #[test]
    fn test_weighted_sample_favors_heavy_terms() {
        let mut rng = StdRng::seed_from_u64(42);
        let vector = TermVector::from_pairs(vec![("heavy", 99.0), ("light", 1.0)]);

        let mut heavy = 0;
        for _ in 0..200 {
            if weighted_sample(&mut rng, &vector).as_deref() == Some("heavy") {
                heavy += 1;
            }
        }
        assert!(heavy > 150, "heavy drawn {heavy} of 200");
    }

    #[test]
    fn test_sample_terms_without_replacement() {
        let mut rng = StdRng::seed_from_u64(3);
        let vector =
            TermVector::from_pairs(vec![("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0)]);

        let sampled = sample_terms(&mut rng, 3, &vector, None, &AHashSet::new());
        assert_eq!(sampled.len(), 3);
    }

    #[test]
    fn test_sample_terms_respects_stoplist_and_exclusions() {
        let mut rng = StdRng::seed_from_u64(3);
        let vector = TermVector::from_pairs(vec![("the", 10.0), ("fox", 1.0), ("dog", 1.0)]);
        let stoplist = StopList::from_words(["the"]);
        let exclude: AHashSet<String> = ["dog".to_string()].into_iter().collect();

        let sampled = sample_terms(&mut rng, 5, &vector, Some(&stoplist), &exclude);
        assert_eq!(sampled.len(), 1);
        assert!(sampled.contains("fox"));
    }
}
