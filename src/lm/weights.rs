//! Interpolation-weight enumeration for parameter sweeps.

/// Every combination of `n` non-negative interpolation weights, each a
/// multiple of 0.1, summing to exactly 1.0.
///
/// The enumeration runs on integers (ordered compositions of 10 into `n`
/// parts) and divides by 10 only at the end, so no floating-point
/// accumulation drift can produce sums of 0.999... or 1.001. The number of
/// combinations is C(n+9, n-1).
pub fn weights(n: usize) -> Vec<Vec<f64>> {
    if n == 0 {
        return Vec::new();
    }
    compositions(n, 10)
        .into_iter()
        .map(|combination| combination.into_iter().map(|x| x as f64 / 10.0).collect())
        .collect()
}

/// Sum a weight combination without floating-point drift.
///
/// Adding tenth-multiples left to right can land on 0.999... for some
/// orderings; accumulating smallest-first keeps every partial sum exactly
/// representable, so a full combination from [`weights`] sums to exactly
/// 1.0.
pub fn weight_sum(combination: &[f64]) -> f64 {
    let mut sorted = combination.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.into_iter().sum()
}

/// All ordered ways to write `total` as a sum of `n` non-negative integers.
///
/// The first slot takes each value in `0..=total` and the remainder
/// recurses; the final slot absorbs whatever mass is left.
fn compositions(n: usize, total: u32) -> Vec<Vec<u32>> {
    if n == 1 {
        return vec![vec![total]];
    }
    let mut combinations = Vec::new();
    for x in 0..=total {
        for mut rest in compositions(n - 1, total - x) {
            let mut combination = Vec::with_capacity(n);
            combination.push(x);
            combination.append(&mut rest);
            combinations.push(combination);
        }
    }
    combinations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binomial(n: u64, k: u64) -> u64 {
        let k = k.min(n - k);
        let mut result = 1u64;
        for i in 0..k {
            result = result * (n - i) / (i + 1);
        }
        result
    }

    #[test]
    fn test_counts_match_stars_and_bars() {
        for n in 1..=3 {
            let count = weights(n).len() as u64;
            assert_eq!(count, binomial(n as u64 + 9, n as u64 - 1), "n = {n}");
        }
        assert_eq!(weights(2).len(), 11);
    }

    #[test]
    fn test_each_combination_sums_to_exactly_one() {
        for n in 1..=3 {
            for combination in weights(n) {
                assert_eq!(weight_sum(&combination), 1.0, "combination {combination:?}");
            }
        }
    }

    #[test]
    fn test_integer_mass_is_exactly_ten() {
        for combination in weights(3) {
            let tenths: i64 = combination.iter().map(|w| (w * 10.0).round() as i64).sum();
            assert_eq!(tenths, 10);
        }
    }

    #[test]
    fn test_all_values_are_tenth_multiples() {
        for combination in weights(3) {
            for value in combination {
                let tenths = value * 10.0;
                assert_eq!(tenths, tenths.round());
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_two_way_weights_are_ordered_grid() {
        let combinations = weights(2);
        assert_eq!(combinations.first().unwrap(), &vec![0.0, 1.0]);
        assert_eq!(combinations.last().unwrap(), &vec![1.0, 0.0]);
    }

    #[test]
    fn test_combinations_are_unique() {
        let combinations = weights(3);
        let mut seen = std::collections::HashSet::new();
        for combination in &combinations {
            let key: Vec<i64> = combination.iter().map(|w| (w * 10.0).round() as i64).collect();
            assert!(seen.insert(key), "duplicate combination {combination:?}");
        }
    }

    #[test]
    fn test_zero_length_request() {
        assert!(weights(0).is_empty());
    }
}
