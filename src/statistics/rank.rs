//! Mid-rank assignment over two pooled samples.

/// Rank-sum of the first sample within the pooled ordering, with tie
/// accounting.
#[derive(Debug, Clone, Copy)]
pub struct PooledRanks {
    /// Sum of mid-ranks assigned to elements of the first sample.
    pub rank_sum_first: f64,
    /// Tie term Σ(t³ - t) over tie groups, for the variance correction.
    pub tie_term: f64,
}

/// Pool two samples, assign 1-based mid-ranks, and return the rank sum of
/// the first sample.
///
/// Tied values share the average of the ranks they would occupy (the
/// standard mid-rank convention), and each tie group of size `t`
/// contributes `t³ - t` to the tie term.
///
/// NaN values must have been filtered by the caller; ordering uses
/// `total_cmp`, so a stray NaN would sort last rather than panic.
pub fn pooled_rank_sum(first: &[f64], second: &[f64]) -> PooledRanks {
    let mut pooled: Vec<(f64, bool)> = Vec::with_capacity(first.len() + second.len());
    pooled.extend(first.iter().map(|&v| (v, true)));
    pooled.extend(second.iter().map(|&v| (v, false)));
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut rank_sum_first = 0.0;
    let mut tie_term = 0.0;

    let n = pooled.len();
    let mut i = 0;
    while i < n {
        // Extend the tie group [i, j)
        let mut j = i + 1;
        while j < n && pooled[j].0 == pooled[i].0 {
            j += 1;
        }

        let t = (j - i) as f64;
        // Ranks i+1 ..= j averaged
        let mid_rank = (i + 1 + j) as f64 / 2.0;
        if j - i > 1 {
            tie_term += t * t * t - t;
        }

        for &(_, is_first) in &pooled[i..j] {
            if is_first {
                rank_sum_first += mid_rank;
            }
        }

        i = j;
    }

    PooledRanks {
        rank_sum_first,
        tie_term,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_without_ties() {
        // Pooled sorted: 1 2 3 4 -> first sample {1, 3} gets ranks 1 + 3
        let ranks = pooled_rank_sum(&[1.0, 3.0], &[2.0, 4.0]);
        assert!((ranks.rank_sum_first - 4.0).abs() < 1e-12);
        assert_eq!(ranks.tie_term, 0.0);
    }

    #[test]
    fn tied_values_share_mid_rank() {
        // Pooled sorted: 1 2 2 3; the two 2s each get rank 2.5
        let ranks = pooled_rank_sum(&[2.0, 3.0], &[1.0, 2.0]);
        assert!((ranks.rank_sum_first - (2.5 + 4.0)).abs() < 1e-12);
        // One tie group of size 2: 2^3 - 2 = 6
        assert!((ranks.tie_term - 6.0).abs() < 1e-12);
    }

    #[test]
    fn all_tied() {
        let ranks = pooled_rank_sum(&[5.0, 5.0, 5.0], &[5.0, 5.0, 5.0]);
        // All six share rank 3.5; first sample sums to 10.5
        assert!((ranks.rank_sum_first - 10.5).abs() < 1e-12);
        // t = 6: 216 - 6 = 210
        assert!((ranks.tie_term - 210.0).abs() < 1e-12);
    }

    #[test]
    fn rank_sums_partition_total() {
        let a = [3.0, 1.0, 4.0, 1.0, 5.0];
        let b = [9.0, 2.0, 6.0];
        let from_a = pooled_rank_sum(&a, &b).rank_sum_first;
        let from_b = pooled_rank_sum(&b, &a).rank_sum_first;
        let n = (a.len() + b.len()) as f64;
        assert!((from_a + from_b - n * (n + 1.0) / 2.0).abs() < 1e-12);
    }
}
