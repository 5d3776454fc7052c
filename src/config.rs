//! Configuration for break comparisons.

use chrono::NaiveDate;

/// Configuration options for [`BreakComparator`](crate::BreakComparator).
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the numeric column to test (default: `"Total"`).
    pub value_column: String,

    /// Break date. Observations strictly before it form the pre group,
    /// observations at or after it the post group (default: 2020-01-01).
    pub cutoff: NaiveDate,

    /// Minimum observations required in each partition (default: 3).
    ///
    /// Below this, every statistical field of the result is absent —
    /// rank-based statistics on one or two points are noise, not evidence.
    pub min_group_size: usize,

    /// Bootstrap resampling iterations for the effect-size interval
    /// (default: 1,000).
    pub bootstrap_iterations: usize,

    /// Base seed for the bootstrap PRNG (default: 42).
    ///
    /// Each iteration derives its own RNG from this seed, so results are
    /// reproducible and independent of iteration scheduling.
    pub bootstrap_seed: u64,

    /// Confidence level for the bootstrap interval (default: 0.95).
    pub confidence_level: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            value_column: "Total".to_string(),
            cutoff: default_cutoff(),
            min_group_size: 3,
            bootstrap_iterations: 1_000,
            bootstrap_seed: 42,
            confidence_level: 0.95,
        }
    }
}

/// The default break date: pandemic onset, 2020-01-01.
pub(crate) fn default_cutoff() -> NaiveDate {
    // Constant date, cannot fail
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}
