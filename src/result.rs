//! Comparison result types and related structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Interval;

/// Complete result of a pre/post break comparison.
///
/// The statistical fields are `None` exactly when either partition had
/// fewer observations than the configured minimum group size; that is an
/// expected condition for sparse series, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// One-sided Mann–Whitney rank-sum p-value (alternative: pre > post).
    pub rank_sum_p: Option<f64>,

    /// Levene variance-homogeneity p-value between the two partitions.
    pub variance_p: Option<f64>,

    /// Rank-biserial effect size with its bootstrap interval.
    pub effect: Option<EffectSize>,

    /// Descriptive summary of the pre-break partition.
    pub pre: GroupSummary,

    /// Descriptive summary of the post-break partition.
    pub post: GroupSummary,

    /// Run metadata for reporting and debugging.
    pub metadata: Metadata,
}

impl ComparisonResult {
    /// True if the minimum-sample-size policy suppressed the statistics.
    pub fn is_insufficient(&self) -> bool {
        self.rank_sum_p.is_none()
    }
}

/// Rank-biserial effect size with bootstrap uncertainty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSize {
    /// Point estimate in [-1, 1]; positive means pre exceeds post.
    pub r: f64,

    /// Bootstrap percentile confidence interval for `r`.
    pub interval: Interval,
}

impl EffectSize {
    /// Classify the magnitude of the point estimate.
    pub fn magnitude(&self) -> EffectMagnitude {
        EffectMagnitude::from_r(self.r)
    }
}

/// Conventional magnitude bands for a rank-biserial effect size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EffectMagnitude {
    /// |r| < 0.1: no practically relevant separation.
    Negligible,
    /// 0.1 <= |r| < 0.3.
    Small,
    /// 0.3 <= |r| < 0.5.
    Medium,
    /// |r| >= 0.5.
    Large,
}

impl EffectMagnitude {
    /// Classify an effect size value.
    pub fn from_r(r: f64) -> Self {
        let r = r.abs();
        if r < 0.1 {
            EffectMagnitude::Negligible
        } else if r < 0.3 {
            EffectMagnitude::Small
        } else if r < 0.5 {
            EffectMagnitude::Medium
        } else {
            EffectMagnitude::Large
        }
    }
}

/// Descriptive statistics for one partition.
///
/// `mean` and `cv` are `None` when the minimum-sample-size policy skipped
/// computation. A computed coefficient of variation can still be NaN when
/// the partition mean is exactly zero; that indeterminacy is propagated,
/// not masked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Number of observations in the partition.
    pub len: usize,

    /// Arithmetic mean of the partition values.
    pub mean: Option<f64>,

    /// Coefficient of variation: sample standard deviation / mean.
    pub cv: Option<f64>,
}

impl GroupSummary {
    /// Summary for a partition the policy declined to analyze.
    pub fn skipped(len: usize) -> Self {
        Self {
            len,
            mean: None,
            cv: None,
        }
    }
}

/// Metadata for reporting and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Name of the value column that was tested.
    pub value_column: String,

    /// Break date used for the partition.
    pub cutoff: NaiveDate,

    /// Rows removed for missing date or value before partitioning.
    pub rows_dropped: usize,

    /// Bootstrap iterations used (0 when statistics were skipped).
    pub bootstrap_iterations: usize,

    /// Base bootstrap seed.
    pub bootstrap_seed: u64,

    /// Total comparison runtime in seconds.
    pub runtime_secs: f64,
}
