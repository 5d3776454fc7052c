//! Main `BreakComparator` entry point and pipeline.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::Result;
use crate::result::{ComparisonResult, EffectSize, GroupSummary, Metadata};
use crate::statistics::{
    bootstrap_effect_interval, coefficient_of_variation, levene_test, mann_whitney_u, mean,
    rank_biserial, Alternative, Center,
};
use crate::table::{Catalog, SeriesTable, TableKey};
use crate::types::Observation;

/// Main entry point for break comparisons.
///
/// Use the builder methods to adjust the column, cutoff, and bootstrap
/// settings, then call [`compare`](Self::compare) on a table (or
/// [`compare_catalog`](Self::compare_catalog) on a whole catalog).
///
/// # Example
///
/// ```ignore
/// use epibreak::BreakComparator;
///
/// let result = BreakComparator::new()
///     .value_column("Total")
///     .bootstrap_iterations(2_000)
///     .compare(&table)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BreakComparator {
    config: Config,
}

impl BreakComparator {
    /// Create with default configuration (column `"Total"`, cutoff
    /// 2020-01-01, 1,000 bootstrap iterations, seed 42).
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create with a reduced bootstrap for exploratory runs.
    ///
    /// 200 iterations instead of 1,000; everything else as default. The
    /// interval is coarser but the point estimates are identical.
    pub fn quick() -> Self {
        Self {
            config: Config {
                bootstrap_iterations: 200,
                ..Config::default()
            },
        }
    }

    /// Set the value column to test.
    pub fn value_column(mut self, column: impl Into<String>) -> Self {
        self.config.value_column = column.into();
        self
    }

    /// Set the break date.
    pub fn cutoff(mut self, cutoff: NaiveDate) -> Self {
        self.config.cutoff = cutoff;
        self
    }

    /// Set the minimum observations required in each partition.
    pub fn min_group_size(mut self, size: usize) -> Self {
        self.config.min_group_size = size;
        self
    }

    /// Set the bootstrap iteration count.
    pub fn bootstrap_iterations(mut self, iterations: usize) -> Self {
        self.config.bootstrap_iterations = iterations;
        self
    }

    /// Set the base bootstrap seed.
    pub fn bootstrap_seed(mut self, seed: u64) -> Self {
        self.config.bootstrap_seed = seed;
        self
    }

    /// Set the confidence level of the bootstrap interval.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.config.confidence_level = level;
        self
    }

    /// Access the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compare the configured value column of a table around the cutoff.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`](crate::Error::ColumnNotFound) if
    /// the configured column is missing. Sparse partitions are not errors;
    /// they produce a result with absent statistics.
    pub fn compare(&self, table: &SeriesTable) -> Result<ComparisonResult> {
        let rows_before = table.len();
        let observations = table.observations(&self.config.value_column)?;
        let rows_dropped = rows_before - observations.len();
        Ok(self.run(&observations, rows_dropped))
    }

    /// Compare a pre-assembled observation sample.
    ///
    /// Observations may arrive unsorted; they are sorted by date before
    /// partitioning. Values must already be free of NaN (the table layer
    /// guarantees this).
    pub fn compare_observations(&self, observations: &[Observation]) -> ComparisonResult {
        let mut sorted = observations.to_vec();
        sorted.sort_by_key(|obs| obs.date);
        self.run(&sorted, 0)
    }

    /// Compare every table of a catalog, continuing past degenerate series.
    ///
    /// Tables that do not carry the configured value column are skipped
    /// with a warning on stderr, matching the batch propagation policy:
    /// one bad series never aborts the run.
    pub fn compare_catalog(&self, catalog: &Catalog) -> BTreeMap<TableKey, ComparisonResult> {
        let mut results = BTreeMap::new();
        for (key, table) in catalog.iter() {
            match self.compare(table) {
                Ok(result) => {
                    results.insert(key, result);
                }
                Err(err) => {
                    eprintln!("[SKIPPED] {}: {}", key, err);
                }
            }
        }
        results
    }

    /// The single-pass pipeline: partition, policy gate, tests, summaries.
    fn run(&self, observations: &[Observation], rows_dropped: usize) -> ComparisonResult {
        let start = Instant::now();

        let (pre, post) = partition(observations, self.config.cutoff);

        if pre.len() < self.config.min_group_size || post.len() < self.config.min_group_size {
            return ComparisonResult {
                rank_sum_p: None,
                variance_p: None,
                effect: None,
                pre: GroupSummary::skipped(pre.len()),
                post: GroupSummary::skipped(post.len()),
                metadata: self.metadata(rows_dropped, 0, start),
            };
        }

        // One-sided rank-sum test, alternative "pre > post"; the effect
        // size reuses the same U statistic.
        let rank_sum = mann_whitney_u(&pre, &post, Alternative::Greater);
        let r = rank_biserial(rank_sum.u, pre.len(), post.len());

        let interval = bootstrap_effect_interval(
            &pre,
            &post,
            self.config.bootstrap_iterations,
            self.config.bootstrap_seed,
            self.config.confidence_level,
        );

        let variance = levene_test(&[&pre, &post], Center::default());

        ComparisonResult {
            rank_sum_p: Some(rank_sum.p_value),
            variance_p: Some(variance.p_value),
            effect: Some(EffectSize { r, interval }),
            pre: summarize(&pre),
            post: summarize(&post),
            metadata: self.metadata(rows_dropped, self.config.bootstrap_iterations, start),
        }
    }

    fn metadata(&self, rows_dropped: usize, iterations: usize, start: Instant) -> Metadata {
        Metadata {
            value_column: self.config.value_column.clone(),
            cutoff: self.config.cutoff,
            rows_dropped,
            bootstrap_iterations: iterations,
            bootstrap_seed: self.config.bootstrap_seed,
            runtime_secs: start.elapsed().as_secs_f64(),
        }
    }
}

/// Split sorted observations at the cutoff: `pre` strictly before,
/// `post` at or after.
fn partition(observations: &[Observation], cutoff: NaiveDate) -> (Vec<f64>, Vec<f64>) {
    let split = observations.partition_point(|obs| obs.date < cutoff);
    let pre = observations[..split].iter().map(|obs| obs.value).collect();
    let post = observations[split..].iter().map(|obs| obs.value).collect();
    (pre, post)
}

fn summarize(values: &[f64]) -> GroupSummary {
    GroupSummary {
        len: values.len(),
        mean: Some(mean(values)),
        cv: Some(coefficient_of_variation(values)),
    }
}
