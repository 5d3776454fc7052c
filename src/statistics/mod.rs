//! Statistical methods for break comparison.
//!
//! This module provides the numerical core of the crate:
//! - Mid-rank assignment with tie accounting
//! - One-sided Mann–Whitney rank-sum test and rank-biserial effect size
//! - Levene variance-homogeneity test
//! - Seeded percentile bootstrap for the effect-size interval
//! - Descriptive statistics (mean, sample std, coefficient of variation)

mod bootstrap;
mod descriptive;
mod distributions;
mod levene;
mod mannwhitney;
mod rank;

pub use bootstrap::{bootstrap_effect_interval, iteration_seed, resample_into};
pub use descriptive::{coefficient_of_variation, mean, percentile_sorted, sample_std};
pub use distributions::{f_cdf, standard_normal_cdf};
pub use levene::{levene_test, Center, VarianceTest};
pub use mannwhitney::{mann_whitney_u, rank_biserial, rank_biserial_from_samples, Alternative, RankSumTest};
pub use rank::{pooled_rank_sum, PooledRanks};
