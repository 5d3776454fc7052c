//! # epibreak
//!
//! Structural-break analysis for epidemiological time series.
//!
//! Given a monthly series of health-event counts (deaths, hospital
//! admissions) and a break date, this crate partitions the series into a
//! pre-break and a post-break sample and quantifies how the two differ:
//!
//! - One-sided Mann–Whitney rank-sum p-value (alternative: pre > post)
//! - Levene variance-homogeneity p-value
//! - Rank-biserial effect size with a bootstrap 95% confidence interval
//! - Mean and coefficient of variation per partition
//!
//! Partitions with fewer than 3 observations produce a result with the
//! statistical fields absent rather than an error, so batch runs over many
//! series keep going when one of them is sparse.
//!
//! ## Quick Start
//!
//! ```ignore
//! use epibreak::BreakComparator;
//!
//! let catalog = epibreak::table::load_catalog("data/", &Default::default())?;
//! let table = catalog.get("mortality", "deaths_respiratory").unwrap();
//!
//! let result = BreakComparator::new()
//!     .value_column("Total")
//!     .compare(table)?;
//!
//! if let Some(effect) = &result.effect {
//!     println!(
//!         "r = {:.3} (95% CI {:.3}..{:.3})",
//!         effect.r, effect.interval.0, effect.interval.1
//!     );
//! }
//! ```
//!
//! ## Reproducibility
//!
//! The bootstrap is seeded (default seed 42) and derives one RNG per
//! iteration from the base seed, so results are bit-identical across runs
//! and identical between the sequential and rayon-parallel paths.
//! Cross-implementation reproduction of the draws is not a goal.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod comparator;
mod config;
mod error;
mod result;
mod types;

// Functional modules
pub mod decompose;
pub mod output;
#[cfg(feature = "plot")]
pub mod plot;
pub mod statistics;
pub mod table;

// Re-exports for public API
pub use comparator::BreakComparator;
pub use config::Config;
pub use error::{Error, Result};
pub use result::{ComparisonResult, EffectMagnitude, EffectSize, GroupSummary, Metadata};
pub use table::{Catalog, SeriesTable, TableKey};
pub use types::{Interval, Observation};

use chrono::NaiveDate;

/// Convenience function: compare a table's value column around a cutoff
/// date with default settings.
///
/// Equivalent to building a [`BreakComparator`] with the given column and
/// cutoff and calling [`BreakComparator::compare`]. Use the builder when
/// you need to tune bootstrap iterations, seed, or the minimum group size.
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] if `value_column` is not present in
/// the table. A degenerate series (too few observations on either side of
/// the cutoff) is not an error; it yields a result with absent statistics.
pub fn compare(
    table: &SeriesTable,
    value_column: &str,
    cutoff: NaiveDate,
) -> Result<ComparisonResult> {
    BreakComparator::new()
        .value_column(value_column)
        .cutoff(cutoff)
        .compare(table)
}
