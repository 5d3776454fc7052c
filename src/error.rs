//! Error types for the table and rendering layers.
//!
//! The statistics core itself never raises: insufficient data is signaled
//! by absent result fields and indeterminate arithmetic by NaN, so batch
//! runs continue past degenerate series. Errors here come from the layers
//! that touch the filesystem or validate table shape.

use thiserror::Error;

/// Crate error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem error while loading or cleaning tables.
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    /// A requested column does not exist in the table.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A column's length does not match the table's date column.
    #[error("inconsistent row count in column {name}: expected {expected}, found {found}")]
    InconsistentRowCount {
        /// Offending column name.
        name: String,
        /// Row count of the date column.
        expected: usize,
        /// Row count of the offending column.
        found: usize,
    },

    /// The input table or series has no usable rows.
    #[error("empty data: {0}")]
    Empty(String),

    /// Invalid argument (e.g. a zero decomposition period).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Chart rendering failure.
    #[cfg(feature = "plot")]
    #[error("plot error: {0}")]
    Plot(String),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;
