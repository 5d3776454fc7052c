//! Tabular series model and ingestion.
//!
//! A [`SeriesTable`] is the contract between the loading/cleaning layer
//! and the statistics core: a parsed date column plus named numeric
//! columns, with NaN marking missing values. [`Catalog`] organizes many
//! tables by category for batch operations.

mod catalog;
pub mod clean;
pub mod load;

pub use catalog::{Catalog, TableKey};
pub use load::{load_catalog, LoadOptions};

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::types::Observation;

/// A named numeric column. NaN marks missing values.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    values: Vec<f64>,
}

impl Column {
    /// Create a column.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// A date-indexed table of numeric series.
///
/// Rows are positional: `dates[i]` belongs with `column.values()[i]` for
/// every column. Dates are not required to be sorted or unique here;
/// [`observations`](Self::observations) sorts on extraction.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl SeriesTable {
    /// Build a table, validating that every column matches the date
    /// column's length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InconsistentRowCount`] on a length mismatch.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self> {
        for column in &columns {
            if column.values.len() != dates.len() {
                return Err(Error::InconsistentRowCount {
                    name: column.name.clone(),
                    expected: dates.len(),
                    found: column.values.len(),
                });
            }
        }
        Ok(Self { dates, columns })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The date column.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column names in original order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of a column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// True if the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Extract the cleaned sample for one column: rows with a missing
    /// (NaN) value dropped, sorted ascending by date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] if the column does not exist.
    pub fn observations(&self, column: &str) -> Result<Vec<Observation>> {
        let values = self
            .column(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;

        let mut observations: Vec<Observation> = self
            .dates
            .iter()
            .zip(values)
            .filter(|(_, value)| !value.is_nan())
            .map(|(&date, &value)| Observation::new(date, value))
            .collect();
        observations.sort_by_key(|obs| obs.date);
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    #[test]
    fn mismatched_column_length_is_rejected() {
        let dates = vec![date(2020, 1), date(2020, 2)];
        let result = SeriesTable::new(dates, vec![Column::new("Total", vec![1.0])]);
        assert!(matches!(
            result,
            Err(Error::InconsistentRowCount { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn observations_drop_nan_and_sort() {
        let dates = vec![date(2020, 3), date(2020, 1), date(2020, 2)];
        let table = SeriesTable::new(
            dates,
            vec![Column::new("Total", vec![3.0, 1.0, f64::NAN])],
        )
        .unwrap();

        let obs = table.observations("Total").unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].date, date(2020, 1));
        assert_eq!(obs[0].value, 1.0);
        assert_eq!(obs[1].date, date(2020, 3));
        assert_eq!(obs[1].value, 3.0);
    }

    #[test]
    fn missing_column_is_an_error() {
        let table = SeriesTable::new(vec![date(2020, 1)], vec![Column::new("Total", vec![1.0])])
            .unwrap();
        assert!(matches!(
            table.observations("Deaths"),
            Err(Error::ColumnNotFound(name)) if name == "Deaths"
        ));
    }
}
