//! Classical additive seasonal decomposition.
//!
//! Splits a monthly series into trend, seasonal, and residual components:
//! trend from a centered moving average, seasonal from per-position means
//! of the detrended series normalized to zero sum, residual as the
//! remainder. The deseasonalized series (observed minus seasonal) is what
//! the break comparison and trend plots consume when seasonality would
//! otherwise drown the signal.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};
use crate::table::{Catalog, SeriesTable, TableKey};
use crate::types::Observation;

/// Options for [`decompose`].
#[derive(Debug, Clone)]
pub struct DecomposeOptions {
    /// Seasonal period in months (default 12, yearly seasonality).
    pub period: usize,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// Result of an additive decomposition. All component vectors are aligned
/// with `dates`.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Monthly dates after reindexing (no gaps).
    pub dates: Vec<NaiveDate>,
    /// Observed values (gaps forward-filled).
    pub observed: Vec<f64>,
    /// Trend component (centered moving average).
    pub trend: Vec<f64>,
    /// Seasonal component, zero-sum over one period.
    pub seasonal: Vec<f64>,
    /// Residual: observed - trend - seasonal.
    pub residual: Vec<f64>,
    /// Observed minus seasonal.
    pub deseasonalized: Vec<f64>,
}

impl Decomposition {
    /// Rebuild a single-column table of the deseasonalized series, for
    /// feeding back into the break comparison.
    pub fn deseasonalized_table(&self, column: impl Into<String>) -> Result<SeriesTable> {
        SeriesTable::new(
            self.dates.clone(),
            vec![crate::table::Column::new(
                column,
                self.deseasonalized.clone(),
            )],
        )
    }
}

/// Decompose one column of a table.
///
/// The series is first reduced to its clean observations (missing values
/// dropped, sorted by date), then reindexed to a gap-free monthly grid
/// with forward fill so the moving average sees a regular cadence.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a zero period and
/// [`Error::Empty`] when fewer than two periods of data remain after
/// cleaning — a seasonal profile needs at least two cycles to mean
/// anything.
pub fn decompose(
    table: &SeriesTable,
    column: &str,
    options: &DecomposeOptions,
) -> Result<Decomposition> {
    if options.period == 0 {
        return Err(Error::InvalidInput("period must be positive".to_string()));
    }

    let observations = table.observations(column)?;
    let (dates, observed) = reindex_monthly(&observations)?;

    if observed.len() < options.period * 2 {
        return Err(Error::Empty(format!(
            "need at least {} observations for period {}, found {}",
            options.period * 2,
            options.period,
            observed.len()
        )));
    }

    let trend = moving_average_trend(&observed, options.period);

    let detrended: Vec<f64> = observed
        .iter()
        .zip(&trend)
        .map(|(value, trend)| value - trend)
        .collect();
    let seasonal = seasonal_component(&detrended, options.period);

    let residual: Vec<f64> = observed
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((value, trend), seasonal)| value - trend - seasonal)
        .collect();
    let deseasonalized: Vec<f64> = observed
        .iter()
        .zip(&seasonal)
        .map(|(value, seasonal)| value - seasonal)
        .collect();

    Ok(Decomposition {
        dates,
        observed,
        trend,
        seasonal,
        residual,
        deseasonalized,
    })
}

/// Decompose selected tables of a catalog.
///
/// Tables whose key is not in `selection` (when given) are left out of
/// the result; tables that fail to decompose (missing column, too short)
/// are skipped with a warning so the batch keeps going.
pub fn decompose_catalog(
    catalog: &Catalog,
    column: &str,
    options: &DecomposeOptions,
    selection: Option<&[TableKey]>,
) -> BTreeMap<TableKey, Decomposition> {
    let mut results = BTreeMap::new();
    for (key, table) in catalog.iter() {
        if let Some(selection) = selection {
            if !selection.contains(&key) {
                continue;
            }
        }
        match decompose(table, column, options) {
            Ok(decomposition) => {
                results.insert(key, decomposition);
            }
            Err(err) => {
                eprintln!("[SKIPPED] {}: {}", key, err);
            }
        }
    }
    results
}

/// Reindex observations to consecutive month starts, forward-filling
/// gaps. Duplicate months keep the last value.
fn reindex_monthly(observations: &[Observation]) -> Result<(Vec<NaiveDate>, Vec<f64>)> {
    let (first, last) = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::Empty("no observations to decompose".to_string())),
    };

    let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for obs in observations {
        by_month.insert((obs.date.year(), obs.date.month()), obs.value);
    }

    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut cursor = (first.date.year(), first.date.month());
    let end = (last.date.year(), last.date.month());
    let mut previous = first.value;

    loop {
        let value = *by_month.get(&cursor).unwrap_or(&previous);
        previous = value;
        // Month starts always exist
        dates.push(NaiveDate::from_ymd_opt(cursor.0, cursor.1, 1).unwrap());
        values.push(value);

        if cursor == end {
            break;
        }
        cursor = if cursor.1 == 12 {
            (cursor.0 + 1, 1)
        } else {
            (cursor.0, cursor.1 + 1)
        };
    }

    Ok((dates, values))
}

/// Centered moving average with a window of one period, shrinking at the
/// edges so every position gets a finite trend value.
fn moving_average_trend(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let half = period / 2;
    let mut trend = Vec::with_capacity(n);

    for i in 0..n {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(n);
        let window = &values[start..end];
        trend.push(window.iter().sum::<f64>() / window.len() as f64);
    }

    trend
}

/// Per-position means of the detrended series, normalized to sum to zero
/// over one period.
fn seasonal_component(detrended: &[f64], period: usize) -> Vec<f64> {
    let mut pattern = vec![0.0; period];
    let mut counts = vec![0usize; period];

    for (i, &value) in detrended.iter().enumerate() {
        pattern[i % period] += value;
        counts[i % period] += 1;
    }
    for (sum, &count) in pattern.iter_mut().zip(&counts) {
        if count > 0 {
            *sum /= count as f64;
        }
    }

    // Zero-sum constraint keeps the level in the trend, not the seasonal
    let mean = pattern.iter().sum::<f64>() / period as f64;
    for value in pattern.iter_mut() {
        *value -= mean;
    }

    detrended
        .iter()
        .enumerate()
        .map(|(i, _)| pattern[i % period])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn date(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn monthly_table(start: (i32, u32), values: &[f64]) -> SeriesTable {
        let mut dates = Vec::new();
        let mut cursor = start;
        for _ in values {
            dates.push(date(cursor.0, cursor.1));
            cursor = if cursor.1 == 12 {
                (cursor.0 + 1, 1)
            } else {
                (cursor.0, cursor.1 + 1)
            };
        }
        SeriesTable::new(dates, vec![Column::new("Total", values.to_vec())]).unwrap()
    }

    #[test]
    fn constant_series_has_flat_components() {
        let table = monthly_table((2018, 1), &[100.0; 36]);
        let d = decompose(&table, "Total", &DecomposeOptions::default()).unwrap();

        for i in 0..d.observed.len() {
            assert!((d.trend[i] - 100.0).abs() < 1e-9);
            assert!(d.seasonal[i].abs() < 1e-9);
            assert!(d.residual[i].abs() < 1e-9);
            assert!((d.deseasonalized[i] - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn additive_identity_holds() {
        let values: Vec<f64> = (0..48)
            .map(|i| 50.0 + i as f64 * 0.5 + 10.0 * ((i % 12) as f64 - 5.5).abs())
            .collect();
        let table = monthly_table((2016, 1), &values);
        let d = decompose(&table, "Total", &DecomposeOptions::default()).unwrap();

        for i in 0..d.observed.len() {
            let rebuilt = d.trend[i] + d.seasonal[i] + d.residual[i];
            assert!((rebuilt - d.observed[i]).abs() < 1e-9);
            let deseasonalized = d.observed[i] - d.seasonal[i];
            assert!((deseasonalized - d.deseasonalized[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn seasonal_component_is_zero_sum() {
        let values: Vec<f64> = (0..36)
            .map(|i| 20.0 + 5.0 * ((i % 12) as f64 / 11.0))
            .collect();
        let table = monthly_table((2017, 1), &values);
        let d = decompose(&table, "Total", &DecomposeOptions::default()).unwrap();

        let one_period: f64 = d.seasonal[..12].iter().sum();
        assert!(one_period.abs() < 1e-9);
    }

    #[test]
    fn gaps_are_reindexed_and_filled() {
        // 2019-01, 2019-02, then a hole, then 2019-04
        let table = SeriesTable::new(
            vec![date(2019, 1), date(2019, 2), date(2019, 4)],
            vec![Column::new("Total", vec![1.0, 2.0, 4.0])],
        )
        .unwrap();
        let obs = table.observations("Total").unwrap();
        let (dates, values) = reindex_monthly(&obs).unwrap();

        assert_eq!(
            dates,
            vec![date(2019, 1), date(2019, 2), date(2019, 3), date(2019, 4)]
        );
        // March forward-filled from February
        assert_eq!(values, vec![1.0, 2.0, 2.0, 4.0]);
    }

    #[test]
    fn catalog_bulk_selects_and_skips() {
        let mut catalog = Catalog::new();
        let long_key = TableKey::new("mortality", "deaths_sepsis");
        let short_key = TableKey::new("mortality", "deaths_rare");
        catalog.insert(long_key.clone(), monthly_table((2017, 1), &[10.0; 36]));
        catalog.insert(short_key.clone(), monthly_table((2020, 1), &[1.0; 6]));
        catalog.insert(
            TableKey::new("morbidity", "admissions"),
            monthly_table((2017, 1), &[5.0; 36]),
        );

        // Selection restricts to the mortality tables; the short one is
        // skipped rather than aborting the batch
        let selection = vec![long_key.clone(), short_key];
        let results = decompose_catalog(
            &catalog,
            "Total",
            &DecomposeOptions::default(),
            Some(&selection),
        );

        assert_eq!(results.len(), 1);
        assert!(results.contains_key(&long_key));
    }

    #[test]
    fn short_series_is_rejected() {
        let table = monthly_table((2020, 1), &[1.0; 18]);
        let result = decompose(&table, "Total", &DecomposeOptions::default());
        assert!(matches!(result, Err(Error::Empty(_))));
    }

    #[test]
    fn zero_period_is_rejected() {
        let table = monthly_table((2020, 1), &[1.0; 24]);
        let result = decompose(&table, "Total", &DecomposeOptions { period: 0 });
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
