//! Bulk loading of pre-cleaned CSV tables into a [`Catalog`].
//!
//! Layout expected on disk: one directory per category, each containing
//! `;`-delimited CSV files produced by the cleaning step — first column
//! ISO dates, remaining columns numeric. Only files ending with the
//! configured suffix are loaded; everything else is ignored.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use super::{Catalog, Column, SeriesTable, TableKey};
use crate::error::Result;

/// Options for [`load_catalog`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// File-name suffix selecting cleaned tables (default `"_cleaned.csv"`).
    /// The table key is the file name with this suffix removed.
    pub suffix: String,

    /// Field delimiter (default `;`).
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            suffix: "_cleaned.csv".to_string(),
            delimiter: b';',
        }
    }
}

/// Load every cleaned table under `base_dir` into a catalog.
///
/// Subdirectories of `base_dir` become categories; files inside them
/// matching the suffix become tables keyed by their trimmed file name.
/// Non-directories at the top level and non-matching files are skipped
/// silently, mirroring how analysts keep scratch files next to the data.
///
/// # Errors
///
/// Fails on filesystem errors or on a matching file that is not valid
/// CSV. Unparseable dates within a file drop that row; unparseable
/// numeric cells become NaN.
pub fn load_catalog(base_dir: impl AsRef<Path>, options: &LoadOptions) -> Result<Catalog> {
    let mut catalog = Catalog::new();

    for category_entry in fs::read_dir(base_dir.as_ref())? {
        let category_entry = category_entry?;
        if !category_entry.file_type()?.is_dir() {
            continue;
        }
        let category = category_entry.file_name().to_string_lossy().into_owned();

        for file_entry in fs::read_dir(category_entry.path())? {
            let file_entry = file_entry?;
            let file_name = file_entry.file_name().to_string_lossy().into_owned();
            let Some(table_name) = file_name.strip_suffix(&options.suffix) else {
                continue;
            };

            let table = read_cleaned_csv(&file_entry.path(), options.delimiter)?;
            catalog.insert(TableKey::new(category.clone(), table_name), table);
        }
    }

    Ok(catalog)
}

/// Read one cleaned CSV file into a [`SeriesTable`].
///
/// The first column holds ISO (`%Y-%m-%d`) dates; a UTF-8 BOM on the
/// header is tolerated. Rows whose date fails to parse are dropped.
pub fn read_cleaned_csv(path: &Path, delimiter: u8) -> Result<SeriesTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let value_names: Vec<String> = headers.iter().skip(1).cloned().collect();
    let mut dates = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); value_names.len()];

    for record in reader.records() {
        let record = record?;
        let Some(date_field) = record.get(0) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_field.trim(), "%Y-%m-%d") else {
            continue;
        };

        dates.push(date);
        for (i, values) in columns.iter_mut().enumerate() {
            let parsed = record
                .get(i + 1)
                .and_then(|field| field.trim().parse::<f64>().ok())
                .unwrap_or(f64::NAN);
            values.push(parsed);
        }
    }

    SeriesTable::new(
        dates,
        value_names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
}
