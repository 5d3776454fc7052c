//! Cleaning of raw government-style tabular exports.
//!
//! The raw files are `;`-delimited, Latin-1 encoded, carry preamble and
//! footer lines around the actual table, mark missing counts with `"-"`,
//! and spell dates in a national locale (`Janeiro/2021`, `jan/21`).
//! Cleaning normalizes all of that into a [`SeriesTable`]: parsed month
//! dates, numeric columns with NaN for non-numeric leftovers.
//!
//! Locale handling is explicit: [`MonthNames`] travels inside
//! [`CleanOptions`] instead of living in process-global state, so two
//! tables in different locales can be cleaned side by side.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use super::{Column, SeriesTable};
use crate::error::{Error, Result};

/// Month-name tables for locale-aware date parsing.
#[derive(Debug, Clone)]
pub struct MonthNames {
    full: [&'static str; 12],
    abbreviated: [&'static str; 12],
}

impl MonthNames {
    /// Brazilian Portuguese month names, the locale of the source data.
    pub fn portuguese() -> Self {
        Self {
            full: [
                "janeiro",
                "fevereiro",
                "março",
                "abril",
                "maio",
                "junho",
                "julho",
                "agosto",
                "setembro",
                "outubro",
                "novembro",
                "dezembro",
            ],
            abbreviated: [
                "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
            ],
        }
    }

    /// English month names.
    pub fn english() -> Self {
        Self {
            full: [
                "january",
                "february",
                "march",
                "april",
                "may",
                "june",
                "july",
                "august",
                "september",
                "october",
                "november",
                "december",
            ],
            abbreviated: [
                "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
            ],
        }
    }

    /// Month number (1-12) from a full name, case-insensitive.
    fn full_month(&self, name: &str) -> Option<u32> {
        let name = name.to_lowercase();
        self.full
            .iter()
            .position(|&m| m == name)
            .map(|i| i as u32 + 1)
    }

    /// Month number (1-12) from an abbreviated name, case-insensitive.
    fn abbreviated_month(&self, name: &str) -> Option<u32> {
        let name = name.to_lowercase();
        self.abbreviated
            .iter()
            .position(|&m| m == name)
            .map(|i| i as u32 + 1)
    }
}

impl Default for MonthNames {
    fn default() -> Self {
        Self::portuguese()
    }
}

/// Options for [`read_raw_csv`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Preamble lines to skip before the header (default 0).
    pub skip_rows: usize,
    /// Footer lines to drop from the end (default 0).
    pub skip_footer: usize,
    /// Field delimiter (default `;`).
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            skip_footer: 0,
            delimiter: b';',
        }
    }
}

/// Options for [`clean_raw_table`].
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Month-name tables for the export's locale.
    pub month_names: MonthNames,
    /// Cell contents standing for "no events recorded" (default `["-"]`).
    pub missing_markers: Vec<String>,
    /// Value substituted for a missing marker (default 0.0 — an absent
    /// count in these exports means zero events, not unknown).
    pub missing_value: f64,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            month_names: MonthNames::default(),
            missing_markers: vec!["-".to_string()],
            missing_value: 0.0,
        }
    }
}

impl CleanOptions {
    fn is_missing_marker(&self, cell: &str) -> bool {
        self.missing_markers.iter().any(|m| m == cell)
    }
}

/// An uncleaned table: header names plus string records.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Header row.
    pub headers: Vec<String>,
    /// Data records, each the same length as `headers`.
    pub records: Vec<Vec<String>>,
}

/// Read a raw Latin-1 export, skipping preamble/footer lines and records
/// whose field count does not match the header.
pub fn read_raw_csv(path: impl AsRef<Path>, options: &ReadOptions) -> Result<RawTable> {
    let bytes = fs::read(path.as_ref())?;
    // Latin-1: every byte maps directly to the code point of the same value
    let text: String = bytes.iter().map(|&b| b as char).collect();

    let lines: Vec<&str> = text.lines().collect();
    let start = options.skip_rows.min(lines.len());
    let end = lines.len().saturating_sub(options.skip_footer).max(start);
    let body = lines[start..end].join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        return Err(Error::Empty(format!(
            "no header row in {}",
            path.as_ref().display()
        )));
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != headers.len() {
            // Footer notes and truncated lines surface as short records
            continue;
        }
        records.push(record.iter().map(|field| field.to_string()).collect());
    }

    Ok(RawTable { headers, records })
}

/// Clean a raw table into a [`SeriesTable`].
///
/// The first column is taken as the date column. Each date cell is
/// trimmed, leading dots removed, then parsed as `FullMonth/yyyy` or
/// `abbr/yy`; rows where neither form parses (totals lines, stray notes)
/// are dropped. Remaining cells become f64, with missing markers
/// substituted first and anything unparseable left as NaN.
///
/// # Errors
///
/// Returns [`Error::Empty`] if the raw table has no columns.
pub fn clean_raw_table(raw: &RawTable, options: &CleanOptions) -> Result<SeriesTable> {
    if raw.headers.is_empty() {
        return Err(Error::Empty("raw table has no columns".to_string()));
    }

    let value_names: Vec<String> = raw.headers.iter().skip(1).cloned().collect();
    let mut dates = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); value_names.len()];

    for record in &raw.records {
        let date_cell = record[0].trim().trim_start_matches('.').trim();
        let Some(date) = parse_locale_month(date_cell, &options.month_names) else {
            continue;
        };

        dates.push(date);
        for (i, values) in columns.iter_mut().enumerate() {
            let cell = record.get(i + 1).map(|c| c.trim()).unwrap_or("");
            let value = if options.is_missing_marker(cell) {
                options.missing_value
            } else {
                cell.parse::<f64>().unwrap_or(f64::NAN)
            };
            values.push(value);
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

/// Parse `Month/yyyy` (full name) or `mon/yy` (abbreviation) into the
/// first day of that month.
fn parse_locale_month(cell: &str, months: &MonthNames) -> Option<NaiveDate> {
    let (month_part, year_part) = cell.split_once('/')?;
    let month_part = month_part.trim();
    let year_part = year_part.trim();

    if let (Some(month), Ok(year)) = (months.full_month(month_part), year_part.parse::<i32>()) {
        if year_part.len() == 4 {
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
    }

    if let (Some(month), Ok(year)) = (
        months.abbreviated_month(month_part),
        year_part.parse::<i32>(),
    ) {
        if year_part.len() == 2 {
            // Two-digit years pivot at 69, as in the original tooling
            let year = if year < 69 { 2000 + year } else { 1900 + year };
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn raw(headers: &[&str], records: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            records: records
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn parses_both_date_formats() {
        let months = MonthNames::portuguese();
        assert_eq!(
            parse_locale_month("Janeiro/2021", &months),
            Some(date(2021, 1))
        );
        assert_eq!(parse_locale_month("dez/19", &months), Some(date(2019, 12)));
        assert_eq!(parse_locale_month("mar/99", &months), Some(date(1999, 3)));
        assert_eq!(parse_locale_month("Total", &months), None);
        // Abbreviation with a four-digit year is not a known layout
        assert_eq!(parse_locale_month("jan/2021", &months), None);
    }

    #[test]
    fn cleans_markers_dots_and_bad_rows() {
        let table = clean_raw_table(
            &raw(
                &["Mês", "Total", "Óbitos"],
                &[
                    &[".. Janeiro/2020", "120", "-"],
                    &["Fevereiro/2020", "abc", "15"],
                    &["Total", "999", "999"],
                ],
            ),
            &CleanOptions::default(),
        )
        .unwrap();

        // Totals row dropped; two months survive
        assert_eq!(table.dates(), &[date(2020, 1), date(2020, 2)]);

        let total = table.column("Total").unwrap();
        assert_eq!(total[0], 120.0);
        assert!(total[1].is_nan());

        let deaths = table.column("Óbitos").unwrap();
        assert_eq!(deaths[0], 0.0);
        assert_eq!(deaths[1], 15.0);
    }

    #[test]
    fn english_locale_parses_without_globals() {
        let options = CleanOptions {
            month_names: MonthNames::english(),
            ..Default::default()
        };
        let table = clean_raw_table(
            &raw(&["Month", "Total"], &[&["January/2020", "3"]]),
            &options,
        )
        .unwrap();
        assert_eq!(table.dates(), &[date(2020, 1)]);
    }

    #[test]
    fn read_raw_csv_skips_preamble_footer_and_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        let mut file = fs::File::create(&path).unwrap();
        // Latin-1 bytes: "Mês" with ê = 0xEA
        file.write_all(b"fonte: sistema\nM\xeas;Total\njan/20;5\nnota de rodap\xe9\nfonte\n")
            .unwrap();

        let raw = read_raw_csv(
            &path,
            &ReadOptions {
                skip_rows: 1,
                skip_footer: 1,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(raw.headers, vec!["Mês", "Total"]);
        // The single-field footer note inside the body is dropped
        assert_eq!(raw.records.len(), 1);
        assert_eq!(raw.records[0], vec!["jan/20", "5"]);
    }
}
