//! Catalog of tables grouped by category.

use std::collections::BTreeMap;
use std::fmt;

use super::SeriesTable;

/// Identifies one table in a [`Catalog`].
///
/// Key format: `category` is the name of the directory the table was
/// loaded from (e.g. `"mortality"`); `table` is the file stem with the
/// loader suffix removed (e.g. `"deaths_respiratory"` from
/// `deaths_respiratory_cleaned.csv`). Both are kept verbatim — no ad hoc
/// string munging happens at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TableKey {
    /// Category (directory) name.
    pub category: String,
    /// Table (file stem) name.
    pub table: String,
}

impl TableKey {
    /// Create a key.
    pub fn new(category: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            table: table.into(),
        }
    }

    /// Human-readable name for titles and chart captions: the table name
    /// with an optional leading prefix removed, underscores replaced by
    /// spaces, and each word capitalized.
    ///
    /// `deaths_respiratory` with prefix `"deaths_"` becomes
    /// `"Respiratory"`.
    pub fn display_name(&self, strip_prefix: Option<&str>) -> String {
        let stem = match strip_prefix {
            Some(prefix) => self.table.strip_prefix(prefix).unwrap_or(&self.table),
            None => &self.table,
        };
        stem.split('_')
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.table)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Two-level mapping category → table name → [`SeriesTable`].
///
/// Iteration order is deterministic (lexicographic), which keeps batch
/// reports and catalog-wide comparisons stable across runs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: BTreeMap<String, BTreeMap<String, SeriesTable>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, replacing any previous table under the same key.
    pub fn insert(&mut self, key: TableKey, table: SeriesTable) {
        self.categories
            .entry(key.category)
            .or_default()
            .insert(key.table, table);
    }

    /// Look up a table.
    pub fn get(&self, category: &str, table: &str) -> Option<&SeriesTable> {
        self.categories.get(category)?.get(table)
    }

    /// All tables of one category.
    pub fn category(&self, category: &str) -> Option<&BTreeMap<String, SeriesTable>> {
        self.categories.get(category)
    }

    /// Category names.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Iterate over every table with its key.
    pub fn iter(&self) -> impl Iterator<Item = (TableKey, &SeriesTable)> {
        self.categories.iter().flat_map(|(category, tables)| {
            tables
                .iter()
                .map(move |(name, table)| (TableKey::new(category.clone(), name.clone()), table))
        })
    }

    /// Total number of tables.
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// True if no tables are present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use chrono::NaiveDate;

    fn tiny_table() -> SeriesTable {
        SeriesTable::new(
            vec![NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()],
            vec![Column::new("Total", vec![1.0])],
        )
        .unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let mut catalog = Catalog::new();
        catalog.insert(TableKey::new("mortality", "deaths_sepsis"), tiny_table());
        assert!(catalog.get("mortality", "deaths_sepsis").is_some());
        assert!(catalog.get("mortality", "missing").is_none());
        assert!(catalog.get("morbidity", "deaths_sepsis").is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn iteration_is_sorted() {
        let mut catalog = Catalog::new();
        catalog.insert(TableKey::new("b", "z"), tiny_table());
        catalog.insert(TableKey::new("a", "y"), tiny_table());
        catalog.insert(TableKey::new("a", "x"), tiny_table());

        let keys: Vec<String> = catalog.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["a/x", "a/y", "b/z"]);
    }

    #[test]
    fn display_name_derivation() {
        let key = TableKey::new("mortality", "deaths_respiratory_failure");
        assert_eq!(
            key.display_name(Some("deaths_")),
            "Respiratory Failure"
        );
        assert_eq!(
            key.display_name(None),
            "Deaths Respiratory Failure"
        );
        // Prefix that does not match is ignored
        assert_eq!(
            key.display_name(Some("admissions_")),
            "Deaths Respiratory Failure"
        );
    }
}
