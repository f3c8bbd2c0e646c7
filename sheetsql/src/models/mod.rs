//! Domain models shared by every stage of the pipeline.
//!
//! - [`Row`] - One data row, column name to cell text
//! - [`Table`] - A header plus the rows read from one source
//! - [`SourceKind`] / [`TableFormat`] - What a file in the input directory is

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Ordered column names taken from the first record of a source.
pub type Header = Vec<String>;

// =============================================================================
// Row
// =============================================================================

/// A single data row.
///
/// Every header column is present as a key, even when the source had no
/// cell for it (the value is then empty). Serializes as a flat map so it can
/// be handed straight to the template engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    /// Value of a column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Number of distinct columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(column, value)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Row(iter.into_iter().collect())
    }
}

/// Build a [`Row`] from a header and the raw cells of one record.
///
/// Missing trailing cells become empty strings, cells beyond the header are
/// dropped. When the header repeats a name, the rightmost column wins.
pub fn reconcile<I>(header: &[String], cells: I) -> Row
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut cells = cells.into_iter();
    let mut values = BTreeMap::new();

    for column in header {
        let value = cells.next().map(Into::into).unwrap_or_default();
        values.insert(column.clone(), value);
    }

    Row(values)
}

// =============================================================================
// Table
// =============================================================================

/// Header and rows of one tabular source, rows in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Header,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(header: Header, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Source classification
// =============================================================================

/// Kind of tabular source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma separated text (`.csv`).
    Delimited,
    /// Excel workbook (`.xlsx`), first sheet only.
    Spreadsheet,
}

/// What an input file contributes to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Table(TableFormat),
    /// The statement template (`.sql`).
    Template,
}

impl SourceKind {
    /// Classify a path by its extension (case-insensitive).
    ///
    /// Returns `None` for anything that is not an input of this tool.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Table(TableFormat::Delimited)),
            "xlsx" => Some(Self::Table(TableFormat::Spreadsheet)),
            "sql" => Some(Self::Template),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(TableFormat::Delimited) => write!(f, "csv"),
            Self::Table(TableFormat::Spreadsheet) => write!(f, "xlsx"),
            Self::Template => write!(f, "template"),
        }
    }
}
