//! Table readers.
//!
//! Turns one tabular source into a [`Table`]. Both readers share the
//! [`reconcile`](crate::models::reconcile) step, so every row carries every
//! header column whatever the source format.
//!
//! - [`delimited`] - CSV with encoding auto-detection
//! - [`spreadsheet`] - First sheet of an XLSX workbook

pub mod delimited;
pub mod encoding;
pub mod spreadsheet;

use std::path::Path;

use crate::error::ReadResult;
use crate::models::{Table, TableFormat};

pub use delimited::{parse_delimited, read_delimited};
pub use encoding::{decode_content, detect_encoding, encoding_for_label};
pub use spreadsheet::{read_spreadsheet, table_from_range};

/// Read a table source of the given format.
pub fn read_table(path: &Path, format: TableFormat) -> ReadResult<Table> {
    let table = match format {
        TableFormat::Delimited => read_delimited(path)?,
        TableFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    tracing::info!(
        path = %path.display(),
        columns = table.header.len(),
        rows = table.len(),
        "read table"
    );

    Ok(table)
}
