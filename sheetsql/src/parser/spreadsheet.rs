//! XLSX reader (first sheet only).
//!
//! Row 0 of the sheet is the header. Data cells are trimmed, missing cells
//! become empty strings, and a row is kept only when at least one of its
//! cells has content.

use calamine::{Data, DataType, Range, Reader, Xlsx};
use chrono::{NaiveDateTime, Timelike};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::error::{ReadError, ReadResult};
use crate::models::{reconcile, Header, Table};

/// Read the first worksheet of an XLSX workbook.
///
/// A workbook without worksheets gives an empty table.
pub fn read_spreadsheet(path: &Path) -> ReadResult<Table> {
    let bytes = fs::read(path).map_err(|e| ReadError::io(path, e))?;

    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| ReadError::format(path, e))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| ReadError::format(path, e))?,
        None => {
            tracing::warn!(path = %path.display(), "workbook has no worksheet");
            return Ok(Table::default());
        }
    };

    Ok(table_from_range(&range))
}

/// Convert a worksheet range into a table.
///
/// Positions are absolute, so a sheet whose first row is blank yields an
/// empty header rather than promoting the next row.
pub fn table_from_range(range: &Range<Data>) -> Table {
    let Some((last_row, last_col)) = range.end() else {
        return Table::default();
    };

    let header = header_row(range, last_col);
    let mut rows = Vec::new();

    for row in 1..=last_row {
        let mut has_value = false;
        let mut cells = Vec::with_capacity(header.len());

        for col in 0..header.len() as u32 {
            let text = range
                .get_value((row, col))
                .map(|cell| cell_text(cell).trim().to_string())
                .unwrap_or_default();
            has_value |= !text.is_empty();
            cells.push(text);
        }

        if has_value {
            rows.push(reconcile(&header, cells));
        }
    }

    Table::new(header, rows)
}

/// Header cells of row 0, untrimmed, up to the last non-empty one.
fn header_row(range: &Range<Data>, last_col: u32) -> Header {
    let mut header: Header = (0..=last_col)
        .map(|col| range.get_value((0, col)).map(cell_text).unwrap_or_default())
        .collect();

    while header.last().is_some_and(|name| name.is_empty()) {
        header.pop();
    }

    header
}

/// Text shown for a cell. No type inference: everything becomes a string.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_else(|| cell.to_string()),
        Data::Error(e) => e.to_string(),
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
    use tempfile::tempdir;

    fn grid(cells: &[(u32, u32, &str)]) -> Range<Data> {
        let end_row = cells.iter().map(|c| c.0).max().unwrap();
        let end_col = cells.iter().map(|c| c.1).max().unwrap();
        let mut range = Range::new((0, 0), (end_row, end_col));
        for (row, col, text) in cells {
            range.set_value((*row, *col), Data::String(text.to_string()));
        }
        range
    }

    #[test]
    fn test_header_and_trimmed_values() {
        let range = grid(&[
            (0, 0, "id"),
            (0, 1, " name "),
            (1, 0, " 1 "),
            (1, 1, "  Alice"),
        ]);
        let table = table_from_range(&range);

        assert_eq!(table.header, vec!["id", " name "]);
        assert_eq!(table.rows[0].get("id"), Some("1"));
        assert_eq!(table.rows[0].get(" name "), Some("Alice"));
    }

    #[test]
    fn test_missing_cells_padded() {
        let range = grid(&[(0, 0, "a"), (0, 1, "b"), (0, 2, "c"), (1, 0, "x")]);
        let table = table_from_range(&range);

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].len(), table.header.len());
        assert_eq!(table.rows[0].get("b"), Some(""));
        assert_eq!(table.rows[0].get("c"), Some(""));
    }

    #[test]
    fn test_row_kept_when_only_first_cell_set() {
        let range = grid(&[(0, 0, "id"), (0, 1, "val"), (1, 0, "1")]);
        let table = table_from_range(&range);

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].get("id"), Some("1"));
        assert_eq!(table.rows[0].get("val"), Some(""));
    }

    #[test]
    fn test_blank_rows_dropped() {
        let range = grid(&[
            (0, 0, "id"),
            (0, 1, "val"),
            (1, 0, "   "),
            (2, 1, "kept"),
            (4, 0, "last"),
        ]);
        let table = table_from_range(&range);

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("val"), Some("kept"));
        assert_eq!(table.rows[1].get("id"), Some("last"));
    }

    #[test]
    fn test_trailing_empty_header_cells_ignored() {
        let range = grid(&[(0, 0, "id"), (1, 0, "1"), (1, 2, "stray")]);
        let table = table_from_range(&range);

        assert_eq!(table.header, vec!["id"]);
        assert_eq!(table.rows[0].len(), 1);
    }

    #[test]
    fn test_cell_text_conversions() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Float(1.0)), "1");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(cell_text(&Data::Error(CellErrorType::Div0)), "#DIV/0!");
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-01-02T03:04:05".into())),
            "2024-01-02T03:04:05"
        );
    }

    #[test]
    fn test_read_workbook_first_sheet_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "id").unwrap();
        first.write_string(0, 1, "val").unwrap();
        first.write_number(1, 0, 1).unwrap();
        first.write_string(1, 1, "one").unwrap();
        first.write_number(2, 0, 2).unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "ignored").unwrap();
        second.write_string(1, 0, "x").unwrap();
        workbook.save(&path).unwrap();

        let table = read_spreadsheet(&path).unwrap();

        assert_eq!(table.header, vec!["id", "val"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("id"), Some("1"));
        assert_eq!(table.rows[0].get("val"), Some("one"));
        assert_eq!(table.rows[1].get("id"), Some("2"));
        assert_eq!(table.rows[1].get("val"), Some(""));
    }

    #[test]
    fn test_read_workbook_date_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dates.xlsx");

        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        let midnight = ExcelDateTime::from_ymd(2024, 1, 2).unwrap();
        let afternoon = ExcelDateTime::from_ymd(2024, 1, 2)
            .unwrap()
            .and_hms(13, 45, 30)
            .unwrap();

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "day").unwrap();
        sheet.write_string(0, 1, "at").unwrap();
        sheet
            .write_datetime_with_format(1, 0, &midnight, &date_format)
            .unwrap();
        sheet
            .write_datetime_with_format(1, 1, &afternoon, &datetime_format)
            .unwrap();
        workbook.save(&path).unwrap();

        let table = read_spreadsheet(&path).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].get("day"), Some("2024-01-02"));
        assert_eq!(table.rows[0].get("at"), Some("2024-01-02 13:45:30"));
    }

    #[test]
    fn test_corrupt_workbook_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a zip container").unwrap();

        let err = read_spreadsheet(&path).unwrap_err();
        assert!(matches!(err, ReadError::Format { .. }));
    }
}
