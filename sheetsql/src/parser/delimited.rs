//! Comma separated text reader.
//!
//! The first record is the header, taken verbatim. Every following record
//! becomes a [`Row`](crate::models::Row) through [`reconcile`]; values are
//! not trimmed and records may be shorter or longer than the header.
//!
//! Quoting is strict: a quote inside an unquoted field, text after a closing
//! quote, or a quoted field left open at end of input is rejected.

use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use super::encoding::decode_auto;
use crate::error::{CsvError, ReadError, ReadResult};
use crate::models::{reconcile, Header, Table};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Read and parse a CSV file.
pub fn read_delimited(path: &Path) -> ReadResult<Table> {
    let bytes = fs::read(path).map_err(|e| ReadError::io(path, e))?;
    let (content, encoding) = decode_auto(&bytes);

    tracing::debug!(path = %path.display(), encoding = encoding.name(), "decoded delimited source");

    parse_delimited(&content).map_err(|e| ReadError::format(path, e))
}

/// Parse CSV text into a table.
///
/// An empty input gives an empty header and no rows.
pub fn parse_delimited(content: &str) -> Result<Table, CsvError> {
    check_quoting(content)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut header: Option<Header> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;

        match &header {
            None => header = Some(record.iter().map(String::from).collect()),
            Some(columns) => rows.push(reconcile(columns, record.iter())),
        }
    }

    Ok(Table::new(header.unwrap_or_default(), rows))
}

/// Reject quoting the `csv` reader would otherwise accept silently.
///
/// A field is quoted only when its first character is a quote. Inside it a
/// doubled quote is a literal quote; the closing quote must be followed by a
/// delimiter, a line break or the end of input.
fn check_quoting(content: &str) -> Result<(), CsvError> {
    let mut chars = content.chars().peekable();
    let mut line = 1;
    let mut field_start = true;

    while let Some(c) = chars.next() {
        match c {
            QUOTE if field_start => {
                line = skip_quoted(&mut chars, line)?;
                field_start = false;
            }
            QUOTE => return Err(CsvError::BareQuote { line }),
            DELIMITER | '\r' => field_start = true,
            '\n' => {
                line += 1;
                field_start = true;
            }
            _ => field_start = false,
        }
    }

    Ok(())
}

/// Consume a quoted field after its opening quote. Returns the line the
/// field ends on.
fn skip_quoted(chars: &mut Peekable<Chars<'_>>, start: usize) -> Result<usize, CsvError> {
    let mut line = start;

    while let Some(c) = chars.next() {
        match c {
            QUOTE if chars.peek() == Some(&QUOTE) => {
                chars.next();
            }
            QUOTE => {
                return match chars.peek() {
                    None | Some(&DELIMITER) | Some(&'\n') | Some(&'\r') => Ok(line),
                    Some(_) => Err(CsvError::ExtraneousQuote { line }),
                };
            }
            '\n' => line += 1,
            _ => {}
        }
    }

    Err(CsvError::UnterminatedQuote { line: start })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_simple_csv() {
        let table = parse_delimited("id,name\n1,Alice\n2,Bob").unwrap();

        assert_eq!(table.header, vec!["id", "name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("id"), Some("1"));
        assert_eq!(table.rows[0].get("name"), Some("Alice"));
        assert_eq!(table.rows[1].get("name"), Some("Bob"));
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name,value\n\"Smith, John\",\"He said \"\"hi\"\"\"\n";
        let table = parse_delimited(csv).unwrap();

        assert_eq!(table.rows[0].get("name"), Some("Smith, John"));
        assert_eq!(table.rows[0].get("value"), Some("He said \"hi\""));
    }

    #[test]
    fn test_values_not_trimmed() {
        let table = parse_delimited(" id ,name\n 1 , Alice ").unwrap();

        assert_eq!(table.header, vec![" id ", "name"]);
        assert_eq!(table.rows[0].get(" id "), Some(" 1 "));
        assert_eq!(table.rows[0].get("name"), Some(" Alice "));
    }

    #[test]
    fn test_short_record_padded() {
        let table = parse_delimited("a,b,c\n1\n1,2").unwrap();

        for row in &table.rows {
            assert_eq!(row.len(), 3);
        }
        assert_eq!(table.rows[0].get("b"), Some(""));
        assert_eq!(table.rows[0].get("c"), Some(""));
        assert_eq!(table.rows[1].get("b"), Some("2"));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let table = parse_delimited("a,b\n1,2,3,4").unwrap();

        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0].get("a"), Some("1"));
        assert_eq!(table.rows[0].get("b"), Some("2"));
    }

    #[test]
    fn test_rows_with_empty_fields_kept() {
        let table = parse_delimited("a,b\n,\n1,2").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("a"), Some(""));
    }

    #[test]
    fn test_header_only() {
        let table = parse_delimited("id,name\n").unwrap();

        assert_eq!(table.header, vec!["id", "name"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let table = parse_delimited("").unwrap();

        assert!(table.header.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_read_latin1_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.csv");
        let mut bytes = b"id,city\n1,".to_vec();
        bytes.extend_from_slice(&[0x53, 0xE8, 0x74, 0x65]); // "Sète"
        std::fs::write(&path, bytes).unwrap();

        let table = read_delimited(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.rows[0].get("city").unwrap().is_empty());
    }

    #[test]
    fn test_multiline_quoted_field() {
        let table = parse_delimited("id,note\r\n1,\"two\r\nlines\"\r\n2,x\r\n").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("note"), Some("two\r\nlines"));
        assert_eq!(table.rows[1].get("id"), Some("2"));
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        let err = parse_delimited("id,name\n1,\"Alice\n2,Bob\n").unwrap_err();

        assert!(matches!(err, CsvError::UnterminatedQuote { line: 2 }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_bare_quote_rejected() {
        let err = parse_delimited("id,name\n1,Al\"ice\n").unwrap_err();
        assert!(matches!(err, CsvError::BareQuote { line: 2 }));

        let err = parse_delimited("id,name\n1, \"Alice\"\n").unwrap_err();
        assert!(matches!(err, CsvError::BareQuote { line: 2 }));
    }

    #[test]
    fn test_text_after_closing_quote_rejected() {
        let err = parse_delimited("id,name\n\"1\"x,Bob\n").unwrap_err();
        assert!(matches!(err, CsvError::ExtraneousQuote { line: 2 }));
    }

    #[test]
    fn test_line_counts_past_multiline_field() {
        let err = parse_delimited("id,note\n1,\"a\nb\"\n2,x\"y\n").unwrap_err();
        assert!(matches!(err, CsvError::BareQuote { line: 4 }));
    }

    #[test]
    fn test_malformed_file_is_format_error_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        std::fs::write(&path, "id,name\n1,\"Alice\n").unwrap();

        let err = read_delimited(&path).unwrap_err();

        assert!(matches!(err, ReadError::Format { .. }));
        let msg = err.to_string();
        assert!(msg.contains("broken.csv"));
        assert!(msg.contains("line 2"));
    }
}
