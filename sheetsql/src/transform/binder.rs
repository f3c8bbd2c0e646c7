//! Row binder: renders every row through the template into a sink.

use std::io::Write;

use super::template::Template;
use crate::error::{RenderError, RenderResult};
use crate::models::Row;

/// Written after each rendered row.
pub const LINE_TERMINATOR: &[u8] = b"\n";

/// Render `rows` in order, each followed by a line terminator.
///
/// Stops at the first failing row or write. Whatever was already written
/// stays in the sink. Returns the number of rows rendered.
pub fn render<W: Write>(template: &Template, rows: &[Row], sink: &mut W) -> RenderResult<usize> {
    for (index, row) in rows.iter().enumerate() {
        let text = template
            .render_row(row)
            .map_err(|source| RenderError::Row {
                row: index + 1,
                source,
            })?;

        sink.write_all(text.as_bytes())?;
        sink.write_all(LINE_TERMINATOR)?;
    }

    sink.flush()?;
    tracing::info!(rows = rows.len(), "rendered rows");

    Ok(rows.len())
}
