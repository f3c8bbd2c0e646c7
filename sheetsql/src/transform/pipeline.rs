//! High-level pipeline API: directory in, rendered statements out.
//!
//! ```rust,ignore
//! use sheetsql::{run, PipelineOptions};
//! use std::path::Path;
//!
//! let sql = run(Path::new("./batch"), &PipelineOptions::default())?;
//! print!("{}", sql);
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::binder;
use super::template::{Template, UndefinedPolicy};
use crate::error::{PipelineError, PipelineResult, SelectError};
use crate::models::{Header, Row, Table};
use crate::source::gather;

/// Options for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Handling of placeholders that name no column.
    pub undefined: UndefinedPolicy,
}

/// A compiled template bound to the rows of one table.
pub struct Pipeline {
    table: Table,
    template: Template,
}

impl Pipeline {
    /// Compile `template` and attach `table`.
    ///
    /// Fails with "no input found" when the table has no rows.
    pub fn new(table: Table, template: &str, options: &PipelineOptions) -> PipelineResult<Self> {
        let template = Template::compile(template, options.undefined)?;

        if table.is_empty() {
            return Err(SelectError::NoInput.into());
        }

        Ok(Self { table, template })
    }

    /// Build from an explicit list of files. Later files of a kind win.
    ///
    /// The template is compiled before the row check, so a broken template
    /// is reported even when the table is empty.
    pub fn from_files<P: AsRef<Path>>(paths: &[P], options: &PipelineOptions) -> PipelineResult<Self> {
        let inputs = gather(paths)?;
        let template = Template::compile(inputs.template_body(), options.undefined)?;
        let selection = inputs.finish()?;

        Ok(Self {
            table: selection.table,
            template,
        })
    }

    /// Build from the files directly inside `dir`.
    pub fn from_dir(dir: &Path, options: &PipelineOptions) -> PipelineResult<Self> {
        let paths = list_dir(dir)?;
        Self::from_files(&paths, options)
    }

    /// Render every row into `sink`, one line terminator after each.
    pub fn write<W: Write>(&self, sink: &mut W) -> PipelineResult<usize> {
        Ok(binder::render(&self.template, &self.table.rows, sink)?)
    }

    /// Render every row into a string.
    pub fn render_to_string(&self) -> PipelineResult<String> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        // Rendered text and terminators are all UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn header(&self) -> &Header {
        &self.table.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.table.rows
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Entries directly inside `dir`, sorted by file name. Not recursive.
pub fn list_dir(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let list_err = |source| PipelineError::ListDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = fs::read_dir(dir)
        .map_err(list_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(list_err)?;

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::debug!(dir = %dir.display(), entries = paths.len(), "listed input directory");

    Ok(paths)
}

/// Render every row of the inputs in `dir` and return the text.
pub fn run(dir: &Path, options: &PipelineOptions) -> PipelineResult<String> {
    Pipeline::from_dir(dir, options)?.render_to_string()
}

/// Render every row of the inputs in `dir` into `sink`.
pub fn run_to_writer<W: Write>(dir: &Path, options: &PipelineOptions, sink: &mut W) -> PipelineResult<usize> {
    Pipeline::from_dir(dir, options)?.write(sink)
}
