//! Input selection.
//!
//! Classifies the files of a run by extension and loads one template and one
//! table. There is no merging: when several files of the same kind are
//! given, the last one wins.
//!
//! [`select`] is [`gather`] followed by [`Inputs::finish`]. Callers that
//! need the template before the row check (to report a broken template
//! ahead of an empty table) run the two steps themselves.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReadError, ReadResult, SelectError, SelectResult};
use crate::models::{SourceKind, Table};
use crate::parser::read_table;

/// The inputs chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Template body; empty when the run has no template file.
    pub template: String,
    pub template_path: Option<PathBuf>,
    pub table: Table,
    pub table_path: PathBuf,
}

/// Everything read while walking the inputs, not yet checked for rows.
#[derive(Debug, Default)]
pub struct Inputs {
    template: Option<(PathBuf, String)>,
    table: Option<(PathBuf, Table)>,
}

impl Inputs {
    fn with(self, path: &Path, kind: SourceKind) -> ReadResult<Self> {
        match kind {
            SourceKind::Template => {
                let body = read_template(path)?;
                if let Some((previous, _)) = &self.template {
                    tracing::warn!(
                        previous = %previous.display(),
                        path = %path.display(),
                        "template replaced by a later file"
                    );
                }
                Ok(Self {
                    template: Some((path.to_path_buf(), body)),
                    ..self
                })
            }
            SourceKind::Table(format) => {
                let table = read_table(path, format)?;
                if let Some((previous, _)) = &self.table {
                    tracing::warn!(
                        previous = %previous.display(),
                        path = %path.display(),
                        "table replaced by a later file"
                    );
                }
                Ok(Self {
                    table: Some((path.to_path_buf(), table)),
                    ..self
                })
            }
        }
    }

    /// Template body read so far, empty when there is none.
    pub fn template_body(&self) -> &str {
        self.template
            .as_ref()
            .map(|(_, body)| body.as_str())
            .unwrap_or("")
    }

    /// Check that a table with rows was read and build the selection.
    pub fn finish(self) -> SelectResult<Selection> {
        let (table_path, table) = match self.table {
            Some((path, table)) if !table.is_empty() => (path, table),
            _ => return Err(SelectError::NoInput),
        };

        let (template_path, template) = match self.template {
            Some((path, body)) => (Some(path), body),
            None => {
                tracing::warn!("no template file found, rows will render empty");
                (None, String::new())
            }
        };

        Ok(Selection {
            template,
            template_path,
            table,
            table_path,
        })
    }
}

/// Classify a path, `None` when the file is not an input.
pub fn classify(path: &Path) -> Option<SourceKind> {
    SourceKind::from_path(path)
}

/// Read the recognized files among `paths`, in order.
///
/// Unrecognized files are skipped. The first read failure aborts.
pub fn gather<P: AsRef<Path>>(paths: &[P]) -> ReadResult<Inputs> {
    paths
        .iter()
        .map(|path| path.as_ref())
        .filter_map(|path| match classify(path) {
            Some(kind) => Some((path, kind)),
            None => {
                tracing::debug!(path = %path.display(), "skipping unrecognized file");
                None
            }
        })
        .try_fold(Inputs::default(), |inputs, (path, kind)| {
            tracing::debug!(path = %path.display(), %kind, "reading input");
            inputs.with(path, kind)
        })
}

/// Read the recognized files among `paths` and pick the inputs.
pub fn select<P: AsRef<Path>>(paths: &[P]) -> SelectResult<Selection> {
    gather(paths)?.finish()
}

/// Load a template body.
pub fn read_template(path: &Path) -> ReadResult<String> {
    fs::read_to_string(path).map_err(|e| ReadError::io(path, e))
}
