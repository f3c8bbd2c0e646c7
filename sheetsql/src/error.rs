//! Error types for the rendering pipeline.
//!
//! One error type per stage:
//!
//! - [`ReadError`] - Reading a table or template file
//! - [`SelectError`] - Picking the inputs out of a directory
//! - [`TemplateError`] - Compiling the statement template
//! - [`RenderError`] - Rendering rows into the output sink
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Conversion upward is automatic via `From`, so `?` works across stages.
//! [`PipelineError::kind`] folds everything back into the five
//! [`ErrorKind`]s reported to the operator.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Read Errors
// =============================================================================

/// Errors while reading one input file.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened or read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was read but is not valid tabular data.
    #[error("Invalid tabular data in {}: {message}", .path.display())]
    Format { path: PathBuf, message: String },
}

impl ReadError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn format(path: &Path, message: impl fmt::Display) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Malformed CSV text. Lines are 1-based and count physical lines, so a
/// quoted field spanning several lines advances the count.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("line {line}: bare \" in non-quoted field")]
    BareQuote { line: usize },

    #[error("line {line}: extraneous or missing \" in quoted field")]
    ExtraneousQuote { line: usize },

    #[error("line {line}: quoted field is never closed")]
    UnterminatedQuote { line: usize },

    #[error(transparent)]
    Parse(#[from] csv::Error),
}

// =============================================================================
// Selection Errors
// =============================================================================

/// Errors while classifying and loading the input files.
#[derive(Debug, Error)]
pub enum SelectError {
    /// A recognized input could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// No table source produced any data row.
    #[error("no input found")]
    NoInput,
}

// =============================================================================
// Template Errors
// =============================================================================

/// The template body could not be compiled.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid template: {0}")]
    Syntax(#[source] minijinja::Error),
}

// =============================================================================
// Render Errors
// =============================================================================

/// Errors while rendering rows into the sink.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A row could not be bound to the template.
    #[error("Failed to render row {row}: {source}")]
    Row {
        /// 1-based position among the rows handed to the renderer, header
        /// excluded. Spreadsheet rows that were blank after trimming are
        /// dropped before counting, so this is not the sheet row number.
        row: usize,
        source: minijinja::Error,
    },

    /// The sink rejected a write.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input directory could not be listed.
    #[error("Failed to list directory {}: {source}", .path.display())]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<ReadError> for PipelineError {
    fn from(err: ReadError) -> Self {
        Self::Select(SelectError::Read(err))
    }
}

impl PipelineError {
    /// Which of the five failure kinds this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ListDir { .. } => ErrorKind::Io,
            Self::Select(SelectError::Read(ReadError::Io { .. })) => ErrorKind::Io,
            Self::Select(SelectError::Read(ReadError::Format { .. })) => ErrorKind::Format,
            Self::Select(SelectError::NoInput) => ErrorKind::Configuration,
            Self::Template(_) => ErrorKind::Template,
            Self::Render(RenderError::Row { .. }) => ErrorKind::Render,
            Self::Render(RenderError::Io(_)) => ErrorKind::Io,
        }
    }
}

/// Failure taxonomy shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    Configuration,
    Template,
    Render,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Io => "io",
            Self::Format => "format",
            Self::Configuration => "configuration",
            Self::Template => "template",
            Self::Render => "render",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type ReadResult<T> = Result<T, ReadError>;

pub type SelectResult<T> = Result<T, SelectError>;

pub type TemplateResult<T> = Result<T, TemplateError>;

pub type RenderResult<T> = Result<T, RenderError>;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ReadError -> SelectError -> PipelineError
        let read_err = ReadError::format(Path::new("data.csv"), "bad quote");
        let pipeline_err: PipelineError = read_err.into();
        assert_eq!(pipeline_err.kind(), ErrorKind::Format);
        assert!(pipeline_err.to_string().contains("data.csv"));

        let pipeline_err: PipelineError = SelectError::NoInput.into();
        assert_eq!(pipeline_err.kind(), ErrorKind::Configuration);
        assert_eq!(pipeline_err.to_string(), "no input found");
    }

    #[test]
    fn test_io_kinds() {
        let io = || std::io::Error::new(std::io::ErrorKind::NotFound, "missing");

        let err: PipelineError = ReadError::io(Path::new("t.sql"), io()).into();
        assert_eq!(err.kind(), ErrorKind::Io);

        let err: PipelineError = RenderError::Io(io()).into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("Failed to write output"));
    }

    #[test]
    fn test_render_error_format() {
        let source = minijinja::Error::new(minijinja::ErrorKind::UndefinedError, "nope");
        let err = RenderError::Row { row: 3, source };
        let msg = err.to_string();
        assert!(msg.contains("row 3"));

        let err: PipelineError = err.into();
        assert_eq!(err.kind(), ErrorKind::Render);
    }
}
