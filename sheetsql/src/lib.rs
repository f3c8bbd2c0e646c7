//! # sheetsql - one SQL statement per spreadsheet row
//!
//! sheetsql takes a directory holding a statement template (`.sql`) and a
//! table (`.csv` or `.xlsx`) and renders the template once per data row.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Directory  │────▶│   Source    │────▶│   Parser    │────▶│   Binder    │
//! │ (.sql/.csv) │     │  selection  │     │ (csv/xlsx)  │     │ (minijinja) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheetsql::{run, PipelineOptions};
//! use std::path::Path;
//!
//! let sql = run(Path::new("./batch"), &PipelineOptions::default()).unwrap();
//! print!("{}", sql);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - Rows, tables and source kinds
//! - [`parser`] - CSV and XLSX readers
//! - [`source`] - Input classification and selection
//! - [`transform`] - Template, binder and pipeline

// Core modules
pub mod error;
pub mod models;

// Reading
pub mod parser;
pub mod source;

// Rendering
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError,
    ErrorKind,
    PipelineError,
    PipelineResult,
    ReadError,
    RenderError,
    SelectError,
    TemplateError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{reconcile, Header, Row, SourceKind, Table, TableFormat};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    parse_delimited,
    read_delimited,
    read_spreadsheet,
    read_table,
};

// =============================================================================
// Re-exports - Selection
// =============================================================================

pub use source::{classify, gather, select, Inputs, Selection};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    list_dir,
    run,
    run_to_writer,
    Pipeline,
    PipelineOptions,
    Template,
    UndefinedPolicy,
};
