//! Rendering.
//!
//! - Template: MiniJinja-backed statement template
//! - Binder: rows through the template into a sink
//! - Pipeline: directory listing, input selection and rendering end to end

pub mod binder;
pub mod pipeline;
pub mod template;

pub use binder::render;
pub use pipeline::*;
pub use template::{Template, UndefinedPolicy};
