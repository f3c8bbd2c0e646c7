//! Statement template backed by MiniJinja.
//!
//! Placeholders use Jinja syntax, `{{ column }}`. The dotted field form
//! `{{.column}}` is accepted too and rewritten before compilation into a
//! lookup on a reserved binding, so columns named like Jinja keywords
//! (`none`, `true`, `not`) still resolve. Values are substituted verbatim:
//! there is no auto-escaping.
//!
//! ```rust
//! use sheetsql::transform::template::{Template, UndefinedPolicy};
//! use sheetsql::models::reconcile;
//!
//! let template = Template::compile("DELETE FROM t WHERE id = {{.id}};", UndefinedPolicy::Lenient).unwrap();
//! let row = reconcile(&["id".to_string()], ["7"]);
//! assert_eq!(template.render_row(&row).unwrap(), "DELETE FROM t WHERE id = 7;");
//! ```

use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::{TemplateError, TemplateResult};
use crate::models::Row;

const TEMPLATE_NAME: &str = "statement.sql";

/// Name under which the whole row is bound, next to its columns.
pub const ROW_VARIABLE: &str = "row";

/// Binding used by rewritten `{{.column}}` placeholders. Always the row,
/// whatever the columns are called.
pub const FIELDS_VARIABLE: &str = "__fields__";

static DOTTED_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{(-?)\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*(-?)\}\}").expect("valid regex")
});

/// How a placeholder naming an unknown column is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UndefinedPolicy {
    /// Render unknown names as empty text.
    #[default]
    Lenient,
    /// Fail the row (and the run) on any unknown name.
    Strict,
}

impl From<UndefinedPolicy> for UndefinedBehavior {
    fn from(policy: UndefinedPolicy) -> Self {
        match policy {
            UndefinedPolicy::Lenient => UndefinedBehavior::Lenient,
            UndefinedPolicy::Strict => UndefinedBehavior::Strict,
        }
    }
}

/// A compiled statement template. Immutable and shareable across threads.
pub struct Template {
    env: Environment<'static>,
}

impl Template {
    /// Compile a template body.
    pub fn compile(source: &str, policy: UndefinedPolicy) -> TemplateResult<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(policy.into());
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template_owned(TEMPLATE_NAME, normalize_placeholders(source).into_owned())
            .map_err(TemplateError::Syntax)?;

        Ok(Self { env })
    }

    /// Render the template with the row's columns as variables.
    pub fn render_row(&self, row: &Row) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        template.render(bind_row(row))
    }
}

/// Variables for one row: each column, plus the row itself as `row` so that
/// columns whose names are not identifiers stay reachable
/// (`{{ row["unit price"] }}`). A column called `row` takes precedence.
fn bind_row(row: &Row) -> BTreeMap<&str, Value> {
    let fields = Value::from_serialize(row);

    let mut vars: BTreeMap<&str, Value> = row
        .iter()
        .map(|(column, value)| (column, Value::from(value)))
        .collect();

    vars.entry(ROW_VARIABLE).or_insert_with(|| fields.clone());
    vars.insert(FIELDS_VARIABLE, fields);

    vars
}

/// Rewrite `{{.name}}` placeholders into `{{ __fields__["name"] }}`.
pub fn normalize_placeholders(source: &str) -> Cow<'_, str> {
    DOTTED_FIELD.replace_all(source, "{{${1} __fields__[\"${2}\"] ${3}}}")
}
