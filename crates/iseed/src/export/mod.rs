//! Rendering of fetched rows as PHP source.
//!
//! - [`php`]: literal rendering of values and row batches
//! - [`indent`]: quote-aware re-indentation of the rendered literal

pub mod indent;
pub mod php;

pub use indent::Indenter;
pub use php::{escape_single_quoted, export_rows, string_literal, value_literal};

use crate::models::TableRow;

/// One indentation level in generated files.
pub const INDENT: &str = "    ";

/// Nesting level of the statements inside the seeder's `run()` method.
pub const STATEMENT_DEPTH: usize = 2;

/// Renders `rows` as an array literal indented to sit inside `run()`.
pub fn render_batch(rows: &[TableRow], indexed: bool) -> String {
    Indenter::new(INDENT, STATEMENT_DEPTH).reindent(&export_rows(rows, indexed))
}
