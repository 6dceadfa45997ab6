//! Seeder template population.
//!
//! The template is plain text with five tokens: `{{class}}`, `{{table}}`,
//! `{{insert_statements}}`, `{{prerun_event}}` and `{{postrun_event}}`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::SeedError;
use crate::export::{self, INDENT, STATEMENT_DEPTH};
use crate::models::TableRow;

/// Template shipped with the binary.
pub const DEFAULT_STUB: &str = include_str!("../templates/seed.stub");

/// Batch size used when none (or zero) is requested.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

const NEWLINE: &str = "\n";

pub const PRERUN_FAILURE: &str = "Prerun event failed, seed wasn't executed!";
pub const POSTRUN_FAILURE: &str = "Seed was executed but the postrun event failed!";

static HOOK_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\\?[A-Za-z_][A-Za-z0-9_]*(\\[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("hook class pattern is valid")
});

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(class|table|insert_statements|prerun_event|postrun_event)\}\}")
        .expect("token pattern is valid")
});

/// Loads the template from `path`, or returns the embedded one.
pub fn load_stub(path: Option<&Path>) -> Result<String, SeedError> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map(|s| s.lines().collect::<Vec<_>>().join(NEWLINE))
            .map_err(|e| SeedError::io(path, e)),
        None => Ok(DEFAULT_STUB.to_string()),
    }
}

fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

/// Rejects hook names that are not PHP class names, since they are pasted into code.
pub fn validate_hook(name: &str) -> Result<(), SeedError> {
    if HOOK_CLASS.is_match(name) {
        Ok(())
    } else {
        Err(SeedError::InvalidHook(name.to_string()))
    }
}

/// Guarded hook invocation; the seed run throws `failure` if the hook returns false.
fn hook_block(hook: Option<&str>, failure: &str) -> String {
    let Some(hook) = hook else {
        return String::new();
    };

    let inner = indent(STATEMENT_DEPTH);
    let nested = indent(STATEMENT_DEPTH + 1);
    [
        format!("$response = Event::until(new {hook}());"),
        format!("{inner}if ($response === false) {{"),
        format!("{nested}throw new Exception(\"{failure}\");"),
        format!("{inner}}}"),
    ]
    .join(NEWLINE)
}

/// Number of batches `total` rows split into.
pub fn batch_count(total: usize, chunk_size: usize) -> usize {
    total.div_ceil(effective_chunk_size(chunk_size))
}

pub fn effective_chunk_size(chunk_size: usize) -> usize {
    if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    }
}

/// One insert statement per batch. The first starts on a new line, later ones
/// are separated by a blank line.
pub fn insert_statements(table: &str, rows: &[TableRow], chunk_size: usize, indexed: bool) -> String {
    let table_literal = export::string_literal(table);
    let mut inserts = String::new();

    for (i, chunk) in rows.chunks(effective_chunk_size(chunk_size)).enumerate() {
        inserts.push_str(NEWLINE);
        if i > 0 {
            inserts.push_str(NEWLINE);
        }
        inserts.push_str(&indent(STATEMENT_DEPTH));
        inserts.push_str(&format!(
            "Db::table({table_literal})->insert({});",
            export::render_batch(chunk, indexed)
        ));
    }

    inserts
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct StubContext<'a> {
    pub class: &'a str,
    pub table: &'a str,
    pub rows: &'a [TableRow],
    pub chunk_size: usize,
    pub prerun_event: Option<&'a str>,
    pub postrun_event: Option<&'a str>,
    pub indexed: bool,
}

/// Fills `stub` with the seeder contents.
pub fn populate_stub(stub: &str, ctx: &StubContext<'_>) -> Result<String, SeedError> {
    for hook in [ctx.prerun_event, ctx.postrun_event].into_iter().flatten() {
        validate_hook(hook)?;
    }

    let inserts = insert_statements(ctx.table, ctx.rows, ctx.chunk_size, ctx.indexed);
    let table = export::escape_single_quoted(ctx.table);
    let prerun = hook_block(ctx.prerun_event, PRERUN_FAILURE);
    let postrun = hook_block(ctx.postrun_event, POSTRUN_FAILURE);

    // Single pass: substituted text is never scanned for tokens again.
    let filled = TOKEN.replace_all(stub, |caps: &regex::Captures<'_>| match &caps[1] {
        "class" => ctx.class,
        "table" => table.as_str(),
        "insert_statements" => inserts.as_str(),
        "prerun_event" => prerun.as_str(),
        _ => postrun.as_str(),
    });
    Ok(filled.into_owned())
}
