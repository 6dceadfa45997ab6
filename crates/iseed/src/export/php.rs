//! PHP literal rendering in the layout of `var_export`.

use std::fmt::Write;

use crate::models::{SeedValue, TableRow};

/// Renders a string as a PHP literal that evaluates to the same bytes.
pub fn string_literal(value: &str) -> String {
    if value.contains('\0') {
        return double_quoted(value.as_bytes());
    }
    single_quoted(value)
}

/// Escapes `value` for use between single quotes. Only `\` and `'` need
/// escaping; newlines and multi-byte characters are kept raw.
pub fn escape_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", escape_single_quoted(value))
}

/// Double-quoted form with every non-printable byte as `\xNN`; the result is
/// plain ASCII on one line.
fn double_quoted(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 2);
    out.push('"');
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'$' => out.push_str("\\$"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out.push('"');
    out
}

fn float_literal(value: f64) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        // Debug keeps a `.0` or exponent so PHP reads a float back.
        format!("{value:?}")
    }
}

/// Renders one scalar value.
pub fn value_literal(value: &SeedValue) -> String {
    match value {
        SeedValue::Null => "NULL".to_string(),
        SeedValue::Bool(true) => "true".to_string(),
        SeedValue::Bool(false) => "false".to_string(),
        // PHP has no literal for its smallest integer.
        SeedValue::Int(i64::MIN) => "-9223372036854775807-1".to_string(),
        SeedValue::Int(v) => v.to_string(),
        SeedValue::Float(v) => float_literal(*v),
        SeedValue::Text(s) => string_literal(s),
        SeedValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => string_literal(s),
            Err(_) => double_quoted(bytes),
        },
    }
}

/// Renders a batch of rows as a nested array literal, two spaces per level.
///
/// Indexed mode writes each row under its position (`0 => `), unindexed mode
/// lists rows without keys. Column names are always kept as keys.
pub fn export_rows(rows: &[TableRow], indexed: bool) -> String {
    let mut out = String::from("array (\n");

    for (i, row) in rows.iter().enumerate() {
        if indexed {
            let _ = writeln!(out, "  {i} => ");
        }
        out.push_str("  array (\n");
        for (column, value) in row.iter() {
            let _ = writeln!(
                out,
                "    {} => {},",
                string_literal(column),
                value_literal(value)
            );
        }
        out.push_str("  ),\n");
    }

    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: Vec<(&str, SeedValue)>) -> TableRow {
        values.into_iter().collect()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(value_literal(&SeedValue::Null), "NULL");
        assert_eq!(value_literal(&SeedValue::Bool(false)), "false");
        assert_eq!(value_literal(&SeedValue::Int(-42)), "-42");
        assert_eq!(
            value_literal(&SeedValue::Int(i64::MIN)),
            "-9223372036854775807-1"
        );
        assert_eq!(value_literal(&SeedValue::Float(1.0)), "1.0");
        assert_eq!(value_literal(&SeedValue::Float(0.1)), "0.1");
        assert_eq!(value_literal(&SeedValue::Float(f64::NAN)), "NAN");
        assert_eq!(value_literal(&SeedValue::Float(f64::NEG_INFINITY)), "-INF");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(string_literal("O'Reilly"), r"'O\'Reilly'");
        assert_eq!(string_literal(r"C:\temp\"), r"'C:\\temp\\'");
        assert_eq!(string_literal("line\nbreak"), "'line\nbreak'");
        assert_eq!(string_literal("héllo 日本"), "'héllo 日本'");
        assert_eq!(string_literal("a\0b"), r#""a\x00b""#);
    }

    #[test]
    fn test_bytes() {
        assert_eq!(value_literal(&SeedValue::Bytes(b"plain".to_vec())), "'plain'");
        assert_eq!(
            value_literal(&SeedValue::Bytes(vec![0xff, b'$', b'"', b'a'])),
            r#""\xff\$\"a""#
        );
    }

    #[test]
    fn test_export_indexed() {
        let rows = vec![
            row(vec![("id", SeedValue::Int(1)), ("name", SeedValue::Text("a".into()))]),
            row(vec![("id", SeedValue::Int(2)), ("name", SeedValue::Null)]),
        ];
        assert_eq!(
            export_rows(&rows, true),
            "array (\n  0 => \n  array (\n    'id' => 1,\n    'name' => 'a',\n  ),\n  1 => \n  array (\n    'id' => 2,\n    'name' => NULL,\n  ),\n)"
        );
    }

    #[test]
    fn test_export_unindexed_keeps_numeric_data() {
        let rows = vec![row(vec![
            ("id", SeedValue::Int(7)),
            ("note", SeedValue::Text("12 => x".into())),
        ])];
        assert_eq!(
            export_rows(&rows, false),
            "array (\n  array (\n    'id' => 7,\n    'note' => '12 => x',\n  ),\n)"
        );
    }

    #[test]
    fn test_export_empty() {
        assert_eq!(export_rows(&[], true), "array (\n)");
    }
}
