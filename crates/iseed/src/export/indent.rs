//! Quote-aware re-indentation of rendered array literals.
//!
//! The scanner consumes one code point at a time and only counts brackets
//! while outside a string literal, so data such as `'a) b('` never shifts
//! the indentation. Lines that begin inside a multi-line string are string
//! data and are passed through untouched.

/// Scanner position relative to string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    OutsideString,
    InsideString { delimiter: char, escaped: bool },
}

impl ScanState {
    fn is_inside(&self) -> bool {
        matches!(self, ScanState::InsideString { .. })
    }
}

/// Bracket movement found on one line, outside of strings.
#[derive(Debug, Default)]
struct LineScan {
    /// `)` before any other character on the line.
    leading_closes: usize,
    opens: usize,
    closes: usize,
}

#[derive(Debug)]
pub struct Indenter<'a> {
    unit: &'a str,
    depth: usize,
    state: ScanState,
}

impl<'a> Indenter<'a> {
    /// `depth` is the nesting level of the line holding the literal's first line.
    pub fn new(unit: &'a str, depth: usize) -> Self {
        Self {
            unit,
            depth,
            state: ScanState::OutsideString,
        }
    }

    /// Re-indents `text`. The first line is kept as-is since it continues the
    /// statement it is embedded in.
    pub fn reindent(mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 2);

        for (i, line) in text.split('\n').enumerate() {
            if i == 0 {
                let scan = self.scan(line);
                self.apply(&scan, 0);
                out.push_str(line);
                continue;
            }

            out.push('\n');

            if self.state.is_inside() {
                let scan = self.scan(line);
                self.apply(&scan, 0);
                out.push_str(line);
                continue;
            }

            let line = line.trim_start();
            let scan = self.scan(line);
            self.depth = self.depth.saturating_sub(scan.leading_closes);
            for _ in 0..self.depth {
                out.push_str(self.unit);
            }
            out.push_str(line);
            self.apply(&scan, scan.leading_closes);
        }

        out
    }

    fn apply(&mut self, scan: &LineScan, already_closed: usize) {
        self.depth = (self.depth + scan.opens).saturating_sub(scan.closes - already_closed);
    }

    fn scan(&mut self, line: &str) -> LineScan {
        let mut scan = LineScan::default();
        let mut leading = !self.state.is_inside();

        for c in line.chars() {
            self.state = match self.state {
                ScanState::OutsideString => match c {
                    '\'' | '"' => {
                        leading = false;
                        ScanState::InsideString {
                            delimiter: c,
                            escaped: false,
                        }
                    }
                    '(' => {
                        leading = false;
                        scan.opens += 1;
                        ScanState::OutsideString
                    }
                    ')' => {
                        if leading {
                            scan.leading_closes += 1;
                        }
                        scan.closes += 1;
                        ScanState::OutsideString
                    }
                    _ => {
                        leading = false;
                        ScanState::OutsideString
                    }
                },
                ScanState::InsideString {
                    delimiter,
                    escaped: true,
                } => ScanState::InsideString {
                    delimiter,
                    escaped: false,
                },
                ScanState::InsideString {
                    delimiter,
                    escaped: false,
                } => {
                    if c == '\\' {
                        ScanState::InsideString {
                            delimiter,
                            escaped: true,
                        }
                    } else if c == delimiter {
                        ScanState::OutsideString
                    } else {
                        self.state
                    }
                }
            };
        }

        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reindent(text: &str) -> String {
        Indenter::new("  ", 0).reindent(text)
    }

    #[test]
    fn test_nested_arrays() {
        let text = "array (\n0 => \narray (\n'id' => 1,\n),\n)";
        assert_eq!(
            reindent(text),
            "array (\n  0 => \n  array (\n    'id' => 1,\n  ),\n)"
        );
    }

    #[test]
    fn test_base_depth() {
        let text = "array (\n'a' => 1,\n)";
        assert_eq!(
            Indenter::new("    ", 2).reindent(text),
            "array (\n            'a' => 1,\n        )"
        );
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        let text = "array (\n'a' => ')(',\n'b' => 'x(',\n'c' => 1,\n)";
        assert_eq!(
            reindent(text),
            "array (\n  'a' => ')(',\n  'b' => 'x(',\n  'c' => 1,\n)"
        );
    }

    #[test]
    fn test_escaped_quote_does_not_close_string() {
        let text = "array (\n'a' => 'it\\'s (',\n'b' => 2,\n)";
        assert_eq!(
            reindent(text),
            "array (\n  'a' => 'it\\'s (',\n  'b' => 2,\n)"
        );
    }

    #[test]
    fn test_escaped_backslash_before_closing_quote() {
        let text = "array (\n'a' => 'dir\\\\',\n'b' => '(',\n)";
        assert_eq!(
            reindent(text),
            "array (\n  'a' => 'dir\\\\',\n  'b' => '(',\n)"
        );
    }

    #[test]
    fn test_multiline_string_is_verbatim() {
        let text = "array (\n'a' => 'first\n   ) indented\n(last',\n'b' => 1,\n)";
        assert_eq!(
            reindent(text),
            "array (\n  'a' => 'first\n   ) indented\n(last',\n  'b' => 1,\n)"
        );
    }

    #[test]
    fn test_double_quoted_strings() {
        let text = "array (\n'a' => \"\\x00\\\")\",\n'b' => 1,\n)";
        assert_eq!(
            reindent(text),
            "array (\n  'a' => \"\\x00\\\")\",\n  'b' => 1,\n)"
        );
    }
}
