//! Best-effort parser for comma-delimited tabular input.
//!
//! Handles quoted fields containing commas, doubled-quote escapes, and
//! embedded newlines. Logical rows are reassembled line-by-line until
//! quote characters balance, so a quoted field may span physical lines.
//! Malformed input never fails: an unterminated quote at end of input
//! flushes whatever was accumulated as a final row.

/// Parse delimited text into rows of fields.
///
/// Each field is trimmed and stripped of one surrounding pair of quote
/// characters; doubled quotes inside a quoted field resolve to one
/// literal quote. Blank physical lines yield single-empty-field rows,
/// which downstream normalization skips.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut logical_rows = Vec::new();
    let mut buf = String::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !buf.is_empty() {
            buf.push('\n');
        }
        buf.push_str(line);
        // A row is complete only when all quotes balance.
        if buf.matches('"').count() % 2 == 0 {
            logical_rows.push(std::mem::take(&mut buf));
        }
    }
    if !buf.is_empty() {
        logical_rows.push(buf);
    }

    logical_rows.iter().map(|row| split_row(row)).collect()
}

/// Split one logical row into fields, honoring quoted regions.
fn split_row(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = row.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Doubled quote inside a quoted field is one literal quote.
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(ch),
        }
    }
    fields.push(cur);

    fields.iter().map(|f| clean_field(f)).collect()
}

/// Trim whitespace, then strip one leading and one trailing quote.
///
/// Escape resolution already happened during the scan; this only removes
/// stray enclosing quotes that survived it.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    trimmed.strip_suffix('"').unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_row() {
        assert_eq!(parse("a,b,c"), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn quoted_comma_is_literal() {
        assert_eq!(parse(r#""a,b",c"#), vec![vec!["a,b", "c"]]);
    }

    #[test]
    fn doubled_quote_resolves_to_one() {
        assert_eq!(parse(r#""a""b",c"#), vec![vec!["a\"b", "c"]]);
    }

    #[test]
    fn quoted_field_spans_lines() {
        assert_eq!(parse("\"line1\nline2\",x"), vec![vec!["line1\nline2", "x"]]);
    }

    #[test]
    fn multi_row() {
        assert_eq!(
            parse("a,b\nc,d"),
            vec![vec!["a", "b"], vec!["c", "d"]]
        );
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            parse("a,b\r\nc,d"),
            vec![vec!["a", "b"], vec!["c", "d"]]
        );
    }

    #[test]
    fn unterminated_quote_flushes_final_row() {
        // No panic, no error: the open-quoted tail becomes the last row.
        assert_eq!(parse("a,b\n\"unterminated,tail"), vec![
            vec!["a", "b"],
            vec!["unterminated,tail"],
        ]);
    }

    #[test]
    fn fields_are_trimmed() {
        assert_eq!(parse(" a , b "), vec![vec!["a", "b"]]);
    }

    #[test]
    fn blank_line_yields_empty_row() {
        assert_eq!(parse("a\n\nb"), vec![
            vec!["a"],
            vec![""],
            vec!["b"],
        ]);
    }

    #[test]
    fn trailing_newline_yields_trailing_empty_row() {
        assert_eq!(parse("a,b\n"), vec![vec!["a", "b"], vec![""]]);
    }

    #[test]
    fn empty_quoted_field() {
        assert_eq!(parse(r#"a,"",c"#), vec![vec!["a", "", "c"]]);
    }

    #[test]
    fn embedded_newline_and_escape_together() {
        let parsed = parse("\"she said \"\"hi\"\"\nand left\",tail");
        assert_eq!(parsed, vec![vec!["she said \"hi\"\nand left", "tail"]]);
    }
}
