// String literal decoding and docstring cleanup

/// Decode a single Python string literal as written in source.
///
/// Returns `None` for bytes and f-string literals, which never act as
/// docstrings and have no static text value.
pub fn decode_string(text: &str) -> Option<String> {
    let quote_at = text.find(|c| c == '"' || c == '\'')?;
    let prefix = text[..quote_at].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }
    let raw = prefix.contains('r');
    let quoted = &text[quote_at..];

    let body = if quoted.len() >= 6 && (quoted.starts_with("\"\"\"") || quoted.starts_with("'''")) {
        &quoted[3..quoted.len() - 3]
    } else if quoted.len() >= 2 {
        &quoted[1..quoted.len() - 1]
    } else {
        return None;
    };

    if raw {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Resolve backslash escapes the way the Python tokenizer does for `str`.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut digits = String::from(next);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                push_code_point(&mut out, &digits, 8, &format!("\\{}", digits));
            }
            'x' => push_hex_escape(&mut out, &mut chars, 'x', 2),
            'u' => push_hex_escape(&mut out, &mut chars, 'u', 4),
            'U' => push_hex_escape(&mut out, &mut chars, 'U', 8),
            other => {
                // Unknown escapes (and \N{...}) are kept as written
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

fn push_hex_escape(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    marker: char,
    width: usize,
) {
    let mut digits = String::new();
    while digits.len() < width {
        match chars.peek() {
            Some(d) if d.is_ascii_hexdigit() => {
                digits.push(*d);
                chars.next();
            }
            _ => break,
        }
    }
    let written = format!("\\{}{}", marker, digits);
    if digits.len() == width {
        push_code_point(out, &digits, 16, &written);
    } else {
        out.push_str(&written);
    }
}

fn push_code_point(out: &mut String, digits: &str, radix: u32, fallback: &str) {
    match u32::from_str_radix(digits, radix).ok().and_then(char::from_u32) {
        Some(ch) => out.push(ch),
        None => out.push_str(fallback),
    }
}

/// Clean up a docstring's indentation like `inspect.cleandoc`.
///
/// Tabs expand to 8 columns, the first line loses its leading whitespace,
/// the common indentation of the remaining lines is removed, and leading
/// and trailing empty lines are dropped.
pub fn clean_doc(doc: &str) -> String {
    let expanded = expand_tabs(doc, 8);
    let lines: Vec<&str> = expanded.split('\n').collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let content = line.trim_start_matches(' ');
            (!content.is_empty()).then(|| line.len() - content.len())
        })
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        cleaned.push(first.trim_start().to_string());
    }
    for line in lines.iter().skip(1) {
        let cut = margin.min(line.len() - line.trim_start_matches(' ').len());
        cleaned.push(line[cut..].to_string());
    }

    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    let leading = cleaned.iter().take_while(|l| l.is_empty()).count();

    cleaned[leading..].join("\n")
}

fn expand_tabs(text: &str, tab_size: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = tab_size - (column % tab_size);
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_strings() {
        assert_eq!(decode_string("\"hello\""), Some("hello".to_string()));
        assert_eq!(decode_string("'hello'"), Some("hello".to_string()));
        assert_eq!(decode_string("''"), Some(String::new()));
    }

    #[test]
    fn test_decode_triple_quoted() {
        assert_eq!(
            decode_string("\"\"\"Line one.\nLine two.\"\"\""),
            Some("Line one.\nLine two.".to_string())
        );
        assert_eq!(decode_string("'''x'''"), Some("x".to_string()));
        assert_eq!(decode_string("\"\"\"\"\"\""), Some(String::new()));
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(decode_string(r#""a\tb""#), Some("a\tb".to_string()));
        assert_eq!(decode_string(r#""it\'s""#), Some("it's".to_string()));
        assert_eq!(decode_string(r#""\x41é\101""#), Some("AéA".to_string()));
        assert_eq!(decode_string("\"one \\\ntwo\""), Some("one two".to_string()));
        assert_eq!(decode_string(r#""\d""#), Some("\\d".to_string()));
    }

    #[test]
    fn test_decode_prefixes() {
        assert_eq!(decode_string(r#"r"\d+""#), Some("\\d+".to_string()));
        assert_eq!(decode_string(r#"u"text""#), Some("text".to_string()));
        assert_eq!(decode_string(r#"b"bytes""#), None);
        assert_eq!(decode_string(r#"f"{x}""#), None);
        assert_eq!(decode_string(r#"Rb"x""#), None);
    }

    #[test]
    fn test_clean_doc_indentation() {
        let doc = "\n    Summary line.\n\n    Details here.\n      Nested.\n    ";
        assert_eq!(clean_doc(doc), "Summary line.\n\nDetails here.\n  Nested.");
    }

    #[test]
    fn test_clean_doc_first_line_kept() {
        let doc = "Summary.\n        More text.\n        ";
        assert_eq!(clean_doc(doc), "Summary.\nMore text.");
    }

    #[test]
    fn test_clean_doc_tabs() {
        assert_eq!(clean_doc("A.\n\tB."), "A.\nB.");
    }

    #[test]
    fn test_clean_doc_empty() {
        assert_eq!(clean_doc(""), "");
        assert_eq!(clean_doc("\n\n"), "");
    }
}
