//! Lexical scanning primitives shared by the extractors.
//!
//! Everything here is positional byte scanning over the raw source text.
//! There is deliberately no lexer underneath: delimiters are balanced by
//! plain character counting, so a bracket inside a string literal or a
//! comment corrupts the count. That limitation is accepted and kept behind
//! these three functions so a stricter matcher could be swapped in without
//! touching the extractors.
//!
//! All delimiters handled here are ASCII, which keeps byte offsets valid as
//! `&str` slice boundaries on arbitrary UTF-8 input.

use tracing::trace;

/// Find the end of a balanced delimiter span.
///
/// `open_pos` must hold `open`. Scans forward from the next byte with a
/// depth counter starting at 1 and returns the position one past the byte
/// that brings the depth back to 0, or `None` when the text ends first.
pub fn matching_span(text: &str, open_pos: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open_pos), Some(&open));

    let mut depth = 1usize;
    let mut i = open_pos + 1;
    while i < bytes.len() {
        if bytes[i] == open {
            depth += 1;
        } else if bytes[i] == close {
            depth -= 1;
            if depth == 0 {
                return Some(i + 1);
            }
        }
        i += 1;
    }
    None
}

/// Find the quoted value of a named argument, e.g. `name="ping"`.
///
/// Tries the pattern `key=` before `key =`; the first pattern present
/// anywhere in the text wins, regardless of which occurs earlier. From the
/// end of the match, runtime whitespace is skipped and a single- or
/// double-quoted literal is expected. The literal ends at the next
/// occurrence of the same quote character; escape sequences are not
/// understood, so an escaped quote terminates the value early.
pub fn find_string_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let mut start = None;
    for pattern in [format!("{key}="), format!("{key} =")] {
        if let Some(pos) = text.find(&pattern) {
            start = Some(pos + pattern.len());
            break;
        }
    }

    let bytes = text.as_bytes();
    let mut i = start?;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n') {
        i += 1;
    }

    let quote = *bytes.get(i)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    i += 1;

    let end = text[i..].find(quote as char)? + i;
    trace!("Found value for {}: {}", key, &text[i..end]);
    Some(&text[i..end])
}

/// Find the JSON object block following a key, e.g. `inputSchema={...}`.
///
/// Locates the first occurrence of `start_key`, then the first `{` after
/// it, and returns the balanced-brace span including both braces. `None`
/// when the key is absent, no `{` follows it, or the span never balances.
pub fn extract_json_block<'a>(text: &'a str, start_key: &str) -> Option<&'a str> {
    let key_pos = text.find(start_key)?;
    let brace_pos = text[key_pos..].find('{')? + key_pos;
    let end = matching_span(text, brace_pos, b'{', b'}')?;
    Some(&text[brace_pos..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_span_flat() {
        let text = "f(a, b) rest";
        assert_eq!(matching_span(text, 1, b'(', b')'), Some(7));
    }

    #[test]
    fn test_matching_span_nested() {
        let text = "{a: {b: {c: 1}}, d: 2} tail";
        assert_eq!(matching_span(text, 0, b'{', b'}'), Some(22));
        assert_eq!(&text[0..22], "{a: {b: {c: 1}}, d: 2}");
    }

    #[test]
    fn test_matching_span_unbalanced() {
        let text = "f(a, (b, c)";
        assert_eq!(matching_span(text, 1, b'(', b')'), None);
    }

    #[test]
    fn test_matching_span_ignores_string_context() {
        // Character counting only: the paren inside the literal closes the
        // span early. Accepted limitation.
        let text = r#"f("...)" , x)"#;
        assert_eq!(matching_span(text, 1, b'(', b')'), Some(7));
    }

    #[test]
    fn test_find_string_value_double_quoted() {
        assert_eq!(
            find_string_value(r#"name="ping", rest"#, "name"),
            Some("ping")
        );
    }

    #[test]
    fn test_find_string_value_single_quoted_with_spacing() {
        assert_eq!(
            find_string_value("description = \t\n 'does things'", "description"),
            Some("does things")
        );
    }

    #[test]
    fn test_find_string_value_pattern_trial_order() {
        // `key=` is tried first and wins even though `key =` occurs earlier
        // in the text.
        let text = r#"name = 'first', name='second'"#;
        assert_eq!(find_string_value(text, "name"), Some("second"));
    }

    #[test]
    fn test_find_string_value_missing_key() {
        assert_eq!(find_string_value("description='x'", "name"), None);
    }

    #[test]
    fn test_find_string_value_no_quote_after_key() {
        assert_eq!(find_string_value("name=ping", "name"), None);
        assert_eq!(find_string_value("name=", "name"), None);
    }

    #[test]
    fn test_find_string_value_unterminated_quote() {
        assert_eq!(find_string_value(r#"name="ping"#, "name"), None);
    }

    #[test]
    fn test_find_string_value_escaped_quote_terminates_early() {
        // No escape handling: the backslash-quote ends the literal.
        assert_eq!(find_string_value(r"name='it\'s'", "name"), Some(r"it\"));
    }

    #[test]
    fn test_extract_json_block_nested() {
        let text = r#"inputSchema={"type":"object","properties":{"a":{"type":"string"}}}, tail"#;
        assert_eq!(
            extract_json_block(text, "inputSchema"),
            Some(r#"{"type":"object","properties":{"a":{"type":"string"}}}"#)
        );
    }

    #[test]
    fn test_extract_json_block_key_absent() {
        assert_eq!(extract_json_block("no schema here {}", "inputSchema"), None);
    }

    #[test]
    fn test_extract_json_block_no_brace_after_key() {
        assert_eq!(extract_json_block("inputSchema=[1,2]", "inputSchema"), None);
    }

    #[test]
    fn test_extract_json_block_unbalanced() {
        assert_eq!(
            extract_json_block(r#"inputSchema={"type":"object""#, "inputSchema"),
            None
        );
    }
}
