//! Choosing how a scalar is written.
//!
//! A string is written the first way in this list that reads back as the
//! same string:
//!
//! 1. bare, when it lexes as a single word, variable or quoted string;
//! 2. as written, when it is a whole verbatim region like `(a b)`;
//! 3. behind a `\`, when it lexes as escapes followed by one other token;
//! 4. quoted. Quoted strings keep their quotes when parsed, so this form
//!    does not read back as the same string.

use std::borrow::Cow;

use unravel_lexer::{TokenKind, expression_grammar};
use unravel_parse::Value;

/// Kinds of the tokens `s` lexes to, or `None` if it does not lex.
fn token_kinds(s: &str) -> Option<Vec<TokenKind>> {
    let lexed = expression_grammar().lex(s).ok()?;
    Some(lexed.tokens.iter().map(|t| t.kind).collect())
}

/// Check if a string can be written as is and read back as a string.
pub fn can_be_bare(s: &str) -> bool {
    matches!(
        token_kinds(s).as_deref(),
        Some([TokenKind::Word | TokenKind::Variable | TokenKind::Quote])
    )
}

/// Check if a string is exactly one verbatim region.
pub fn is_verbatim(s: &str) -> bool {
    s.starts_with('(')
        && matches!(
            unravel_parse::parse(s),
            Ok(Value::List(items)) if items.len() == 1 && items[0].as_str() == Some(s)
        )
}

/// Check if a string reads back as itself behind a single `\`.
///
/// The escapes must be followed by one other token; a trailing escape
/// would leave nothing to protect.
pub fn can_be_escaped(s: &str) -> bool {
    match token_kinds(s).as_deref() {
        Some([escapes @ .., payload]) => {
            *payload != TokenKind::Escape && escapes.iter().all(|k| *k == TokenKind::Escape)
        }
        _ => false,
    }
}

/// Escape a string for quoted output.
///
/// Returns the escaped content (without surrounding quotes).
pub fn escape_quoted(s: &str) -> Cow<'_, str> {
    if !s.contains(['"', '\\']) {
        return Cow::Borrowed(s);
    }
    let mut result = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    Cow::Owned(result)
}

/// The written form of a string.
pub fn format_str(s: &str) -> Cow<'_, str> {
    if can_be_bare(s) || is_verbatim(s) {
        Cow::Borrowed(s)
    } else if can_be_escaped(s) {
        Cow::Owned(format!("\\{s}"))
    } else {
        Cow::Owned(format!("\"{}\"", escape_quoted(s)))
    }
}

/// The written form of a map key.
///
/// Keys are read as the text of a single element token, numbers included.
pub fn format_key(key: &str) -> Cow<'_, str> {
    match token_kinds(key).as_deref() {
        Some([kind]) if kind.is_element() => Cow::Borrowed(key),
        _ => Cow::Owned(format!("\"{}\"", escape_quoted(key))),
    }
}

/// The written form of a float. Always has a `.` so it reads back as a
/// float; never uses an exponent.
pub fn format_float(f: f64) -> String {
    let s = f.to_string();
    if s.contains('.') || !f.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_be_bare() {
        assert!(can_be_bare("hello"));
        assert!(can_be_bare("/usr/bin"));
        assert!(can_be_bare("$home"));
        assert!(can_be_bare("\"a b\""));
        assert!(!can_be_bare("12"));
        assert!(!can_be_bare("a b"));
        assert!(!can_be_bare(""));
        assert!(!can_be_bare("{"));
    }

    #[test]
    fn test_is_verbatim() {
        assert!(is_verbatim("(a b)"));
        assert!(is_verbatim("(x(y)z)"));
        assert!(!is_verbatim("(a)(b)"));
        assert!(!is_verbatim("(a"));
        assert!(!is_verbatim("a"));
    }

    #[test]
    fn test_format_str() {
        assert_eq!(format_str("hello"), "hello");
        assert_eq!(format_str("12"), "\\12");
        assert_eq!(format_str("-1.5"), "\\-1.5");
        assert_eq!(format_str(","), "\\,");
        assert_eq!(format_str("\\x"), "\\\\x");
        assert_eq!(format_str("\\"), "\"\\\\\"");
        assert_eq!(format_str("\\\\"), "\"\\\\\\\\\"");
        assert!(!can_be_escaped("\\"));
        assert_eq!(format_str("(a b)"), "(a b)");
        assert_eq!(format_str("a b"), "\"a b\"");
        assert_eq!(format_str("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_format_key() {
        assert_eq!(format_key("name"), "name");
        assert_eq!(format_key("1"), "1");
        assert_eq!(format_key("a b"), "\"a b\"");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(1e20), "100000000000000000000.0");
    }
}
