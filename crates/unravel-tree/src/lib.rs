#![doc = include_str!("../README.md")]
//! Parsing, diagnostics and formatting for unravel expressions.

mod diagnostic;
mod format;
mod options;
pub mod scalar;

pub use diagnostic::Diagnostic;
pub use format::{format_value, format_value_default};
pub use options::FormatOptions;
pub use unravel_parse::{Map, ParseError, ParseErrorKind, ParseOptions, Span, Tokenizer, Value};

/// Parse an expression into a value tree.
pub fn parse(source: &str) -> Result<Value, ParseError> {
    tracing::debug!(source, "parsing");
    unravel_parse::parse(source)
}

/// Parse an expression with options.
pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    tracing::debug!(source, ?options, "parsing");
    Tokenizer::new(source)?.parse_with(options)
}

/// Convert a value to a JSON value.
pub fn to_json(value: &Value) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(value)
}

/// Convert a value to a JSON string. Maps keep their key order.
pub fn to_json_string(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unravel_testhelpers::setup;

    #[test]
    fn test_parse_and_get() {
        setup();
        let value = parse("{hosts=[db1,db2],retry=3}").unwrap();
        assert_eq!(value.get("hosts[1]").and_then(Value::as_str), Some("db2"));
        assert_eq!(value.get("retry").and_then(Value::as_int), Some(3));
        assert_eq!(format_value_default(&value), "{hosts=[db1,db2],retry=3}");
    }

    #[test]
    fn test_parse_with_options() {
        setup();
        let value = parse_with("{a=1}", &ParseOptions::new().keep_singleton()).unwrap();
        assert_eq!(value.get("[0].a").and_then(Value::as_int), Some(1));
    }

    #[test]
    fn test_json_string() {
        setup();
        let value = parse("a b,c").unwrap();
        assert_eq!(to_json_string(&value).unwrap(), r#"["a",["b","c"]]"#);
    }
}
