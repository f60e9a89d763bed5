//! Format a [`Value`] as expression text.

use unravel_parse::{Map, Value};

use crate::FormatOptions;
use crate::scalar::{format_float, format_key, format_str};

/// Format a value as expression text.
///
/// Lists are written `[a,b]` and maps `{k=v}`. A list at the root is
/// written without brackets when it is empty, so that it reads back as the
/// empty top level.
///
/// Not everything reads back. Empty nested lists and maps come out as `[]`
/// and `{}`, which do not parse. A map value must start with an element or
/// a bracket, so strings that need a `\` there, and verbatim regions, read
/// back differently.
pub fn format_value(value: &Value, options: &FormatOptions) -> String {
    let mut out = String::new();
    match value {
        Value::List(items) if items.is_empty() => {}
        _ => write_value(&mut out, value, options),
    }
    out
}

/// Format a value with default options.
pub fn format_value_default(value: &Value) -> String {
    format_value(value, &FormatOptions::default())
}

fn write_value(out: &mut String, value: &Value, options: &FormatOptions) {
    match value {
        Value::Str(s) => out.push_str(&format_str(s)),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(options.separator());
                }
                write_value(out, item, options);
            }
            out.push(']');
        }
        Value::Map(map) => write_map(out, map, options),
    }
}

fn write_map(out: &mut String, map: &Map, options: &FormatOptions) {
    out.push('{');
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str(options.separator());
        }
        out.push_str(&format_key(key));
        out.push_str(options.equals());
        write_value(out, value, options);
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::str(text)
    }

    fn sample() -> Value {
        let opts: Map = [("retry", Value::Int(3)), ("ratio", Value::Float(0.5))]
            .into_iter()
            .collect();
        let map: Map = [
            ("hosts", Value::List(vec![s("db1"), s("db2")])),
            ("opts", Value::Map(opts)),
            ("cmd", s("$cmd")),
        ]
        .into_iter()
        .collect();
        Value::Map(map)
    }

    #[test]
    fn test_format_compact() {
        insta::assert_snapshot!(
            format_value_default(&sample()),
            @"{hosts=[db1,db2],opts={retry=3,ratio=0.5},cmd=$cmd}"
        );
    }

    #[test]
    fn test_format_relaxed() {
        insta::assert_snapshot!(
            format_value(&sample(), &FormatOptions::new().relaxed()),
            @"{hosts = [db1, db2], opts = {retry = 3, ratio = 0.5}, cmd = $cmd}"
        );
    }

    #[test]
    fn test_format_list_root() {
        let value = Value::List(vec![
            s("a"),
            Value::List(vec![s("b"), Value::Int(12)]),
            s("12"),
            s("(ls -la)"),
        ]);
        insta::assert_snapshot!(format_value_default(&value), @r"[a,[b,12],\12,(ls -la)]");
    }

    #[test]
    fn test_format_empty_root() {
        assert_eq!(format_value_default(&Value::List(vec![])), "");
        assert_eq!(format_value_default(&Value::List(vec![Value::List(vec![])])), "[[]]");
    }
}
