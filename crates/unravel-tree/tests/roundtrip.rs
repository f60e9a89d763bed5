//! Canonical text reads back as the tree it was written from.

use proptest::prelude::*;
use unravel_tree::{FormatOptions, Map, Value, format_value, format_value_default, parse};

fn word() -> impl Strategy<Value = Value> {
    "[a-z][a-z0-9_./-]{0,7}".prop_map(Value::Str)
}

/// Strings that only read back in list position: number-like text needs a
/// `\`, and verbatim regions are only verbatim outside map values.
fn list_only_str() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[0-9]{1,4}".prop_map(Value::Str),
        "\\([a-z]{1,4}( [a-z]{1,4})?\\)".prop_map(Value::Str),
        Just(Value::str(",")),
        Just(Value::str("=")),
    ]
}

fn number() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(|i| Value::Int(i64::from(i))),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
    ]
}

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,5}"
}

fn list(inner: impl Strategy<Value = Value>) -> impl Strategy<Value = Value> {
    prop::collection::vec(prop_oneof![inner, list_only_str()], 1..4).prop_map(Value::List)
}

fn map(inner: impl Strategy<Value = Value>) -> impl Strategy<Value = Value> {
    prop::collection::vec((key(), inner), 1..4)
        .prop_map(|entries| Value::Map(entries.into_iter().collect::<Map>()))
}

fn value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![word(), number()];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![list(inner.clone()), map(inner)]
    })
}

/// Roots are what a parse produces: a list or a map.
fn root() -> impl Strategy<Value = Value> {
    prop_oneof![list(value()), map(value())]
}

proptest! {
    #[test]
    fn compact_text_reads_back(value in root()) {
        let text = format_value_default(&value);
        let parsed = parse(&text).map_err(|e| TestCaseError::fail(e.caret()))?;
        prop_assert_eq!(parsed, value, "text: {}", text);
    }

    #[test]
    fn relaxed_text_reads_back(value in root()) {
        let text = format_value(&value, &FormatOptions::new().relaxed());
        let parsed = parse(&text).map_err(|e| TestCaseError::fail(e.caret()))?;
        prop_assert_eq!(parsed, value, "text: {}", text);
    }

    #[test]
    fn canonical_text_is_stable(value in root()) {
        let text = format_value_default(&value);
        let again = format_value_default(&parse(&text).map_err(|e| TestCaseError::fail(e.caret()))?);
        prop_assert_eq!(again, text);
    }
}

fn canonical(source: &str) -> String {
    format_value_default(&parse(source).unwrap())
}

#[test]
fn test_regrouping_is_explicit_in_canonical_text() {
    insta::assert_snapshot!(canonical("a,b c"), @"[a,[b,c]]");
    insta::assert_snapshot!(canonical("a b,c d"), @"[a,[b,c],d]");
    insta::assert_snapshot!(canonical("[1,2 3]"), @"[1,[2,3]]");
}

#[test]
fn test_assignments_become_maps() {
    insta::assert_snapshot!(canonical("a=1 b = x"), @"[{a=1},{b=x}]");
    insta::assert_snapshot!(canonical("{ a = 1 , a = 2 }"), @"{a=2}");
    insta::assert_snapshot!(canonical("opts={retry=3,hosts=[db1 db2]}"), @"{opts={retry=3,hosts=[db1,db2]}}");
}

#[test]
fn test_literal_text_survives() {
    insta::assert_snapshot!(canonical(r"run (ls -la) \12 $HOME"), @r"[run,(ls -la),\12,$HOME]");
    insta::assert_snapshot!(canonical(r#""a b",c"#), @r#"["a b",c]"#);
    insta::assert_snapshot!(canonical("1.0 -2 .5"), @"[1.0,-2,0.5]");
}
