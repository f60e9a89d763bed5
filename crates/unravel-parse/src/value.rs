//! The value tree produced by unraveling.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use unravel_lexer::TokenValue;

/// A node of the value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text: words, variables, quoted strings (quotes kept), escapes and
    /// verbatim regions.
    Str(String),
    Int(i64),
    Float(f64),
    /// An ordered list.
    List(Vec<Value>),
    /// A key/value mapping.
    Map(Map),
}

impl Value {
    /// Shorthand for a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Whether this is a string, integer or float.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Int(_) | Value::Float(_))
    }

    /// Get a value by path.
    ///
    /// Path syntax: `key`, `key.nested`, `list[0]`, `key[1].nested`. The
    /// empty path is the value itself.
    pub fn get(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }

        let (segment, rest) = next_segment(path)?;
        let value = match (self, segment) {
            (Value::Map(map), Segment::Key(key)) => map.get(key)?,
            (Value::List(items), Segment::Index(index)) => items.get(index)?,
            _ => return None,
        };
        value.get(rest)
    }
}

impl From<TokenValue> for Value {
    fn from(value: TokenValue) -> Self {
        match value {
            TokenValue::Str(s) => Value::Str(s),
            TokenValue::Int(i) => Value::Int(i),
            TokenValue::Float(f) => Value::Float(f),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

/// An insertion-ordered mapping from string keys to values.
///
/// Inserting an existing key replaces its value in place: the last write
/// wins, the first occurrence keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for Map {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            out.serialize_entry(k, v)?;
        }
        out.end()
    }
}

/// One step of a [`Value::get`] path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'p> {
    Key(&'p str),
    Index(usize),
}

/// Split the first segment off a non-empty path.
///
/// Keys run up to the next `.` or `[` and never hold a `]`; indices are
/// decimal. A segment must be followed by the end, a `[`, or a `.` and more
/// path.
fn next_segment(path: &str) -> Option<(Segment<'_>, &str)> {
    let (segment, rest) = match path.strip_prefix('[') {
        Some(inner) => {
            let (index, rest) = inner.split_once(']')?;
            (Segment::Index(index.parse().ok()?), rest)
        }
        None => {
            let (key, rest) = path.split_at(path.find(['.', '[']).unwrap_or(path.len()));
            if key.is_empty() || key.contains(']') {
                return None;
            }
            (Segment::Key(key), rest)
        }
    };
    let rest = match rest.strip_prefix('.') {
        Some("") => return None,
        Some(rest) => rest,
        None if rest.is_empty() || rest.starts_with('[') => rest,
        None => return None,
    };
    Some((segment, rest))
}
