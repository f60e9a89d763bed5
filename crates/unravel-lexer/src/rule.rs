//! Lexical rules: a pattern, a kind, and options.

use std::fmt;

use regex::Regex;

use crate::{GrammarError, TokenKind, TokenValue};

/// What a rule matches: literal text or a regular expression.
///
/// Regex patterns are anchored at construction, so matching never searches
/// past the start of the unconsumed text.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exact text.
    Literal(String),
    /// An anchored regular expression, plus the source it was built from.
    Regex { source: String, regex: Regex },
}

impl Pattern {
    /// A literal pattern.
    pub fn literal(text: impl Into<String>) -> Self {
        Pattern::Literal(text.into())
    }

    /// A regex pattern, anchored to the start of the text.
    pub fn regex(source: &str) -> Result<Self, GrammarError> {
        let regex = Regex::new(&format!(r"\A(?:{source})")).map_err(|e| {
            GrammarError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Pattern::Regex {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Literal(text) => text,
            Pattern::Regex { source, .. } => source,
        }
    }

    /// Byte length of the match at the start of `text`.
    ///
    /// Empty matches count as no match: a rule that consumes nothing would
    /// stall the lexer.
    pub fn match_len(&self, text: &str) -> Option<usize> {
        let len = match self {
            Pattern::Literal(literal) => text.starts_with(literal.as_str()).then_some(literal.len()),
            Pattern::Regex { regex, .. } => regex.find(text).map(|m| m.end()),
        }?;
        (len > 0).then_some(len)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Literal(a), Pattern::Literal(b)) => a == b,
            (Pattern::Regex { source: a, .. }, Pattern::Regex { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// Error from a value converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError(pub String);

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConvertError {}

/// Turns matched text into a token value.
pub type Converter = fn(&str) -> Result<TokenValue, ConvertError>;

/// Stock converters.
pub mod convert {
    use super::ConvertError;
    use crate::TokenValue;

    /// Parse as a base-10 `i64`.
    pub fn integer(text: &str) -> Result<TokenValue, ConvertError> {
        text.parse::<i64>()
            .map(TokenValue::Int)
            .map_err(|e| ConvertError(format!("invalid integer `{text}`: {e}")))
    }

    /// Parse as an `f64`.
    pub fn float(text: &str) -> Result<TokenValue, ConvertError> {
        text.parse::<f64>()
            .map(TokenValue::Float)
            .map_err(|e| ConvertError(format!("invalid float `{text}`: {e}")))
    }
}

/// Per-rule behavior.
#[derive(Debug, Clone, Default)]
pub struct RuleOptions {
    /// Applied to the matched text to produce the token value.
    pub converter: Option<Converter>,
    /// Consume the match but emit nothing.
    pub ignore: bool,
    /// Fail with this message when the rule matches.
    pub error: Option<String>,
    /// Counter bumped up on each match.
    pub increment: Option<String>,
    /// Counter bumped down on each match.
    pub decrement: Option<String>,
}

impl RuleOptions {
    /// Default options: emit the matched text as-is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert matched text with `converter`.
    pub fn convert_with(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Drop the token after matching.
    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Fail with `message` whenever this rule matches.
    pub fn raises(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Increment `counter` on each match.
    pub fn increment(mut self, counter: impl Into<String>) -> Self {
        self.increment = Some(counter.into());
        self
    }

    /// Decrement `counter` on each match.
    pub fn decrement(mut self, counter: impl Into<String>) -> Self {
        self.decrement = Some(counter.into());
        self
    }
}

/// One lexical rule.
#[derive(Debug, Clone)]
pub struct TokenRule {
    pattern: Pattern,
    kind: TokenKind,
    options: RuleOptions,
}

impl TokenRule {
    /// Create a rule producing `kind`.
    pub fn new(pattern: Pattern, kind: TokenKind, options: RuleOptions) -> Self {
        Self {
            pattern,
            kind,
            options,
        }
    }

    /// Create a rule from a kind name, rejecting names outside [`TokenKind`].
    pub fn named(pattern: Pattern, kind: &str, options: RuleOptions) -> Result<Self, GrammarError> {
        let kind =
            TokenKind::from_name(kind).ok_or_else(|| GrammarError::UnknownKind(kind.to_string()))?;
        Ok(Self::new(pattern, kind, options))
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    /// Whether matches of this rule are dropped.
    pub fn is_ignored(&self) -> bool {
        self.options.ignore
    }

    /// Byte length of this rule's match at the start of `text`.
    pub fn match_len(&self, text: &str) -> Option<usize> {
        self.pattern.match_len(text)
    }

    /// Produce the token value for matched text.
    pub fn convert(&self, text: &str) -> Result<TokenValue, ConvertError> {
        match self.options.converter {
            Some(converter) => converter(text),
            None => Ok(TokenValue::Str(text.to_string())),
        }
    }
}

/// Rules compare by what they match and what they do with it; converters
/// only by presence.
impl PartialEq for TokenRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.kind == other.kind
            && self.options.converter.is_some() == other.options.converter.is_some()
            && self.options.ignore == other.options.ignore
            && self.options.error == other.options.error
            && self.options.increment == other.options.increment
            && self.options.decrement == other.options.decrement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let pattern = Pattern::literal("(");
        assert_eq!(pattern.match_len("(a)"), Some(1));
        assert_eq!(pattern.match_len("a("), None);
        assert_eq!(pattern.match_len(""), None);
    }

    #[test]
    fn test_regex_is_anchored() {
        let pattern = Pattern::regex(r"[0-9]+").unwrap();
        assert_eq!(pattern.match_len("123abc"), Some(3));
        assert_eq!(pattern.match_len("abc123"), None);
    }

    #[test]
    fn test_regex_alternation_stays_anchored() {
        let pattern = Pattern::regex("a|b").unwrap();
        assert_eq!(pattern.match_len("xb"), None);
        assert_eq!(pattern.match_len("bx"), Some(1));
    }

    #[test]
    fn test_empty_match_is_no_match() {
        let pattern = Pattern::regex(r"[0-9]*").unwrap();
        assert_eq!(pattern.match_len("abc"), None);
        assert_eq!(pattern.match_len("1bc"), Some(1));
    }

    #[test]
    fn test_invalid_regex() {
        let err = Pattern::regex("(").unwrap_err();
        assert!(matches!(err, GrammarError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn test_named_rule() {
        let rule = TokenRule::named(Pattern::literal("="), "equals", RuleOptions::new()).unwrap();
        assert_eq!(rule.kind(), TokenKind::Equals);

        let err = TokenRule::named(Pattern::literal("="), "assign", RuleOptions::new()).unwrap_err();
        assert_eq!(err, GrammarError::UnknownKind("assign".to_string()));
    }

    #[test]
    fn test_converters() {
        assert_eq!(convert::integer("+5"), Ok(TokenValue::Int(5)));
        assert_eq!(convert::integer("-12"), Ok(TokenValue::Int(-12)));
        assert!(convert::integer("99999999999999999999").is_err());
        assert_eq!(convert::float(".5"), Ok(TokenValue::Float(0.5)));
        assert_eq!(convert::float("-1.25"), Ok(TokenValue::Float(-1.25)));
    }

    #[test]
    fn test_rule_without_converter_keeps_text() {
        let rule = TokenRule::new(Pattern::literal(","), TokenKind::Comma, RuleOptions::new());
        assert_eq!(rule.convert(","), Ok(TokenValue::Str(",".to_string())));
    }
}
