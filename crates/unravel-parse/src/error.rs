//! Parse errors.

use std::fmt;

use unravel_lexer::{LexError, Span};

/// The kind of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The lexer could not match the text, or a lexer rule refused it.
    UnmatchableText,
    /// A token that cannot appear where it was found.
    InvalidCharacter,
    /// A closing bracket with no matching opener at this level.
    UnexpectedClose,
    /// Two items with no delimiter between them.
    DelimiterExpected,
    /// A delimiter where an item was required.
    ItemExpected,
    /// A comma in a level that already settled on whitespace.
    WhitespaceExpected,
    /// Input ended inside a bracket, hash or verbatim region.
    UnexpectedEnd,
    /// Brackets, hashes or regrouped levels nested past the depth limit.
    NestingTooDeep,
}

impl ParseErrorKind {
    /// The kind's name, as used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ParseErrorKind::UnmatchableText => "UnmatchableText",
            ParseErrorKind::InvalidCharacter => "InvalidCharacter",
            ParseErrorKind::UnexpectedClose => "UnexpectedClose",
            ParseErrorKind::DelimiterExpected => "DelimiterExpected",
            ParseErrorKind::ItemExpected => "ItemExpected",
            ParseErrorKind::WhitespaceExpected => "WhitespaceExpected",
            ParseErrorKind::UnexpectedEnd => "UnexpectedEnd",
            ParseErrorKind::NestingTooDeep => "NestingTooDeep",
        }
    }

    /// Message used when the raiser gives none.
    pub fn default_message(&self) -> &'static str {
        match self {
            ParseErrorKind::UnmatchableText => "Unexpected character",
            ParseErrorKind::InvalidCharacter => "Invalid character",
            ParseErrorKind::UnexpectedClose => "Unexpected close",
            ParseErrorKind::DelimiterExpected => "Delimiter expected",
            ParseErrorKind::ItemExpected => "Item expected",
            ParseErrorKind::WhitespaceExpected => "Whitespace expected",
            ParseErrorKind::UnexpectedEnd => "Unexpected end of input",
            ParseErrorKind::NestingTooDeep => "Maximum nesting depth exceeded",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A positional parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// The offending text, if there is any (none at end of input).
    pub character: Option<String>,
    /// The full source, rebuilt from the token stream.
    pub source: String,
    /// 0-based character offset of the offending text.
    pub offset: usize,
    retry: Option<bool>,
}

impl ParseError {
    /// Create an error with the kind's default message.
    pub fn new(kind: ParseErrorKind, source: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            message: kind.default_message().to_string(),
            character: None,
            source: source.into(),
            offset,
            retry: None,
        }
    }

    /// Surface a lexing failure as [`ParseErrorKind::UnmatchableText`].
    ///
    /// Lexing failed, so there is no token stream to rebuild the source from;
    /// the raw `source` is kept instead.
    pub fn from_lex(err: LexError, source: &str) -> Self {
        ParseError::new(ParseErrorKind::UnmatchableText, source, err.offset)
            .with_message(err.message)
            .with_character(err.character)
            .with_retry(true)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_character(mut self, character: impl Into<String>) -> Self {
        let character = character.into();
        self.character = (!character.is_empty()).then_some(character);
        self
    }

    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Whether the caller may retry with corrected input.
    ///
    /// `None` when the raiser did not say.
    pub fn retry(&self) -> Option<bool> {
        self.retry
    }

    /// Character span of the offending text; empty at end of input.
    pub fn span(&self) -> Span {
        let len = self.character.as_deref().map_or(0, |c| c.chars().count());
        Span::new(self.offset, self.offset + len)
    }

    /// Plain-text rendering with a caret under the offending character.
    ///
    /// ```text
    /// Delimiter expected "b" : {a=1 b=2}
    ///                               ^
    /// ```
    pub fn caret(&self) -> String {
        let preamble = format!(
            "{} \"{}\" : ",
            self.message,
            self.character.as_deref().unwrap_or_default()
        );
        let indent = preamble.chars().count() + self.offset;
        format!("{preamble}{}\n{:indent$}^", self.source, "")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.character {
            Some(c) => write!(f, "{} '{}' at offset {}", self.message, c, self.offset),
            None => write!(f, "{} at offset {}", self.message, self.offset),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ParseError::new(ParseErrorKind::DelimiterExpected, "{a=1 b=2}", 5).with_character("b");
        assert_eq!(err.to_string(), "Delimiter expected 'b' at offset 5");

        let err = ParseError::new(ParseErrorKind::UnexpectedEnd, "[1,2", 4);
        assert_eq!(err.to_string(), "Unexpected end of input at offset 4");
    }

    #[test]
    fn test_caret() {
        let err = ParseError::new(ParseErrorKind::DelimiterExpected, "{a=1 b=2}", 5).with_character("b");
        assert_eq!(
            err.caret(),
            "Delimiter expected \"b\" : {a=1 b=2}\n                              ^"
        );
    }

    #[test]
    fn test_span_counts_characters() {
        let err = ParseError::new(ParseErrorKind::InvalidCharacter, "é,\"ü\"", 2).with_character("\"ü\"");
        assert_eq!(err.span(), Span::new(2, 5));
        let err = ParseError::new(ParseErrorKind::UnexpectedEnd, "[", 1).with_character("");
        assert_eq!(err.character, None);
        assert!(err.span().is_empty());
    }

    #[test]
    fn test_retry_hint() {
        let err = ParseError::new(ParseErrorKind::ItemExpected, "a,,b", 2);
        assert_eq!(err.retry(), None);
        assert_eq!(err.with_retry(true).retry(), Some(true));
    }
}
