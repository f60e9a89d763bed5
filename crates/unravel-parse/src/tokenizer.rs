//! A lexed token sequence with classification and lookahead queries.

use tracing::debug;
use unravel_lexer::{Counters, Grammar, Lexed, Token, TokenKind, expression_grammar};

use crate::{ParseError, ParseErrorKind};

/// A token category for [`Tokenizer::of_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// `word`, `number`, `quote` or `variable`.
    Element,
    /// Any opening bracket.
    Open,
    /// Any closing bracket.
    Close,
    /// `(`
    Paren,
    /// `{`
    Hash,
    /// `[`
    Array,
    /// Exactly this kind.
    Kind(TokenKind),
}

impl Class {
    /// Whether `kind` belongs to this class.
    pub fn contains(&self, kind: TokenKind) -> bool {
        match self {
            Class::Element => kind.is_element(),
            Class::Open => kind.is_open(),
            Class::Close => kind.is_close(),
            Class::Paren => kind == TokenKind::LParen,
            Class::Hash => kind == TokenKind::LCurly,
            Class::Array => kind == TokenKind::LSquare,
            Class::Kind(k) => kind == *k,
        }
    }
}

impl From<TokenKind> for Class {
    fn from(kind: TokenKind) -> Self {
        Class::Kind(kind)
    }
}

/// What the unraveler finds at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum What {
    End,
    Whitespace,
    Comma,
    Escape,
    /// A verbatim region opens.
    Paren,
    Close,
    Hash,
    Array,
    /// `key = value`
    Assignment,
    Other,
}

/// A finite token sequence from one lexing pass.
///
/// Every query takes a token index; indices at or past the end read as
/// [`TokenKind::End`].
#[derive(Debug, Clone)]
pub struct Tokenizer<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
    counters: Counters,
}

impl<'src> Tokenizer<'src> {
    /// Lex `source` with the expression grammar.
    pub fn new(source: &'src str) -> Result<Self, ParseError> {
        Self::with_grammar(expression_grammar(), source)
    }

    /// Lex `source` with any grammar.
    pub fn with_grammar(grammar: &Grammar, source: &'src str) -> Result<Self, ParseError> {
        let Lexed { tokens, counters } = grammar
            .lex(source)
            .map_err(|e| ParseError::from_lex(e, source))?;
        debug!(source, count = tokens.len(), "lexed");
        Ok(Self {
            source,
            tokens,
            counters,
        })
    }

    /// The source this sequence was lexed from.
    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, pos: usize) -> Option<&Token<'src>> {
        self.tokens.get(pos)
    }

    /// Kind at `pos`, [`TokenKind::End`] past the end.
    pub fn kind(&self, pos: usize) -> TokenKind {
        self.tokens.get(pos).map_or(TokenKind::End, |t| t.kind)
    }

    /// Source text at `pos`, empty past the end.
    pub fn text(&self, pos: usize) -> &'src str {
        self.tokens.get(pos).map_or("", |t| t.text)
    }

    /// Final value of a nesting counter from the lexing pass.
    pub fn counter(&self, key: &str) -> Option<i64> {
        self.counters.get(key)
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Rejoin the token text with `sep` between tokens.
    pub fn join(&self, sep: &str) -> String {
        self.tokens.iter().map(|t| t.text).collect::<Vec<_>>().join(sep)
    }

    /// Whether the token at `pos` is in `class`. Never true past the end.
    pub fn of_type(&self, pos: usize, class: impl Into<Class>) -> bool {
        self.tokens
            .get(pos)
            .is_some_and(|t| class.into().contains(t.kind))
    }

    /// Whether the token at `pos` opens a bracket.
    pub fn is_open(&self, pos: usize) -> bool {
        self.of_type(pos, Class::Open)
    }

    /// Whether the token at `pos` closes a bracket.
    pub fn is_close(&self, pos: usize) -> bool {
        self.of_type(pos, Class::Close)
    }

    /// Whether `pos` is past the last token, or at `close` when given.
    pub fn is_end(&self, pos: usize, close: Option<TokenKind>) -> bool {
        match self.kind(pos) {
            TokenKind::End => true,
            kind => close == Some(kind),
        }
    }

    /// Walk from `pos` over tokens whose kind is in `walk_over`.
    ///
    /// Stops at the end or at the first other kind. With `look_for`, the
    /// stop position is only accepted when its kind is listed; otherwise the
    /// walk returns `pos` unchanged.
    pub fn walk(&self, pos: usize, walk_over: &[TokenKind], look_for: Option<&[TokenKind]>) -> usize {
        let mut end = pos;
        while !self.is_end(end, None) && walk_over.contains(&self.kind(end)) {
            end += 1;
        }
        match look_for {
            Some(kinds) if !kinds.contains(&self.kind(end)) => pos,
            _ => end,
        }
    }

    /// Position of the first non-whitespace token at or after `pos`.
    pub fn skip_whitespace(&self, pos: usize) -> usize {
        self.walk(pos, &[TokenKind::Whitespace], None)
    }

    /// Classify the token at `pos` for dispatch.
    pub fn what_is(&self, pos: usize) -> What {
        match self.kind(pos) {
            TokenKind::End => What::End,
            TokenKind::Whitespace => What::Whitespace,
            TokenKind::Comma => What::Comma,
            TokenKind::Escape => What::Escape,
            TokenKind::LParen => What::Paren,
            kind if kind.is_close() => What::Close,
            TokenKind::LCurly => What::Hash,
            TokenKind::LSquare => What::Array,
            _ if self.is_assignment(pos) => What::Assignment,
            _ => What::Other,
        }
    }

    /// Positions of key, `=` and value when an assignment starts at `pos`.
    ///
    /// Whitespace may surround the `=`; the value must be an element or an
    /// opening bracket.
    pub fn assignment_positions(&self, pos: usize) -> Option<(usize, usize, usize)> {
        if !self.of_type(pos, Class::Element) {
            return None;
        }
        let equals = self.skip_whitespace(pos + 1);
        if !self.of_type(equals, TokenKind::Equals) {
            return None;
        }
        let value = self.skip_whitespace(equals + 1);
        (self.of_type(value, Class::Element) || self.of_type(value, Class::Open))
            .then_some((pos, equals, value))
    }

    pub fn is_assignment(&self, pos: usize) -> bool {
        self.assignment_positions(pos).is_some()
    }

    /// Character offset of `pos` in the rejoined token text.
    pub fn offset(&self, pos: usize) -> usize {
        self.tokens
            .iter()
            .take(pos)
            .map(|t| t.text.chars().count())
            .sum()
    }

    /// Build an error of `kind` pointing at the token at `pos`.
    ///
    /// The error carries the rejoined source, the character offset of the
    /// token and its text, and is marked retryable.
    pub fn invalid_character(&self, pos: usize, kind: ParseErrorKind, message: Option<&str>) -> ParseError {
        let mut err = ParseError::new(kind, self.join(""), self.offset(pos))
            .with_character(self.text(pos))
            .with_retry(true);
        if let Some(message) = message {
            err = err.with_message(message);
        }
        debug!(kind = %err.kind, offset = err.offset, character = ?err.character, "{}", err.message);
        err
    }
}
