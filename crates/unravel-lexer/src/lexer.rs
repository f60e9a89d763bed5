//! Scanning text against a grammar.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::{Grammar, Span, Token, TokenRule};

/// Nesting counters for one lexing pass, keyed by counter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters(BTreeMap<String, i64>);

impl Counters {
    /// Current value of `key`, if any rule has touched it.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.0.get(key).copied()
    }

    /// Whether every counter is back at zero.
    pub fn is_balanced(&self) -> bool {
        self.0.values().all(|&v| v == 0)
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn bump(&mut self, key: &str, delta: i64) {
        *self.0.entry(key.to_string()).or_insert(0) += delta;
    }
}

/// The kind of a lexing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// No rule matched, or an error-on-match rule fired.
    Unmatchable,
    /// A rule's converter rejected the matched text.
    Conversion,
}

/// A lexing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    /// The offending text: the single unmatched character, or the text a
    /// failing rule matched.
    pub character: String,
    /// Character offset in the source.
    pub offset: usize,
}

impl LexError {
    fn unmatchable(message: impl Into<String>, character: impl Into<String>, offset: usize) -> Self {
        Self {
            kind: LexErrorKind::Unmatchable,
            message: message.into(),
            character: character.into(),
            offset,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' at position {}",
            self.message,
            self.character,
            self.offset + 1
        )
    }
}

impl std::error::Error for LexError {}

/// Output of a full lexing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed<'src> {
    /// Every token, without the end sentinel.
    pub tokens: Vec<Token<'src>>,
    /// Counter values after the last token.
    pub counters: Counters,
}

/// A lexer that produces tokens from one source string.
#[derive(Debug, Clone)]
pub struct Lexer<'g, 'src> {
    grammar: &'g Grammar,
    /// The source text being lexed.
    source: &'src str,
    /// Current byte position in `source`.
    pos: usize,
    /// Current character position in `source`.
    offset: usize,
    counters: Counters,
    ended: bool,
}

impl<'g, 'src> Lexer<'g, 'src> {
    /// Create a new lexer with fresh counters.
    pub fn new(grammar: &'g Grammar, source: &'src str) -> Self {
        Self {
            grammar,
            source,
            pos: 0,
            offset: 0,
            counters: Counters::default(),
            ended: false,
        }
    }

    /// Current character offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the end token has been produced.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.ended
    }

    /// Current value of a counter.
    pub fn counter(&self, key: &str) -> Option<i64> {
        self.counters.get(key)
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    #[inline]
    fn remaining(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Get the next token, or the end sentinel once the text is consumed.
    pub fn next_token(&mut self) -> Result<Token<'src>, LexError> {
        loop {
            let remaining = self.remaining();
            if remaining.is_empty() {
                self.ended = true;
                return Ok(Token::end(self.offset));
            }

            let grammar = self.grammar;
            let found = grammar
                .rules()
                .iter()
                .find_map(|rule| rule.match_len(remaining).map(|len| (rule, len)))
                .or_else(|| {
                    grammar
                        .default_rule()
                        .and_then(|rule| rule.match_len(remaining).map(|len| (rule, len)))
                });

            let Some((rule, len)) = found else {
                let character = remaining.chars().next().map(String::from).unwrap_or_default();
                return Err(LexError::unmatchable(
                    "Unexpected character",
                    character,
                    self.offset,
                ));
            };

            if let Some(message) = &rule.options().error {
                return Err(LexError::unmatchable(
                    message.clone(),
                    &remaining[..len],
                    self.offset,
                ));
            }

            let token = self.consume(rule, len)?;
            if rule.is_ignored() {
                trace!("Ignored {:?} at {:?}", token.kind, token.span);
                continue;
            }
            trace!("Token {:?} at {:?}: {:?}", token.kind, token.span, token.text);
            return Ok(token);
        }
    }

    /// Advance past a match of `rule`, updating counters and converting.
    fn consume(&mut self, rule: &TokenRule, len: usize) -> Result<Token<'src>, LexError> {
        let text = &self.source[self.pos..self.pos + len];
        let start = self.offset;

        let value = rule.convert(text).map_err(|e| LexError {
            kind: LexErrorKind::Conversion,
            message: e.0,
            character: text.to_string(),
            offset: start,
        })?;

        self.pos += len;
        self.offset += text.chars().count();

        let options = rule.options();
        if let Some(key) = &options.increment {
            self.counters.bump(key, 1);
        }
        if let Some(key) = &options.decrement {
            self.counters.bump(key, -1);
        }

        Ok(Token::new(
            rule.kind(),
            value,
            Span::new(start, self.offset),
            text,
        ))
    }

    /// Lex to the end, returning every token and the final counters.
    pub fn parse(mut self) -> Result<Lexed<'src>, LexError> {
        let mut tokens = Vec::new();
        while !self.is_end() {
            let token = self.next_token()?;
            if !token.is_end() {
                tokens.push(token);
            }
        }
        Ok(Lexed {
            tokens,
            counters: self.counters,
        })
    }
}

impl<'src> Iterator for Lexer<'_, 'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ended {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.is_end() => None,
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.ended = true;
                Some(Err(e))
            }
        }
    }
}
