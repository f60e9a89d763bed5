//! Ordered rule sets.

use std::collections::BTreeSet;
use std::fmt;

use crate::{LexError, Lexed, Lexer, Pattern, RuleOptions, TokenKind, TokenRule};

/// Error while building a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A regex pattern failed to compile.
    InvalidPattern { pattern: String, message: String },
    /// A kind name that is not a [`TokenKind`].
    UnknownKind(String),
    /// A kind that rules may not produce (the end sentinel).
    ReservedKind(TokenKind),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::InvalidPattern { pattern, message } => {
                write!(f, "invalid pattern `{pattern}`: {message}")
            }
            GrammarError::UnknownKind(name) => write!(f, "unknown token kind `{name}`"),
            GrammarError::ReservedKind(kind) => {
                write!(f, "token kind `{kind}` cannot be produced by a rule")
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// An ordered list of rules plus an optional default rule.
///
/// Rules are tried in declaration order and the first anchored match wins;
/// the default rule is only tried when no other rule matches. A grammar is
/// immutable once built and holds no per-parse state, so a single instance
/// can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    rules: Vec<TokenRule>,
    default: Option<TokenRule>,
}

impl Grammar {
    /// Start building a grammar.
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    pub fn default_rule(&self) -> Option<&TokenRule> {
        self.default.as_ref()
    }

    /// Every kind this grammar can emit, the default rule's included.
    pub fn kinds(&self) -> BTreeSet<TokenKind> {
        self.rules
            .iter()
            .chain(self.default.iter())
            .map(TokenRule::kind)
            .collect()
    }

    /// A lexer over `source`.
    pub fn lexer<'g, 'src>(&'g self, source: &'src str) -> Lexer<'g, 'src> {
        Lexer::new(self, source)
    }

    /// Lex all of `source`.
    pub fn lex<'src>(&self, source: &'src str) -> Result<Lexed<'src>, LexError> {
        self.lexer(source).parse()
    }
}

/// Builder for [`Grammar`].
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<TokenRule>,
    default: Option<TokenRule>,
}

impl GrammarBuilder {
    /// Add a rule that emits `kind` for `pattern`.
    pub fn matches(self, pattern: Pattern, kind: TokenKind) -> Self {
        self.matches_with(pattern, kind, RuleOptions::new())
    }

    /// Add a rule with options.
    pub fn matches_with(self, pattern: Pattern, kind: TokenKind, options: RuleOptions) -> Self {
        self.rule(TokenRule::new(pattern, kind, options))
    }

    /// Add a rule whose matches are consumed and dropped.
    pub fn ignores(self, pattern: Pattern, kind: TokenKind) -> Self {
        self.matches_with(pattern, kind, RuleOptions::new().ignored())
    }

    /// Add a prebuilt rule.
    pub fn rule(mut self, rule: TokenRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the fallback rule, tried only when no other rule matches.
    pub fn default_rule(mut self, pattern: Pattern, kind: TokenKind) -> Self {
        self.default = Some(TokenRule::new(pattern, kind, RuleOptions::new()));
        self
    }

    /// Finish the grammar.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if let Some(rule) = self
            .rules
            .iter()
            .chain(self.default.iter())
            .find(|rule| rule.kind() == TokenKind::End)
        {
            return Err(GrammarError::ReservedKind(rule.kind()));
        }
        Ok(Grammar {
            rules: self.rules,
            default: self.default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_kind_is_reserved() {
        let err = Grammar::builder()
            .matches(Pattern::literal(";"), TokenKind::End)
            .build()
            .unwrap_err();
        assert_eq!(err, GrammarError::ReservedKind(TokenKind::End));
    }

    #[test]
    fn test_kinds_include_default() {
        let grammar = Grammar::builder()
            .matches(Pattern::literal(","), TokenKind::Comma)
            .default_rule(Pattern::regex("[a-z]+").unwrap(), TokenKind::Word)
            .build()
            .unwrap();
        let kinds: Vec<_> = grammar.kinds().into_iter().collect();
        assert_eq!(kinds, vec![TokenKind::Comma, TokenKind::Word]);
    }

    #[test]
    fn test_grammar_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Grammar>();
    }
}
