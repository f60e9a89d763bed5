//! Token types for the expression lexer.

use std::fmt;

use crate::Span;

/// The kind of a token.
///
/// This is a closed set: grammars can only produce these kinds, and kind
/// names coming from configuration go through [`TokenKind::from_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// `\`
    Escape,
    /// `$name`
    Variable,
    /// `"..."`
    Quote,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LCurly,
    /// `}`
    RCurly,
    /// `[`
    LSquare,
    /// `]`
    RSquare,
    /// `,`
    Comma,
    /// A run of whitespace
    Whitespace,
    /// Integer or float literal
    Number,
    /// `=`
    Equals,
    /// Any other run of non-operator characters
    Word,
    /// A `"` with no closing partner
    UnmatchedQuote,
    /// End of input
    End,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 16] = [
        TokenKind::Escape,
        TokenKind::Variable,
        TokenKind::Quote,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LCurly,
        TokenKind::RCurly,
        TokenKind::LSquare,
        TokenKind::RSquare,
        TokenKind::Comma,
        TokenKind::Whitespace,
        TokenKind::Number,
        TokenKind::Equals,
        TokenKind::Word,
        TokenKind::UnmatchedQuote,
        TokenKind::End,
    ];

    /// The snake_case name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Escape => "escape",
            TokenKind::Variable => "variable",
            TokenKind::Quote => "quote",
            TokenKind::LParen => "l_paren",
            TokenKind::RParen => "r_paren",
            TokenKind::LCurly => "l_curly",
            TokenKind::RCurly => "r_curly",
            TokenKind::LSquare => "l_square",
            TokenKind::RSquare => "r_square",
            TokenKind::Comma => "comma",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Number => "number",
            TokenKind::Equals => "equals",
            TokenKind::Word => "word",
            TokenKind::UnmatchedQuote => "unmatched_quote",
            TokenKind::End => "end",
        }
    }

    /// Look a kind up by its snake_case name.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        TokenKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Whether this kind can stand alone as a value.
    pub fn is_element(&self) -> bool {
        matches!(
            self,
            TokenKind::Word | TokenKind::Number | TokenKind::Quote | TokenKind::Variable
        )
    }

    /// Whether this kind opens a bracket.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            TokenKind::LCurly | TokenKind::LParen | TokenKind::LSquare
        )
    }

    /// Whether this kind closes a bracket.
    pub fn is_close(&self) -> bool {
        matches!(
            self,
            TokenKind::RCurly | TokenKind::RParen | TokenKind::RSquare
        )
    }

    /// The closing partner of an opening bracket.
    pub fn closing(&self) -> Option<TokenKind> {
        match self {
            TokenKind::LCurly => Some(TokenKind::RCurly),
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LSquare => Some(TokenKind::RSquare),
            _ => None,
        }
    }

    /// The opening partner of a closing bracket.
    pub fn opening(&self) -> Option<TokenKind> {
        match self {
            TokenKind::RCurly => Some(TokenKind::LCurly),
            TokenKind::RParen => Some(TokenKind::LParen),
            TokenKind::RSquare => Some(TokenKind::LSquare),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value carried by a token, after any conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// Unconverted text.
    Str(String),
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Str(s) => f.write_str(s),
            TokenValue::Int(i) => write!(f, "{i}"),
            TokenValue::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// A token with its kind, value, span, and source text slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The converted value.
    pub value: TokenValue,
    /// The span in the source text, in characters.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, value: TokenValue, span: Span, text: &'src str) -> Self {
        Self {
            kind,
            value,
            span,
            text,
        }
    }

    /// The end-of-input sentinel at `offset`.
    pub fn end(offset: usize) -> Self {
        Self {
            kind: TokenKind::End,
            value: TokenValue::Str(String::new()),
            span: Span::empty(offset),
            text: "",
        }
    }

    /// Whether this is the end-of-input sentinel.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.value)
    }
}
