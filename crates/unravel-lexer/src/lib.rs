#![doc = include_str!("../README.md")]

mod span;
pub use span::Span;

mod token;
pub use token::{Token, TokenKind, TokenValue};

mod rule;
pub use rule::{ConvertError, Converter, Pattern, RuleOptions, TokenRule, convert};

mod grammar;
pub use grammar::{Grammar, GrammarBuilder, GrammarError};

mod lexer;
pub use lexer::{Counters, LexError, LexErrorKind, Lexed, Lexer};

mod expression;
pub use expression::expression_grammar;
