#![doc = include_str!("../README.md")]

pub use unravel_lexer::{Span, Token, TokenKind, TokenValue};

mod error;
pub use error::{ParseError, ParseErrorKind};

mod options;
pub use options::{DEFAULT_MAX_DEPTH, ParseOptions};

mod value;
pub use value::{Map, Value};

mod tokenizer;
pub use tokenizer::{Class, Tokenizer, What};

mod status;
pub use status::{Close, Convention, Status, Step};

mod unravel;


/// Parse an expression into a value tree.
pub fn parse(source: &str) -> Result<Value, ParseError> {
    Tokenizer::new(source)?.parse()
}
