//! Per-level unravel state and the delimiter state machine.

use tracing::trace;
use unravel_lexer::TokenKind;

use crate::{ParseError, ParseErrorKind, Tokenizer};

/// How items at one level are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// No delimiter seen yet.
    Undetermined,
    Comma,
    Whitespace,
}

impl Convention {
    /// The delimiter kind that belongs to the other convention.
    pub fn opposite_delimiter(&self) -> Option<TokenKind> {
        match self {
            Convention::Undetermined => None,
            Convention::Comma => Some(TokenKind::Whitespace),
            Convention::Whitespace => Some(TokenKind::Comma),
        }
    }
}

/// What ends a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Close {
    /// The end of input (top level).
    End,
    /// A closing bracket of this kind.
    Bracket(TokenKind),
    /// A regroup boundary: end of input, any close bracket, or the
    /// delimiter of the other convention.
    Group(Convention),
}

/// Outcome of feeding one token to a [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep going at this level.
    Proceed,
    /// The level is complete; return what it has without consuming.
    EndOfLevel,
    /// The last item starts a nested group using this convention.
    Regroup(Convention),
}

/// State of one unravel level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub close: Close,
    pub convention: Convention,
    /// The last thing read was an item.
    pub have_item: bool,
    /// The last thing read was a delimiter.
    pub have_delimiter: bool,
}

impl Status {
    /// A fresh level, undetermined until its first delimiter.
    pub fn new(close: Close) -> Self {
        Self {
            close,
            convention: Convention::Undetermined,
            have_item: false,
            have_delimiter: false,
        }
    }

    /// A regroup level, preloaded with one item and positioned just past
    /// the delimiter that triggered it.
    pub fn group(convention: Convention) -> Self {
        Self {
            close: Close::Group(convention),
            convention,
            have_item: false,
            have_delimiter: true,
        }
    }

    /// Record an item at `pos`.
    ///
    /// An item straight after another item locks an undetermined level to
    /// whitespace. Under the comma convention that situation is a missing
    /// delimiter, which ends the level cleanly instead of failing; the
    /// caller decides whether what follows is acceptable.
    pub fn item(&mut self, tokens: &Tokenizer<'_>, pos: usize) -> Step {
        if self.have_item {
            match self.convention {
                Convention::Undetermined => self.convention = Convention::Whitespace,
                Convention::Comma if !tokens.is_open(pos) && !tokens.is_close(pos) => {
                    trace!(pos, "delimiter expected, ending comma level");
                    return Step::EndOfLevel;
                }
                _ => {}
            }
        }
        self.have_item = true;
        self.have_delimiter = false;
        Step::Proceed
    }

    /// Record a delimiter at `pos`.
    pub fn delimiter(&mut self, tokens: &Tokenizer<'_>, pos: usize) -> Result<Step, ParseError> {
        match (tokens.kind(pos), self.convention) {
            (TokenKind::Comma, Convention::Whitespace) => {
                if self.have_item {
                    return Ok(Step::Regroup(Convention::Comma));
                }
                return Err(tokens.invalid_character(pos, ParseErrorKind::WhitespaceExpected, None));
            }
            (TokenKind::Comma, Convention::Comma) if self.have_delimiter => {
                return Err(tokens.invalid_character(pos, ParseErrorKind::ItemExpected, None));
            }
            (TokenKind::Comma, Convention::Undetermined) => {
                if !self.have_item {
                    return Err(tokens.invalid_character(pos, ParseErrorKind::ItemExpected, None));
                }
                self.convention = Convention::Comma;
            }
            (TokenKind::Whitespace, Convention::Undetermined) if self.have_item => {
                self.convention = Convention::Whitespace;
            }
            (TokenKind::Whitespace, Convention::Comma) if self.have_item => {
                return Ok(Step::Regroup(Convention::Whitespace));
            }
            _ => {}
        }
        self.have_delimiter = true;
        self.have_item = false;
        Ok(Step::Proceed)
    }

    /// The regrouped list has replaced the last item.
    pub fn regrouped(&mut self) {
        self.have_item = true;
        self.have_delimiter = false;
    }

    /// Whether the level ends at `kind` without consuming it.
    pub fn ends_at(&self, kind: TokenKind) -> bool {
        match self.close {
            Close::Group(convention) => {
                kind.is_close() || convention.opposite_delimiter() == Some(kind)
            }
            _ => false,
        }
    }
}
