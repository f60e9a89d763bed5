//! Recursive-descent unraveling of a token sequence into a value tree.

use tracing::{debug, trace};
use unravel_lexer::TokenKind;

use crate::status::{Close, Convention, Status, Step};
use crate::tokenizer::{Class, What};
use crate::{DEFAULT_MAX_DEPTH, Map, ParseError, ParseErrorKind, ParseOptions, Tokenizer, Value};

/// How deep the level being unraveled is nested, and how deep it may go.
#[derive(Debug, Clone, Copy)]
struct Depth {
    current: usize,
    max: usize,
}

impl Depth {
    fn new(max: usize) -> Self {
        Self { current: 0, max }
    }

    /// The depth one level further in, for a level opened at `pos`.
    fn enter(self, tokens: &Tokenizer<'_>, pos: usize) -> Result<Self, ParseError> {
        if self.current >= self.max {
            return Err(tokens.invalid_character(pos, ParseErrorKind::NestingTooDeep, None));
        }
        Ok(Self {
            current: self.current + 1,
            ..self
        })
    }
}

impl<'src> Tokenizer<'src> {
    /// Unravel the whole sequence with default options.
    pub fn parse(&self) -> Result<Value, ParseError> {
        self.parse_with(&ParseOptions::default())
    }

    /// Unravel the whole sequence.
    ///
    /// The top level always produces a list; with
    /// [`ParseOptions::unwrap_singleton`] a top level holding exactly one
    /// list or map returns that item instead. Tokens left over after the top
    /// level ends are a missing delimiter.
    pub fn parse_with(&self, options: &ParseOptions) -> Result<Value, ParseError> {
        let depth = Depth::new(options.max_depth);
        let (pos, mut items) = self.unravel_at(options.start, Close::End, None, false, depth)?;
        if !self.is_end(pos, None) {
            return Err(self.invalid_character(pos, ParseErrorKind::DelimiterExpected, None));
        }

        let singleton = matches!(items.as_slice(), [Value::List(_) | Value::Map(_)]);
        if options.unwrap_singleton && singleton {
            return Ok(items.swap_remove(0));
        }
        Ok(Value::List(items))
    }

    /// Unravel one level starting at `pos`.
    ///
    /// Returns the position after the level and its items. A bracket level
    /// consumes its closing bracket; top and regroup levels stop in front of
    /// whatever ended them. `preload` seeds a regroup level with the item
    /// taken from the parent. With `skip_until_close` the level is a
    /// verbatim region read as raw text up to the matching close.
    ///
    /// Levels nested below this one are limited to [`DEFAULT_MAX_DEPTH`].
    pub fn unravel(
        &self,
        pos: usize,
        close: Close,
        preload: Option<Value>,
        skip_until_close: bool,
    ) -> Result<(usize, Vec<Value>), ParseError> {
        self.unravel_at(pos, close, preload, skip_until_close, Depth::new(DEFAULT_MAX_DEPTH))
    }

    fn unravel_at(
        &self,
        pos: usize,
        close: Close,
        preload: Option<Value>,
        skip_until_close: bool,
        depth: Depth,
    ) -> Result<(usize, Vec<Value>), ParseError> {
        debug!(pos, ?close, skip_until_close, depth = depth.current, "unravel level");
        if skip_until_close {
            let Close::Bracket(close) = close else {
                return Err(self.invalid_character(
                    pos,
                    ParseErrorKind::InvalidCharacter,
                    Some("Verbatim regions must end at a bracket"),
                ));
            };
            let (next, inner) = self.verbatim(pos, close)?;
            let open = pos.checked_sub(1).map_or("", |p| self.text(p));
            let text = format!("{open}{inner}{}", self.text(next - 1));
            return Ok((next, vec![Value::Str(text)]));
        }

        let mut status = match close {
            Close::Group(convention) => Status::group(convention),
            _ => Status::new(close),
        };
        let mut result: Vec<Value> = preload.into_iter().collect();

        let mut pos = self.skip_whitespace(pos);
        if self.of_type(pos, TokenKind::Comma) || self.is_close(pos) {
            // a regroup level starts right after a delimiter
            let kind = if status.have_delimiter {
                ParseErrorKind::ItemExpected
            } else {
                ParseErrorKind::InvalidCharacter
            };
            return Err(self.invalid_character(pos, kind, None));
        }

        loop {
            let kind = self.kind(pos);
            let level_ends = match status.close {
                Close::End => kind == TokenKind::End,
                Close::Group(_) => kind == TokenKind::End || status.ends_at(kind),
                Close::Bracket(_) => false,
            };
            if level_ends {
                if status.have_delimiter {
                    return Err(self.invalid_character(pos, ParseErrorKind::ItemExpected, None));
                }
                debug!(pos, ?close, items = result.len(), "level complete");
                return Ok((pos, result));
            }

            let what = self.what_is(pos);
            trace!(pos, ?what, text = self.text(pos), "unravel step");
            match what {
                What::End => {
                    return Err(self.invalid_character(pos, ParseErrorKind::UnexpectedEnd, None));
                }
                What::Close => {
                    if status.close != Close::Bracket(kind) {
                        return Err(self.invalid_character(pos, ParseErrorKind::UnexpectedClose, None));
                    }
                    if status.have_delimiter {
                        return Err(self.invalid_character(pos, ParseErrorKind::ItemExpected, None));
                    }
                    debug!(pos, items = result.len(), "bracket closed");
                    return Ok((pos + 1, result));
                }
                What::Whitespace | What::Comma => {
                    match status.delimiter(self, pos)? {
                        Step::Proceed => pos += 1,
                        Step::Regroup(convention) => {
                            pos = self.regroup(pos, convention, &mut result, depth)?;
                            status.regrouped();
                        }
                        Step::EndOfLevel => return Ok((pos, result)),
                    }
                    continue;
                }
                What::Other if !self.of_type(pos, Class::Element) => {
                    return Err(self.invalid_character(pos, ParseErrorKind::InvalidCharacter, None));
                }
                _ => {}
            }

            if status.item(self, pos) == Step::EndOfLevel {
                if let Close::Bracket(_) = status.close {
                    return Err(self.invalid_character(pos, ParseErrorKind::DelimiterExpected, None));
                }
                debug!(pos, "level ended by a missing delimiter");
                return Ok((pos, result));
            }

            pos = match what {
                What::Escape => {
                    let (next, value) = self.get_escape(pos)?;
                    result.push(value);
                    next
                }
                What::Paren => {
                    let close = Close::Bracket(TokenKind::RParen);
                    let (next, items) = self.unravel_at(pos + 1, close, None, true, depth)?;
                    result.extend(items);
                    next
                }
                What::Hash => {
                    let (next, map) = self.get_hash(pos, depth.enter(self, pos)?)?;
                    result.push(Value::Map(map));
                    next
                }
                What::Array => {
                    let close = Close::Bracket(TokenKind::RSquare);
                    let inner = depth.enter(self, pos)?;
                    let (next, items) = self.unravel_at(pos + 1, close, None, false, inner)?;
                    result.push(Value::List(items));
                    next
                }
                What::Assignment => {
                    let (next, key, value) = self.get_assignment(pos, depth)?;
                    result.push(Value::Map(Map::from_iter([(key, value)])));
                    next
                }
                _ => match self.scalar(pos) {
                    Some(value) => {
                        result.push(value);
                        pos + 1
                    }
                    None => {
                        return Err(self.invalid_character(pos, ParseErrorKind::InvalidCharacter, None));
                    }
                },
            };
            pos = self.skip_padding(pos);
        }
    }

    /// Replace the last item with a nested group that starts with it.
    fn regroup(
        &self,
        pos: usize,
        convention: Convention,
        result: &mut Vec<Value>,
        depth: Depth,
    ) -> Result<usize, ParseError> {
        debug!(pos, ?convention, "regrouping");
        let inner = depth.enter(self, pos)?;
        let last = result.pop();
        let (next, group) = self.unravel_at(pos + 1, Close::Group(convention), last, false, inner)?;
        result.push(Value::List(group));
        Ok(next)
    }

    /// Skip whitespace that only pads a comma, a close bracket or the end.
    ///
    /// Whitespace in front of anything else stays, to be read as a
    /// delimiter.
    fn skip_padding(&self, pos: usize) -> usize {
        if !self.of_type(pos, TokenKind::Whitespace) {
            return pos;
        }
        let next = self.skip_whitespace(pos);
        match self.kind(next) {
            TokenKind::Comma | TokenKind::End => next,
            kind if kind.is_close() => next,
            _ => pos,
        }
    }

    /// The scalar value of an element token.
    fn scalar(&self, pos: usize) -> Option<Value> {
        self.token(pos)
            .filter(|t| t.kind.is_element())
            .map(|t| Value::from(t.value.clone()))
    }

    /// Read an escape run at `pos`: the first backslash is dropped, further
    /// backslashes and the token after them are kept as literal text.
    fn get_escape(&self, pos: usize) -> Result<(usize, Value), ParseError> {
        let mut end = pos + 1;
        while self.kind(end) == TokenKind::Escape {
            end += 1;
        }
        if self.is_end(end, None) {
            return Err(self.invalid_character(
                end,
                ParseErrorKind::UnexpectedEnd,
                Some("Escape characters cannot be last"),
            ));
        }
        let text: String = (pos + 1..=end).map(|p| self.text(p)).collect();
        trace!(pos, text = %text, "escape");
        Ok((end + 1, Value::Str(text)))
    }

    /// Raw text from `pos` up to the `close` that balances the region.
    ///
    /// Nested openers of the same family must be closed before the region
    /// ends; an escape keeps its backslash and protects the next token.
    /// Returns the position after `close` and the text between.
    fn verbatim(&self, pos: usize, close: TokenKind) -> Result<(usize, String), ParseError> {
        let open = close.opening();
        let mut text = String::new();
        let mut depth = 0usize;
        let mut pos = pos;
        loop {
            let kind = self.kind(pos);
            match kind {
                TokenKind::End => {
                    return Err(self.invalid_character(
                        pos,
                        ParseErrorKind::UnexpectedEnd,
                        Some("Unclosed verbatim region"),
                    ));
                }
                TokenKind::Escape => {
                    if self.is_end(pos + 1, None) {
                        return Err(self.invalid_character(
                            pos + 1,
                            ParseErrorKind::UnexpectedEnd,
                            Some("Escape characters cannot be last"),
                        ));
                    }
                    text.push_str(self.text(pos));
                    text.push_str(self.text(pos + 1));
                    pos += 2;
                    continue;
                }
                _ if kind == close && depth == 0 => {
                    trace!(pos, text = %text, "verbatim region");
                    return Ok((pos + 1, text));
                }
                _ if kind == close => depth -= 1,
                _ if Some(kind) == open => depth += 1,
                _ => {}
            }
            text.push_str(self.text(pos));
            pos += 1;
        }
    }

    /// Read `{key=value[,key=value]*}` at `pos`.
    ///
    /// `depth` is the depth of the hash itself.
    fn get_hash(&self, pos: usize, depth: Depth) -> Result<(usize, Map), ParseError> {
        let mut map = Map::new();
        // expecting an assignment: at the start and after each comma
        let mut ready = true;
        let mut pos = pos + 1;
        loop {
            pos = self.skip_whitespace(pos);
            match self.kind(pos) {
                TokenKind::End => {
                    return Err(self.invalid_character(pos, ParseErrorKind::UnexpectedEnd, None));
                }
                TokenKind::RCurly => break,
                TokenKind::Comma if ready => {
                    return Err(self.invalid_character(pos, ParseErrorKind::ItemExpected, None));
                }
                TokenKind::Comma => {
                    ready = true;
                    pos += 1;
                }
                _ if self.is_assignment(pos) => {
                    if !ready {
                        return Err(self.invalid_character(pos, ParseErrorKind::DelimiterExpected, None));
                    }
                    let (next, key, value) = self.get_assignment(pos, depth)?;
                    map.insert(key, value);
                    ready = false;
                    pos = next;
                }
                _ => {
                    return Err(self.invalid_character(
                        pos,
                        ParseErrorKind::InvalidCharacter,
                        Some("Invalid character found while building hash"),
                    ));
                }
            }
        }
        if ready {
            return Err(self.invalid_character(pos, ParseErrorKind::ItemExpected, None));
        }
        trace!(pos, entries = map.len(), "hash closed");
        Ok((pos + 1, map))
    }

    /// Read `key = value` at `pos`.
    ///
    /// The value is a single element, a hash, or a bracket group unraveled
    /// as a list.
    fn get_assignment(&self, pos: usize, depth: Depth) -> Result<(usize, String, Value), ParseError> {
        let Some((key_pos, _, value_pos)) = self.assignment_positions(pos) else {
            return Err(self.invalid_character(
                pos,
                ParseErrorKind::InvalidCharacter,
                Some("Invalid assignment"),
            ));
        };
        let key = self.text(key_pos).to_string();

        let (next, value) = if self.of_type(value_pos, Class::Hash) {
            let (next, map) = self.get_hash(value_pos, depth.enter(self, value_pos)?)?;
            (next, Value::Map(map))
        } else if let Some(close) = self.kind(value_pos).closing() {
            let inner = depth.enter(self, value_pos)?;
            let (next, items) = self.unravel_at(value_pos + 1, Close::Bracket(close), None, false, inner)?;
            (next, Value::List(items))
        } else if let Some(value) = self.scalar(value_pos) {
            (value_pos + 1, value)
        } else {
            return Err(self.invalid_character(
                value_pos,
                ParseErrorKind::InvalidCharacter,
                Some("Invalid assignment"),
            ));
        };
        trace!(key = %key, ?value, "assignment");
        Ok((next, key, value))
    }
}
