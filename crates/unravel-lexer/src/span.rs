//! Span tracking for source locations.

/// A span representing a range in the source text.
///
/// Offsets count characters, not bytes, so they can be shown to users and
/// handed to diagnostic renderers directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Character offset of the start (inclusive)
    pub start: usize,
    /// Character offset of the end (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span from start and end character offsets.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Create an empty span at a position.
    #[inline]
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Length of this span in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether this span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}
