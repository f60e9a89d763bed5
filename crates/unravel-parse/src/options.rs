//! Options for unraveling.

/// Default limit on bracket, hash and regroup nesting.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Options for [`Tokenizer::parse_with`](crate::Tokenizer::parse_with).
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Token index to start unraveling at (default: 0)
    pub start: usize,

    /// Return the sole item of a top level holding exactly one list or map
    /// instead of a one-element list (default: true)
    pub unwrap_singleton: bool,

    /// Deepest nesting of brackets, hashes and regrouped levels accepted
    /// before parsing fails (default: [`DEFAULT_MAX_DEPTH`])
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start: 0,
            unwrap_singleton: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at token index `start`.
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Always return the top level as a list.
    pub fn keep_singleton(mut self) -> Self {
        self.unwrap_singleton = false;
        self
    }

    /// Fail once nesting goes deeper than `max_depth` levels.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
