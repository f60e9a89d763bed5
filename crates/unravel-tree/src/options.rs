//! Formatting options for canonical output.

/// Options for [`format_value`](crate::format_value).
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Write `, ` instead of `,` between items (default: false)
    pub space_after_comma: bool,

    /// Write `key = value` instead of `key=value` (default: false)
    pub spaced_assignment: bool,
}

impl FormatOptions {
    /// Create new default options: the most compact form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a space after every comma.
    pub fn space_after_comma(mut self) -> Self {
        self.space_after_comma = true;
        self
    }

    /// Surround `=` with spaces.
    pub fn spaced_assignment(mut self) -> Self {
        self.spaced_assignment = true;
        self
    }

    /// Both spacing options: `{a = 1, b = [x, y]}`.
    pub fn relaxed(self) -> Self {
        self.space_after_comma().spaced_assignment()
    }

    pub(crate) fn separator(&self) -> &'static str {
        if self.space_after_comma { ", " } else { "," }
    }

    pub(crate) fn equals(&self) -> &'static str {
        if self.spaced_assignment { " = " } else { "=" }
    }
}
