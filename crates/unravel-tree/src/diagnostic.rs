//! Diagnostic rendering for parse errors.

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};
use unravel_parse::{ParseError, ParseErrorKind};

/// Rendering of a [`ParseError`] as an ariadne report.
pub trait Diagnostic {
    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source
    /// context.
    fn render(&self, filename: &str) -> String;

    /// Write the error report to a writer.
    fn write_report<W: std::io::Write>(&self, filename: &str, writer: W);
}

impl Diagnostic for ParseError {
    fn render(&self, filename: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    fn write_report<W: std::io::Write>(&self, filename: &str, writer: W) {
        let report = build_report(self, filename);
        let _ = report
            .finish()
            .write((filename, Source::from(self.source.as_str())), writer);
    }
}

/// Character range to label. Errors at the end of input have an empty span;
/// those point at the last character instead.
fn label_range(err: &ParseError) -> Range<usize> {
    let span = err.span();
    if !span.is_empty() {
        return span.into();
    }
    let len = err.source.chars().count();
    if span.start < len {
        span.start..span.start + 1
    } else {
        len.saturating_sub(1)..len
    }
}

fn build_report<'a>(
    err: &ParseError,
    filename: &'a str,
) -> ariadne::ReportBuilder<'static, (&'a str, Range<usize>)> {
    let range = label_range(err);
    let (title, label, help) = match err.kind {
        ParseErrorKind::UnmatchableText => (
            "unmatchable text",
            err.message.clone(),
            if err.character.as_deref() == Some("\"") {
                Some("quotes must come in pairs")
            } else {
                None
            },
        ),
        ParseErrorKind::InvalidCharacter => (
            "invalid character",
            err.message.clone(),
            Some("write `\\` in front of it to use it as text"),
        ),
        ParseErrorKind::UnexpectedClose => (
            "unexpected closing bracket",
            "nothing to close here".to_string(),
            Some("remove it, or add the matching opening bracket"),
        ),
        ParseErrorKind::DelimiterExpected => (
            "delimiter expected",
            "expected `,` or whitespace before this".to_string(),
            Some("separate items with commas or with whitespace"),
        ),
        ParseErrorKind::ItemExpected => (
            "item expected",
            "expected an item here".to_string(),
            Some("remove the extra comma"),
        ),
        ParseErrorKind::WhitespaceExpected => (
            "whitespace expected",
            "this level is separated by whitespace".to_string(),
            Some("use one kind of delimiter per level, or bracket the comma-separated items"),
        ),
        ParseErrorKind::UnexpectedEnd => (
            "unexpected end of input",
            err.message.clone(),
            Some("close every open bracket, brace and parenthesis"),
        ),
        ParseErrorKind::NestingTooDeep => (
            "nesting too deep",
            "one level too many opens here".to_string(),
            Some("flatten the expression, or raise `ParseOptions::max_depth`"),
        ),
    };

    let report = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label)
                .with_color(Color::Red),
        );
    match help {
        Some(help) => report.with_help(help),
        None => report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unravel_testhelpers::setup;

    fn render(source: &str) -> String {
        setup();
        let err = unravel_parse::parse(source).unwrap_err();
        let rendered = err.render("args");
        String::from_utf8(strip_ansi_escapes::strip(&rendered)).unwrap()
    }

    #[test]
    fn test_delimiter_expected_diagnostic() {
        let out = render("{a=1 b=2}");
        assert!(out.contains("delimiter expected"), "{out}");
        assert!(out.contains("expected `,` or whitespace before this"), "{out}");
        assert!(out.contains("{a=1 b=2}"), "{out}");
        assert!(out.contains("args"), "{out}");
    }

    #[test]
    fn test_unmatched_quote_diagnostic() {
        let out = render("a \"b");
        assert!(out.contains("unmatchable text"), "{out}");
        assert!(out.contains("Unmatched quote"), "{out}");
        assert!(out.contains("quotes must come in pairs"), "{out}");
    }

    #[test]
    fn test_unexpected_end_diagnostic() {
        let out = render("[1,2");
        assert!(out.contains("unexpected end of input"), "{out}");
        assert!(out.contains("close every open bracket"), "{out}");
    }

    #[test]
    fn test_nesting_too_deep_diagnostic() {
        let depth = unravel_parse::DEFAULT_MAX_DEPTH + 1;
        let out = render(&format!("{}x{}", "[".repeat(depth), "]".repeat(depth)));
        assert!(out.contains("nesting too deep"), "{out}");
        assert!(out.contains("ParseOptions::max_depth"), "{out}");
    }

    #[test]
    fn test_label_ranges() {
        let err = ParseError::new(ParseErrorKind::UnexpectedEnd, "[1,2", 4);
        assert_eq!(label_range(&err), 3..4);
        let err = ParseError::new(ParseErrorKind::UnexpectedEnd, "", 0);
        assert_eq!(label_range(&err), 0..0);
        let err = ParseError::new(ParseErrorKind::ItemExpected, "a,,b", 2).with_character(",");
        assert_eq!(label_range(&err), 2..3);
    }
}
