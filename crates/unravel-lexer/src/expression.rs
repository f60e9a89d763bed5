//! The grammar of the CLI expression language.

use once_cell::sync::Lazy;

use crate::{Grammar, GrammarError, Pattern, RuleOptions, TokenKind, convert};

static EXPRESSION: Lazy<Grammar> =
    Lazy::new(|| build().expect("expression grammar patterns are valid"));

/// The shared expression grammar, built on first use.
pub fn expression_grammar() -> &'static Grammar {
    &EXPRESSION
}

fn build() -> Result<Grammar, GrammarError> {
    let counted = |pattern: &str, kind, counter: &str, open: bool| {
        let options = if open {
            RuleOptions::new().increment(counter)
        } else {
            RuleOptions::new().decrement(counter)
        };
        (Pattern::literal(pattern), kind, options)
    };

    let brackets = [
        counted("(", TokenKind::LParen, "paren", true),
        counted(")", TokenKind::RParen, "paren", false),
        counted("{", TokenKind::LCurly, "curly", true),
        counted("}", TokenKind::RCurly, "curly", false),
        counted("[", TokenKind::LSquare, "square", true),
        counted("]", TokenKind::RSquare, "square", false),
    ];

    let mut builder = Grammar::builder()
        .matches(Pattern::regex(r"\\")?, TokenKind::Escape)
        .matches(Pattern::regex(r"\$\w+")?, TokenKind::Variable)
        .matches(Pattern::regex(r#""[^"\\]*(?:\\.[^"\\]*)*""#)?, TokenKind::Quote);
    for (pattern, kind, options) in brackets {
        builder = builder.matches_with(pattern, kind, options);
    }

    builder
        .matches(Pattern::literal(","), TokenKind::Comma)
        .matches(Pattern::regex(r"\s+")?, TokenKind::Whitespace)
        .matches_with(
            Pattern::regex(r"[-+]?[0-9]*\.[0-9]+")?,
            TokenKind::Number,
            RuleOptions::new().convert_with(convert::float),
        )
        .matches_with(
            Pattern::regex(r"[-+]?[0-9]+")?,
            TokenKind::Number,
            RuleOptions::new().convert_with(convert::integer),
        )
        .matches(Pattern::literal("="), TokenKind::Equals)
        .matches_with(
            Pattern::literal("\""),
            TokenKind::UnmatchedQuote,
            RuleOptions::new().raises("Unmatched quote"),
        )
        .default_rule(Pattern::regex(r#"[^\s\\"(){}\[\],=]+"#)?, TokenKind::Word)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LexErrorKind, TokenValue};
    use proptest::prelude::*;
    use unravel_testhelpers::setup;

    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        expression_grammar()
            .lex(source)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_structural_tokens() {
        setup();
        assert_eq!(lex("("), vec![(TokenKind::LParen, "(")]);
        assert_eq!(lex(")"), vec![(TokenKind::RParen, ")")]);
        assert_eq!(lex("{"), vec![(TokenKind::LCurly, "{")]);
        assert_eq!(lex("}"), vec![(TokenKind::RCurly, "}")]);
        assert_eq!(lex("["), vec![(TokenKind::LSquare, "[")]);
        assert_eq!(lex("]"), vec![(TokenKind::RSquare, "]")]);
        assert_eq!(lex(","), vec![(TokenKind::Comma, ",")]);
        assert_eq!(lex("="), vec![(TokenKind::Equals, "=")]);
        assert_eq!(lex("\\"), vec![(TokenKind::Escape, "\\")]);
    }

    #[test]
    fn test_assignment() {
        setup();
        assert_eq!(
            lex("a = [1,2]"),
            vec![
                (TokenKind::Word, "a"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Equals, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::LSquare, "["),
                (TokenKind::Number, "1"),
                (TokenKind::Comma, ","),
                (TokenKind::Number, "2"),
                (TokenKind::RSquare, "]"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        setup();
        let values: Vec<_> = expression_grammar()
            .lex("1 -2 +3 .5 -1.25")
            .unwrap()
            .tokens
            .into_iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.value)
            .collect();
        assert_eq!(
            values,
            vec![
                TokenValue::Int(1),
                TokenValue::Int(-2),
                TokenValue::Int(3),
                TokenValue::Float(0.5),
                TokenValue::Float(-1.25),
            ]
        );
    }

    #[test]
    fn test_words_and_variables() {
        setup();
        assert_eq!(
            lex("$host name-1 /usr/bin"),
            vec![
                (TokenKind::Variable, "$host"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Word, "name-1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Word, "/usr/bin"),
            ]
        );
        // a leading digit run is a number, the rest a word
        assert_eq!(
            lex("12ab"),
            vec![(TokenKind::Number, "12"), (TokenKind::Word, "ab")]
        );
    }

    #[test]
    fn test_quotes() {
        setup();
        assert_eq!(
            lex(r#""quote test""#),
            vec![(TokenKind::Quote, r#""quote test""#)]
        );
        assert_eq!(
            lex(r#""with \"escapes\"""#),
            vec![(TokenKind::Quote, r#""with \"escapes\"""#)]
        );
    }

    #[test]
    fn test_unmatched_quote() {
        setup();
        let err = expression_grammar().lex("\"").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::Unmatchable);
        assert_eq!(err.message, "Unmatched quote");
        assert_eq!(err.offset, 0);

        let err = expression_grammar().lex("a \"b").unwrap_err();
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_bracket_counters() {
        setup();
        let lexed = expression_grammar().lex("{a=[1,(2]").unwrap();
        assert_eq!(lexed.counters.get("curly"), Some(1));
        assert_eq!(lexed.counters.get("square"), Some(0));
        assert_eq!(lexed.counters.get("paren"), Some(1));
        assert!(!lexed.counters.is_balanced());
    }

    #[test]
    fn test_available_kinds() {
        let kinds = expression_grammar().kinds();
        assert!(kinds.contains(&TokenKind::Word));
        assert!(kinds.contains(&TokenKind::UnmatchedQuote));
        assert!(!kinds.contains(&TokenKind::End));
        assert_eq!(kinds.len(), 15);
    }

    proptest! {
        /// Token text accounts for every input character exactly once.
        #[test]
        fn rejoined_text_reproduces_source(source in r#"[a-z0-9 ,=\[\]{}()$.+\-\\]{0,18}"#) {
            let lexed = expression_grammar().lex(&source).unwrap();
            let rejoined: String = lexed.tokens.iter().map(|t| t.text).collect();
            prop_assert_eq!(&rejoined, &source);

            let mut offset = 0;
            for token in &lexed.tokens {
                prop_assert_eq!(token.span.start, offset);
                offset = token.span.end;
            }
            prop_assert_eq!(offset, source.chars().count());
        }

        /// Without numbers, rejoining values is the same as rejoining text.
        #[test]
        fn rejoined_values_reproduce_source(source in r#"[a-z ,=\[\]{}()]{0,40}"#) {
            let lexed = expression_grammar().lex(&source).unwrap();
            let rejoined: String = lexed.tokens.iter().map(|t| t.value.to_string()).collect();
            prop_assert_eq!(rejoined, source);
        }
    }
}
