//! Parse error handling for the Java parser
//!
//! Converts lexer failures and chumsky `Rich` errors into
//! [`jport_core::SyntaxError`] with 1-based line and column.

use chumsky::error::{Rich, RichPattern, RichReason};
use chumsky::span::SimpleSpan;
use jport_core::SyntaxError;

use crate::frontend::lexer::Token;

/// Error for a token the lexer could not recognize.
pub(crate) fn lex_error(source: &str, span: SimpleSpan) -> SyntaxError {
    let text = source.get(span.start..span.end).unwrap_or_default();
    let message = match text.chars().next() {
        Some('"') => "unterminated string literal".to_string(),
        Some('\'') => "unterminated character literal".to_string(),
        Some(c) => format!("unrecognized character `{c}`"),
        None => "unrecognized input".to_string(),
    };
    let mut err = SyntaxError::at(source, span.start, message);
    err.found = Some(text.to_string());
    err
}

fn describe(pattern: &RichPattern<'_, Token>) -> String {
    match pattern {
        RichPattern::Token(tok) => format!("`{}`", &**tok),
        RichPattern::Label(label) => label.to_string(),
        RichPattern::EndOfInput => "end of input".to_string(),
        other => format!("{other:?}"),
    }
}

/// Convert chumsky Rich error to SyntaxError
pub(crate) fn to_syntax_error(err: &Rich<'_, Token, SimpleSpan>, source: &str) -> SyntaxError {
    let span = err.span();

    let mut expected: Vec<String> = err.expected().map(describe).collect();
    expected.sort();
    expected.dedup();

    let found = err.found().map(|t| t.to_string());

    let message = match err.reason() {
        RichReason::Custom(msg) => msg.to_string(),
        _ => {
            let found_text = match &found {
                Some(tok) => format!("`{tok}`"),
                None => "end of input".to_string(),
            };
            if expected.is_empty() {
                format!("unexpected {found_text}")
            } else {
                format!("found {found_text}, expected {}", expected.join(" or "))
            }
        }
    };

    let mut out = SyntaxError::at(source, span.start, message);
    out.expected = expected;
    out.found = found;
    out
}
