//! Python lexer - tokenizes just enough Python to recover its block structure
//!
//! Physical newlines are tokens; indentation is measured from the source
//! text by the reader, not lexed.

use logos::{Lexer, Logos};
use std::ops::Range;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Hash, Default)]
#[logos(skip r"[ \t\f]+|\\\r?\n")]
pub enum PyToken {
    #[regex(r"#[^\n]*", allow_greedy = true)]
    Comment,
    #[regex(r"\r?\n")]
    Newline,

    #[regex(r#"[rRbBuUfF]{0,2}""""#, |lex| close_triple(lex, b"\"\"\""))]
    #[regex(r#"[rRbBuUfF]{0,2}'''"#, |lex| close_triple(lex, b"'''"))]
    TripleStr,
    #[regex(r#"[rRbBuUfF]{0,2}"([^"\\\n]|\\.)*""#)]
    #[regex(r#"[rRbBuUfF]{0,2}'([^'\\\n]|\\.)*'"#)]
    Str,
    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?([eE][+-][0-9_]+)?")]
    Number,
    #[regex(r"[\p{XID_Start}_][\p{XID_Continue}]*", |lex| lex.slice().to_string())]
    Name(String),

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Eq,
    #[token("@")]
    At,
    #[token("*")]
    Star,
    #[token("**")]
    DoubleStar,
    #[regex(r"[-+/%&|^~<>!]+=?", |lex| lex.slice().to_string())]
    #[token("==", |lex| lex.slice().to_string())]
    #[token(":=", |lex| lex.slice().to_string())]
    #[token("*=", |lex| lex.slice().to_string())]
    #[token("**=", |lex| lex.slice().to_string())]
    #[token("@=", |lex| lex.slice().to_string())]
    Op(String),

    #[default]
    Error,
}

impl PyToken {
    pub fn is_name(&self, name: &str) -> bool {
        matches!(self, PyToken::Name(n) if n == name)
    }

    pub fn opens(&self) -> Option<char> {
        match self {
            PyToken::LParen => Some('('),
            PyToken::LBracket => Some('['),
            PyToken::LBrace => Some('{'),
            _ => None,
        }
    }

    pub fn closes(&self) -> Option<char> {
        match self {
            PyToken::RParen => Some('('),
            PyToken::RBracket => Some('['),
            PyToken::RBrace => Some('{'),
            _ => None,
        }
    }
}

/// Consume through the closing triple quote; no match when the string is
/// never closed.
fn close_triple(lex: &mut Lexer<PyToken>, quote: &[u8]) -> bool {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        if rest[i] == b'\\' {
            i += 2;
            continue;
        }
        if rest[i..].starts_with(quote) {
            lex.bump(i + quote.len());
            return true;
        }
        i += 1;
    }
    false
}

pub type SpannedPyToken = (PyToken, Range<usize>);

/// Tokenize Python source; comments are dropped, lexing errors become
/// [`PyToken::Error`].
pub fn tokenize(source: &str) -> Vec<SpannedPyToken> {
    PyToken::lexer(source)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(PyToken::Error), span))
        .filter(|(tok, _)| *tok != PyToken::Comment)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<PyToken> {
        tokenize(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_class_header() {
        assert_eq!(
            kinds("class A(B, Generic[T]):  # note\n"),
            [
                PyToken::Name("class".into()),
                PyToken::Name("A".into()),
                PyToken::LParen,
                PyToken::Name("B".into()),
                PyToken::Comma,
                PyToken::Name("Generic".into()),
                PyToken::LBracket,
                PyToken::Name("T".into()),
                PyToken::RBracket,
                PyToken::RParen,
                PyToken::Colon,
                PyToken::Newline,
            ]
        );
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let tokens = kinds("\"\"\"one\ntwo \"quoted\"\n\"\"\"\nx");
        assert_eq!(
            tokens,
            [PyToken::TripleStr, PyToken::Newline, PyToken::Name("x".into())]
        );
    }

    #[test]
    fn test_unterminated_strings_are_errors() {
        assert!(kinds("'''never closed").contains(&PyToken::Error));
        assert!(kinds("x = \"open\n").contains(&PyToken::Error));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("-> == = ** *"),
            [
                PyToken::Op("->".into()),
                PyToken::Op("==".into()),
                PyToken::Eq,
                PyToken::DoubleStar,
                PyToken::Star,
            ]
        );
    }

    #[test]
    fn test_unicode_names() {
        assert_eq!(
            kinds("数量: int"),
            [
                PyToken::Name("数量".into()),
                PyToken::Colon,
                PyToken::Name("int".into())
            ]
        );
    }

    #[test]
    fn test_line_continuation_is_skipped() {
        assert_eq!(
            kinds("a \\\n b"),
            [PyToken::Name("a".into()), PyToken::Name("b".into())]
        );
    }
}
