//! Java lexer - tokenizes Java source code
//!
//! Declarations get dedicated tokens. Everything that can only appear inside
//! bodies and initializers (operators, most keywords) is lexed coarsely: the
//! parser only needs to balance brackets there and never looks inside.

use chumsky::span::SimpleSpan;
use jport_core::Modifier;
use logos::Logos;
use std::fmt;

/// Token type for Java source code
#[derive(Logos, Debug, PartialEq, Eq, Clone, Hash, Default)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Comments are lexed so their contents never reach the parser, then
    // dropped by `tokenize`.
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", allow_greedy = true)]
    BlockComment,

    // Declaration keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("throws")]
    Throws,
    #[token("super")]
    Super,

    #[token("public", |_| Modifier::Public)]
    #[token("protected", |_| Modifier::Protected)]
    #[token("private", |_| Modifier::Private)]
    #[token("static", |_| Modifier::Static)]
    #[token("final", |_| Modifier::Final)]
    #[token("abstract", |_| Modifier::Abstract)]
    #[token("synchronized", |_| Modifier::Synchronized)]
    #[token("native", |_| Modifier::Native)]
    #[token("transient", |_| Modifier::Transient)]
    #[token("volatile", |_| Modifier::Volatile)]
    #[token("strictfp", |_| Modifier::Strictfp)]
    #[token("default", |_| Modifier::Default)]
    Modifier(Modifier),

    // Literals, kept as written. A text block is a `"""` token so it wins
    // over the empty string `""` on length.
    #[token("\"\"\"", text_block)]
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    StringLit(String),
    #[regex(r"'([^'\\\n]|\\.)+'", |lex| lex.slice().to_string())]
    CharLit(String),
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?[a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?[a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Number(String),

    // Primitive type names, `void`, `this`, `new` and the statement keywords
    // are plain identifiers at this level.
    #[regex(r"[\p{XID_Start}_$][\p{XID_Continue}$]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    // `>>` is never a single token so nested generic arguments close one
    // level at a time.
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
    #[token("@")]
    At,
    #[token("*")]
    Star,
    #[regex(r"[-+/%!~|^:]", |lex| lex.slice().chars().next())]
    Op(char),

    /// Error token for unrecognized input
    #[default]
    Error,
}

/// Consume a text block through its closing `"""`. `\"""` does not close
/// it. No match when the block is never closed.
fn text_block(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        if rest[i] == b'\\' {
            i += 2;
            continue;
        }
        if rest[i..].starts_with(b"\"\"\"") {
            lex.bump(i + 3);
            return Some(lex.slice().to_string());
        }
        i += 1;
    }
    None
}

impl Token {
    fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment | Token::BlockComment)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LineComment | Token::BlockComment => write!(f, "comment"),
            Token::Package => write!(f, "package"),
            Token::Import => write!(f, "import"),
            Token::Class => write!(f, "class"),
            Token::Interface => write!(f, "interface"),
            Token::Enum => write!(f, "enum"),
            Token::Extends => write!(f, "extends"),
            Token::Implements => write!(f, "implements"),
            Token::Throws => write!(f, "throws"),
            Token::Super => write!(f, "super"),
            Token::Modifier(m) => write!(f, "{m}"),
            Token::StringLit(s) | Token::CharLit(s) | Token::Number(s) | Token::Ident(s) => {
                write!(f, "{s}")
            }
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Ellipsis => write!(f, "..."),
            Token::Dot => write!(f, "."),
            Token::Eq => write!(f, "="),
            Token::Question => write!(f, "?"),
            Token::Amp => write!(f, "&"),
            Token::At => write!(f, "@"),
            Token::Star => write!(f, "*"),
            Token::Op(c) => write!(f, "{c}"),
            Token::Error => write!(f, "invalid token"),
        }
    }
}

/// Token with span information
pub type SpannedToken = (Token, SimpleSpan);

/// Tokenize Java source code with spans, dropping comments.
///
/// Unrecognized input becomes [`Token::Error`]; the parser reports it.
pub fn tokenize(source: &str) -> Vec<SpannedToken> {
    Token::lexer(source)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Error), span.into()))
        .filter(|(tok, _)| !tok.is_comment())
        .collect()
}
