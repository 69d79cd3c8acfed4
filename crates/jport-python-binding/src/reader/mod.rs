//! Python declaration reader
//!
//! Recovers the class/field/method outline of a Python module and rejects
//! text Python itself would refuse to compile for structural reasons:
//! broken indentation, unbalanced brackets, unterminated strings and
//! malformed `class`/`def` headers. Expressions are never parsed.

pub mod lexer;

use jport_core::error::line_column;
use jport_core::naming::is_python_keyword;
use lexer::{PyToken, SpannedPyToken, tokenize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ReadError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleOutline {
    pub classes: Vec<ClassOutline>,
}

impl ModuleOutline {
    pub fn class(&self, name: &str) -> Option<&ClassOutline> {
        self.classes.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassOutline {
    pub name: String,
    pub line: usize,
    /// Base expressions as written.
    pub bases: Vec<String>,
    pub fields: Vec<FieldOutline>,
    /// Every `def` except `__init__`.
    pub methods: Vec<MethodOutline>,
    pub inits: Vec<MethodOutline>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutline {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodOutline {
    pub name: String,
    pub line: usize,
    /// Parameter names without `*`/`**`, `self` and `cls` included.
    pub params: Vec<String>,
    /// Parameters other than `self`/`cls` written without an annotation.
    pub unannotated: Vec<String>,
    pub returns_annotated: bool,
    pub decorators: Vec<String>,
}

/// One logical line: physical lines joined by open brackets.
struct LogicalLine {
    indent: usize,
    number: usize,
    tokens: Vec<SpannedPyToken>,
}

impl LogicalLine {
    fn first(&self) -> Option<&PyToken> {
        self.tokens.first().map(|(t, _)| t)
    }

    fn opens_block(&self) -> bool {
        matches!(self.tokens.last(), Some((PyToken::Colon, _)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Module,
    Class(usize),
    Other,
}

struct Block {
    indent: usize,
    owner: Owner,
}

pub fn read_outline(source: &str) -> Result<ModuleOutline, ReadError> {
    let lines = logical_lines(source)?;

    let mut outline = ModuleOutline::default();
    let mut blocks = vec![Block {
        indent: 0,
        owner: Owner::Module,
    }];
    let mut pending: Option<(Owner, usize)> = None;
    let mut decorators: Vec<String> = Vec::new();

    for line in &lines {
        let top = blocks.last().map_or(0, |b| b.indent);
        if let Some((owner, _)) = pending.take() {
            if line.indent <= top {
                return Err(error_at(line.number, "expected an indented block"));
            }
            blocks.push(Block {
                indent: line.indent,
                owner,
            });
        } else if line.indent > top {
            return Err(error_at(line.number, "unexpected indent"));
        } else {
            while blocks.last().is_some_and(|b| line.indent < b.indent) {
                blocks.pop();
            }
            if blocks.last().map(|b| b.indent) != Some(line.indent) {
                return Err(error_at(
                    line.number,
                    "unindent does not match any outer indentation level",
                ));
            }
        }

        let owner = blocks.last().map_or(Owner::Module, |b| b.owner);
        let mut opened = Owner::Other;
        let start = usize::from(line.first().is_some_and(|t| t.is_name("async")));
        let head = line.tokens.get(start).map(|(t, _)| t);

        match head {
            Some(PyToken::At) => {
                decorators.push(span_text(source, &line.tokens[1..]).to_string());
            }
            Some(t) if t.is_name("class") => {
                let (name, bases) = class_header(source, line)?;
                if owner == Owner::Module {
                    outline.classes.push(ClassOutline {
                        name,
                        line: line.number,
                        bases,
                        fields: Vec::new(),
                        methods: Vec::new(),
                        inits: Vec::new(),
                    });
                    opened = Owner::Class(outline.classes.len() - 1);
                }
                decorators.clear();
            }
            Some(t) if t.is_name("def") => {
                let mut method = def_header(source, line, start)?;
                if let Owner::Class(index) = owner {
                    method.decorators = std::mem::take(&mut decorators);
                    let class = &mut outline.classes[index];
                    if method.name == "__init__" {
                        class.inits.push(method);
                    } else {
                        class.methods.push(method);
                    }
                }
                decorators.clear();
            }
            _ => {
                if let (Owner::Class(index), Some(name)) = (owner, field_name(line)) {
                    outline.classes[index].fields.push(FieldOutline {
                        name,
                        line: line.number,
                    });
                }
                decorators.clear();
            }
        }

        if line.opens_block() {
            pending = Some((opened, line.number));
        }
    }

    if let Some((_, number)) = pending {
        return Err(error_at(number + 1, "expected an indented block"));
    }
    Ok(outline)
}

fn error_at(line: usize, message: impl Into<String>) -> ReadError {
    ReadError {
        line,
        message: message.into(),
    }
}

fn token_error(source: &str, offset: usize) -> ReadError {
    let (line, _) = line_column(source, offset);
    let rest = &source[offset..];
    let unquoted = rest.trim_start_matches(['r', 'R', 'b', 'B', 'u', 'U', 'f', 'F']);
    let message = if unquoted.starts_with(['"', '\'']) {
        "unterminated string literal".to_string()
    } else {
        match rest.chars().next() {
            Some(c) => format!("invalid character `{c}`"),
            None => "unexpected end of input".to_string(),
        }
    };
    error_at(line, message)
}

/// Split tokens into logical lines, checking bracket balance on the way.
fn logical_lines(source: &str) -> Result<Vec<LogicalLine>, ReadError> {
    let mut lines = Vec::new();
    let mut current: Vec<SpannedPyToken> = Vec::new();
    let mut open: Vec<(char, usize)> = Vec::new();

    for (token, span) in tokenize(source) {
        if token == PyToken::Error {
            return Err(token_error(source, span.start));
        }
        if token == PyToken::Newline {
            if open.is_empty() && !current.is_empty() {
                lines.push(logical_line(source, std::mem::take(&mut current)));
            }
            continue;
        }
        if let Some(bracket) = token.opens() {
            open.push((bracket, span.start));
        } else if let Some(bracket) = token.closes() {
            let closing = &source[span.clone()];
            match open.pop() {
                Some((opening, _)) if opening == bracket => {}
                Some((opening, _)) => {
                    let (line, _) = line_column(source, span.start);
                    return Err(error_at(
                        line,
                        format!("closing `{closing}` does not match opening `{opening}`"),
                    ));
                }
                None => {
                    let (line, _) = line_column(source, span.start);
                    return Err(error_at(line, format!("unmatched `{closing}`")));
                }
            }
        }
        current.push((token, span));
    }

    if let Some((opening, offset)) = open.last() {
        let (line, _) = line_column(source, *offset);
        return Err(error_at(line, format!("`{opening}` was never closed")));
    }
    if !current.is_empty() {
        lines.push(logical_line(source, current));
    }
    Ok(lines)
}

fn logical_line(source: &str, tokens: Vec<SpannedPyToken>) -> LogicalLine {
    let offset = tokens.first().map_or(0, |(_, span)| span.start);
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let indent = source[line_start..offset].chars().fold(0, |width, c| match c {
        '\t' => (width / 8 + 1) * 8,
        '\x0c' => 0,
        _ => width + 1,
    });
    LogicalLine {
        indent,
        number: line_column(source, offset).0,
        tokens,
    }
}

/// Source text covered by a token run.
fn span_text<'s>(source: &'s str, tokens: &[SpannedPyToken]) -> &'s str {
    match (tokens.first(), tokens.last()) {
        (Some((_, first)), Some((_, last))) => &source[first.start..last.end],
        _ => "",
    }
}

/// Index of the bracket closing the one at `open`.
fn matching_close(tokens: &[SpannedPyToken], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, (token, _)) in tokens.iter().enumerate().skip(open) {
        if token.opens().is_some() {
            depth += 1;
        } else if token.closes().is_some() {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split a token run at top-level commas, dropping empty pieces.
fn split_top_level(tokens: &[SpannedPyToken]) -> Vec<&[SpannedPyToken]> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, (token, _)) in tokens.iter().enumerate() {
        if token.opens().is_some() {
            depth += 1;
        } else if token.closes().is_some() {
            depth = depth.saturating_sub(1);
        } else if *token == PyToken::Comma && depth == 0 {
            pieces.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    pieces.push(&tokens[start..]);
    pieces.into_iter().filter(|p| !p.is_empty()).collect()
}

/// True when a top-level `:` follows position `from`.
fn has_top_level_colon(tokens: &[SpannedPyToken], from: usize) -> bool {
    let mut depth = 0usize;
    for (token, _) in tokens.iter().skip(from) {
        if token.opens().is_some() {
            depth += 1;
        } else if token.closes().is_some() {
            depth = depth.saturating_sub(1);
        } else if *token == PyToken::Colon && depth == 0 {
            return true;
        }
    }
    false
}

fn identifier(token: Option<&SpannedPyToken>) -> Option<&str> {
    match token {
        Some((PyToken::Name(name), _)) if !is_python_keyword(name) => Some(name.as_str()),
        _ => None,
    }
}

/// `class Name:` or `class Name(bases):`.
fn class_header(source: &str, line: &LogicalLine) -> Result<(String, Vec<String>), ReadError> {
    let invalid = |what: &str| error_at(line.number, format!("invalid class header: {what}"));
    let tokens = &line.tokens;

    let name = identifier(tokens.get(1)).ok_or_else(|| invalid("expected a class name"))?;
    let (bases, after) = match tokens.get(2) {
        Some((PyToken::LParen, _)) => {
            let close = matching_close(tokens, 2).ok_or_else(|| invalid("unclosed base list"))?;
            let bases = split_top_level(&tokens[3..close])
                .into_iter()
                .map(|base| span_text(source, base).to_string())
                .collect();
            (bases, close + 1)
        }
        _ => (Vec::new(), 2),
    };

    match tokens.get(after) {
        Some((PyToken::Colon, _)) => Ok((name.to_string(), bases)),
        _ => Err(invalid("expected `:`")),
    }
}

/// `def name(params) [-> annotation]:`; `start` points at `def`.
fn def_header(
    source: &str,
    line: &LogicalLine,
    start: usize,
) -> Result<MethodOutline, ReadError> {
    let invalid = |what: &str| error_at(line.number, format!("invalid def header: {what}"));
    let tokens = &line.tokens;

    let name = identifier(tokens.get(start + 1)).ok_or_else(|| invalid("expected a function name"))?;
    if !matches!(tokens.get(start + 2), Some((PyToken::LParen, _))) {
        return Err(invalid("expected `(`"));
    }
    let close = matching_close(tokens, start + 2).ok_or_else(|| invalid("unclosed parameter list"))?;

    let mut params: Vec<String> = Vec::new();
    let mut unannotated = Vec::new();
    for param in split_top_level(&tokens[start + 3..close]) {
        let named = param
            .iter()
            .position(|(t, _)| !matches!(t, PyToken::Star | PyToken::DoubleStar));
        match named.map(|i| &param[i..]) {
            Some([(PyToken::Name(n), _), rest @ ..]) => {
                if params.contains(n) {
                    return Err(error_at(
                        line.number,
                        format!("duplicate argument `{n}` in function definition"),
                    ));
                }
                let receiver = matches!(n.as_str(), "self" | "cls");
                if !receiver && !matches!(rest.first(), Some((PyToken::Colon, _))) {
                    unannotated.push(n.clone());
                }
                params.push(n.clone());
            }
            // Bare `*` and `/` separators.
            None | Some([(PyToken::Op(_), _)]) => {}
            Some(_) => {
                return Err(invalid(&format!(
                    "unexpected `{}` in parameter list",
                    span_text(source, param)
                )));
            }
        }
    }

    let returns_annotated = match tokens.get(close + 1) {
        Some((PyToken::Colon, _)) => false,
        Some((PyToken::Op(op), _)) if op == "->" && has_top_level_colon(tokens, close + 2) => true,
        _ => return Err(invalid("expected `:`")),
    };
    Ok(MethodOutline {
        name: name.to_string(),
        line: line.number,
        params,
        unannotated,
        returns_annotated,
        decorators: Vec::new(),
    })
}

/// `name: T [= v]` or `name = v` directly in a class body.
fn field_name(line: &LogicalLine) -> Option<String> {
    let name = identifier(line.tokens.first())?;
    match line.tokens.get(1) {
        Some((PyToken::Colon, _)) | Some((PyToken::Eq, _)) => Some(name.to_string()),
        _ => None,
    }
}
