//! CLI errors and syntax-error diagnostics

use jport_core::SyntaxError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("no input files")]
    NoInputs,

    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("glob pattern matched no files: {0}")]
    NoMatches(String),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is already written from {}", output.display(), first.display())]
    OutputCollision { output: PathBuf, first: PathBuf },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Glob(#[from] glob::GlobError),
}

/// A [`SyntaxError`] with the source it points into, for miette rendering.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(jport::syntax_error))]
pub struct SyntaxDiagnostic {
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
}

impl SyntaxDiagnostic {
    pub fn new(name: &str, source: &str, err: &SyntaxError) -> Self {
        let offset = err.offset.min(source.len());
        let len = source
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map(char::len_utf8)
            .unwrap_or(0);
        let help = (!err.expected.is_empty())
            .then(|| format!("expected one of: {}", err.expected.join(", ")));
        Self {
            message: err.to_string(),
            source_code: NamedSource::new(name, source.to_string()),
            span: (offset, len).into(),
            help,
        }
    }
}

/// Render a syntax error the way miette's installed report handler does.
pub fn render_syntax_error(name: &str, source: &str, err: &SyntaxError) -> String {
    format!(
        "{:?}",
        miette::Report::new(SyntaxDiagnostic::new(name, source, err))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_points_at_offset() {
        let source = "class Broken {\n";
        let err = SyntaxError::at(source, source.len(), "unexpected end of input");
        let diagnostic = SyntaxDiagnostic::new("Broken.java", source, &err);
        assert_eq!(diagnostic.span.offset(), source.len());
        assert_eq!(diagnostic.span.len(), 0);
        assert_eq!(
            diagnostic.to_string(),
            "syntax error at 2:1: unexpected end of input"
        );
    }

    #[test]
    fn test_render_names_the_file() {
        let source = "class 1 {}";
        let mut err = SyntaxError::at(source, 6, "unexpected token");
        err.expected = vec!["identifier".into()];
        let rendered = render_syntax_error("Bad.java", source, &err);
        assert!(rendered.contains("Bad.java"), "{rendered}");
        assert!(rendered.contains("expected one of: identifier"), "{rendered}");
    }
}
