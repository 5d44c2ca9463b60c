//! Rich, colored rendering of a [`ParseError`]/[`EvalError`] against its
//! source text, for use by the CLI's `parse` and `convert` subcommands.

use crate::eval::EvalError;
use crate::parser::ParseError;
use crate::tokens::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A rendered diagnostic with source context. Presentation only — it never
/// changes which of the three error kinds in §7 of the spec was raised.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Option<Span>,
    pub source_line: Option<String>,
}

impl Diagnostic {
    pub fn from_parse_error(err: &ParseError, source: &str) -> Self {
        let ParseError::Syntax { message, span } = err;
        Diagnostic {
            severity: Severity::Error,
            message: message.clone(),
            span: Some(*span),
            source_line: line_text(source, span.line),
        }
    }

    pub fn from_eval_error(err: &EvalError, module_label: &str) -> Self {
        let EvalError::UndefinedVariable { name } = err;
        Diagnostic {
            severity: Severity::Error,
            message: format!("undefined variable '{name}' while converting {module_label}"),
            span: None,
            source_line: None,
        }
    }

    /// Render as plain text (no ANSI codes); the CLI wraps this in color.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.span {
            Some(span) => out.push_str(&format!("{label}: {} ({span})\n", self.message)),
            None => out.push_str(&format!("{label}: {}\n", self.message)),
        }
        if let (Some(span), Some(line)) = (self.span, &self.source_line) {
            out.push_str(&format!("  {line}\n"));
            out.push_str(&format!("  {}^\n", " ".repeat(span.col.saturating_sub(1))));
        }
        out
    }
}

fn line_text(source: &str, line: usize) -> Option<String> {
    if line == 0 {
        return None;
    }
    source.lines().nth(line - 1).map(|s| s.to_string())
}
