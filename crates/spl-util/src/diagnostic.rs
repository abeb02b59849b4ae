//! Diagnostic reporting.
//!
//! SPL splits diagnostics into two bands (see the error-handling design):
//! lexical/syntactic errors are fatal and raised the instant they're
//! detected, while scope and type errors are collected into a [`Handler`]
//! so a pass can report everything wrong with a program in one run.
//!
//! # Examples
//!
//! ```
//! use spl_util::diagnostic::{Diagnostic, DiagnosticKind, Handler};
//!
//! let mut handler = Handler::new();
//! handler.push(Diagnostic::new(DiagnosticKind::UndeclaredVariable, "'b' is not declared").with_node(7));
//! assert!(handler.has_errors());
//! assert_eq!(handler.diagnostics()[0].to_string(), "UndeclaredVariable: 'b' is not declared (node #7)");
//! ```

use crate::span::Span;
use std::fmt;

/// The kind of a diagnostic, used both for programmatic matching and as the
/// leading word of its rendered form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    DuplicateName,
    CrossCategoryClash,
    LocalShadowsParam,
    UndeclaredVariable,
    TypeError,
    ArityMismatch,
    SyntaxError,
    LexicalError,
    EmitterError,
    RecursiveInline,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::DuplicateName => "DuplicateName",
            DiagnosticKind::CrossCategoryClash => "CrossCategoryClash",
            DiagnosticKind::LocalShadowsParam => "LocalShadowsParam",
            DiagnosticKind::UndeclaredVariable => "UndeclaredVariable",
            DiagnosticKind::TypeError => "TypeError",
            DiagnosticKind::ArityMismatch => "ArityMismatch",
            DiagnosticKind::SyntaxError => "SyntaxError",
            DiagnosticKind::LexicalError => "LexicalError",
            DiagnosticKind::EmitterError => "EmitterError",
            DiagnosticKind::RecursiveInline => "RecursiveInline",
        };
        write!(f, "{s}")
    }
}

/// A single diagnostic message.
///
/// `node_id` correlates the diagnostic with the AST node that triggered it;
/// `scope_path` additionally names the scope it was raised in (scope/type
/// errors); `span` carries `line:col` for lexical/syntax errors that have no
/// AST node yet.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub node_id: Option<u32>,
    pub scope_path: Option<String>,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            node_id: None,
            scope_path: None,
            span: None,
        }
    }

    pub fn with_node(mut self, node_id: u32) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn with_scope(mut self, scope_path: impl Into<String>) -> Self {
        self.scope_path = Some(scope_path.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        match (self.node_id, &self.scope_path) {
            (Some(id), Some(scope)) => write!(f, " (node #{id}, scope {scope})")?,
            (Some(id), None) => write!(f, " (node #{id})")?,
            (None, Some(scope)) => write!(f, " (scope {scope})")?,
            (None, None) => {
                if let Some(span) = self.span.filter(|s| !s.is_dummy()) {
                    write!(f, " ({span})")?;
                }
            }
        }
        Ok(())
    }
}

/// Accumulates diagnostics for a single compilation pass.
///
/// Passes that must report everything wrong with a program (scope checking,
/// type checking) push into a `Handler` and run to completion; passes that
/// abort on the first problem (lexing, parsing) raise an error value instead
/// and never touch a `Handler`.
#[derive(Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_node_and_scope() {
        let diag = Diagnostic::new(DiagnosticKind::CrossCategoryClash, "'foo' reused")
            .with_node(3)
            .with_scope("Everywhere");
        assert_eq!(diag.to_string(), "CrossCategoryClash: 'foo' reused (node #3, scope Everywhere)");
    }

    #[test]
    fn formats_span_when_no_node() {
        let diag = Diagnostic::new(DiagnosticKind::LexicalError, "unknown character 'Q'")
            .with_span(Span::new(2, 5));
        assert_eq!(diag.to_string(), "LexicalError: unknown character 'Q' (2:5)");
    }

    #[test]
    fn handler_accumulates() {
        let mut handler = Handler::new();
        assert!(!handler.has_errors());
        handler.push(Diagnostic::new(DiagnosticKind::TypeError, "boolean where numeric expected"));
        handler.push(Diagnostic::new(DiagnosticKind::TypeError, "numeric where boolean expected"));
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics().len(), 2);
    }
}
