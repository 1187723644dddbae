//! Build-time diagnostics.
//!
//! Every unsupported construct produces exactly one diagnostic and a
//! placeholder fragment; traversal continues. Diagnostics are surfaced to the
//! caller as ordered build messages, never as runtime panics or exceptions.

use std::sync::{Arc, Mutex};

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::ast::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Closed taxonomy of per-construct compilation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// The selection references a value not reachable from the scope root.
    OutOfScopeReference { name: String, scope_root: String },
    /// The variables argument is not a flat aggregate literal.
    UnsupportedVariablesShape,
    /// An argument is neither a literal, a declared variable, nor an enum
    /// constant.
    UnresolvedArgument,
    /// Catch-all for any expression shape the compiler does not model.
    UnsupportedExpressionShape { suggestion: Option<String> },
    /// The call site looks like the DSL but its parameter shape matches no
    /// supported pattern.
    AmbiguousOperationShape,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::OutOfScopeReference { name, scope_root } => {
                write!(
                    f,
                    "'{}' is not reachable from the selection root '{}'; only the root, literals and declared variables may appear here",
                    name, scope_root
                )
            }
            DiagnosticKind::UnsupportedVariablesShape => {
                write!(
                    f,
                    "variables must be a flat struct literal with named members"
                )
            }
            DiagnosticKind::UnresolvedArgument => {
                write!(
                    f,
                    "argument is not a literal, a declared variable, or an enum constant"
                )
            }
            DiagnosticKind::UnsupportedExpressionShape { suggestion } => {
                if let Some(s) = suggestion {
                    write!(f, "unsupported expression. Did you mean '{}'?", s)
                } else {
                    write!(f, "unsupported expression")
                }
            }
            DiagnosticKind::AmbiguousOperationShape => {
                write!(
                    f,
                    "call site does not match any supported operation pattern"
                )
            }
        }
    }
}

/// One build message, pointing at the exact offending sub-expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub location: Location,
    /// Normalized source text of the offending sub-expression.
    pub source: String,
    pub kind: DiagnosticKind,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(location: Location, source: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            location,
            source: source.into(),
            kind,
            severity: Severity::Error,
        }
    }

    pub fn message(&self) -> String {
        format!("{}: {} (in `{}`)", self.location, self.kind, self.source)
    }
}

/// Append-only collector shared across one compiler invocation.
///
/// Clones share the same buffer; appends are thread-safe so call sites can be
/// compiled in parallel.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    inner: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.inner.lock().expect("diagnostic sink poisoned").push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("diagnostic sink poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the collected diagnostics, in emission order.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.inner.lock().expect("diagnostic sink poisoned").clone()
    }
}

/// Renders diagnostics as colored terminal lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticPrinter;

impl DiagnosticPrinter {
    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            let label = match diagnostic.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            out.push_str(&format!(
                "{} [{}]: {}\n  --> `{}`\n",
                label,
                diagnostic.location,
                diagnostic.kind,
                diagnostic.source.cyan()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_preserves_order() {
        let sink = DiagnosticSink::new();
        sink.push(Diagnostic::error(
            Location { line: 1, column: 0 },
            "first",
            DiagnosticKind::UnresolvedArgument,
        ));
        sink.push(Diagnostic::error(
            Location { line: 2, column: 4 },
            "second",
            DiagnosticKind::AmbiguousOperationShape,
        ));
        let all = sink.snapshot();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].source, "first");
        assert_eq!(all[1].source, "second");
    }

    #[test]
    fn clones_share_the_buffer() {
        let sink = DiagnosticSink::new();
        let clone = sink.clone();
        clone.push(Diagnostic::error(
            Location::default(),
            "x",
            DiagnosticKind::UnsupportedVariablesShape,
        ));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn printer_renders_location_kind_and_source() {
        let rendered = DiagnosticPrinter.render(&[Diagnostic::error(
            Location { line: 3, column: 8 },
            "outer.name",
            DiagnosticKind::UnresolvedArgument,
        )]);
        assert!(rendered.contains("3:8"));
        assert!(rendered.contains("outer.name"));
        assert!(rendered.contains("argument is not a literal"));
    }

    #[test]
    fn out_of_scope_message_names_both_sides() {
        let kind = DiagnosticKind::OutOfScopeReference {
            name: "outer".to_string(),
            scope_root: "q".to_string(),
        };
        let text = kind.to_string();
        assert!(text.contains("'outer'"));
        assert!(text.contains("'q'"));
    }
}
