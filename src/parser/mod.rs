//! Call-site classification.
//!
//! Candidate discovery (an external pass) hands this module one call
//! expression at a time; classification decides whether it is a DSL operation
//! and extracts the `(kind, name, variables, selector)` tuple. A call whose
//! method is not `query`/`mutation` is silently skipped; a call that names
//! the DSL but matches no supported parameter pattern is reported as
//! `AmbiguousOperationShape`.

mod selection;

pub use selection::lower_expr;

use syn::{Expr, Lit};

use crate::ast::{Candidate, OperationKind, SelectionKind};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::{SelqError, SelqResult};
use selection::{location_of, source_of};

/// Classify one call expression into a [`Candidate`].
///
/// Returns `None` both for non-DSL calls (silently) and for ambiguous DSL
/// calls (with a diagnostic).
pub fn classify_candidate(expr: &Expr, sink: &DiagnosticSink) -> Option<Candidate> {
    let call = match unwrap_call(expr) {
        Expr::MethodCall(call) => call,
        _ => return None,
    };

    let kind = match call.method.to_string().as_str() {
        "query" => OperationKind::Query,
        "mutation" => OperationKind::Mutation,
        _ => return None,
    };

    let location = location_of(call.method.span());
    let source = source_of(expr);
    let ambiguous = || {
        sink.push(Diagnostic::error(
            location,
            source.clone(),
            DiagnosticKind::AmbiguousOperationShape,
        ));
        None
    };

    let args: Vec<&Expr> = call.args.iter().collect();
    let Some((selector_expr, head)) = args.split_last() else {
        return ambiguous();
    };
    let selector = lower_expr(selector_expr);
    let SelectionKind::Lambda { params, .. } = &selector.kind else {
        return ambiguous();
    };

    let (name, variables, expected_arity) = match head {
        [] => (None, None, 1),
        [Expr::Lit(lit)] => {
            if let Lit::Str(name) = &lit.lit {
                (Some(name.value()), None, 1)
            } else {
                return ambiguous();
            }
        }
        [other] => (None, Some((*other).clone()), 2),
        _ => return ambiguous(),
    };
    if params.len() != expected_arity {
        return ambiguous();
    }

    Some(Candidate {
        kind,
        name,
        variables,
        selector,
        key: source,
        location,
    })
}

/// Parse a call expression from source text and classify it.
pub fn parse_candidate(source: &str, sink: &DiagnosticSink) -> SelqResult<Option<Candidate>> {
    let expr: Expr =
        syn::parse_str(source).map_err(|e| SelqError::Selector(e.to_string()))?;
    Ok(classify_candidate(&expr, sink))
}

fn unwrap_call(expr: &Expr) -> &Expr {
    match expr {
        Expr::Await(inner) => unwrap_call(&inner.base),
        Expr::Paren(inner) => unwrap_call(&inner.expr),
        Expr::Group(inner) => unwrap_call(&inner.expr),
        _ => expr,
    }
}
