//! Lowering from `syn` expressions to [`SelectionNode`] trees.
//!
//! Runs once per call site. Anything outside the modeled shapes lowers to
//! `SelectionKind::Unsupported`; the compiler turns those into diagnostics
//! later so that one bad sub-expression never aborts the pass.

use proc_macro2::Span;
use quote::ToTokens;
use syn::spanned::Spanned;
use syn::{Expr, Lit, Member, Pat, UnOp};

use crate::ast::{LitValue, Location, SelectionKind, SelectionNode};
use crate::fmt::normalize_source;

pub(crate) fn location_of(span: Span) -> Location {
    let start = span.start();
    Location {
        line: start.line,
        column: start.column,
    }
}

pub(crate) fn source_of<T: ToTokens>(tokens: &T) -> String {
    normalize_source(&tokens.to_token_stream().to_string())
}

fn make(expr: &Expr, kind: SelectionKind) -> SelectionNode {
    SelectionNode::new(kind, location_of(expr.span()), source_of(expr))
}

/// Lower one expression to a selection node.
pub fn lower_expr(expr: &Expr) -> SelectionNode {
    match expr {
        Expr::Path(path) => {
            if path.qself.is_some() {
                return make(expr, SelectionKind::Unsupported);
            }
            let mut segments = Vec::new();
            for segment in &path.path.segments {
                if !segment.arguments.is_none() {
                    return make(expr, SelectionKind::Unsupported);
                }
                segments.push(segment.ident.to_string());
            }
            make(expr, SelectionKind::Path { segments })
        }
        Expr::Field(field) => match &field.member {
            Member::Named(name) => make(
                expr,
                SelectionKind::Member {
                    target: Box::new(lower_expr(&field.base)),
                    name: name.to_string(),
                },
            ),
            Member::Unnamed(_) => make(expr, SelectionKind::Unsupported),
        },
        Expr::MethodCall(call) => make(
            expr,
            SelectionKind::Call {
                target: Box::new(lower_expr(&call.receiver)),
                method: call.method.to_string(),
                args: call.args.iter().map(lower_expr).collect(),
            },
        ),
        Expr::Closure(closure) => {
            let mut params = Vec::new();
            for input in &closure.inputs {
                match param_ident(input) {
                    Some(name) => params.push(name),
                    None => return make(expr, SelectionKind::Unsupported),
                }
            }
            make(
                expr,
                SelectionKind::Lambda {
                    params,
                    body: Box::new(lower_expr(&closure.body)),
                },
            )
        }
        Expr::Tuple(tuple) => make(
            expr,
            SelectionKind::Aggregate {
                members: tuple.elems.iter().map(lower_expr).collect(),
            },
        ),
        Expr::Paren(paren) => lower_expr(&paren.expr),
        Expr::Group(group) => lower_expr(&group.expr),
        Expr::Reference(reference) => lower_expr(&reference.expr),
        Expr::Lit(lit) => match lower_lit(&lit.lit) {
            Some(value) => make(expr, SelectionKind::Literal(value)),
            None => make(expr, SelectionKind::Unsupported),
        },
        Expr::Unary(unary) => {
            if let UnOp::Neg(_) = unary.op
                && let Expr::Lit(lit) = unary.expr.as_ref()
            {
                let negated = match lower_lit(&lit.lit) {
                    Some(LitValue::Int(digits)) => Some(LitValue::Int(format!("-{}", digits))),
                    Some(LitValue::Float(digits)) => Some(LitValue::Float(format!("-{}", digits))),
                    _ => None,
                };
                if let Some(value) = negated {
                    return make(expr, SelectionKind::Literal(value));
                }
            }
            make(expr, SelectionKind::Unsupported)
        }
        // `Some(inner)` unwraps to the inner value; `None` lowers as a path
        // and compiles to the GraphQL `null` literal.
        Expr::Call(call) => {
            if let Expr::Path(path) = call.func.as_ref()
                && path
                    .path
                    .segments
                    .last()
                    .is_some_and(|segment| segment.ident == "Some")
                && call.args.len() == 1
            {
                return lower_expr(&call.args[0]);
            }
            make(expr, SelectionKind::Unsupported)
        }
        Expr::Block(block) => {
            if block.block.stmts.len() == 1
                && let syn::Stmt::Expr(inner, None) = &block.block.stmts[0]
            {
                return lower_expr(inner);
            }
            make(expr, SelectionKind::Unsupported)
        }
        _ => make(expr, SelectionKind::Unsupported),
    }
}

fn param_ident(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) => Some(ident.ident.to_string()),
        Pat::Type(typed) => param_ident(&typed.pat),
        _ => None,
    }
}

fn lower_lit(lit: &Lit) -> Option<LitValue> {
    match lit {
        Lit::Int(value) => Some(LitValue::Int(value.base10_digits().to_string())),
        Lit::Float(value) => Some(LitValue::Float(value.base10_digits().to_string())),
        Lit::Str(value) => Some(LitValue::String(value.value())),
        Lit::Bool(value) => Some(LitValue::Bool(value.value)),
        _ => None,
    }
}
