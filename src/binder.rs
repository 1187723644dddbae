//! Variable binder.
//!
//! Turns the optional variables aggregate of a call site into the document's
//! `$name: Type` declarations and the lookup table the selection compiler
//! uses to substitute `$name` references. Declaration order is the literal's
//! member order and is significant.

use std::collections::HashMap;

use syn::{Expr, Lit, Member, UnOp};

use crate::ast::VariableDeclaration;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::fmt::to_camel;
use crate::oracle::{SchemaOracle, TypeRef};
use crate::parser::lower_expr;

/// Mapping from host access text (`vars.user_id`) to a `$userId` reference.
pub type AvailableVariables = HashMap<String, String>;

/// Bind the variables aggregate, if any.
///
/// A variables argument that is not a flat struct literal (or whose member
/// types cannot be resolved) yields one `UnsupportedVariablesShape`
/// diagnostic and an empty variable set; the document still compiles,
/// degraded but non-fatal.
pub fn bind_variables(
    variables: Option<&Expr>,
    bound_name: Option<&str>,
    oracle: &dyn SchemaOracle,
    sink: &DiagnosticSink,
) -> (Vec<VariableDeclaration>, AvailableVariables) {
    let (Some(expr), Some(bound_name)) = (variables, bound_name) else {
        return (Vec::new(), HashMap::new());
    };

    match bind_struct_literal(expr, bound_name, oracle) {
        Ok(bound) => bound,
        Err(()) => {
            let node = lower_expr(expr);
            sink.push(Diagnostic::error(
                node.location,
                node.source,
                DiagnosticKind::UnsupportedVariablesShape,
            ));
            (Vec::new(), HashMap::new())
        }
    }
}

fn bind_struct_literal(
    expr: &Expr,
    bound_name: &str,
    oracle: &dyn SchemaOracle,
) -> Result<(Vec<VariableDeclaration>, AvailableVariables), ()> {
    let Expr::Struct(literal) = expr else {
        return Err(());
    };
    if literal.rest.is_some() || literal.qself.is_some() {
        return Err(());
    }

    let type_path = literal
        .path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    let declared = oracle.input_members(&type_path);

    let mut declarations = Vec::with_capacity(literal.fields.len());
    let mut available = HashMap::with_capacity(literal.fields.len());
    for field in &literal.fields {
        let Member::Named(member) = &field.member else {
            return Err(());
        };
        let member = member.to_string();

        let gql_type = declared
            .as_ref()
            .and_then(|members| members.iter().find(|m| m.name == member))
            .map(|m| m.ty.render())
            .or_else(|| infer_member_type(&field.expr, oracle))
            .ok_or(())?;

        let graphql_name = to_camel(&member);
        declarations.push(VariableDeclaration {
            name: graphql_name.clone(),
            gql_type,
        });
        available.insert(
            format!("{}.{}", bound_name, member),
            format!("${}", graphql_name),
        );
    }

    Ok((declarations, available))
}

/// Fall-back GraphQL type inference from the member's value expression, for
/// oracles that have no input-member table for the aggregate. Non-nullable
/// unless the value is wrapped in `Option` syntax.
fn infer_member_type(expr: &Expr, oracle: &dyn SchemaOracle) -> Option<String> {
    match expr {
        Expr::Lit(lit) => scalar_for_lit(&lit.lit),
        Expr::Unary(unary) => {
            if let UnOp::Neg(_) = unary.op
                && let Expr::Lit(lit) = unary.expr.as_ref()
            {
                scalar_for_lit(&lit.lit)
            } else {
                None
            }
        }
        Expr::Path(path) => {
            let segments: Vec<String> = path
                .path
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect();
            if segments.len() < 2 {
                return None;
            }
            let prefix = segments[..segments.len() - 1].join("::");
            oracle
                .enum_type(&prefix)
                .map(|name| TypeRef::enum_type(name).required().render())
        }
        Expr::Call(call) => {
            // `Some(value)` infers as the inner type, made nullable.
            if let Expr::Path(path) = call.func.as_ref()
                && path
                    .path
                    .segments
                    .last()
                    .is_some_and(|segment| segment.ident == "Some")
                && call.args.len() == 1
            {
                infer_member_type(&call.args[0], oracle)
                    .map(|ty| ty.trim_end_matches('!').to_string())
            } else {
                None
            }
        }
        Expr::Reference(reference) => infer_member_type(&reference.expr, oracle),
        _ => None,
    }
}

fn scalar_for_lit(lit: &Lit) -> Option<String> {
    let name = match lit {
        Lit::Int(_) => "Int",
        Lit::Float(_) => "Float",
        Lit::Str(_) => "String",
        Lit::Bool(_) => "Boolean",
        _ => return None,
    };
    Some(TypeRef::scalar(name).required().render())
}
