//! Document assembly.
//!
//! Combines operation kind, optional operation name, the variable
//! declaration list, and the compiled selection fragment into the final
//! document text. The output must parse on any GraphQL server, and its
//! whitespace must be byte-stable: content hashing and deduplication depend
//! on it.

use crate::ast::{OperationKind, VariableDeclaration};

/// Build the full document text.
///
/// `query` / `query Name` / `query ($a: Int!, $b: Status)` segments are
/// emitted only when present; the outer braces carry exactly one space
/// inside each side.
pub fn assemble_document(
    kind: OperationKind,
    name: Option<&str>,
    variables: &[VariableDeclaration],
    body: &str,
) -> String {
    let mut document = String::from(kind.keyword());
    if let Some(name) = name {
        document.push(' ');
        document.push_str(name);
    }
    if !variables.is_empty() {
        let declarations: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
        document.push_str(" (");
        document.push_str(&declarations.join(", "));
        document.push(')');
    }
    document.push_str(" { ");
    if !body.is_empty() {
        document.push_str(body);
        document.push(' ');
    }
    document.push('}');
    document
}
