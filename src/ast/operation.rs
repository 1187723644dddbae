//! Operation-level types: candidates going into the compiler and the
//! compiled artifacts coming out.

use serde::{Deserialize, Serialize};

use crate::ast::{Location, SelectionNode};

/// GraphQL operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    /// The keyword that opens the document.
    pub fn keyword(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }

    /// Schema object type the operation's root selection is resolved against.
    pub fn root_type(&self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One `$name: Type` entry of the document's variable declaration list.
///
/// `gql_type` carries the nullability marker (`Int` vs `Int!`). Order is the
/// declaration order of the variables aggregate and is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    pub gql_type: String,
}

impl std::fmt::Display for VariableDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}: {}", self.name, self.gql_type)
    }
}

/// One call site handed to the compiler by candidate discovery.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub kind: OperationKind,
    /// Human-supplied operation name, when the call site provides one.
    pub name: Option<String>,
    /// The raw variables aggregate expression; the binder inspects its shape.
    pub variables: Option<syn::Expr>,
    /// The selector lambda, lowered.
    pub selector: SelectionNode,
    /// Normalized call-site text; the registration key.
    pub key: String,
    pub location: Location,
}

/// The compiled artifact for one call site. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledOperation {
    pub kind: OperationKind,
    pub name: Option<String>,
    /// Full document text (`query ... { ... }`).
    pub document: String,
    /// The selection fragment alone, without the outer braces.
    pub body: String,
    /// Normalized registration key.
    pub key: String,
    /// Content hash of `document`, lowercase hex.
    pub hash: String,
    pub variables: Vec<VariableDeclaration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_kind_text() {
        assert_eq!(OperationKind::Query.keyword(), "query");
        assert_eq!(OperationKind::Mutation.root_type(), "Mutation");
        assert_eq!(OperationKind::Mutation.to_string(), "mutation");
    }

    #[test]
    fn variable_declaration_display() {
        let decl = VariableDeclaration {
            name: "userId".to_string(),
            gql_type: "Int!".to_string(),
        };
        assert_eq!(decl.to_string(), "$userId: Int!");
    }
}
