//! The expression-to-document compiler.
//!
//! One pass per call site: bind variables, walk the selection, assemble the
//! document, hash it. All per-construct failures land in the diagnostic sink
//! and degrade to placeholders; only cancellation aborts the pass.

mod assemble;
mod scope;
mod selection;

pub use assemble::assemble_document;
pub use scope::BindingScope;

use std::sync::Arc;

use crate::ast::{Candidate, CompiledOperation, SelectionKind, SelectionNode};
use crate::batch::CancelToken;
use crate::binder::bind_variables;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::{SelqError, SelqResult};
use crate::oracle::SchemaOracle;
use crate::registry::content_hash;
use selection::{SelectionCompiler, placeholder_fragment};

/// Compile one candidate call site into its document.
///
/// Never fails on malformed selections (those produce diagnostics and
/// placeholders); the only error is cancellation.
pub fn compile_operation(
    candidate: &Candidate,
    oracle: &dyn SchemaOracle,
    sink: &DiagnosticSink,
    cancel: &CancelToken,
) -> SelqResult<CompiledOperation> {
    if cancel.is_cancelled() {
        return Err(SelqError::Cancelled);
    }

    let selector = &candidate.selector;
    let (bound_name, root, body): (Option<&str>, &str, Option<&SelectionNode>) =
        match &selector.kind {
            SelectionKind::Lambda { params, body } => match params.as_slice() {
                [root] => (None, root.as_str(), Some(&**body)),
                [vars, root] => (Some(vars.as_str()), root.as_str(), Some(&**body)),
                _ => {
                    sink.push(Diagnostic::error(
                        selector.location,
                        selector.source.clone(),
                        DiagnosticKind::AmbiguousOperationShape,
                    ));
                    (None, "_", None)
                }
            },
            _ => {
                sink.push(Diagnostic::error(
                    selector.location,
                    selector.source.clone(),
                    DiagnosticKind::AmbiguousOperationShape,
                ));
                (None, "_", None)
            }
        };

    let (variables, available) =
        bind_variables(candidate.variables.as_ref(), bound_name, oracle, sink);

    let body_text = match body {
        Some(body) => {
            let scope = BindingScope::new(root, candidate.kind.root_type(), Arc::new(available));
            let mut compiler = SelectionCompiler::new(oracle, sink, cancel);
            compiler.compile(body, &scope)
        }
        None => placeholder_fragment(&selector.source),
    };
    if cancel.is_cancelled() {
        return Err(SelqError::Cancelled);
    }

    let document =
        assemble_document(candidate.kind, candidate.name.as_deref(), &variables, &body_text);
    let hash = content_hash(&document);

    Ok(CompiledOperation {
        kind: candidate.kind,
        name: candidate.name.clone(),
        document,
        body: body_text,
        key: candidate.key.clone(),
        hash,
        variables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{FieldInfo, SchemaIndex, TypeRef};
    use crate::parser::parse_candidate;
    use pretty_assertions::assert_eq;

    fn fixture_oracle() -> SchemaIndex {
        let mut index = SchemaIndex::new();
        index.add_field("Query", FieldInfo::object("me", "User"));
        index.add_field(
            "Query",
            FieldInfo::object("user", "User").arg("id", TypeRef::scalar("Int").required()),
        );
        index.add_field("User", FieldInfo::scalar("name", "String"));
        index.add_field(
            "Mutation",
            FieldInfo::object("delete_user", "User").arg("id", TypeRef::scalar("ID").required()),
        );
        index.add_enum("Status", "Status");
        index
    }

    fn compile(source: &str) -> (CompiledOperation, DiagnosticSink) {
        let oracle = fixture_oracle();
        let sink = DiagnosticSink::new();
        let cancel = CancelToken::new();
        let candidate = parse_candidate(source, &sink)
            .expect("source parses")
            .expect("candidate classifies");
        let operation = compile_operation(&candidate, &oracle, &sink, &cancel).unwrap();
        (operation, sink)
    }

    #[test]
    fn compiles_bare_query() {
        let (operation, sink) = compile("client.query(|q| q.me(|m| m.name))");
        assert!(sink.is_empty());
        assert_eq!(operation.document, "query { me { name } }");
        assert_eq!(operation.body, "me { name }");
    }

    #[test]
    fn compiles_named_mutation() {
        let (operation, sink) =
            compile("client.mutation(\"Delete\", |m| m.delete_user(5, |u| u.name()))");
        assert!(sink.is_empty());
        assert_eq!(
            operation.document,
            "mutation Delete { deleteUser(id: 5) { name } }"
        );
    }

    #[test]
    fn compiles_variables_into_declarations_and_references() {
        let (operation, sink) = compile(
            "client.query(Vars { user_id: 5 }, |vars, q| q.user(vars.user_id, |u| u.name()))",
        );
        assert!(sink.is_empty());
        assert_eq!(
            operation.document,
            "query ($userId: Int!) { user(id: $userId) { name } }"
        );
        assert_eq!(operation.variables.len(), 1);
    }

    #[test]
    fn same_tree_compiles_to_identical_bytes_and_hash() {
        let (first, _) = compile("client.query(|q| q.me(|m| m.name))");
        let (second, _) = compile("client.query(|q| q.me(|m| m.name))");
        assert_eq!(first.document, second.document);
        assert_eq!(first.hash, second.hash);
    }

    #[test]
    fn reformatted_call_site_shares_the_key() {
        let (first, _) = compile("client.query(|q| q.me(|m| m.name))");
        let (second, _) = compile("client.query(|q| q.me(\n    |m| m.name\n))");
        assert_eq!(first.key, second.key);
    }
}
