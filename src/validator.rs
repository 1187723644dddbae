//! Compiled document validation.
//!
//! Runs the emitted text through `graphql-parser` to catch assembly bugs
//! before a server does. A document carrying a placeholder fragment fails
//! here: the placeholder is not GraphQL.

use crate::ast::CompiledOperation;
use crate::error::{SelqError, SelqResult};

/// Check that a document parses as an executable GraphQL document.
pub fn validate_document(document: &str) -> SelqResult<()> {
    graphql_parser::parse_query::<&str>(document)
        .map(|_| ())
        .map_err(|e| SelqError::InvalidDocument(e.to_string()))
}

/// Validate a compiled operation's document text.
pub fn validate_operation(operation: &CompiledOperation) -> SelqResult<()> {
    validate_document(&operation.document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_documents_parse() {
        validate_document("query { me { firstName lastName } }").unwrap();
        validate_document("query ($userId: Int!) { user(id: $userId) { name } }").unwrap();
        validate_document("mutation Delete { deleteUser(id: 5) { name } }").unwrap();
    }

    #[test]
    fn placeholder_documents_fail_loudly() {
        let err =
            validate_document("query { // Failed to generate query for: outer }").unwrap_err();
        assert!(matches!(err, SelqError::InvalidDocument(_)));
    }

    #[test]
    fn empty_selection_set_is_rejected() {
        assert!(validate_document("query { }").is_err());
    }
}
