//! Compile-time GraphQL query builder with AST-native design.
//!
//! Express operations as typed selection expressions, not strings. A build
//! pass compiles each call site into a canonical GraphQL document and
//! registers it under a stable key for a thin runtime client to execute.
//!
//! ```ignore
//! use selq::{CompileSession, QueryRegistry};
//! use selq::parser::parse_candidate;
//!
//! let registry = QueryRegistry::new();
//! let session = CompileSession::new(&oracle, &registry);
//! let candidate = parse_candidate("client.query(|q| q.me(|m| m.name))", &session.sink())?;
//! let operation = session.compile(&candidate.unwrap())?;
//! assert_eq!(operation.document, "query { me { name } }");
//! ```

pub mod ast;
pub mod batch;
pub mod binder;
pub mod compiler;
pub mod diagnostics;
pub mod error;
pub mod fmt;
pub mod oracle;
pub mod parser;
pub mod registry;
pub mod validator;

pub use batch::{CancelToken, CompileSession};
pub use compiler::compile_operation;
pub use error::{SelqError, SelqResult};
pub use registry::QueryRegistry;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::batch::{CancelToken, CompileSession};
    pub use crate::compiler::{BindingScope, compile_operation};
    pub use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
    pub use crate::error::*;
    pub use crate::oracle::{FieldInfo, InputMember, SchemaIndex, SchemaOracle, TypeRef};
    pub use crate::parser::{classify_candidate, parse_candidate};
    pub use crate::registry::{QueryInfo, QueryRegistry};
    pub use crate::validator::{validate_document, validate_operation};
}
