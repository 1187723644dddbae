//! AST for typed selection expressions and compiled operations.

mod operation;
mod selection;

pub use operation::{Candidate, CompiledOperation, OperationKind, VariableDeclaration};
pub use selection::{LitValue, Location, SelectionKind, SelectionNode};
