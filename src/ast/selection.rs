//! Selection expression tree.
//!
//! A [`SelectionNode`] is lowered from `syn::Expr` once per call site and is
//! immutable afterwards. The tree is a closed variant type: supporting a new
//! host expression shape means a new [`SelectionKind`] arm, and every
//! consumer matches exhaustively.

use serde::{Deserialize, Serialize};

use crate::fmt::escape_string;

/// Position of a node within the parsed selector source.
///
/// Lines are 1-indexed, columns 0-indexed, matching `proc-macro2` span
/// locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A literal argument value, rendered in GraphQL literal syntax by `Display`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LitValue {
    /// Integer literal, kept as its decimal digit string.
    Int(String),
    /// Float literal, kept as its decimal digit string.
    Float(String),
    String(String),
    Bool(bool),
    Null,
}

impl std::fmt::Display for LitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LitValue::Int(digits) => write!(f, "{}", digits),
            LitValue::Float(digits) => write!(f, "{}", digits),
            LitValue::String(s) => write!(f, "\"{}\"", escape_string(s)),
            LitValue::Bool(b) => write!(f, "{}", b),
            LitValue::Null => write!(f, "null"),
        }
    }
}

/// One node of a parsed selection expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionNode {
    pub kind: SelectionKind,
    pub location: Location,
    /// Normalized source text, used for diagnostics and placeholders.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionKind {
    /// Bare identifier or `::`-separated constant path (`q`, `Status::Active`).
    Path { segments: Vec<String> },
    /// Member access (`target.name`). Chains are right-associated.
    Member {
        target: Box<SelectionNode>,
        name: String,
    },
    /// Field invocation (`target.method(args...)`).
    ///
    /// The last argument, when it is a lambda, is the nested selection.
    Call {
        target: Box<SelectionNode>,
        method: String,
        args: Vec<SelectionNode>,
    },
    /// Selector closure (`|u| ...`, or `|vars, q| ...` at the top level).
    Lambda {
        params: Vec<String>,
        body: Box<SelectionNode>,
    },
    /// Tuple of selections, compiled in declaration order.
    Aggregate { members: Vec<SelectionNode> },
    /// Literal value in argument position.
    Literal(LitValue),
    /// Any expression shape the compiler does not model.
    Unsupported,
}

impl SelectionNode {
    pub fn new(kind: SelectionKind, location: Location, source: String) -> Self {
        Self {
            kind,
            location,
            source,
        }
    }

    /// The node's bare identifier, if it is one.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            SelectionKind::Path { segments } if segments.len() == 1 => {
                Some(segments[0].as_str())
            }
            _ => None,
        }
    }

    /// Canonical dotted text of an identifier-rooted member chain
    /// (`vars.user_id`), used to match declared variable references.
    pub fn dotted_path(&self) -> Option<String> {
        match &self.kind {
            SelectionKind::Path { segments } if segments.len() == 1 => {
                Some(segments[0].clone())
            }
            SelectionKind::Member { target, name } => target
                .dotted_path()
                .map(|base| format!("{}.{}", base, name)),
            _ => None,
        }
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self.kind, SelectionKind::Lambda { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: SelectionKind) -> SelectionNode {
        SelectionNode::new(kind, Location::default(), String::new())
    }

    #[test]
    fn dotted_path_of_member_chain() {
        let base = node(SelectionKind::Path {
            segments: vec!["vars".to_string()],
        });
        let chain = node(SelectionKind::Member {
            target: Box::new(base),
            name: "user_id".to_string(),
        });
        assert_eq!(chain.dotted_path().as_deref(), Some("vars.user_id"));
    }

    #[test]
    fn dotted_path_rejects_calls() {
        let base = node(SelectionKind::Path {
            segments: vec!["q".to_string()],
        });
        let call = node(SelectionKind::Call {
            target: Box::new(base),
            method: "me".to_string(),
            args: vec![],
        });
        assert_eq!(call.dotted_path(), None);
    }

    #[test]
    fn literal_rendering() {
        assert_eq!(LitValue::Int("5".to_string()).to_string(), "5");
        assert_eq!(LitValue::Bool(true).to_string(), "true");
        assert_eq!(LitValue::Null.to_string(), "null");
        assert_eq!(
            LitValue::String("say \"hi\"".to_string()).to_string(),
            "\"say \\\"hi\\\"\""
        );
    }
}
