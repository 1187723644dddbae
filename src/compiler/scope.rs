//! Binding scope for the selection walk.

use std::collections::HashMap;
use std::sync::Arc;

/// The compiler's view of "what is in scope" at one nesting level.
///
/// Immutable: descending into a nested lambda produces a replacement scope
/// via [`BindingScope::with_root`]; the inner root fully shadows the outer
/// one, while the variables table is inherited by reference and never
/// written by a child.
#[derive(Debug, Clone)]
pub struct BindingScope {
    root: String,
    root_type: String,
    variables: Arc<HashMap<String, String>>,
}

impl BindingScope {
    pub fn new(
        root: impl Into<String>,
        root_type: impl Into<String>,
        variables: Arc<HashMap<String, String>>,
    ) -> Self {
        Self {
            root: root.into(),
            root_type: root_type.into(),
            variables,
        }
    }

    /// The lambda parameter naming the current selection root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Schema object type the current root resolves against.
    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    /// `$name` reference for a host access path, if it names a declared
    /// variable.
    pub fn variable(&self, path_text: &str) -> Option<&str> {
        self.variables.get(path_text).map(String::as_str)
    }

    /// Replacement scope for a nested lambda.
    pub fn with_root(&self, root: impl Into<String>, root_type: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            root_type: root_type.into(),
            variables: Arc::clone(&self.variables),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_scope_replaces_root_and_shares_variables() {
        let mut variables = HashMap::new();
        variables.insert("vars.id".to_string(), "$id".to_string());
        let outer = BindingScope::new("q", "Query", Arc::new(variables));

        let inner = outer.with_root("u", "User");
        assert_eq!(inner.root(), "u");
        assert_eq!(inner.root_type(), "User");
        assert_eq!(inner.variable("vars.id"), Some("$id"));
        // The outer scope is untouched.
        assert_eq!(outer.root(), "q");
    }
}
