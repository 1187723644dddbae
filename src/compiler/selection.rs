//! The selection compiler.
//!
//! Walks a [`SelectionNode`] tree with a [`BindingScope`] and emits the
//! GraphQL selection-set fragment (the text between the outermost braces).
//! One arm per node kind; every unsupported construct yields one diagnostic
//! plus a placeholder fragment and the parent keeps assembling around it, so
//! a single malformed call site never blocks the rest of a batch.

use crate::ast::{SelectionKind, SelectionNode};
use crate::batch::CancelToken;
use crate::compiler::scope::BindingScope;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::fmt::to_camel;
use crate::oracle::{OracleCache, SchemaOracle, did_you_mean};

/// Placeholder substituted for a failed sub-expression.
///
/// Not valid GraphQL: a consumer that ships a document containing it fails
/// at parse time instead of running a silently wrong query.
pub(crate) fn placeholder_fragment(source: &str) -> String {
    format!("// Failed to generate query for: {}", source)
}

pub(crate) struct SelectionCompiler<'a> {
    oracle: &'a dyn SchemaOracle,
    cache: OracleCache,
    sink: &'a DiagnosticSink,
    cancel: &'a CancelToken,
}

impl<'a> SelectionCompiler<'a> {
    pub(crate) fn new(
        oracle: &'a dyn SchemaOracle,
        sink: &'a DiagnosticSink,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            oracle,
            cache: OracleCache::new(),
            sink,
            cancel,
        }
    }

    /// Compile one node under the given scope.
    pub(crate) fn compile(&mut self, node: &SelectionNode, scope: &BindingScope) -> String {
        if self.cancel.is_cancelled() {
            return String::new();
        }
        match &node.kind {
            SelectionKind::Path { segments } if segments.len() == 1 => {
                if segments[0] == scope.root() {
                    // Selecting the root itself adds nothing; it is the
                    // implicit container.
                    String::new()
                } else {
                    self.fail(
                        node,
                        DiagnosticKind::OutOfScopeReference {
                            name: segments[0].clone(),
                            scope_root: scope.root().to_string(),
                        },
                    )
                }
            }
            SelectionKind::Path { .. } => {
                self.fail(node, DiagnosticKind::UnsupportedExpressionShape { suggestion: None })
            }
            SelectionKind::Member { .. } => self.compile_member(node, scope),
            SelectionKind::Call { .. } => self.compile_call(node, scope),
            SelectionKind::Lambda { params, body } => match params.as_slice() {
                [param] => {
                    let nested = scope.with_root(param, scope.root_type());
                    self.compile(body, &nested)
                }
                _ => self.fail(
                    node,
                    DiagnosticKind::UnsupportedExpressionShape { suggestion: None },
                ),
            },
            SelectionKind::Aggregate { members } => {
                let fragments: Vec<String> = members
                    .iter()
                    .map(|member| self.compile(member, scope))
                    .filter(|fragment| !fragment.is_empty())
                    .collect();
                fragments.join(" ")
            }
            SelectionKind::Literal(_) | SelectionKind::Unsupported => {
                self.fail(node, DiagnosticKind::UnsupportedExpressionShape { suggestion: None })
            }
        }
    }

    /// Member chains compile syntactically: the base must be the scope root,
    /// outer segments open nested braces, the innermost name is the leaf.
    fn compile_member(&mut self, node: &SelectionNode, scope: &BindingScope) -> String {
        let mut names: Vec<&str> = Vec::new();
        let mut current = node;
        loop {
            match &current.kind {
                SelectionKind::Member { target, name } => {
                    names.push(name);
                    current = target;
                }
                SelectionKind::Path { segments } if segments.len() == 1 => {
                    if segments[0] == scope.root() {
                        break;
                    }
                    return self.fail(
                        current,
                        DiagnosticKind::OutOfScopeReference {
                            name: segments[0].clone(),
                            scope_root: scope.root().to_string(),
                        },
                    );
                }
                _ => {
                    return self.fail(
                        current,
                        DiagnosticKind::UnsupportedExpressionShape { suggestion: None },
                    );
                }
            }
        }

        // Collected leaf-first; fold outward into nested braces.
        let mut fragment = to_camel(names[0]);
        for name in &names[1..] {
            fragment = format!("{} {{ {} }}", to_camel(name), fragment);
        }
        fragment
    }

    fn compile_call(&mut self, node: &SelectionNode, scope: &BindingScope) -> String {
        let SelectionKind::Call {
            target,
            method,
            args,
        } = &node.kind
        else {
            return self.fail(
                node,
                DiagnosticKind::UnsupportedExpressionShape { suggestion: None },
            );
        };

        // The receiver must be the scope root, possibly through a member
        // chain; intermediate segments become enclosing braces.
        let mut segments: Vec<&str> = Vec::new();
        let mut current: &SelectionNode = target;
        loop {
            match &current.kind {
                SelectionKind::Member { target, name } => {
                    segments.push(name);
                    current = target;
                }
                SelectionKind::Path {
                    segments: path_segments,
                } if path_segments.len() == 1 => {
                    if path_segments[0] == scope.root() {
                        break;
                    }
                    return self.fail(
                        current,
                        DiagnosticKind::OutOfScopeReference {
                            name: path_segments[0].clone(),
                            scope_root: scope.root().to_string(),
                        },
                    );
                }
                _ => {
                    return self.fail(
                        current,
                        DiagnosticKind::UnsupportedExpressionShape { suggestion: None },
                    );
                }
            }
        }
        segments.reverse();

        // Symbol resolution through the oracle, hop by hop.
        let mut parent_type = scope.root_type().to_string();
        for segment in &segments {
            match self.cache.field(self.oracle, &parent_type, segment) {
                Some(info) => parent_type = info.ty.name,
                None => {
                    let suggestion =
                        did_you_mean(segment, &self.oracle.field_names(&parent_type));
                    return self.fail(
                        node,
                        DiagnosticKind::UnsupportedExpressionShape { suggestion },
                    );
                }
            }
        }
        let Some(field) = self.cache.field(self.oracle, &parent_type, method) else {
            let suggestion = did_you_mean(method, &self.oracle.field_names(&parent_type));
            return self.fail(
                node,
                DiagnosticKind::UnsupportedExpressionShape { suggestion },
            );
        };

        let (value_args, nested) = match args.split_last() {
            Some((last, head)) if last.is_lambda() => (head, Some(last)),
            _ => (args.as_slice(), None),
        };

        let mut fragment = to_camel(method);
        if !value_args.is_empty() && !field.arguments.is_empty() {
            let rendered: Vec<String> = value_args
                .iter()
                .zip(field.arguments.iter())
                .map(|(value, def)| {
                    format!("{}: {}", to_camel(&def.name), self.compile_argument(value, scope))
                })
                .collect();
            fragment.push('(');
            fragment.push_str(&rendered.join(", "));
            fragment.push(')');
        }

        if let Some(lambda) = nested {
            let SelectionKind::Lambda { params, body } = &lambda.kind else {
                return self.fail(
                    lambda,
                    DiagnosticKind::UnsupportedExpressionShape { suggestion: None },
                );
            };
            if params.len() != 1 {
                return self.fail(
                    lambda,
                    DiagnosticKind::UnsupportedExpressionShape { suggestion: None },
                );
            }
            // Scope replacement, not merge: the nested parameter fully
            // shadows the outer root beneath this point.
            let nested_scope = scope.with_root(&params[0], &field.ty.name);
            let body_text = self.compile(body, &nested_scope);
            fragment.push_str(" { ");
            if !body_text.is_empty() {
                fragment.push_str(&body_text);
                fragment.push(' ');
            }
            fragment.push('}');
        }

        for segment in segments.iter().rev() {
            fragment = format!("{} {{ {} }}", to_camel(segment), fragment);
        }
        fragment
    }

    fn compile_argument(&mut self, node: &SelectionNode, scope: &BindingScope) -> String {
        if self.cancel.is_cancelled() {
            return String::new();
        }
        if let SelectionKind::Literal(value) = &node.kind {
            return value.to_string();
        }
        if let Some(path) = node.dotted_path()
            && let Some(reference) = scope.variable(&path)
        {
            return reference.to_string();
        }
        if let SelectionKind::Path { segments } = &node.kind {
            if segments.len() == 1 && segments[0] == "None" {
                return "null".to_string();
            }
            if segments.len() >= 2 {
                let prefix = segments[..segments.len() - 1].join("::");
                if self.cache.enum_type(self.oracle, &prefix).is_some() {
                    // GraphQL enum literal: the bare member name.
                    return segments[segments.len() - 1].clone();
                }
            }
        }
        self.fail(node, DiagnosticKind::UnresolvedArgument)
    }

    /// Report one diagnostic and substitute the placeholder. Under
    /// cancellation, emit nothing at all.
    fn fail(&self, node: &SelectionNode, kind: DiagnosticKind) -> String {
        if self.cancel.is_cancelled() {
            return String::new();
        }
        self.sink
            .push(Diagnostic::error(node.location, node.source.clone(), kind));
        placeholder_fragment(&node.source)
    }
}
