//! Type and schema oracle.
//!
//! The compiler never inspects the host program's type system directly; it
//! asks an oracle. The trait is read-only and side-effect free so call sites
//! can be compiled concurrently, and answers are memoized per compile pass in
//! an [`OracleCache`] rather than hidden in mutable fields.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

/// Classification of a field's result type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
}

/// A GraphQL type reference with nullability and list markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub kind: TypeKind,
    pub nullable: bool,
    pub list: bool,
}

impl TypeRef {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Scalar,
            nullable: true,
            list: false,
        }
    }

    pub fn enum_type(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Enum,
            ..Self::scalar(name)
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Object,
            ..Self::scalar(name)
        }
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Render as GraphQL type syntax. List elements are non-null.
    pub fn render(&self) -> String {
        let base = if self.list {
            format!("[{}!]", self.name)
        } else {
            self.name.clone()
        };
        if self.nullable { base } else { format!("{}!", base) }
    }
}

/// One declared argument of a schema field, in host-side naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDef {
    pub name: String,
    pub ty: TypeRef,
}

/// What the oracle knows about one field of an object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Host-side field name (`first_name`); GraphQL casing is applied by the
    /// compiler.
    pub name: String,
    /// Declared arguments in order, excluding any trailing selector.
    pub arguments: Vec<ArgumentDef>,
    pub ty: TypeRef,
}

impl FieldInfo {
    pub fn scalar(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            ty: TypeRef::scalar(type_name),
        }
    }

    pub fn enum_field(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            ty: TypeRef::enum_type(type_name),
            ..Self::scalar(name, "")
        }
    }

    pub fn object(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            ty: TypeRef::object(type_name),
            ..Self::scalar(name, "")
        }
    }

    pub fn arg(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.arguments.push(ArgumentDef {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn list(mut self) -> Self {
        self.ty = self.ty.list();
        self
    }

    pub fn is_object(&self) -> bool {
        self.ty.kind == TypeKind::Object
    }
}

/// A member of an input aggregate, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMember {
    pub name: String,
    pub ty: TypeRef,
}

/// External type and symbol resolution.
///
/// Must be callable repeatedly, consistent within one compiler run, and safe
/// for concurrent use.
pub trait SchemaOracle: Sync {
    /// Resolve a field reachable from `object_type` by its host-side name.
    fn field(&self, object_type: &str, name: &str) -> Option<FieldInfo>;

    /// Members of an input aggregate type, in declaration order.
    fn input_members(&self, type_path: &str) -> Option<Vec<InputMember>>;

    /// GraphQL enum type name for a host constant path prefix, if it names an
    /// enum.
    fn enum_type(&self, type_path: &str) -> Option<String>;

    /// Field names of an object type, for suggestions. Defaults to none.
    fn field_names(&self, object_type: &str) -> Vec<String> {
        let _ = object_type;
        Vec::new()
    }
}

/// Recursion-scoped memo for oracle answers, created once per compile pass.
#[derive(Debug, Default)]
pub struct OracleCache {
    fields: HashMap<(String, String), Option<FieldInfo>>,
    enums: HashMap<String, Option<String>>,
}

impl OracleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        &mut self,
        oracle: &dyn SchemaOracle,
        object_type: &str,
        name: &str,
    ) -> Option<FieldInfo> {
        self.fields
            .entry((object_type.to_string(), name.to_string()))
            .or_insert_with(|| oracle.field(object_type, name))
            .clone()
    }

    pub fn enum_type(&mut self, oracle: &dyn SchemaOracle, type_path: &str) -> Option<String> {
        self.enums
            .entry(type_path.to_string())
            .or_insert_with(|| oracle.enum_type(type_path))
            .clone()
    }
}

/// In-memory oracle backed by registered schema snapshots.
///
/// Used by tests and by embedders that load a schema model up front.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    objects: HashMap<String, Vec<FieldInfo>>,
    inputs: HashMap<String, Vec<InputMember>>,
    enums: HashMap<String, String>,
}

impl SchemaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field on an object type.
    pub fn add_field(&mut self, object_type: &str, field: FieldInfo) {
        self.objects
            .entry(object_type.to_string())
            .or_default()
            .push(field);
    }

    /// Register an input aggregate with its members in declaration order.
    pub fn add_input(&mut self, type_path: &str, members: Vec<InputMember>) {
        self.inputs.insert(type_path.to_string(), members);
    }

    /// Register a host enum path and its GraphQL enum type name.
    pub fn add_enum(&mut self, type_path: &str, gql_name: &str) {
        self.enums
            .insert(type_path.to_string(), gql_name.to_string());
    }
}

impl SchemaOracle for SchemaIndex {
    fn field(&self, object_type: &str, name: &str) -> Option<FieldInfo> {
        self.objects
            .get(object_type)?
            .iter()
            .find(|f| f.name == name)
            .cloned()
    }

    fn input_members(&self, type_path: &str) -> Option<Vec<InputMember>> {
        self.inputs.get(type_path).cloned()
    }

    fn enum_type(&self, type_path: &str) -> Option<String> {
        self.enums.get(type_path).cloned()
    }

    fn field_names(&self, object_type: &str) -> Vec<String> {
        self.objects
            .get(object_type)
            .map(|fields| fields.iter().map(|f| f.name.clone()).collect())
            .unwrap_or_default()
    }
}

/// Closest candidate within edit distance 2, for "did you mean" hints.
pub fn did_you_mean(target: &str, candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .map(|c| (levenshtein(target, c), c))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, c)| c.clone())
}
