//! The typed intermediate model the parser produces and later stages consume.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Binding decision for one named schema type
///
/// Exactly one `TypeBinding` exists per schema name in a [`Tree`]; every field,
/// argument and return type refers to it by name through a [`TypeRef`], so all
/// uses observe the same decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    /// Schema-level identifier
    pub name: String,
    /// Rust identifier of the concrete type (`i64`, `User`)
    pub ident: String,
    /// Module the concrete type lives in once bound (`crate::models`)
    pub location: Option<String>,
    /// Bound to a type the generator does not emit
    pub externally_bound: bool,
    /// Maps to a Rust primitive; never needs a location
    pub primitive: bool,
}

impl TypeBinding {
    /// A binding resolved at parse time to a primitive Rust type
    pub fn primitive(name: impl Into<String>, rust_type: impl Into<String>) -> Self {
        TypeBinding {
            name: name.into(),
            ident: rust_type.into(),
            location: None,
            externally_bound: false,
            primitive: true,
        }
    }

    /// A binding left for the binder
    pub fn unresolved(name: impl Into<String>) -> Self {
        let name = name.into();
        TypeBinding {
            ident: name.clone(),
            name,
            location: None,
            externally_bound: false,
            primitive: false,
        }
    }

    /// Whether a concrete type has been decided
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.primitive || self.location.is_some()
    }

    /// Record a binding decision. Returns `false` without changing anything
    /// if the binding was already resolved.
    pub fn bind(&mut self, location: impl Into<String>, externally_bound: bool) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.location = Some(location.into());
        self.externally_bound = externally_bound;
        true
    }

    /// Fully qualified Rust path (`crate::models::User`, `i64`)
    #[must_use]
    pub fn qualified(&self) -> Option<String> {
        if self.primitive {
            return Some(self.ident.clone());
        }
        self.location
            .as_ref()
            .map(|location| format!("{location}::{}", self.ident))
    }

    /// Whether the generator must emit a definition for this type
    #[must_use]
    pub fn is_generated(&self) -> bool {
        !self.primitive && self.location.is_some() && !self.externally_bound
    }
}

/// Reference from a field/argument/return to a named type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Schema type name (key into [`Tree::bindings`])
    pub name: String,
    /// Wrapped in a list
    pub is_array: bool,
    /// Outer non-null
    pub required: bool,
}

/// Serialization keys for a model field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    /// JSON key (the schema field name)
    pub json: String,
    /// Dgraph predicate (`uid` or `Type.field`)
    pub predicate: String,
}

impl FieldTag {
    /// Tag for `field` on `parent`
    #[must_use]
    pub fn new(parent: &str, field: &str) -> Self {
        let predicate = if field == "id" {
            "uid".to_string()
        } else {
            format!("{parent}.{field}")
        };
        FieldTag {
            json: field.to_string(),
            predicate,
        }
    }
}

/// A field of a model or interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Schema field name
    pub name: String,
    /// Description text
    pub description: Option<String>,
    /// Field type
    pub ty: TypeRef,
    /// Serialization tag
    pub tag: FieldTag,
}

/// Lifecycle event a model subscribes webhooks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleEvent {
    /// `add: true`
    Add,
    /// `update: true`
    Update,
    /// `delete: true`
    Delete,
}

impl LifecycleEvent {
    /// Directive argument name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleEvent::Add => "add",
            LifecycleEvent::Update => "update",
            LifecycleEvent::Delete => "delete",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object or input object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Type name
    pub name: String,
    /// Description text
    pub description: Option<String>,
    /// Every field, annotated or not
    pub fields: Vec<Field>,
    /// Interfaces implemented, then unions the model is a member of
    pub implements: Vec<String>,
    /// Webhook subscriptions
    pub lambda_on_mutate: Vec<LifecycleEvent>,
}

/// Whether an abstract type was declared as an interface or a union
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    /// `interface`
    Interface,
    /// `union`
    Union,
}

/// An interface or union type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// Type name
    pub name: String,
    /// Description text
    pub description: Option<String>,
    /// Declared kind
    pub kind: InterfaceKind,
    /// Interface fields (empty for unions)
    pub fields: Vec<Field>,
}

/// One enum value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value name
    pub name: String,
    /// Description text
    pub description: Option<String>,
}

/// An enum type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    /// Type name
    pub name: String,
    /// Description text
    pub description: Option<String>,
    /// Values in declaration order
    pub values: Vec<EnumValue>,
}

/// An opaque custom scalar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    /// Type name
    pub name: String,
    /// Description text
    pub description: Option<String>,
}

/// One entry of the [`ModelTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelType {
    /// Object / input object
    Model(Model),
    /// Interface / union
    Interface(Interface),
    /// Enum
    Enum(Enum),
    /// Custom scalar
    Scalar(Scalar),
}

impl ModelType {
    /// Type name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ModelType::Model(m) => &m.name,
            ModelType::Interface(i) => &i.name,
            ModelType::Enum(e) => &e.name,
            ModelType::Scalar(s) => &s.name,
        }
    }
}

/// Type name → model entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelTree {
    /// Entries keyed by type name
    pub types: BTreeMap<String, ModelType>,
}

impl ModelTree {
    /// Look up any entry
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModelType> {
        self.types.get(name)
    }

    /// Look up a model
    #[must_use]
    pub fn model(&self, name: &str) -> Option<&Model> {
        match self.types.get(name) {
            Some(ModelType::Model(m)) => Some(m),
            _ => None,
        }
    }

    /// All models
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.types.values().filter_map(|t| match t {
            ModelType::Model(m) => Some(m),
            _ => None,
        })
    }

    /// All interfaces and unions
    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.types.values().filter_map(|t| match t {
            ModelType::Interface(i) => Some(i),
            _ => None,
        })
    }

    /// All enums
    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.types.values().filter_map(|t| match t {
            ModelType::Enum(e) => Some(e),
            _ => None,
        })
    }

    /// All custom scalars
    pub fn scalars(&self) -> impl Iterator<Item = &Scalar> {
        self.types.values().filter_map(|t| match t {
            ModelType::Scalar(s) => Some(s),
            _ => None,
        })
    }

    /// Models subscribed to at least one lifecycle event
    pub fn subscribed_models(&self) -> impl Iterator<Item = &Model> {
        self.models().filter(|m| !m.lambda_on_mutate.is_empty())
    }
}

/// Resolver for one annotated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResolver {
    /// Parent type name
    pub parent: String,
    /// The field
    pub field: Field,
    /// Middleware to run first, in order
    pub middleware: Vec<String>,
}

impl FieldResolver {
    /// `Parent_field`
    #[must_use]
    pub fn key(&self) -> String {
        field_resolver_key(&self.parent, &self.field.name)
    }
}

/// `Parent_field`
#[must_use]
pub fn field_resolver_key(parent: &str, field: &str) -> String {
    format!("{parent}_{field}")
}

/// Root operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Field of the query root
    Query,
    /// Field of the mutation root
    Mutation,
}

impl OperationKind {
    /// `Query` / `Mutation`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
        }
    }
}

/// An operation argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Argument name
    pub name: String,
    /// Argument type
    pub ty: TypeRef,
}

/// An annotated query or mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Query or mutation
    pub kind: OperationKind,
    /// Operation name
    pub name: String,
    /// Description text
    pub description: Option<String>,
    /// Arguments in declaration order
    pub arguments: Vec<Argument>,
    /// Return type
    pub ret: TypeRef,
    /// Middleware to run first, in order
    pub middleware: Vec<String>,
}

impl Operation {
    /// `Query_name` / `Mutation_name`
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}_{}", self.kind.as_str(), self.name)
    }
}

/// Annotated resolvers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverTree {
    /// Keyed by `Parent_field`
    pub field_resolvers: BTreeMap<String, FieldResolver>,
    /// Keyed by operation name
    pub queries: BTreeMap<String, Operation>,
    /// Keyed by operation name
    pub mutations: BTreeMap<String, Operation>,
}

/// Everything one generation run knows about the schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    /// Declared data types
    pub models: ModelTree,
    /// Operations needing user logic
    pub resolvers: ResolverTree,
    /// Every middleware name referenced anywhere
    pub middleware: BTreeSet<String>,
    /// One binding per referenced schema type
    pub bindings: BTreeMap<String, TypeBinding>,
}

impl Tree {
    /// Binding for a schema type name
    #[must_use]
    pub fn binding(&self, name: &str) -> Option<&TypeBinding> {
        self.bindings.get(name)
    }

    /// Every type reference with a description of where it is used
    #[must_use]
    pub fn references(&self) -> Vec<(&TypeRef, String)> {
        let mut refs = Vec::new();
        for model in self.models.models() {
            for field in &model.fields {
                refs.push((&field.ty, format!("{}.{}", model.name, field.name)));
            }
        }
        for interface in self.models.interfaces() {
            for field in &interface.fields {
                refs.push((&field.ty, format!("{}.{}", interface.name, field.name)));
            }
        }
        for op in self
            .resolvers
            .queries
            .values()
            .chain(self.resolvers.mutations.values())
        {
            refs.push((&op.ret, format!("{}.{}", op.kind.as_str(), op.name)));
            for arg in &op.arguments {
                refs.push((
                    &arg.ty,
                    format!("{}.{}({})", op.kind.as_str(), op.name, arg.name),
                ));
            }
        }
        refs
    }
}
