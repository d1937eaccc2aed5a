//! # Schema Module
//!
//! The IDL loader: turns schema files into a [`SchemaDocument`], the
//! name-indexed view the parser walks.
//!
//! ## Loading
//!
//! 1. The Dgraph [`prelude`] (built-in scalars and directive definitions) is
//!    parsed first and flagged `builtin`.
//! 2. Each schema file is parsed on its own with `async-graphql-parser`, so
//!    syntax errors name the file they came from.
//! 3. Definitions are merged by name. `extend type` blocks append to the base
//!    definition; a second plain definition is a [`SchemaError::DuplicateType`].
//! 4. Root operation types come from a `schema { ... }` block or the
//!    conventional `Query` / `Mutation` / `Subscription` names. A schema with no
//!    query root gets an empty `Query` object so later stages can rely on one.
//!
//! The loader does no semantic validation beyond what is needed to build the
//! document; unknown type references surface later in the parser.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use async_graphql_parser::types::{
    BaseType, ConstDirective, FieldDefinition, InputValueDefinition, Type, TypeDefinition,
    TypeKind, TypeSystemDefinition,
};
use async_graphql_parser::Positioned;

use crate::error::SchemaError;

pub mod prelude;
#[cfg(test)]
mod tests;

pub use prelude::{PRELUDE, PRELUDE_NAME};

/// Directive marking a field as needing custom resolver logic
pub const LAMBDA_DIRECTIVE: &str = "lambda";
/// Directive subscribing a type to add/update/delete webhooks
pub const LAMBDA_ON_MUTATE_DIRECTIVE: &str = "lambdaOnMutate";

/// Kind of a named type definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// `type`
    Object,
    /// `input`
    InputObject,
    /// `interface`
    Interface,
    /// `union`
    Union,
    /// `enum`
    Enum,
    /// `scalar`
    Scalar,
}

/// Where a definition came from, for error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// File name, or `<builtin>`
    pub file: String,
    /// 1-based line
    pub line: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A type reference as written in the schema (`[User!]!`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    /// Innermost named type
    pub name: String,
    /// Whether any list wrapper is present
    pub is_array: bool,
    /// Whether the outermost type is non-null
    pub required: bool,
}

/// A directive applied to a definition or field
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Directive name without `@`
    pub name: String,
    /// Arguments converted to JSON values, in source order
    pub arguments: Vec<(String, serde_json::Value)>,
}

impl Directive {
    /// Look up an argument value
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&serde_json::Value> {
        self.arguments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// An argument or input field
#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    /// Argument name
    pub name: String,
    /// Description text
    pub description: Option<String>,
    /// Declared type
    pub ty: TypeExpr,
}

/// A field of an object, interface or input type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Description text (may carry `@middleware([...])`)
    pub description: Option<String>,
    /// Arguments in declaration order
    pub arguments: Vec<InputValue>,
    /// Declared type
    pub ty: TypeExpr,
    /// Applied directives
    pub directives: Vec<Directive>,
}

impl FieldDef {
    /// Find an applied directive by name
    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// Whether the field carries `@lambda`
    #[must_use]
    pub fn has_lambda(&self) -> bool {
        self.directive(LAMBDA_DIRECTIVE).is_some()
    }
}

/// A value of an enum definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDef {
    /// Value name
    pub name: String,
    /// Description text
    pub description: Option<String>,
}

/// A named type definition
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// Type name
    pub name: String,
    /// Kind
    pub kind: DefinitionKind,
    /// Description text
    pub description: Option<String>,
    /// Applied directives
    pub directives: Vec<Directive>,
    /// Fields (object, interface, input)
    pub fields: Vec<FieldDef>,
    /// Implemented interfaces (object, interface)
    pub implements: Vec<String>,
    /// Union members
    pub members: Vec<String>,
    /// Enum values
    pub values: Vec<EnumValueDef>,
    /// Where it was defined
    pub location: SourceLocation,
    /// Part of the injected prelude rather than user schema
    pub builtin: bool,
}

impl Definition {
    /// Find an applied directive by name
    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// Whether this definition, or one of its fields, needs custom logic
    #[must_use]
    pub fn has_lambda(&self) -> bool {
        self.directive(LAMBDA_ON_MUTATE_DIRECTIVE).is_some()
            || self.fields.iter().any(FieldDef::has_lambda)
    }

    fn empty_object(name: &str, location: SourceLocation) -> Self {
        Definition {
            name: name.to_string(),
            kind: DefinitionKind::Object,
            description: None,
            directives: Vec::new(),
            fields: Vec::new(),
            implements: Vec::new(),
            members: Vec::new(),
            values: Vec::new(),
            location,
            builtin: true,
        }
    }
}

/// One schema input: a name for error messages and its SDL text
#[derive(Debug, Clone)]
pub struct Source {
    /// File path or label
    pub name: String,
    /// SDL text
    pub input: String,
}

impl Source {
    /// Build a source from a label and text
    pub fn new(name: impl Into<String>, input: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            input: input.into(),
        }
    }
}

/// Merged, name-indexed schema
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    definitions: Vec<Definition>,
    index: HashMap<String, usize>,
    query: String,
    mutation: Option<String>,
    subscription: Option<String>,
}

impl SchemaDocument {
    /// All definitions in the order they were first declared
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    /// Look up a definition by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// Name of the query root (always present)
    #[must_use]
    pub fn query_root(&self) -> &str {
        &self.query
    }

    /// Name of the mutation root, if any
    #[must_use]
    pub fn mutation_root(&self) -> Option<&str> {
        self.mutation.as_deref()
    }

    /// Name of the subscription root, if any
    #[must_use]
    pub fn subscription_root(&self) -> Option<&str> {
        self.subscription.as_deref()
    }

    /// Whether `name` is the query or mutation root
    #[must_use]
    pub fn is_operation_root(&self, name: &str) -> bool {
        self.query == name || self.mutation.as_deref() == Some(name)
    }

    /// Unions that list `name` as a member, in declaration order
    #[must_use]
    pub fn unions_containing(&self, name: &str) -> Vec<&str> {
        self.definitions
            .iter()
            .filter(|d| d.kind == DefinitionKind::Union && d.members.iter().any(|m| m == name))
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Object types declaring `implements <name>`, in declaration order
    #[must_use]
    pub fn implementors(&self, name: &str) -> Vec<&str> {
        self.definitions
            .iter()
            .filter(|d| {
                matches!(d.kind, DefinitionKind::Object) && d.implements.iter().any(|i| i == name)
            })
            .map(|d| d.name.as_str())
            .collect()
    }
}

/// Load schema files, injecting the Dgraph prelude
///
/// # Errors
///
/// Returns an error if a file cannot be read or the merged document is
/// structurally invalid.
pub fn load_schema(files: &[PathBuf]) -> Result<SchemaDocument, SchemaError> {
    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let input = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.clone(),
            source,
        })?;
        sources.push(Source::new(path.display().to_string(), input));
    }
    tracing::debug!(files = sources.len(), "loading schema");
    load_sources(&sources)
}

/// Load already-read schema sources, injecting the Dgraph prelude
///
/// # Errors
///
/// Returns an error on syntax errors, duplicate definitions or a `schema`
/// block naming a missing type.
pub fn load_sources(sources: &[Source]) -> Result<SchemaDocument, SchemaError> {
    let mut builder = DocumentBuilder::default();
    builder.ingest(&Source::new(PRELUDE_NAME, PRELUDE), true)?;
    for source in sources {
        builder.ingest(source, false)?;
    }
    builder.finish()
}

#[derive(Default)]
struct DocumentBuilder {
    definitions: Vec<Definition>,
    index: HashMap<String, usize>,
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
}

impl DocumentBuilder {
    fn ingest(&mut self, source: &Source, builtin: bool) -> Result<(), SchemaError> {
        let document =
            async_graphql_parser::parse_schema(&source.input).map_err(|e| SchemaError::Syntax {
                file: source.name.clone(),
                message: e.to_string(),
            })?;

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema) => {
                    let schema = schema.node;
                    if let Some(q) = schema.query {
                        self.query = Some(q.node.to_string());
                    }
                    if let Some(m) = schema.mutation {
                        self.mutation = Some(m.node.to_string());
                    }
                    if let Some(s) = schema.subscription {
                        self.subscription = Some(s.node.to_string());
                    }
                }
                TypeSystemDefinition::Type(ty) => {
                    let location = SourceLocation {
                        file: source.name.clone(),
                        line: ty.pos.line,
                    };
                    let extend = ty.node.extend;
                    let def = convert_type(ty.node, location, builtin);
                    self.insert(def, extend)?;
                }
                // Directive definitions only matter to full validation.
                TypeSystemDefinition::Directive(_) => {}
            }
        }
        Ok(())
    }

    fn insert(&mut self, def: Definition, extend: bool) -> Result<(), SchemaError> {
        let Some(&i) = self.index.get(&def.name) else {
            self.index.insert(def.name.clone(), self.definitions.len());
            self.definitions.push(def);
            return Ok(());
        };

        let existing = &mut self.definitions[i];
        if extend {
            existing.fields.extend(def.fields);
            existing.implements.extend(def.implements);
            existing.members.extend(def.members);
            existing.values.extend(def.values);
            existing.directives.extend(def.directives);
            return Ok(());
        }
        if existing.builtin && !def.builtin {
            tracing::debug!(name = %def.name, "user schema overrides builtin definition");
            *existing = def;
            return Ok(());
        }
        Err(SchemaError::DuplicateType {
            name: def.name,
            first: existing.location.to_string(),
            second: def.location.to_string(),
        })
    }

    fn finish(mut self) -> Result<SchemaDocument, SchemaError> {
        let query = match self.query.take() {
            Some(name) => {
                if !self.index.contains_key(&name) {
                    return Err(SchemaError::MissingRoot {
                        root: "query",
                        name,
                    });
                }
                name
            }
            None => {
                if !self.index.contains_key("Query") {
                    tracing::debug!("schema has no query root, adding an empty Query type");
                    let location = SourceLocation {
                        file: PRELUDE_NAME.to_string(),
                        line: 0,
                    };
                    self.index
                        .insert("Query".to_string(), self.definitions.len());
                    self.definitions
                        .push(Definition::empty_object("Query", location));
                }
                "Query".to_string()
            }
        };
        let mutation = self.root_or_default(self.mutation.clone(), "mutation", "Mutation")?;
        let subscription =
            self.root_or_default(self.subscription.clone(), "subscription", "Subscription")?;

        Ok(SchemaDocument {
            definitions: self.definitions,
            index: self.index,
            query,
            mutation,
            subscription,
        })
    }

    fn root_or_default(
        &self,
        declared: Option<String>,
        root: &'static str,
        conventional: &str,
    ) -> Result<Option<String>, SchemaError> {
        match declared {
            Some(name) if self.index.contains_key(&name) => Ok(Some(name)),
            Some(name) => Err(SchemaError::MissingRoot { root, name }),
            None => Ok(self
                .index
                .contains_key(conventional)
                .then(|| conventional.to_string())),
        }
    }
}

fn convert_type(ty: TypeDefinition, location: SourceLocation, builtin: bool) -> Definition {
    let mut def = Definition {
        name: ty.name.node.to_string(),
        kind: DefinitionKind::Scalar,
        description: ty.description.map(|d| d.node),
        directives: convert_directives(&ty.directives),
        fields: Vec::new(),
        implements: Vec::new(),
        members: Vec::new(),
        values: Vec::new(),
        location,
        builtin,
    };

    match ty.kind {
        TypeKind::Scalar => {}
        TypeKind::Object(object) => {
            def.kind = DefinitionKind::Object;
            def.implements = object.implements.iter().map(|i| i.node.to_string()).collect();
            def.fields = object.fields.iter().map(|f| convert_field(&f.node)).collect();
        }
        TypeKind::Interface(interface) => {
            def.kind = DefinitionKind::Interface;
            def.implements = interface
                .implements
                .iter()
                .map(|i| i.node.to_string())
                .collect();
            def.fields = interface
                .fields
                .iter()
                .map(|f| convert_field(&f.node))
                .collect();
        }
        TypeKind::Union(union) => {
            def.kind = DefinitionKind::Union;
            def.members = union.members.iter().map(|m| m.node.to_string()).collect();
        }
        TypeKind::Enum(enumeration) => {
            def.kind = DefinitionKind::Enum;
            def.values = enumeration
                .values
                .iter()
                .map(|v| EnumValueDef {
                    name: v.node.value.node.to_string(),
                    description: v.node.description.as_ref().map(|d| d.node.clone()),
                })
                .collect();
        }
        TypeKind::InputObject(input) => {
            def.kind = DefinitionKind::InputObject;
            def.fields = input
                .fields
                .iter()
                .map(|f| convert_input_field(&f.node))
                .collect();
        }
    }
    def
}

fn convert_field(field: &FieldDefinition) -> FieldDef {
    FieldDef {
        name: field.name.node.to_string(),
        description: field.description.as_ref().map(|d| d.node.clone()),
        arguments: field
            .arguments
            .iter()
            .map(|a| convert_input_value(&a.node))
            .collect(),
        ty: convert_type_expr(&field.ty.node),
        directives: convert_directives(&field.directives),
    }
}

fn convert_input_field(field: &InputValueDefinition) -> FieldDef {
    FieldDef {
        name: field.name.node.to_string(),
        description: field.description.as_ref().map(|d| d.node.clone()),
        arguments: Vec::new(),
        ty: convert_type_expr(&field.ty.node),
        directives: convert_directives(&field.directives),
    }
}

fn convert_input_value(value: &InputValueDefinition) -> InputValue {
    InputValue {
        name: value.name.node.to_string(),
        description: value.description.as_ref().map(|d| d.node.clone()),
        ty: convert_type_expr(&value.ty.node),
    }
}

fn convert_type_expr(ty: &Type) -> TypeExpr {
    fn innermost(ty: &Type) -> String {
        match &ty.base {
            BaseType::Named(name) => name.to_string(),
            BaseType::List(inner) => innermost(inner),
        }
    }

    TypeExpr {
        name: innermost(ty),
        is_array: matches!(ty.base, BaseType::List(_)),
        required: !ty.nullable,
    }
}

fn convert_directives(directives: &[Positioned<ConstDirective>]) -> Vec<Directive> {
    directives
        .iter()
        .map(|d| Directive {
            name: d.node.name.node.to_string(),
            arguments: d
                .node
                .arguments
                .iter()
                .map(|(name, value)| {
                    (
                        name.node.to_string(),
                        serde_json::to_value(&value.node).unwrap_or(serde_json::Value::Null),
                    )
                })
                .collect(),
        })
        .collect()
}
