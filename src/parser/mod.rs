//! # Parser Module
//!
//! Walks a [`SchemaDocument`] once and builds the [`Tree`]: the model types the
//! generator has to represent, the resolvers that need user logic, and every
//! middleware name the schema mentions.
//!
//! ## What gets walked
//!
//! - The query and mutation roots are always visited, but only their `@lambda`
//!   fields become [`Operation`]s.
//! - Object, input, interface and union types are visited only when they (or
//!   one of their fields) carry `@lambda` / `@lambdaOnMutate`, or when they are
//!   reachable from something already visited.
//! - User enums and custom scalars are always added.
//!
//! Every referenced type gets exactly one [`TypeBinding`] in
//! [`Tree::bindings`]. Primitive scalars are resolved here; everything else is
//! left for the [`binder`](crate::binder). A visited set carried by the parser
//! context makes self-referencing and mutually referencing types terminate.

use std::collections::HashSet;

use crate::error::ParseError;
use crate::schema::{
    Definition, DefinitionKind, FieldDef, SchemaDocument, TypeExpr, LAMBDA_ON_MUTATE_DIRECTIVE,
};

pub mod annotations;
pub mod primitives;
pub mod tree;
#[cfg(test)]
mod tests;

pub use annotations::{parse_lifecycle, parse_middleware};
pub use primitives::rust_primitive;
pub use tree::{
    field_resolver_key, Argument, Enum, EnumValue, Field, FieldResolver, FieldTag, Interface,
    InterfaceKind, LifecycleEvent, Model, ModelTree, ModelType, Operation, OperationKind,
    ResolverTree, Scalar, Tree, TypeBinding, TypeRef,
};

/// Build the [`Tree`] for a loaded schema
///
/// # Errors
///
/// Returns [`ParseError::UnknownType`] when a reference names an undefined type
/// and [`ParseError::RootTypeReused`] when a query or mutation root is used as
/// a field or argument type.
pub fn parse(doc: &SchemaDocument) -> Result<Tree, ParseError> {
    let mut parser = Parser::new(doc);
    parser.walk()?;
    let tree = parser.tree;
    tracing::info!(
        types = tree.models.types.len(),
        queries = tree.resolvers.queries.len(),
        mutations = tree.resolvers.mutations.len(),
        field_resolvers = tree.resolvers.field_resolvers.len(),
        middleware = tree.middleware.len(),
        "parsed schema"
    );
    Ok(tree)
}

/// Parse context: the tree under construction plus the names already visited
struct Parser<'a> {
    doc: &'a SchemaDocument,
    tree: Tree,
    visited: HashSet<String>,
}

impl<'a> Parser<'a> {
    fn new(doc: &'a SchemaDocument) -> Self {
        Parser {
            doc,
            tree: Tree::default(),
            visited: HashSet::new(),
        }
    }

    fn walk(&mut self) -> Result<(), ParseError> {
        let doc = self.doc;
        for def in doc.definitions() {
            if def.name == doc.query_root() {
                self.walk_operations(def, OperationKind::Query)?;
                continue;
            }
            if doc.mutation_root() == Some(def.name.as_str()) {
                self.walk_operations(def, OperationKind::Mutation)?;
                continue;
            }
            if doc.subscription_root() == Some(def.name.as_str()) {
                if def.has_lambda() {
                    tracing::warn!(name = %def.name, "subscriptions are not supported, skipping");
                }
                continue;
            }

            match def.kind {
                DefinitionKind::Enum | DefinitionKind::Scalar if !def.builtin => {
                    self.ensure(&def.name, &def.name)?;
                }
                DefinitionKind::Object
                | DefinitionKind::InputObject
                | DefinitionKind::Interface
                | DefinitionKind::Union
                    if def.has_lambda() =>
                {
                    self.ensure(&def.name, &def.name)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn walk_operations(&mut self, root: &Definition, kind: OperationKind) -> Result<(), ParseError> {
        for field in root.fields.iter().filter(|f| f.has_lambda()) {
            let referenced_by = format!("{}.{}", kind.as_str(), field.name);
            let ret = self.resolve(&field.ty, &referenced_by)?;
            let mut arguments = Vec::with_capacity(field.arguments.len());
            for arg in &field.arguments {
                let ty = self.resolve(&arg.ty, &format!("{referenced_by}({})", arg.name))?;
                arguments.push(Argument {
                    name: arg.name.clone(),
                    ty,
                });
            }
            let middleware = self.collect_middleware(field);
            let operation = Operation {
                kind,
                name: field.name.clone(),
                description: field.description.clone(),
                arguments,
                ret,
                middleware,
            };
            tracing::debug!(key = %operation.key(), "operation");
            let target = match kind {
                OperationKind::Query => &mut self.tree.resolvers.queries,
                OperationKind::Mutation => &mut self.tree.resolvers.mutations,
            };
            target.insert(operation.name.clone(), operation);
        }
        Ok(())
    }

    fn resolve(&mut self, expr: &TypeExpr, referenced_by: &str) -> Result<TypeRef, ParseError> {
        self.ensure(&expr.name, referenced_by)?;
        Ok(TypeRef {
            name: expr.name.clone(),
            is_array: expr.is_array,
            required: expr.required,
        })
    }

    /// Make sure `name` has a binding and, when it is a schema type, a model entry
    fn ensure(&mut self, name: &str, referenced_by: &str) -> Result<(), ParseError> {
        if self.visited.contains(name) {
            return Ok(());
        }
        if let Some(rust_type) = rust_primitive(name) {
            self.visited.insert(name.to_string());
            self.tree
                .bindings
                .insert(name.to_string(), TypeBinding::primitive(name, rust_type));
            return Ok(());
        }

        let doc = self.doc;
        let def = doc.get(name).ok_or_else(|| ParseError::UnknownType {
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
        })?;
        if doc.is_operation_root(name) {
            return Err(ParseError::RootTypeReused {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
                location: def.location.to_string(),
            });
        }

        self.visited.insert(name.to_string());
        self.tree
            .bindings
            .insert(name.to_string(), TypeBinding::unresolved(name));

        let entry = match def.kind {
            DefinitionKind::Object | DefinitionKind::InputObject => {
                ModelType::Model(self.model(def)?)
            }
            DefinitionKind::Interface | DefinitionKind::Union => {
                ModelType::Interface(self.interface(def)?)
            }
            DefinitionKind::Enum => ModelType::Enum(Enum {
                name: def.name.clone(),
                description: def.description.clone(),
                values: def
                    .values
                    .iter()
                    .map(|v| EnumValue {
                        name: v.name.clone(),
                        description: v.description.clone(),
                    })
                    .collect(),
            }),
            DefinitionKind::Scalar => ModelType::Scalar(Scalar {
                name: def.name.clone(),
                description: def.description.clone(),
            }),
        };
        self.tree.models.types.insert(name.to_string(), entry);
        Ok(())
    }

    fn model(&mut self, def: &Definition) -> Result<Model, ParseError> {
        let fields = self.fields(def)?;

        let mut implements = def.implements.clone();
        implements.extend(
            self.doc
                .unions_containing(&def.name)
                .into_iter()
                .map(str::to_string),
        );
        for parent in &implements {
            self.ensure(parent, &def.name)?;
        }

        let lambda_on_mutate = parse_lifecycle(def.directive(LAMBDA_ON_MUTATE_DIRECTIVE));
        if !lambda_on_mutate.is_empty() {
            tracing::debug!(model = %def.name, events = ?lambda_on_mutate, "webhook subscription");
        }
        Ok(Model {
            name: def.name.clone(),
            description: def.description.clone(),
            fields,
            implements,
            lambda_on_mutate,
        })
    }

    fn interface(&mut self, def: &Definition) -> Result<Interface, ParseError> {
        let (kind, fields, members) = if def.kind == DefinitionKind::Union {
            (InterfaceKind::Union, Vec::new(), def.members.clone())
        } else {
            let fields = self.fields(def)?;
            let mut related = def.implements.clone();
            related.extend(
                self.doc
                    .implementors(&def.name)
                    .into_iter()
                    .filter(|n| !self.doc.is_operation_root(n))
                    .map(str::to_string),
            );
            (InterfaceKind::Interface, fields, related)
        };
        for member in &members {
            self.ensure(member, &def.name)?;
        }
        Ok(Interface {
            name: def.name.clone(),
            description: def.description.clone(),
            kind,
            fields,
        })
    }

    /// Record every field of `def`, adding field resolvers for `@lambda` ones
    fn fields(&mut self, def: &Definition) -> Result<Vec<Field>, ParseError> {
        let mut fields = Vec::with_capacity(def.fields.len());
        for field_def in &def.fields {
            let referenced_by = format!("{}.{}", def.name, field_def.name);
            let ty = self.resolve(&field_def.ty, &referenced_by)?;
            let field = Field {
                name: field_def.name.clone(),
                description: field_def.description.clone(),
                ty,
                tag: FieldTag::new(&def.name, &field_def.name),
            };
            if field_def.has_lambda() {
                let middleware = self.collect_middleware(field_def);
                let resolver = FieldResolver {
                    parent: def.name.clone(),
                    field: field.clone(),
                    middleware,
                };
                tracing::debug!(key = %resolver.key(), "field resolver");
                self.tree
                    .resolvers
                    .field_resolvers
                    .insert(resolver.key(), resolver);
            }
            fields.push(field);
        }
        Ok(fields)
    }

    fn collect_middleware(&mut self, field: &FieldDef) -> Vec<String> {
        let names = parse_middleware(field.description.as_deref());
        self.tree.middleware.extend(names.iter().cloned());
        names
    }
}
