//! View data for the resolver stubs and the dispatch file.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Config;
use crate::error::GenerateError;
use crate::parser::{FieldResolver, Operation, OperationKind, Tree};
use crate::rewriter::{render_block, RewriteSet, Signature};

use super::naming::{doc_lines, field_ident};
use super::templates::{
    ArgumentView, ExecuterTemplateData, FieldRoute, MiddlewareChain, OperationRoute,
    ResolverTemplateData, StubView, WebhookRoute,
};
use super::types::{base_type, value_type, Scope};

/// One function the user fills in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stub {
    /// Rewriter key (`Query_user`, `User_friends`)
    pub key: String,
    /// Resolver file kind
    pub kind: &'static str,
    /// Doc comment lines
    pub docs: Vec<String>,
    /// Everything up to and including the opening brace
    pub header: String,
    /// Body used when no previous body exists
    pub default_body: String,
}

impl Stub {
    /// Full function text with either the preserved or the default body
    #[must_use]
    pub fn code(&self, rewrite: &RewriteSet) -> String {
        let body = rewrite
            .bodies
            .get(&self.key)
            .map_or(self.default_body.as_str(), String::as_str);
        format!("{}{}}}", self.header, body)
    }
}

fn unimplemented_body(key: &str) -> String {
    format!("\n    Err(LambdaError::unimplemented(\"{key}\"))\n")
}

const OK_BODY: &str = "\n    Ok(())\n";

fn operation_file_kind(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Query => "query",
        OperationKind::Mutation => "mutation",
    }
}

fn operation_stub(tree: &Tree, op: &Operation) -> Result<Stub, GenerateError> {
    let key = op.key();
    let mut params = Vec::with_capacity(op.arguments.len() + 1);
    for arg in &op.arguments {
        params.push(format!(
            "{}: {}",
            field_ident(&arg.name),
            value_type(tree, &arg.ty, Scope::Elsewhere)?
        ));
    }
    params.push("auth_header: &AuthHeader".to_string());
    let ret = value_type(tree, &op.ret, Scope::Elsewhere)?;
    Ok(Stub {
        header: format!(
            "pub fn {key}({}) -> Result<{ret}, LambdaError> {{",
            params.join(", ")
        ),
        default_body: unimplemented_body(&key),
        docs: doc_lines(op.description.as_deref()),
        kind: operation_file_kind(op.kind),
        key,
    })
}

fn field_stub(tree: &Tree, resolver: &FieldResolver) -> Result<Stub, GenerateError> {
    let key = resolver.key();
    let parent = base_type(tree, &resolver.parent, Scope::Elsewhere)?;
    let ret = value_type(tree, &resolver.field.ty, Scope::Elsewhere)?;
    Ok(Stub {
        header: format!(
            "pub fn {key}(parents: &[{parent}], auth_header: &AuthHeader) -> Result<Vec<{ret}>, LambdaError> {{"
        ),
        default_body: unimplemented_body(&key),
        docs: doc_lines(resolver.field.description.as_deref()),
        kind: "field",
        key,
    })
}

/// Every stub for `tree`, grouped by file kind and sorted by key
///
/// # Errors
///
/// Returns [`GenerateError::UnresolvedType`] if a signature type has no binding.
pub fn stubs(tree: &Tree) -> Result<Vec<Stub>, GenerateError> {
    let mut stubs = Vec::new();
    for op in tree.resolvers.queries.values() {
        stubs.push(operation_stub(tree, op)?);
    }
    for op in tree.resolvers.mutations.values() {
        stubs.push(operation_stub(tree, op)?);
    }
    for resolver in tree.resolvers.field_resolvers.values() {
        stubs.push(field_stub(tree, resolver)?);
    }
    for name in &tree.middleware {
        let key = format!("Middleware_{name}");
        stubs.push(Stub {
            header: format!(
                "pub fn {key}(md: &mut MiddlewareData) -> Result<(), LambdaError> {{"
            ),
            default_body: OK_BODY.to_string(),
            docs: Vec::new(),
            kind: "middleware",
            key,
        });
    }
    for model in tree.models.subscribed_models() {
        let key = format!("Webhook_{}", model.name);
        let events: Vec<&str> = model.lambda_on_mutate.iter().map(|e| e.as_str()).collect();
        stubs.push(Stub {
            header: format!("pub fn {key}(event: &Event) -> Result<(), LambdaError> {{"),
            default_body: OK_BODY.to_string(),
            docs: vec![format!("/// Called after {} of {}", events.join(", "), model.name)],
            kind: "webhook",
            key,
        });
    }
    Ok(stubs)
}

/// Template data for the resolver file of `kind`
///
/// Deprecated declarations are placed in the file their name belongs to,
/// functions with an unrecognized name end up in the field resolver file.
#[must_use]
pub fn resolver_data(
    config: &Config,
    tree: &Tree,
    kind: &str,
    stubs: &[Stub],
    rewrite: &RewriteSet,
) -> ResolverTemplateData {
    ResolverTemplateData {
        exec_module: config.exec_file_module(),
        stubs: stubs
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| StubView {
                docs: s.docs.clone(),
                code: s.code(rewrite),
            })
            .collect(),
        deprecated: rewrite
            .deprecated
            .iter()
            .filter(|(key, _)| Signature::classify(key, tree).resolver_kind() == kind)
            .map(|(key, declaration)| render_block(key, declaration))
            .collect(),
    }
}

/// Module name of a resolver file (`query_resolver`)
#[must_use]
pub fn resolver_file_module(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Template data for the dispatch file
///
/// # Errors
///
/// Returns [`GenerateError::UnresolvedType`] if a signature type has no binding.
pub fn executer_data(config: &Config, tree: &Tree) -> Result<ExecuterTemplateData, GenerateError> {
    let module = |kind: &str| resolver_file_module(&config.resolver_file_name(kind));
    let mut chains: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let mut operations = Vec::new();
    for op in tree
        .resolvers
        .queries
        .values()
        .chain(tree.resolvers.mutations.values())
    {
        let kind = operation_file_kind(op.kind);
        let route = format!("{}.{}", op.kind.as_str(), op.name);
        let args = op
            .arguments
            .iter()
            .map(|arg| {
                Ok(ArgumentView {
                    name: arg.name.clone(),
                    local: format!("arg_{}", field_ident(&arg.name).trim_start_matches("r#")),
                    ty: value_type(tree, &arg.ty, Scope::Elsewhere)?,
                })
            })
            .collect::<Result<Vec<_>, GenerateError>>()?;
        let mut call_args: Vec<String> = args.iter().map(|a| a.local.clone()).collect();
        call_args.push("&request.auth_header".to_string());
        if !op.middleware.is_empty() {
            chains.insert(route.clone(), op.middleware.clone());
        }
        operations.push(OperationRoute {
            call: format!("{}::{}", module(kind), op.key()),
            call_args: call_args.join(", "),
            args,
            route,
        });
    }

    let mut fields = Vec::new();
    for resolver in tree.resolvers.field_resolvers.values() {
        let route = format!("{}.{}", resolver.parent, resolver.field.name);
        if !resolver.middleware.is_empty() {
            chains.insert(route.clone(), resolver.middleware.clone());
        }
        fields.push(FieldRoute {
            parent_ty: base_type(tree, &resolver.parent, Scope::Elsewhere)?,
            call: format!("{}::{}", module("field"), resolver.key()),
            route,
        });
    }

    let webhooks = tree
        .models
        .subscribed_models()
        .map(|m| WebhookRoute {
            type_name: m.name.clone(),
            call: format!("{}::Webhook_{}", module("webhook"), m.name),
        })
        .collect();

    let middleware = chains
        .into_iter()
        .map(|(route, names)| MiddlewareChain {
            route,
            steps: names
                .iter()
                .map(|name| format!("{}::Middleware_{name}", module("middleware")))
                .collect(),
        })
        .collect();

    Ok(ExecuterTemplateData {
        resolver_module: config.resolver.module.clone(),
        resolver_files: crate::config::RESOLVER_KINDS
            .iter()
            .map(|kind| module(kind))
            .collect::<Vec<_>>()
            .join(", "),
        webhooks,
        operations,
        fields,
        middleware,
    })
}
