use askama::Template;

/// Variant of a generated enum
#[derive(Debug, Clone)]
pub struct VariantView {
    /// Rust identifier
    pub ident: String,
    /// Schema value
    pub value: String,
    /// Whether `ident` differs from `value` and needs `#[serde(rename)]`
    pub renamed: bool,
    /// Doc comment lines
    pub docs: Vec<String>,
}

/// A schema enum
#[derive(Debug, Clone)]
pub struct EnumView {
    /// Type name
    pub name: String,
    /// Doc comment lines
    pub docs: Vec<String>,
    /// Variants in schema order
    pub variants: Vec<VariantView>,
}

/// An opaque type emitted as a JSON newtype
#[derive(Debug, Clone)]
pub struct NewtypeView {
    /// Type name
    pub name: String,
    /// Doc comment lines
    pub docs: Vec<String>,
}

/// One implementor of an interface or member of a union
#[derive(Debug, Clone)]
pub struct MemberView {
    /// Variant identifier
    pub ident: String,
    /// Rust type path
    pub ty: String,
}

/// An interface or union with known implementors
#[derive(Debug, Clone)]
pub struct UnionView {
    /// Type name
    pub name: String,
    /// Doc comment lines
    pub docs: Vec<String>,
    /// Implementors sorted by name
    pub variants: Vec<MemberView>,
}

/// A struct field
#[derive(Debug, Clone)]
pub struct FieldView {
    /// snake_case identifier
    pub ident: String,
    /// Rust type
    pub ty: String,
    /// JSON key
    pub rename: String,
    /// Dgraph predicate accepted on input
    pub alias: String,
    /// Doc comment lines
    pub docs: Vec<String>,
}

/// A model struct
#[derive(Debug, Clone)]
pub struct StructView {
    /// Type name
    pub name: String,
    /// Doc comment lines
    pub docs: Vec<String>,
    /// Fields in schema order
    pub fields: Vec<FieldView>,
}

/// Template data for the generated model file
#[derive(Template)]
#[template(path = "models.rs.txt", escape = "none")]
pub struct ModelsTemplateData {
    /// Enums
    pub enums: Vec<EnumView>,
    /// Custom scalars and abstract types without implementors
    pub newtypes: Vec<NewtypeView>,
    /// Interfaces and unions
    pub unions: Vec<UnionView>,
    /// Models
    pub structs: Vec<StructView>,
}

/// One resolver function
#[derive(Debug, Clone)]
pub struct StubView {
    /// Doc comment lines
    pub docs: Vec<String>,
    /// Signature, body and closing brace
    pub code: String,
}

/// Template data for one `<kind>_resolver.rs` file
#[derive(Template)]
#[template(path = "resolver.rs.txt", escape = "none")]
pub struct ResolverTemplateData {
    /// Module of the dispatch file holding the support types
    pub exec_module: String,
    /// Live stubs sorted by key
    pub stubs: Vec<StubView>,
    /// Commented-out deprecated declarations
    pub deprecated: Vec<String>,
}

/// A webhook dispatch arm
#[derive(Debug, Clone)]
pub struct WebhookRoute {
    /// `__typename` of the event
    pub type_name: String,
    /// Function path
    pub call: String,
}

/// An argument decoded from the request
#[derive(Debug, Clone)]
pub struct ArgumentView {
    /// Schema name
    pub name: String,
    /// Local variable
    pub local: String,
    /// Rust type
    pub ty: String,
}

/// A query or mutation dispatch arm
#[derive(Debug, Clone)]
pub struct OperationRoute {
    /// `Query.name` / `Mutation.name`
    pub route: String,
    /// Arguments to decode
    pub args: Vec<ArgumentView>,
    /// Function path
    pub call: String,
    /// Call argument list
    pub call_args: String,
}

/// A field resolver dispatch arm
#[derive(Debug, Clone)]
pub struct FieldRoute {
    /// `Type.field`
    pub route: String,
    /// Rust type of the parents
    pub parent_ty: String,
    /// Function path
    pub call: String,
}

/// Middleware run before a resolver
#[derive(Debug, Clone)]
pub struct MiddlewareChain {
    /// Resolver route
    pub route: String,
    /// Middleware function paths in order
    pub steps: Vec<String>,
}

/// Template data for the generated dispatch file
#[derive(Template)]
#[template(path = "executer.rs.txt", escape = "none")]
pub struct ExecuterTemplateData {
    /// Resolver directory module
    pub resolver_module: String,
    /// Comma separated resolver file modules
    pub resolver_files: String,
    /// Webhook arms
    pub webhooks: Vec<WebhookRoute>,
    /// Query and mutation arms
    pub operations: Vec<OperationRoute>,
    /// Field resolver arms
    pub fields: Vec<FieldRoute>,
    /// Middleware chains
    pub middleware: Vec<MiddlewareChain>,
}

/// Template data for the resolver directory `mod.rs`
#[derive(Template)]
#[template(path = "mod.rs.txt", escape = "none")]
pub struct ModRsTemplateData {
    /// Module names to declare
    pub modules: Vec<String>,
}
