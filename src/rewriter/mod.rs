//! # Rewriter Module
//!
//! Reads the previously generated resolver files and recovers the
//! hand-written parts before they are overwritten.
//!
//! Every top-level function is classified by name into a [`Signature`]:
//!
//! | Name | Signature | Live when |
//! |---|---|---|
//! | `Query_<name>` | [`Signature::Query`] | the query is annotated |
//! | `Mutation_<name>` | [`Signature::Mutation`] | the mutation is annotated |
//! | `Middleware_<name>` | [`Signature::Middleware`] | the middleware is referenced |
//! | `Webhook_<Type>` | [`Signature::Webhook`] | the model subscribes to events |
//! | `<Parent>_<field>` | [`Signature::Field`] | the field is annotated |
//!
//! A live function contributes its body, byte for byte, to
//! [`RewriteSet::bodies`]. Anything else, including names that fit no
//! convention, is kept whole in [`RewriteSet::deprecated`] so the generator can
//! retain it as commented-out text.
//!
//! A missing resolver directory means this is the first run and yields an
//! empty set. Any file that exists but cannot be read or parsed aborts the run.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RewriteError;
use crate::parser::Tree;

pub mod declarations;
pub mod deprecated;

pub use declarations::{
    DeclarationEnumerator, FunctionDecl, RustDeclarations, SourcePos, SourceSpan,
};
pub use deprecated::{parse_blocks, render_block, RetainedBlock};

/// What a previously generated function implemented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// `Query_<name>`
    Query(String),
    /// `Mutation_<name>`
    Mutation(String),
    /// `Middleware_<name>`
    Middleware(String),
    /// `Webhook_<Type>`
    Webhook(String),
    /// `<Parent>_<field>`
    Field {
        /// Parent type
        parent: String,
        /// Field name
        field: String,
    },
    /// Fits no naming convention
    Unrecognized(String),
}

impl Signature {
    /// Classify a function name
    ///
    /// A name that is exactly a field resolver key in `tree` is a field
    /// resolver even when its parent type is called `Query`, `Mutation`,
    /// `Middleware` or `Webhook`. Other names with a field shape are split at
    /// the first underscore.
    #[must_use]
    pub fn classify(name: &str, tree: &Tree) -> Signature {
        if let Some(resolver) = tree.resolvers.field_resolvers.get(name) {
            return Signature::Field {
                parent: resolver.parent.clone(),
                field: resolver.field.name.clone(),
            };
        }
        if let Some(rest) = suffix(name, "Query_") {
            return Signature::Query(rest);
        }
        if let Some(rest) = suffix(name, "Mutation_") {
            return Signature::Mutation(rest);
        }
        if let Some(rest) = suffix(name, "Middleware_") {
            return Signature::Middleware(rest);
        }
        if let Some(rest) = suffix(name, "Webhook_") {
            return Signature::Webhook(rest);
        }
        match name.split_once('_') {
            Some((parent, field)) if !parent.is_empty() && !field.is_empty() => Signature::Field {
                parent: parent.to_string(),
                field: field.to_string(),
            },
            _ => Signature::Unrecognized(name.to_string()),
        }
    }

    /// Key used in [`RewriteSet`] maps
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Signature::Query(name) => format!("Query_{name}"),
            Signature::Mutation(name) => format!("Mutation_{name}"),
            Signature::Middleware(name) => format!("Middleware_{name}"),
            Signature::Webhook(name) => format!("Webhook_{name}"),
            Signature::Field { parent, field } => format!("{parent}_{field}"),
            Signature::Unrecognized(name) => name.clone(),
        }
    }

    /// Whether the current tree still has something this function implements
    #[must_use]
    pub fn is_live(&self, tree: &Tree) -> bool {
        match self {
            Signature::Query(name) => tree.resolvers.queries.contains_key(name),
            Signature::Mutation(name) => tree.resolvers.mutations.contains_key(name),
            Signature::Middleware(name) => tree.middleware.contains(name),
            Signature::Webhook(name) => tree
                .models
                .model(name)
                .is_some_and(|m| !m.lambda_on_mutate.is_empty()),
            Signature::Field { .. } => tree.resolvers.field_resolvers.contains_key(&self.key()),
            Signature::Unrecognized(_) => false,
        }
    }

    /// Resolver file kind this signature belongs in
    #[must_use]
    pub fn resolver_kind(&self) -> &'static str {
        match self {
            Signature::Query(_) => "query",
            Signature::Mutation(_) => "mutation",
            Signature::Middleware(_) => "middleware",
            Signature::Webhook(_) => "webhook",
            Signature::Field { .. } | Signature::Unrecognized(_) => "field",
        }
    }
}

fn suffix(name: &str, prefix: &str) -> Option<String> {
    name.strip_prefix(prefix)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

/// Recovered source for the next generation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSet {
    /// Signature key → body text of a live function
    pub bodies: BTreeMap<String, String>,
    /// Signature key → full declaration that no longer matches the schema
    pub deprecated: BTreeMap<String, String>,
}

impl RewriteSet {
    /// Whether nothing was recovered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.deprecated.is_empty()
    }
}

/// Recovers bodies from previously generated resolver files
#[derive(Debug, Clone)]
pub struct Rewriter<E = RustDeclarations> {
    enumerator: E,
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl Rewriter<RustDeclarations> {
    /// Rewriter over `files` inside the resolver directory `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Rewriter::with_enumerator(RustDeclarations, dir, files)
    }
}

impl<E: DeclarationEnumerator> Rewriter<E> {
    /// Rewriter using a custom declaration enumerator
    pub fn with_enumerator(enumerator: E, dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Rewriter {
            enumerator,
            dir: dir.into(),
            files,
        }
    }

    /// Recover bodies and deprecated declarations for `tree`
    ///
    /// # Errors
    ///
    /// Fails when a resolver file cannot be read or parsed, or when a
    /// declaration span is unusable.
    pub fn load(&self, tree: &Tree) -> Result<RewriteSet, RewriteError> {
        let mut set = RewriteSet::default();
        if !self.dir.exists() {
            tracing::info!(dir = %self.dir.display(), "no previous resolvers, first run");
            return Ok(set);
        }

        let mut sources = SourceCache::default();
        let mut retained = BTreeMap::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for file in &self.files {
            if !file.exists() {
                continue;
            }
            let text = sources.get(file)?.to_string();
            for block in parse_blocks(&text) {
                retained.insert(block.key, block.declaration);
            }

            for decl in self.enumerator.enumerate(file, &text)? {
                if let Some(previous) = seen.insert(decl.name.clone(), file.clone()) {
                    tracing::warn!(
                        name = %decl.name,
                        first = %previous.display(),
                        second = %file.display(),
                        "function defined more than once, keeping the last"
                    );
                }
                let signature = Signature::classify(&decl.name, tree);
                let key = signature.key();
                if signature.is_live(tree) {
                    let body = sources.slice(&key, &decl.body)?;
                    set.deprecated.remove(&key);
                    set.bodies.insert(key, body);
                } else {
                    let declaration = sources.slice(&key, &decl.declaration)?;
                    tracing::warn!(signature = %key, "no longer in schema, keeping as deprecated");
                    set.bodies.remove(&key);
                    set.deprecated.insert(key, declaration);
                }
            }
        }

        for (key, declaration) in retained {
            if set.bodies.contains_key(&key) || set.deprecated.contains_key(&key) {
                continue;
            }
            if Signature::classify(&key, tree).is_live(tree) {
                if let Some(body) = self.revive(&key, &declaration) {
                    tracing::info!(signature = %key, "restoring deprecated body");
                    set.bodies.insert(key, body);
                    continue;
                }
            }
            set.deprecated.insert(key, declaration);
        }

        tracing::info!(
            bodies = set.bodies.len(),
            deprecated = set.deprecated.len(),
            "recovered previous resolvers"
        );
        Ok(set)
    }

    /// Body of a retained declaration whose signature is live again
    fn revive(&self, key: &str, declaration: &str) -> Option<String> {
        let origin = self.dir.join(format!("{key}.deprecated"));
        let decls = match self.enumerator.enumerate(&origin, declaration) {
            Ok(decls) => decls,
            Err(err) => {
                tracing::warn!(signature = %key, error = %err, "cannot restore deprecated block");
                return None;
            }
        };
        let decl = decls.into_iter().find(|d| d.name == key)?;
        declaration
            .get(decl.body.start.offset..decl.body.end.offset)
            .map(str::to_string)
    }
}

/// File contents read during one load, keyed by path
#[derive(Default)]
struct SourceCache {
    files: HashMap<PathBuf, String>,
}

impl SourceCache {
    fn get(&mut self, path: &Path) -> Result<&str, RewriteError> {
        if !self.files.contains_key(path) {
            let text = fs::read_to_string(path).map_err(|source| RewriteError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            self.files.insert(path.to_path_buf(), text);
        }
        Ok(self.files.get(path).map(String::as_str).unwrap_or_default())
    }

    /// Text covered by `span`, which must lie inside a single file
    fn slice(&mut self, signature: &str, span: &SourceSpan) -> Result<String, RewriteError> {
        if span.start.file != span.end.file {
            return Err(RewriteError::SpanCrossesFiles {
                signature: signature.to_string(),
                start: span.start.file.clone(),
                end: span.end.file.clone(),
            });
        }
        let text = self.get(&span.start.file)?;
        text.get(span.start.offset..span.end.offset)
            .map(str::to_string)
            .ok_or_else(|| RewriteError::InvalidSpan {
                signature: signature.to_string(),
                path: span.start.file.clone(),
                start: span.start.offset,
                end: span.end.offset,
            })
    }
}
