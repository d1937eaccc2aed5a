//! # Error Module
//!
//! Every pipeline stage returns its own typed error so that a failure names the
//! file, type or signature that triggered it. [`Error`] unifies them for the
//! pipeline and CLI boundary.
//!
//! | Stage | Error | Fatal conditions |
//! |---|---|---|
//! | config | [`ConfigError`] | unreadable/invalid config, no schema files |
//! | schema | [`SchemaError`] | unreadable file, syntax error, duplicate type |
//! | parser | [`ParseError`] | unknown type, root type reused as a model |
//! | binder | [`BindError`] | autobind source unloadable, unbound reference |
//! | rewriter | [`RewriteError`] | resolver file unparsable, span crosses files |
//! | generator | [`GenerateError`] | unbound type, template rendering or write failure |
//!
//! A missing previous resolver tree is *not* an error: it marks the first run.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("unable to read config {path:?}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid YAML for [`crate::config::Config`]
    #[error("unable to parse config {path:?}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },
    /// A required setting is missing or malformed
    #[error("invalid config {path:?}: {message}")]
    Invalid {
        /// Config file path
        path: PathBuf,
        /// What is wrong
        message: String,
    },
    /// A schema glob pattern could not be compiled
    #[error("failed to glob schema filename {pattern:?}: {message}")]
    Glob {
        /// Offending pattern
        pattern: String,
        /// Glob error text
        message: String,
    },
    /// None of the schema patterns matched a file
    #[error("no schema files matched {patterns:?}")]
    NoSchemaFiles {
        /// Configured patterns
        patterns: Vec<String>,
    },
}

/// Schema loading errors (IDL loader collaborator)
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A schema file could not be read
    #[error("unable to read schema {path:?}: {source}")]
    Read {
        /// Schema file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A schema file is not valid SDL
    #[error("syntax error in schema {file}: {message}")]
    Syntax {
        /// Schema file (or `<builtin>` for the prelude)
        file: String,
        /// Parser message including line/column
        message: String,
    },
    /// The same type is defined twice without `extend`
    #[error("type {name} is defined twice: {first} and {second}")]
    DuplicateType {
        /// Type name
        name: String,
        /// Location of the first definition
        first: String,
        /// Location of the second definition
        second: String,
    },
    /// The `schema { ... }` block names a root type that does not exist
    #[error("schema root {root} refers to undefined type {name}")]
    MissingRoot {
        /// `query`, `mutation` or `subscription`
        root: &'static str,
        /// Named type
        name: String,
    },
}

/// Schema parser errors
#[derive(Debug, Error)]
pub enum ParseError {
    /// A field, argument or return type names a type that is not defined
    #[error("unknown type {name} referenced by {referenced_by}")]
    UnknownType {
        /// Missing type name
        name: String,
        /// `Parent.field` or `Query.op(arg)` that referenced it
        referenced_by: String,
    },
    /// A query/mutation root type is used as an ordinary model type
    #[error("root type {name} cannot be used as a model (referenced by {referenced_by}, {location})")]
    RootTypeReused {
        /// Root type name
        name: String,
        /// `Parent.field` that referenced it
        referenced_by: String,
        /// Schema location of the root definition
        location: String,
    },
}

/// Type binder errors
#[derive(Debug, Error)]
pub enum BindError {
    /// A configured autobind source cannot be loaded
    #[error("could not load autobind source {module} at {path:?}: {reason}")]
    SourceUnavailable {
        /// Module path from config
        module: String,
        /// Filesystem location
        path: PathBuf,
        /// Why it failed
        reason: String,
    },
    /// The default model location exists but cannot be introspected
    #[error("could not load generated model location {path:?}: {reason}")]
    DefaultUnavailable {
        /// Filesystem location
        path: PathBuf,
        /// Why it failed
        reason: String,
    },
    /// A type reference has no binding after the bind pass
    #[error("type {name} used by {used_by} could not be bound to any location")]
    Unbound {
        /// Schema type name
        name: String,
        /// Where it is used
        used_by: String,
    },
}

/// Body-preserving rewriter errors
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A previous resolver file could not be read
    #[error("unable to read resolver source {path:?}: {source}")]
    Read {
        /// Resolver file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A previous resolver file is not valid Rust
    #[error("unable to parse resolver source {path:?}: {message}")]
    Parse {
        /// Resolver file path
        path: PathBuf,
        /// Parser message
        message: String,
    },
    /// A declaration span starts and ends in different files
    #[error("cannot extract source for {signature}: span starts in {start:?} and ends in {end:?}")]
    SpanCrossesFiles {
        /// Signature being extracted
        signature: String,
        /// File holding the start position
        start: PathBuf,
        /// File holding the end position
        end: PathBuf,
    },
    /// A span does not fit the file it points into
    #[error("cannot extract source for {signature}: byte range {start}..{end} is invalid for {path:?}")]
    InvalidSpan {
        /// Signature being extracted
        signature: String,
        /// File path
        path: PathBuf,
        /// Start offset
        start: usize,
        /// End offset
        end: usize,
    },
}

/// Generator (template rendering / output) errors
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A type reached the generator without a binding
    #[error("type {name} has no binding")]
    UnresolvedType {
        /// Schema type name
        name: String,
    },
    /// A template failed to render
    #[error("failed to render {template}: {source}")]
    Render {
        /// Template name
        template: &'static str,
        /// Askama error
        #[source]
        source: askama::Error,
    },
    /// An output file or directory could not be written
    #[error("failed to write {path:?}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of a generation run
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Schema loading failure
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Schema parsing failure
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Type binding failure
    #[error(transparent)]
    Bind(#[from] BindError),
    /// Body extraction failure
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    /// Output failure
    #[error(transparent)]
    Generate(#[from] GenerateError),
}
