//! # Pipeline Module
//!
//! One generation run, start to finish:
//!
//! ```text
//! lambda.yaml ─► schema files ─► Tree ─► bind ─► recover bodies ─► render ─► write
//! ```
//!
//! Every stage before `write` is side-effect free, so any failure leaves the
//! previous output exactly as it was.

use std::path::PathBuf;

use crate::binder::{Autobinder, DefaultLocation};
use crate::config::Config;
use crate::error::Error;
use crate::generator::{render_all, write_files, WriteOutcome};
use crate::parser::parse;
use crate::rewriter::Rewriter;
use crate::schema::load_schema;

/// Summary of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generated {
    /// Files created or changed
    pub written: Vec<PathBuf>,
    /// Files whose content was already up to date
    pub unchanged: Vec<PathBuf>,
    /// Existing files the generator does not overwrite
    pub skipped: Vec<PathBuf>,
    /// Hand-written bodies carried over
    pub preserved: usize,
    /// Declarations retained as deprecated blocks
    pub deprecated: usize,
}

/// Run the generator for a loaded config
///
/// # Errors
///
/// Returns the first stage error. Nothing is written unless every stage up to
/// rendering succeeded.
pub fn generate(config: &Config) -> Result<Generated, Error> {
    let files = config.schema_files()?;
    tracing::info!(files = files.len(), "loading schema");
    let doc = load_schema(&files)?;

    let mut tree = parse(&doc)?;
    Autobinder::new(DefaultLocation::from_config(config)).bind(&mut tree, &config.bind_sources())?;

    let rewrite = Rewriter::new(config.resolver_dir(), config.resolver_files()).load(&tree)?;
    let rendered = render_all(config, &tree, &rewrite)?;

    let mut report = Generated {
        preserved: rewrite.bodies.len(),
        deprecated: rewrite.deprecated.len(),
        ..Generated::default()
    };
    for (path, outcome) in write_files(&rendered)? {
        match outcome {
            WriteOutcome::Written => report.written.push(path),
            WriteOutcome::Unchanged => report.unchanged.push(path),
            WriteOutcome::Skipped => report.skipped.push(path),
        }
    }

    tracing::info!(
        written = report.written.len(),
        unchanged = report.unchanged.len(),
        preserved = report.preserved,
        deprecated = report.deprecated,
        "generation complete"
    );
    Ok(report)
}
