//! # Generator Module
//!
//! Renders the bound [`Tree`] and the recovered [`RewriteSet`] into Rust
//! source with Askama templates.
//!
//! ## Output
//!
//! ```text
//! <exec.filename>                 dispatch layer, support types   (always rewritten)
//! <model.filename>                generated model types           (always rewritten)
//! <resolver.dir>/
//! ├── mod.rs                      module list                     (written once)
//! ├── query_resolver.rs           Query_<name>
//! ├── mutation_resolver.rs        Mutation_<name>
//! ├── field_resolver.rs           <Parent>_<field>
//! ├── middleware_resolver.rs      Middleware_<name>
//! └── webhook_resolver.rs         Webhook_<Type>
//! ```
//!
//! Resolver files are always rewritten too, but every function body the
//! rewriter recovered is injected back verbatim and everything that no longer
//! matches the schema is kept as a commented-out block at the end of the file.
//!
//! Every file is rendered before the first one is written, so a rendering
//! failure leaves the previous output untouched. Rendering is deterministic:
//! running the generator twice on the same input yields identical bytes.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;

use crate::config::{Config, RESOLVER_KINDS};
use crate::error::GenerateError;
use crate::parser::Tree;
use crate::rewriter::RewriteSet;

pub mod models;
pub mod naming;
pub mod resolvers;
pub mod templates;
pub mod types;

pub use models::models_data;
pub use naming::{doc_lines, field_ident, sanitize_rust_identifier, to_snake_case};
pub use resolvers::{executer_data, resolver_data, resolver_file_module, stubs, Stub};
pub use templates::{
    ExecuterTemplateData, ModRsTemplateData, ModelsTemplateData, ResolverTemplateData,
};
pub use types::{base_type, field_type, value_type, Scope};

/// One rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Absolute destination
    pub path: PathBuf,
    /// Rendered source
    pub contents: String,
    /// Replace an existing file; when `false` an existing file is left alone
    pub overwrite: bool,
}

/// What happened to a file in [`write_files`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// New or changed content was written
    Written,
    /// The file already had exactly this content
    Unchanged,
    /// The file exists and is not owned by the generator
    Skipped,
}

fn render<T: Template>(template: &'static str, data: &T) -> Result<String, GenerateError> {
    let mut out = data
        .render()
        .map_err(|source| GenerateError::Render { template, source })?;
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Render every output file
///
/// # Errors
///
/// Returns an error if a type reaches the generator unbound or a template
/// fails to render.
pub fn render_all(
    config: &Config,
    tree: &Tree,
    rewrite: &RewriteSet,
) -> Result<Vec<GeneratedFile>, GenerateError> {
    let mut files = Vec::with_capacity(RESOLVER_KINDS.len() + 3);

    files.push(GeneratedFile {
        path: config.model_file(),
        contents: render("models.rs.txt", &models_data(tree)?)?,
        overwrite: true,
    });

    let stubs = stubs(tree)?;
    let dir = config.resolver_dir();
    let mut modules = Vec::with_capacity(RESOLVER_KINDS.len());
    for kind in RESOLVER_KINDS {
        let file_name = config.resolver_file_name(kind);
        modules.push(resolver_file_module(&file_name));
        files.push(GeneratedFile {
            path: dir.join(file_name),
            contents: render(
                "resolver.rs.txt",
                &resolver_data(config, tree, kind, &stubs, rewrite),
            )?,
            overwrite: true,
        });
    }

    files.push(GeneratedFile {
        path: config.exec_file(),
        contents: render("executer.rs.txt", &executer_data(config, tree)?)?,
        overwrite: true,
    });

    files.push(GeneratedFile {
        path: dir.join("mod.rs"),
        contents: render("mod.rs.txt", &ModRsTemplateData { modules })?,
        overwrite: false,
    });

    tracing::debug!(files = files.len(), stubs = stubs.len(), "rendered output");
    Ok(files)
}

/// Write rendered files, creating parent directories as needed
///
/// # Errors
///
/// Returns [`GenerateError::Write`] for the first file or directory that
/// cannot be written.
pub fn write_files(files: &[GeneratedFile]) -> Result<Vec<(PathBuf, WriteOutcome)>, GenerateError> {
    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let outcome = write_file(file)?;
        outcomes.push((file.path.clone(), outcome));
    }
    Ok(outcomes)
}

fn write_file(file: &GeneratedFile) -> Result<WriteOutcome, GenerateError> {
    let path = &file.path;
    if path.exists() {
        if !file.overwrite {
            tracing::info!(path = %path.display(), "keeping existing file");
            return Ok(WriteOutcome::Skipped);
        }
        if fs::read_to_string(path).is_ok_and(|current| current == file.contents) {
            tracing::debug!(path = %path.display(), "unchanged");
            return Ok(WriteOutcome::Unchanged);
        }
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }
    fs::write(path, &file.contents).map_err(|source| GenerateError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "generated");
    Ok(WriteOutcome::Written)
}

fn create_dir(dir: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(dir).map_err(|source| GenerateError::Write {
        path: dir.to_path_buf(),
        source,
    })
}
