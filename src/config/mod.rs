//! # Configuration Module
//!
//! Loads `lambda.yaml`, the only input besides the schema files that affects a
//! generation run.
//!
//! ```yaml
//! schema:
//!   - "schema/*.graphql"
//! exec:
//!   filename: src/lambda/generated/generated.rs
//!   module: crate::lambda::generated
//! model:
//!   filename: src/lambda/model/models_gen.rs
//!   module: crate::lambda::model
//! resolver:
//!   dir: src/lambda/resolvers
//!   module: crate::lambda::resolvers
//!   filename_template: "{resolver}_resolver.rs"
//! autobind:
//!   - crate::models
//!   - module: shared::types
//!     path: ../shared/src/types
//! ```
//!
//! All relative paths resolve against the directory holding the config file.
//! The order of `autobind` entries is significant: the binder takes the first
//! source that declares a type.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;


#[allow(clippy::unwrap_used)]
static RESOLVER_TEMPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{([^}]+)\}_resolver\.rs$").unwrap());

/// The resolver file kinds the generator owns, in emission order.
pub const RESOLVER_KINDS: [&str; 5] = ["query", "mutation", "field", "middleware", "webhook"];

/// Location of one generated file and the Rust module it is mounted at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// File path relative to the config directory
    pub filename: String,
    /// Rust module path the file is reachable at (e.g. `crate::lambda::model`)
    pub module: String,
}

/// Where resolver stubs are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Directory relative to the config directory
    pub dir: String,
    /// Rust module path of the directory
    pub module: String,
    /// File name pattern, currently only `{resolver}_resolver.rs`
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

fn default_filename_template() -> String {
    "{resolver}_resolver.rs".to_string()
}

/// An `autobind` entry as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindSourceSpec {
    /// `crate::models` - location derived from the module path
    Module(String),
    /// Explicit module path plus filesystem location
    Located {
        /// Rust module path types are referenced through
        module: String,
        /// Directory or `.rs` file, relative to the config directory
        path: String,
    },
}

/// A resolved autobind source: where to look and how to name what is found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindSource {
    /// Rust module path (e.g. `crate::models`)
    pub module: String,
    /// Directory or file to introspect. A directory path may also name a
    /// `<path>.rs` module file.
    pub path: PathBuf,
}

/// Parsed `lambda.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Schema file globs
    pub schema: Vec<String>,
    /// Generated dispatch layer
    pub exec: PackageConfig,
    /// Default generated-output location for model types
    pub model: PackageConfig,
    /// Resolver stub location
    pub resolver: ResolverConfig,
    /// Ordered autobind sources
    #[serde(default)]
    pub autobind: Vec<BindSourceSpec>,
    /// Directory holding the config file
    #[serde(skip)]
    pub root: PathBuf,
    /// Path of the config file itself
    #[serde(skip)]
    pub path: PathBuf,
}

/// Template for `lambdagen init`
#[derive(Template)]
#[template(path = "lambda.yaml.txt", escape = "none")]
pub struct DefaultConfigTemplate<'a> {
    /// Schema glob to put in the config
    pub schema_glob: &'a str,
}

impl Config {
    /// Read and validate a config file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable, is not valid YAML, has
    /// unknown keys, or misses a required setting.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&raw, path)?;
        let abs = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        config.root = abs
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.path = path.to_path_buf();
        tracing::debug!(config = ?path, root = ?config.root, "loaded config");
        Ok(config)
    }

    /// Parse and validate YAML text. `origin` is only used in error messages;
    /// the root is left empty (relative to the working directory).
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn from_yaml(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::Invalid {
            path: origin.to_path_buf(),
            message: message.to_string(),
        };

        if self.exec.module.trim().is_empty()
            || self.model.module.trim().is_empty()
            || self.resolver.module.trim().is_empty()
        {
            return Err(invalid("module must be set for exec, model and resolver"));
        }
        if self.exec.filename.trim().is_empty() || self.model.filename.trim().is_empty() {
            return Err(invalid(
                "file names for generated executer and model must be set",
            ));
        }
        if self.resolver.dir.trim().is_empty() {
            return Err(invalid("resolver target directory must be set"));
        }

        match RESOLVER_TEMPLATE
            .captures(&self.resolver.filename_template)
            .and_then(|c| c.get(1))
        {
            Some(name) if name.as_str() == "resolver" => {}
            Some(_) => {
                return Err(invalid(
                    "currently only {resolver}_resolver.rs is supported as resolver filename template",
                ))
            }
            None => {
                return Err(invalid(
                    "could not find resolver name in filename template",
                ))
            }
        }

        for spec in &self.autobind {
            if let BindSourceSpec::Module(module) = spec {
                if module != "crate" && !module.starts_with("crate::") {
                    return Err(ConfigError::Invalid {
                        path: origin.to_path_buf(),
                        message: format!(
                            "autobind module {module} is outside this crate and needs an explicit path"
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Expand the schema globs relative to the config directory
    ///
    /// Matches are deduplicated, keeping the order in which they were first seen.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is malformed or nothing matched.
    pub fn schema_files(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut files: Vec<PathBuf> = Vec::new();
        for pattern in &self.schema {
            let full = self.root.join(pattern);
            let full = full.to_string_lossy();
            let matches = glob::glob(&full).map_err(|e| ConfigError::Glob {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            for entry in matches.flatten() {
                if !files.contains(&entry) {
                    files.push(entry);
                }
            }
        }
        if files.is_empty() {
            return Err(ConfigError::NoSchemaFiles {
                patterns: self.schema.clone(),
            });
        }
        Ok(files)
    }

    /// Resolve the `autobind` list into introspectable locations, in order
    #[must_use]
    pub fn bind_sources(&self) -> Vec<BindSource> {
        self.autobind
            .iter()
            .map(|spec| match spec {
                BindSourceSpec::Module(module) => BindSource {
                    module: module.clone(),
                    path: self.root.join(module_dir(module)),
                },
                BindSourceSpec::Located { module, path } => BindSource {
                    module: module.clone(),
                    path: self.root.join(path),
                },
            })
            .collect()
    }

    /// Absolute path of the generated model file
    #[must_use]
    pub fn model_file(&self) -> PathBuf {
        self.root.join(&self.model.filename)
    }

    /// Directory that makes up the default generated-output location
    #[must_use]
    pub fn model_dir(&self) -> PathBuf {
        self.model_file()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone())
    }

    /// File name the generator itself writes model types to
    #[must_use]
    pub fn model_file_name(&self) -> String {
        Path::new(&self.model.filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Module path of the generated model file (`crate::lambda::model::models_gen`)
    #[must_use]
    pub fn model_file_module(&self) -> String {
        file_module(&self.model.module, Path::new(&self.model.filename))
    }

    /// Absolute path of the generated dispatch file
    #[must_use]
    pub fn exec_file(&self) -> PathBuf {
        self.root.join(&self.exec.filename)
    }

    /// Module path of the generated dispatch file
    #[must_use]
    pub fn exec_file_module(&self) -> String {
        file_module(&self.exec.module, Path::new(&self.exec.filename))
    }

    /// Absolute resolver directory
    #[must_use]
    pub fn resolver_dir(&self) -> PathBuf {
        self.root.join(&self.resolver.dir)
    }

    /// File name for one resolver kind (`query` → `query_resolver.rs`)
    #[must_use]
    pub fn resolver_file_name(&self, kind: &str) -> String {
        self.resolver.filename_template.replace("{resolver}", kind)
    }

    /// Every generator-owned resolver file, existing or not
    #[must_use]
    pub fn resolver_files(&self) -> Vec<PathBuf> {
        let dir = self.resolver_dir();
        RESOLVER_KINDS
            .iter()
            .map(|kind| dir.join(self.resolver_file_name(kind)))
            .collect()
    }
}

/// Module path of `file` inside the directory module `parent`
///
/// `mod.rs`, `lib.rs` and `main.rs` are the directory module itself; any other
/// file is a child module named after its stem.
#[must_use]
pub fn file_module(parent: &str, file: &Path) -> String {
    match file.file_stem().and_then(|s| s.to_str()) {
        Some("mod" | "lib" | "main") | None => parent.to_string(),
        Some(stem) => format!("{parent}::{stem}"),
    }
}

/// `crate::a::b` → `src/a/b`
fn module_dir(module: &str) -> PathBuf {
    let mut dir = PathBuf::from("src");
    for segment in module.split("::").skip(1) {
        dir.push(segment);
    }
    dir
}

/// Write a default `lambda.yaml`
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if writing fails.
pub fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{path:?} already exists (use --force to overwrite)");
    }
    let rendered = DefaultConfigTemplate {
        schema_glob: "schema/*.graphql",
    }
    .render()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, rendered)?;
    tracing::info!(path = ?path, "wrote default config");
    Ok(())
}
