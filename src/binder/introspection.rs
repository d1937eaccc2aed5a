//! Package introspection: which type names a source location declares.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::file_module;

/// Why a location could not be introspected
#[derive(Debug, Error)]
pub enum IntrospectError {
    /// Nothing exists at the location
    #[error("location does not exist")]
    Missing,
    /// The location exists but cannot be read or parsed
    #[error("{0}")]
    Invalid(String),
}

/// A type declared in a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Module the type is declared in (`crate::models::user`)
    pub module: String,
    /// File holding the declaration
    pub file: PathBuf,
}

impl Declaration {
    /// File name of the declaring file
    #[must_use]
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Type names a loaded location declares
#[derive(Debug, Clone, Default)]
pub struct Package {
    /// Module path the location is mounted at
    pub module: String,
    declarations: BTreeMap<String, Vec<Declaration>>,
}

impl Package {
    /// An empty package for `module`
    #[must_use]
    pub fn empty(module: impl Into<String>) -> Self {
        Package {
            module: module.into(),
            declarations: BTreeMap::new(),
        }
    }

    /// Record a declaration of `name`, after any recorded earlier
    pub fn declare(&mut self, name: impl Into<String>, declaration: Declaration) {
        self.declarations
            .entry(name.into())
            .or_default()
            .push(declaration);
    }

    /// First place `name` is declared, if it is
    #[must_use]
    pub fn declares(&self, name: &str) -> Option<&Declaration> {
        self.declarations_of(name).next()
    }

    /// Every place `name` is declared, in scan order
    pub fn declarations_of<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Declaration> {
        self.declarations.get(name).into_iter().flatten()
    }

    /// Number of declared types
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the package declares nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Loads a source location and reports the types it declares
pub trait PackageIntrospector {
    /// Load the location at `path`, mounted as `module`
    ///
    /// # Errors
    ///
    /// [`IntrospectError::Missing`] when nothing exists at `path`,
    /// [`IntrospectError::Invalid`] when it cannot be read or parsed.
    fn load(&self, module: &str, path: &Path) -> Result<Package, IntrospectError>;
}

/// [`PackageIntrospector`] for Rust source backed by `syn`
///
/// A location is either a single `.rs` file or a directory, in which case every
/// `.rs` file directly inside it is read in name order. Top-level `struct`,
/// `enum`, `union`, `type` and `trait` items count as declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustPackages;

impl PackageIntrospector for RustPackages {
    fn load(&self, module: &str, path: &Path) -> Result<Package, IntrospectError> {
        if !path.exists() {
            return Err(IntrospectError::Missing);
        }
        let mut package = Package::empty(module);

        if path.is_file() {
            if path.extension().and_then(|e| e.to_str()) != Some("rs") {
                return Err(IntrospectError::Invalid(format!(
                    "{} is not a Rust source file",
                    path.display()
                )));
            }
            scan_file(&mut package, module, path)?;
            return Ok(package);
        }

        let entries = fs::read_dir(path)
            .map_err(|e| IntrospectError::Invalid(format!("{}: {e}", path.display())))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| IntrospectError::Invalid(format!("{}: {e}", path.display())))?;
            let file = entry.path();
            if file.is_file() && file.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(file);
            }
        }
        files.sort();

        for file in &files {
            scan_file(&mut package, &file_module(module, file), file)?;
        }
        tracing::debug!(
            module,
            path = %path.display(),
            files = files.len(),
            types = package.len(),
            "introspected package"
        );
        Ok(package)
    }
}

fn scan_file(package: &mut Package, module: &str, file: &Path) -> Result<(), IntrospectError> {
    let source = fs::read_to_string(file)
        .map_err(|e| IntrospectError::Invalid(format!("{}: {e}", file.display())))?;
    let parsed = syn::parse_file(&source)
        .map_err(|e| IntrospectError::Invalid(format!("{}: {e}", file.display())))?;

    for item in &parsed.items {
        let ident = match item {
            syn::Item::Struct(s) => &s.ident,
            syn::Item::Enum(e) => &e.ident,
            syn::Item::Union(u) => &u.ident,
            syn::Item::Type(t) => &t.ident,
            syn::Item::Trait(t) => &t.ident,
            _ => continue,
        };
        package.declare(
            ident.to_string(),
            Declaration {
                module: module.to_string(),
                file: file.to_path_buf(),
            },
        );
    }
    Ok(())
}
