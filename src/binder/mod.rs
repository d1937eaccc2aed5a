//! # Binder Module
//!
//! Decides, for every [`TypeBinding`](crate::parser::TypeBinding) the parser
//! left unresolved, which concrete Rust type satisfies it.
//!
//! ## Order
//!
//! For each schema type name:
//!
//! 1. The configured autobind sources, in configuration order. The first
//!    source declaring a type of that exact name wins; later sources are not
//!    consulted.
//! 2. The default model location. A declaration there in any file other than
//!    the generated model file is hand-written, so it wins and the type is not
//!    emitted again.
//! 3. Otherwise the type is bound to the generated model file.
//!
//! Bindings are never revisited: running [`Autobinder::bind`] on an already
//! bound tree changes nothing.
//!
//! After the pass every reference in the tree must resolve, otherwise
//! [`BindError::Unbound`] is returned.

use std::path::PathBuf;

use crate::config::{BindSource, Config};
use crate::error::BindError;
use crate::parser::Tree;

pub mod introspection;

pub use introspection::{Declaration, IntrospectError, Package, PackageIntrospector, RustPackages};

/// The location the generator writes model types to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultLocation {
    /// Module of the model directory (`crate::lambda::model`)
    pub module: String,
    /// Model directory
    pub dir: PathBuf,
    /// File name of the generated model file (`models_gen.rs`)
    pub generated_file: String,
    /// Module of the generated model file (`crate::lambda::model::models_gen`)
    pub generated_module: String,
}

impl DefaultLocation {
    /// The default location described by a config
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        DefaultLocation {
            module: config.model.module.clone(),
            dir: config.model_dir(),
            generated_file: config.model_file_name(),
            generated_module: config.model_file_module(),
        }
    }
}

/// Resolves type bindings against autobind sources and the default location
#[derive(Debug, Clone)]
pub struct Autobinder<I = RustPackages> {
    introspector: I,
    default: DefaultLocation,
}

impl Autobinder<RustPackages> {
    /// Binder using `syn` to inspect Rust sources
    #[must_use]
    pub fn new(default: DefaultLocation) -> Self {
        Autobinder::with_introspector(RustPackages, default)
    }
}

impl<I: PackageIntrospector> Autobinder<I> {
    /// Binder using a custom introspector
    pub fn with_introspector(introspector: I, default: DefaultLocation) -> Self {
        Autobinder {
            introspector,
            default,
        }
    }

    /// Bind every unresolved type in `tree`
    ///
    /// # Errors
    ///
    /// Fails when an autobind source cannot be loaded, when the default
    /// location exists but cannot be read, or when a reference is left unbound.
    pub fn bind(&self, tree: &mut Tree, sources: &[BindSource]) -> Result<(), BindError> {
        let external = self.load_sources(sources)?;
        let promoted = self.load_default()?;

        for binding in tree.bindings.values_mut() {
            if binding.is_resolved() {
                continue;
            }
            let name = binding.name.clone();

            if let Some(declaration) = external.iter().find_map(|p| p.declares(&name)) {
                binding.bind(declaration.module.clone(), true);
                tracing::info!(
                    name = %name,
                    module = %declaration.module,
                    file = %declaration.file.display(),
                    "autobind"
                );
                continue;
            }

            if let Some(declaration) = promoted
                .declarations_of(&name)
                .find(|d| d.file_name() != self.default.generated_file)
            {
                binding.bind(declaration.module.clone(), true);
                tracing::info!(
                    name = %name,
                    module = %declaration.module,
                    file = %declaration.file.display(),
                    "autobind hand-written type"
                );
                continue;
            }

            binding.bind(self.default.generated_module.clone(), false);
            tracing::debug!(name = %name, module = %self.default.generated_module, "generate");
        }

        check_bound(tree)
    }

    fn load_sources(&self, sources: &[BindSource]) -> Result<Vec<Package>, BindError> {
        let mut packages = Vec::with_capacity(sources.len());
        for source in sources {
            if source.module == self.default.module
                || source.module == self.default.generated_module
            {
                tracing::warn!(
                    module = %source.module,
                    "autobind source is the generated model location, skipping"
                );
                continue;
            }
            let package = self
                .introspector
                .load(&source.module, &source.path)
                .map_err(|e| BindError::SourceUnavailable {
                    module: source.module.clone(),
                    path: source.path.clone(),
                    reason: e.to_string(),
                })?;
            tracing::debug!(module = %source.module, types = package.len(), "loaded autobind source");
            packages.push(package);
        }
        Ok(packages)
    }

    fn load_default(&self) -> Result<Package, BindError> {
        match self.introspector.load(&self.default.module, &self.default.dir) {
            Ok(package) => Ok(package),
            Err(IntrospectError::Missing) => {
                tracing::debug!(path = %self.default.dir.display(), "no model location yet");
                Ok(Package::empty(self.default.module.clone()))
            }
            Err(IntrospectError::Invalid(reason)) => Err(BindError::DefaultUnavailable {
                path: self.default.dir.clone(),
                reason,
            }),
        }
    }
}

/// Every binding and every reference must be resolved
fn check_bound(tree: &Tree) -> Result<(), BindError> {
    for (ty, used_by) in tree.references() {
        match tree.binding(&ty.name) {
            Some(binding) if binding.is_resolved() => {}
            _ => {
                return Err(BindError::Unbound {
                    name: ty.name.clone(),
                    used_by,
                })
            }
        }
    }
    if let Some(binding) = tree.bindings.values().find(|b| !b.is_resolved()) {
        return Err(BindError::Unbound {
            name: binding.name.clone(),
            used_by: "schema".to_string(),
        });
    }
    Ok(())
}
