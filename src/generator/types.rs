//! Rust type expressions for schema type references.

use crate::error::GenerateError;
use crate::parser::{ModelType, Tree, TypeRef};

/// Where the type expression will be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Inside the generated model file: generated types are in scope
    Models,
    /// Anywhere else: every non-primitive type is fully qualified
    Elsewhere,
}

/// Path of the named type without any wrapping
///
/// # Errors
///
/// Returns [`GenerateError::UnresolvedType`] if the type has no resolved binding.
pub fn base_type(tree: &Tree, name: &str, scope: Scope) -> Result<String, GenerateError> {
    let binding = tree
        .binding(name)
        .filter(|b| b.is_resolved())
        .ok_or_else(|| GenerateError::UnresolvedType {
            name: name.to_string(),
        })?;
    if scope == Scope::Models && binding.is_generated() {
        return Ok(binding.ident.clone());
    }
    binding
        .qualified()
        .ok_or_else(|| GenerateError::UnresolvedType {
            name: name.to_string(),
        })
}

/// Whether values of the named type are structs or abstract enums
#[must_use]
pub fn is_composite(tree: &Tree, name: &str) -> bool {
    matches!(
        tree.models.get(name),
        Some(ModelType::Model(_) | ModelType::Interface(_))
    ) && !tree.binding(name).is_some_and(|b| b.primitive)
}

/// Type of an argument, return value or resolver result
///
/// # Errors
///
/// Returns [`GenerateError::UnresolvedType`] if the type has no resolved binding.
pub fn value_type(tree: &Tree, ty: &TypeRef, scope: Scope) -> Result<String, GenerateError> {
    let base = base_type(tree, &ty.name, scope)?;
    let inner = if ty.is_array {
        format!("Vec<{base}>")
    } else {
        base
    };
    Ok(optional(inner, ty.required))
}

/// Type of a model field; single composite values are boxed so recursive
/// models have a finite size
///
/// # Errors
///
/// Returns [`GenerateError::UnresolvedType`] if the type has no resolved binding.
pub fn field_type(tree: &Tree, ty: &TypeRef, scope: Scope) -> Result<String, GenerateError> {
    let base = base_type(tree, &ty.name, scope)?;
    let inner = if ty.is_array {
        format!("Vec<{base}>")
    } else if is_composite(tree, &ty.name) {
        format!("Box<{base}>")
    } else {
        base
    };
    Ok(optional(inner, ty.required))
}

fn optional(inner: String, required: bool) -> String {
    if required {
        inner
    } else {
        format!("Option<{inner}>")
    }
}
