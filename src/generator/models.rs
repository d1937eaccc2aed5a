//! View data for the generated model file.

use crate::error::GenerateError;
use crate::parser::{Interface, ModelType, Tree};

use super::naming::{doc_lines, field_ident, sanitize_rust_identifier};
use super::templates::{
    EnumView, FieldView, MemberView, ModelsTemplateData, NewtypeView, StructView, UnionView,
    VariantView,
};
use super::types::{base_type, field_type, Scope};

/// Collect every type the generator owns into template data
///
/// Externally bound and hand-written types are skipped; they are referenced
/// by path instead.
///
/// # Errors
///
/// Returns [`GenerateError::UnresolvedType`] if a field type has no binding.
pub fn models_data(tree: &Tree) -> Result<ModelsTemplateData, GenerateError> {
    let mut data = ModelsTemplateData {
        enums: Vec::new(),
        newtypes: Vec::new(),
        unions: Vec::new(),
        structs: Vec::new(),
    };

    for entry in tree.models.types.values() {
        let generated = tree
            .binding(entry.name())
            .is_some_and(|b| b.is_generated());
        if !generated {
            continue;
        }
        match entry {
            ModelType::Enum(e) => data.enums.push(EnumView {
                name: e.name.clone(),
                docs: doc_lines(e.description.as_deref()),
                variants: e
                    .values
                    .iter()
                    .map(|v| {
                        let ident = sanitize_rust_identifier(&v.name);
                        VariantView {
                            renamed: ident != v.name,
                            ident,
                            value: v.name.clone(),
                            docs: doc_lines(v.description.as_deref()),
                        }
                    })
                    .collect(),
            }),
            ModelType::Scalar(s) => data.newtypes.push(NewtypeView {
                name: s.name.clone(),
                docs: doc_lines(s.description.as_deref()),
            }),
            ModelType::Interface(i) => {
                let variants = members(tree, i)?;
                if variants.is_empty() {
                    data.newtypes.push(NewtypeView {
                        name: i.name.clone(),
                        docs: doc_lines(i.description.as_deref()),
                    });
                } else {
                    data.unions.push(UnionView {
                        name: i.name.clone(),
                        docs: doc_lines(i.description.as_deref()),
                        variants,
                    });
                }
            }
            ModelType::Model(m) => {
                let fields = m
                    .fields
                    .iter()
                    .map(|f| {
                        Ok(FieldView {
                            ident: field_ident(&f.name),
                            ty: field_type(tree, &f.ty, Scope::Models)?,
                            rename: f.tag.json.clone(),
                            alias: f.tag.predicate.clone(),
                            docs: doc_lines(f.description.as_deref()),
                        })
                    })
                    .collect::<Result<Vec<_>, GenerateError>>()?;
                data.structs.push(StructView {
                    name: m.name.clone(),
                    docs: doc_lines(m.description.as_deref()),
                    fields,
                });
            }
        }
    }

    data.newtypes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(data)
}

/// Models implementing an interface or belonging to a union, by name
fn members(tree: &Tree, interface: &Interface) -> Result<Vec<MemberView>, GenerateError> {
    tree.models
        .models()
        .filter(|m| m.implements.iter().any(|i| *i == interface.name))
        .map(|m| {
            Ok(MemberView {
                ident: sanitize_rust_identifier(&m.name),
                ty: base_type(tree, &m.name, Scope::Models)?,
            })
        })
        .collect()
}
