use crate::error::SpecError;
use crate::spec::document::{SchemaDocument, SchemaNode};
use crate::spec::swagger::{RawDocument, RawParameter, ReferenceOr};
use indexmap::IndexMap;

/// Resolves document-level `$ref`s to the reusable items they name.
///
/// Two kinds of references exist in a Swagger 2.0 document:
/// - `$ref: "#/parameters/PageLimit"` on an operation parameter, resolved
///   here once while the document is built;
/// - `$ref: "#/definitions/User"` inside a schema, kept as
///   [`SchemaNode::Ref`] and resolved on demand by
///   [`SchemaDocument::dereference`].
pub trait ResolveReference<T> {
    fn resolve<'a>(&'a self, document: &'a RawDocument) -> Result<&'a T, SpecError>;
}

fn resolve_logic<'a, T>(
    ref_or: &'a ReferenceOr<T>,
    items: &'a IndexMap<String, T>,
    prefix: &str,
) -> Result<&'a T, SpecError> {
    match ref_or {
        ReferenceOr::Item(item) => Ok(item),
        ReferenceOr::Reference { reference } => {
            let name = reference.strip_prefix(prefix).ok_or_else(|| {
                SpecError::UnresolvedReference(format!(
                    "{} (expected prefix {})",
                    reference, prefix
                ))
            })?;

            items
                .get(name)
                .ok_or_else(|| SpecError::UnresolvedReference(reference.clone()))
        }
    }
}

impl ResolveReference<RawParameter> for ReferenceOr<RawParameter> {
    fn resolve<'a>(&'a self, document: &'a RawDocument) -> Result<&'a RawParameter, SpecError> {
        resolve_logic(self, &document.parameters, "#/parameters/")
    }
}

impl SchemaDocument {
    /// Looks up a schema definition by reference, accepting both
    /// `#/definitions/Name` and `definitions/Name`.
    pub fn definition(&self, reference: &str) -> Result<&SchemaNode, SpecError> {
        let name = reference
            .strip_prefix("#/definitions/")
            .or_else(|| reference.strip_prefix("definitions/"))
            .ok_or_else(|| SpecError::UnresolvedReference(reference.to_string()))?;

        self.definitions
            .get(name)
            .ok_or_else(|| SpecError::UnresolvedReference(reference.to_string()))
    }

    /// Follows a chain of `Ref` aliases until a concrete node is reached.
    ///
    /// A chain that revisits a definition fails with
    /// [`SpecError::CyclicReference`].
    pub fn dereference<'a>(&'a self, node: &'a SchemaNode) -> Result<&'a SchemaNode, SpecError> {
        let mut current = node;
        let mut visited: Vec<&str> = Vec::new();

        while let SchemaNode::Ref(target) = current {
            if visited.contains(&target.as_str()) {
                return Err(SpecError::CyclicReference(target.clone()));
            }
            visited.push(target);
            current = self.definition(target)?;
        }

        Ok(current)
    }
}
