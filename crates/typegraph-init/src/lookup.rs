//! Reference normalization.
//!
//! Every registered type has one canonical reference, its schema reference.
//! [`TypeLookup`] maps any reference that denotes a registered type onto that
//! canonical form so dependency sets can be compared by plain equality.

use typegraph_core::{TypeRef, TypeTarget, UnresolvedReference};
use typegraph_registry::{RegisteredType, TypeRegistry, TypeSlot};

/// Read-only resolver over a registry.
#[derive(Debug, Clone, Copy)]
pub struct TypeLookup<'reg> {
    registry: &'reg TypeRegistry,
}

impl<'reg> TypeLookup<'reg> {
    pub fn new(registry: &'reg TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'reg TypeRegistry {
        self.registry
    }

    /// Slot of the type `reference` denotes.
    ///
    /// Syntax references resolve through completed names, so they only
    /// resolve once the target finished name completion.
    pub fn find(&self, reference: &TypeRef) -> Option<TypeSlot> {
        match reference.target() {
            TypeTarget::Syntax(name) => self
                .registry
                .find(reference)
                .or_else(|| self.registry.find_by_name(name)),
            TypeTarget::Runtime(_) | TypeTarget::Schema(_) => self.registry.find(reference),
        }
    }

    pub fn resolve(&self, reference: &TypeRef) -> Option<&'reg RegisteredType> {
        self.find(reference).and_then(|slot| self.registry.get(slot))
    }

    /// Canonical reference of the type `reference` denotes.
    pub fn normalize(&self, reference: &TypeRef) -> Result<TypeRef, UnresolvedReference> {
        self.resolve(reference)
            .map(|ty| ty.primary_reference().clone())
            .ok_or_else(|| UnresolvedReference(reference.clone()))
    }

    /// Canonical reference, or `reference` itself when it does not resolve.
    pub fn normalize_or_keep(&self, reference: &TypeRef) -> TypeRef {
        self.normalize(reference)
            .unwrap_or_else(|_| reference.clone())
    }

    /// Normalize a list, dropping references that normalize to an identity
    /// already present. Unresolved references are kept as they are.
    pub fn normalize_all<'a>(&self, references: impl IntoIterator<Item = &'a TypeRef>) -> Vec<TypeRef> {
        let mut out: Vec<TypeRef> = Vec::new();
        for reference in references {
            let normalized = self.normalize_or_keep(reference);
            if !out.contains(&normalized) {
                out.push(normalized);
            }
        }
        out
    }
}
