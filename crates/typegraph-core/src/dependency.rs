use std::fmt;

use crate::{CompletionKind, TypeRef};

/// "This type cannot enter a batch for `kind` until `reference` has completed `kind`."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDependency {
    pub reference: TypeRef,
    pub kind: CompletionKind,
}

impl TypeDependency {
    pub fn new(reference: TypeRef, kind: CompletionKind) -> Self {
        Self { reference, kind }
    }

    /// Dependency that must be named first.
    pub fn named(reference: TypeRef) -> Self {
        Self::new(reference, CompletionKind::Named)
    }

    /// Dependency that must be fully completed first.
    pub fn completed(reference: TypeRef) -> Self {
        Self::new(reference, CompletionKind::Completed)
    }
}

impl fmt::Display for TypeDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reference, self.kind)
    }
}
