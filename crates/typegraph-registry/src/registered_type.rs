//! Registered type records.
//!
//! A [`RegisteredType`] is never mutated through a shared owner. Updates
//! produce a new value (`with_*` / `add_*`) which is written back with
//! [`TypeRegistry::register`](crate::TypeRegistry::register).

use std::sync::Arc;

use indexmap::IndexMap;

use typegraph_core::{
    CompletionKind, FieldReference, RegisteredResolver, RuntimeType, SchemaError, TypeDependency,
    TypeKind, TypeRef, TypeSystemObject,
};

/// What the front end reported about a type while it was discovered.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryContext {
    /// Errors reported while building the type's descriptor.
    pub errors: Vec<SchemaError>,
    /// Resolvers collected from the type's fields, in declaration order.
    pub resolvers: IndexMap<FieldReference, RegisteredResolver>,
    /// Additional names the type can be found by.
    pub alternate_names: Vec<String>,
    /// Scope tag the type was discovered in.
    pub scope: Option<Arc<str>>,
}

/// A type known to the registry.
#[derive(Debug, Clone)]
pub struct RegisteredType {
    object: TypeSystemObject,
    references: Vec<TypeRef>,
    dependencies: Vec<TypeDependency>,
    discovery: DiscoveryContext,
}

impl RegisteredType {
    /// Create a record. The canonical schema reference of `object` becomes the
    /// first reference; `references` are added after it without duplicates.
    pub fn new(
        object: TypeSystemObject,
        references: impl IntoIterator<Item = TypeRef>,
        dependencies: Vec<TypeDependency>,
        discovery: DiscoveryContext,
    ) -> Self {
        let primary = TypeRef::schema(object.id().clone()).with_scope(discovery.scope.clone());
        let mut all = vec![primary];
        for reference in references {
            if !all.contains(&reference) {
                all.push(reference);
            }
        }

        let mut deduped: Vec<TypeDependency> = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            if !deduped.contains(&dependency) {
                deduped.push(dependency);
            }
        }

        Self {
            object,
            references: all,
            dependencies: deduped,
            discovery,
        }
    }

    pub fn object(&self) -> &TypeSystemObject {
        &self.object
    }

    /// The canonical reference. Always the object's schema reference.
    pub fn primary_reference(&self) -> &TypeRef {
        &self.references[0]
    }

    pub fn references(&self) -> &[TypeRef] {
        &self.references
    }

    pub fn dependencies(&self) -> &[TypeDependency] {
        &self.dependencies
    }

    /// Dependency references of one kind, in declaration order.
    pub fn dependencies_of(&self, kind: CompletionKind) -> impl Iterator<Item = &TypeRef> {
        self.dependencies
            .iter()
            .filter(move |d| d.kind == kind)
            .map(|d| &d.reference)
    }

    pub fn discovery(&self) -> &DiscoveryContext {
        &self.discovery
    }

    pub fn is_extension(&self) -> bool {
        self.object.is_extension()
    }

    pub fn is_named_type(&self) -> bool {
        self.object.is_named_type()
    }

    pub fn is_directive(&self) -> bool {
        self.object.is_directive()
    }

    pub fn kind(&self) -> TypeKind {
        self.object.kind()
    }

    pub fn name(&self) -> Option<&str> {
        self.object.name()
    }

    pub fn runtime_type(&self) -> &RuntimeType {
        self.object.runtime_type()
    }

    /// Name if completed, otherwise the canonical reference.
    pub fn display_name(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => self.primary_reference().to_string(),
        }
    }

    /// Replace the type object. The schema identity must not change.
    pub fn with_object(mut self, object: TypeSystemObject) -> Self {
        debug_assert_eq!(object.id(), self.object.id());
        self.object = object;
        self
    }

    /// Add an alias reference.
    pub fn with_reference(mut self, reference: TypeRef) -> Self {
        if !self.references.contains(&reference) {
            self.references.push(reference);
        }
        self
    }

    /// Replace the dependency list.
    pub fn with_dependencies(mut self, dependencies: Vec<TypeDependency>) -> Self {
        self.dependencies.clear();
        self.add_dependencies(dependencies)
    }

    /// Append dependencies, skipping ones already present.
    pub fn add_dependencies(mut self, dependencies: impl IntoIterator<Item = TypeDependency>) -> Self {
        for dependency in dependencies {
            if !self.dependencies.contains(&dependency) {
                self.dependencies.push(dependency);
            }
        }
        self
    }
}
