//! The completed type graph and the handle it is published through.

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use typegraph_core::{
    FieldDefinition, FieldError, FieldReference, FieldResolver, InitError, ObjectType,
    ResolverContext, Value,
};
use typegraph_registry::{RegisteredType, TypeRegistry, TypeSlot};

/// A fully initialized schema type graph.
///
/// Every named type carries a unique name, every dependency is satisfied and
/// every object field carries its compiled pipeline.
pub struct TypeGraph {
    registry: TypeRegistry,
    resolvers: IndexMap<FieldReference, FieldResolver>,
    alternate_names: FxHashMap<String, TypeSlot>,
}

impl TypeGraph {
    pub(crate) fn new(
        registry: TypeRegistry,
        resolvers: IndexMap<FieldReference, FieldResolver>,
        alternate_names: FxHashMap<String, TypeSlot>,
    ) -> Self {
        Self {
            registry,
            resolvers,
            alternate_names,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Look a named type up by its name or one of its alternate names.
    pub fn get_type(&self, name: &str) -> Option<&RegisteredType> {
        self.registry
            .find_by_name(name)
            .or_else(|| self.alternate_names.get(name).copied())
            .and_then(|slot| self.registry.get(slot))
    }

    pub fn get_directive(&self, name: &str) -> Option<&RegisteredType> {
        self.registry
            .find_directive(name)
            .and_then(|slot| self.registry.get(slot))
    }

    /// Named types (no extensions, no directives) in registration order.
    pub fn named_types(&self) -> impl Iterator<Item = &RegisteredType> {
        self.registry.types().filter(|t| t.is_named_type())
    }

    pub fn query_type(&self) -> Option<&ObjectType> {
        self.named_types()
            .filter_map(|t| t.object().as_object())
            .find(|o| o.is_query_type)
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.get_type(type_name)?.object().field(field_name)
    }

    /// Compiled resolver bound to a field.
    pub fn resolver(&self, field: &FieldReference) -> Option<&FieldResolver> {
        self.resolvers.get(field)
    }

    pub fn resolvers(&self) -> impl Iterator<Item = (&FieldReference, &FieldResolver)> {
        self.resolvers.iter()
    }

    /// Run the field's middleware-wrapped pipeline against `parent`.
    pub fn resolve_field(
        &self,
        type_name: &str,
        field_name: &str,
        parent: &Value,
        arguments: &FxHashMap<String, Value>,
    ) -> Result<Value, FieldError> {
        let field = self
            .field(type_name, field_name)
            .ok_or_else(|| FieldError::new(format!("unknown field `{type_name}.{field_name}`")))?;
        let pipeline = field
            .pipeline
            .as_ref()
            .ok_or_else(|| FieldError::new(format!("field `{type_name}.{field_name}` has no pipeline")))?;
        pipeline(&ResolverContext::new(parent, arguments))
    }

    /// Names of every named type that implements `interface`.
    pub fn implementations(&self, interface: &str) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.named_types()
            .filter_map(|t| t.object().as_object())
            .filter(|o| o.implements.iter().any(|i| i == interface))
            .filter_map(|o| o.header.name.as_deref())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

impl fmt::Debug for TypeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeGraph")
            .field("registry", &self.registry)
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .field("alternate_names", &self.alternate_names)
            .finish()
    }
}

/// Deferred access to the schema being built.
///
/// Empty while initialization runs and bound exactly once when it succeeds.
/// Clones share the same cell, so completion contexts can hold a handle before
/// the graph exists.
#[derive(Debug, Clone, Default)]
pub struct SchemaHandle {
    cell: Arc<OnceLock<Arc<TypeGraph>>>,
}

impl SchemaHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<TypeGraph>> {
        self.cell.get().cloned()
    }

    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }

    pub(crate) fn bind(&self, graph: Arc<TypeGraph>) -> Result<(), InitError> {
        self.cell.set(graph).map_err(|_| InitError::SchemaAlreadyBound)
    }
}
