//! TypeRegistry - storage for every type discovered during initialization.
//!
//! This module provides [`TypeRegistry`], which owns all [`RegisteredType`]
//! records of one initialization run and indexes them for O(1) lookup by
//! reference, by runtime type and by completed name.
//!
//! # Storage Model
//!
//! - **Types**: stored in registration order; a type's position is its [`TypeSlot`].
//! - **References**: schema and syntax references map straight to a slot.
//! - **Runtime types**: a runtime type maps to every (context, scope, slot)
//!   entry registered for it, in registration order, so lookups honor the
//!   context wildcard deterministically.
//! - **Names**: filled by [`TypeRegistry::register_name`] as types complete
//!   their names; directives live under `@name`.
//!
//! # Updates
//!
//! Registering a type whose canonical reference is already present overwrites
//! the existing record in place and keeps its slot. Indexes only grow on
//! registration; call [`TypeRegistry::rebuild_indexes`] after bulk updates that
//! change references or names.
//!
//! # Thread Safety
//!
//! `TypeRegistry` is owned exclusively by one initialization run and is not
//! shared until the run hands off the completed graph.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use typegraph_core::{RuntimeType, TypeContext, TypeRef, TypeTarget};

use crate::RegisteredType;

/// Position of a type in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeSlot(u32);

impl TypeSlot {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct RuntimeEntry {
    context: TypeContext,
    scope: Option<Arc<str>>,
    slot: TypeSlot,
}

/// Registry of discovered types.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: Vec<RegisteredType>,

    /// Schema and syntax references -> slot.
    by_reference: FxHashMap<TypeRef, TypeSlot>,

    /// Runtime type -> entries in registration order.
    by_runtime: FxHashMap<RuntimeType, Vec<RuntimeEntry>>,

    /// Completed names -> slot.
    by_name: FxHashMap<String, TypeSlot>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a type, overwriting the record with the same canonical reference.
    pub fn register(&mut self, ty: RegisteredType) -> TypeSlot {
        let slot = match self.by_reference.get(ty.primary_reference()).copied() {
            Some(slot) => {
                self.types[slot.index()] = ty;
                slot
            }
            None => {
                let slot = TypeSlot(self.types.len() as u32);
                self.types.push(ty);
                slot
            }
        };
        self.index_type(slot);
        slot
    }

    /// Record the completed name a type currently carries.
    ///
    /// Directives are keyed as `@name` so they never collide with named types.
    /// Extensions and unnamed types are not indexed. Returns the slot already
    /// holding the name if another type claimed it first.
    pub fn register_name(&mut self, slot: TypeSlot) -> Result<(), TypeSlot> {
        let Some(key) = self.get(slot).and_then(name_key) else {
            return Ok(());
        };
        match self.by_name.get(&key) {
            Some(&existing) if existing != slot => Err(existing),
            _ => {
                self.by_name.insert(key, slot);
                Ok(())
            }
        }
    }

    /// Recompute every index from the registered records. O(n).
    ///
    /// Name entries survive only while the named slot still carries that name.
    pub fn rebuild_indexes(&mut self) {
        self.by_reference.clear();
        self.by_runtime.clear();
        for index in 0..self.types.len() {
            self.index_type(TypeSlot(index as u32));
        }

        let names = std::mem::take(&mut self.by_name);
        self.by_name = names
            .into_iter()
            .filter(|(key, slot)| {
                self.types
                    .get(slot.index())
                    .and_then(name_key)
                    .is_some_and(|k| k == *key)
            })
            .collect();
    }

    fn index_type(&mut self, slot: TypeSlot) {
        let ty = &self.types[slot.index()];
        let scope = ty.discovery().scope.clone();
        let kind_context = ty.kind().context();

        for reference in ty.references() {
            match reference.target() {
                TypeTarget::Runtime(runtime) => {
                    // a wildcard alias only stands for the position the type lives in
                    let context = match reference.context() {
                        TypeContext::None => kind_context,
                        context => context,
                    };
                    let entries = self.by_runtime.entry(runtime.clone()).or_default();
                    push_runtime_entry(entries, context, reference.scope().map(Arc::from), slot);
                }
                TypeTarget::Schema(_) | TypeTarget::Syntax(_) => {
                    self.by_reference.entry(reference.clone()).or_insert(slot);
                }
            }
        }

        // Named types are also reachable through the runtime type backing them.
        if ty.is_named_type() && !ty.runtime_type().is_object() {
            let entries = self.by_runtime.entry(ty.runtime_type().clone()).or_default();
            push_runtime_entry(entries, kind_context, scope, slot);
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn get(&self, slot: TypeSlot) -> Option<&RegisteredType> {
        self.types.get(slot.index())
    }

    /// Find the slot a reference points at.
    pub fn find(&self, reference: &TypeRef) -> Option<TypeSlot> {
        match reference.target() {
            TypeTarget::Runtime(runtime) => {
                self.find_runtime(runtime, reference.context(), reference.scope())
            }
            TypeTarget::Schema(_) | TypeTarget::Syntax(_) => self.by_reference.get(reference).copied(),
        }
    }

    /// Find a type by runtime type, honoring the context wildcard.
    /// The earliest registered match wins.
    pub fn find_runtime(
        &self,
        runtime: &RuntimeType,
        context: TypeContext,
        scope: Option<&str>,
    ) -> Option<TypeSlot> {
        self.by_runtime.get(runtime)?.iter().find_map(|entry| {
            (entry.context.is_compatible(context) && entry.scope.as_deref() == scope)
                .then_some(entry.slot)
        })
    }

    /// Find a named type by its completed name.
    pub fn find_by_name(&self, name: &str) -> Option<TypeSlot> {
        self.by_name.get(name).copied()
    }

    /// Find a directive by its completed name (without `@`).
    pub fn find_directive(&self, name: &str) -> Option<TypeSlot> {
        self.by_name.get(&format!("@{name}")).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&RegisteredType> {
        self.find_by_name(name).and_then(|slot| self.get(slot))
    }

    pub fn contains(&self, reference: &TypeRef) -> bool {
        self.find(reference).is_some()
    }

    // ==========================================================================
    // Iteration
    // ==========================================================================

    /// All registered types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &RegisteredType> {
        self.types.iter()
    }

    /// All slots in registration order.
    pub fn slots(&self) -> impl Iterator<Item = TypeSlot> + use<> {
        (0..self.types.len() as u32).map(TypeSlot)
    }

    /// Slots and types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeSlot, &RegisteredType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (TypeSlot(i as u32), ty))
    }
}

fn name_key(ty: &RegisteredType) -> Option<String> {
    let name = ty.name()?;
    if ty.is_directive() {
        Some(format!("@{name}"))
    } else if ty.is_named_type() {
        Some(name.to_string())
    } else {
        None
    }
}

fn push_runtime_entry(
    entries: &mut Vec<RuntimeEntry>,
    context: TypeContext,
    scope: Option<Arc<str>>,
    slot: TypeSlot,
) {
    let exists = entries
        .iter()
        .any(|e| e.slot == slot && e.context == context && e.scope == scope);
    if !exists {
        entries.push(RuntimeEntry { context, scope, slot });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiscoveryContext;
    use typegraph_core::{
        DirectiveType, InputObjectType, ObjectType, SchemaTypeId, TypeDependency, TypeExtension,
        TypeSystemObject,
    };

    fn object(name: &str) -> ObjectType {
        ObjectType::new(
            SchemaTypeId::new(format!("ObjectType<{name}>")),
            RuntimeType::named(name),
        )
    }

    fn input(name: &str) -> TypeSystemObject {
        InputObjectType::new(
            SchemaTypeId::new(format!("InputObjectType<{name}>")),
            RuntimeType::named(name),
        )
        .into()
    }

    fn registered(object: impl Into<TypeSystemObject>) -> RegisteredType {
        RegisteredType::new(object.into(), [], vec![], DiscoveryContext::default())
    }

    #[test]
    fn register_assigns_slots_in_order() {
        let mut registry = TypeRegistry::new();
        let a = registry.register(registered(object("A")));
        let b = registry.register(registered(object("B")));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn register_same_identity_overwrites() {
        let mut registry = TypeRegistry::new();
        let slot = registry.register(registered(object("A")));
        let updated = registry
            .get(slot)
            .unwrap()
            .clone()
            .add_dependencies([TypeDependency::completed(TypeRef::syntax("Node", TypeContext::Output))]);
        let again = registry.register(updated);

        assert_eq!(slot, again);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(slot).unwrap().dependencies().len(), 1);
    }

    #[test]
    fn runtime_lookup_respects_context() {
        let mut registry = TypeRegistry::new();
        let output = registry.register(registered(object("User")));
        let input = registry.register(registered(input("User")));
        let user = RuntimeType::named("User");

        assert_eq!(registry.find_runtime(&user, TypeContext::Output, None), Some(output));
        assert_eq!(registry.find_runtime(&user, TypeContext::Input, None), Some(input));
        // wildcard picks the earliest registration
        assert_eq!(registry.find_runtime(&user, TypeContext::None, None), Some(output));
        assert_eq!(registry.find_runtime(&user, TypeContext::Output, Some("admin")), None);
    }

    #[test]
    fn wildcard_aliases_take_the_context_of_their_type() {
        let mut registry = TypeRegistry::new();
        let user = RuntimeType::named("User");
        let alias = TypeRef::runtime(user.clone(), TypeContext::None);
        let input = registry.register(registered(input("User")).with_reference(alias.clone()));

        assert_eq!(registry.find(&alias), Some(input));
        assert_eq!(registry.find_runtime(&user, TypeContext::Input, None), Some(input));
        assert_eq!(registry.find_runtime(&user, TypeContext::Output, None), None);
    }

    #[test]
    fn extensions_are_not_indexed_by_runtime_type() {
        let mut registry = TypeRegistry::new();
        let ext = TypeExtension::new(
            ObjectType::new(SchemaTypeId::new("UserExtension"), RuntimeType::named("User")).named("User"),
        );
        registry.register(registered(ext));
        assert_eq!(
            registry.find_runtime(&RuntimeType::named("User"), TypeContext::Output, None),
            None
        );
    }

    #[test]
    fn names_are_registered_explicitly() {
        let mut registry = TypeRegistry::new();
        let a = registry.register(registered(object("A").named("Shared")));
        let b = registry.register(registered(object("B").named("Shared")));

        assert_eq!(registry.find_by_name("Shared"), None);
        assert!(registry.register_name(a).is_ok());
        assert!(registry.register_name(a).is_ok());
        assert_eq!(registry.register_name(b), Err(a));
        assert_eq!(registry.find_by_name("Shared"), Some(a));
    }

    #[test]
    fn directives_use_their_own_namespace() {
        let mut registry = TypeRegistry::new();
        let ty = registry.register(registered(object("Cached").named("cached")));
        let directive = registry.register(registered(
            DirectiveType::new(SchemaTypeId::new("CachedDirective"), RuntimeType::named("CachedDirective"))
                .named("cached"),
        ));

        assert!(registry.register_name(ty).is_ok());
        assert!(registry.register_name(directive).is_ok());
        assert_eq!(registry.find_by_name("cached"), Some(ty));
        assert_eq!(registry.find_directive("cached"), Some(directive));
    }

    #[test]
    fn rebuild_drops_stale_names() {
        let mut registry = TypeRegistry::new();
        let a = registry.register(registered(object("A").named("A")));
        registry.register_name(a).unwrap();

        let renamed = registry.get(a).unwrap().clone().with_object(object("A").named("Renamed").into());
        registry.register(renamed);
        registry.rebuild_indexes();

        assert_eq!(registry.find_by_name("A"), None);
        assert!(registry.contains(&TypeRef::schema(SchemaTypeId::new("ObjectType<A>"))));
    }
}
