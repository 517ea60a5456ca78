//! Implicit interface linking.
//!
//! An object whose runtime type is assignable to an interface's runtime type
//! gains a `Completed` dependency on that interface, so the interface always
//! completes first.

use tracing::debug;

use typegraph_core::{RuntimeType, TypeContext, TypeDependency, TypeInspector, TypeKind, TypeRef};
use typegraph_registry::{TypeRegistry, TypeSlot};

/// Add the inferred interface dependencies. Returns the number of links added.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn link_implicit_interfaces(registry: &mut TypeRegistry, inspector: &dyn TypeInspector) -> usize {
    let mut objects: Vec<(TypeSlot, RuntimeType)> = Vec::new();
    let mut interfaces: Vec<RuntimeType> = Vec::new();

    for (slot, ty) in registry.iter() {
        if ty.is_extension() || ty.runtime_type().is_object() {
            continue;
        }
        match ty.kind() {
            TypeKind::Object => objects.push((slot, ty.runtime_type().clone())),
            TypeKind::Interface => interfaces.push(ty.runtime_type().clone()),
            _ => {}
        }
    }

    let mut links = 0;
    for (slot, object_type) in objects {
        let dependencies: Vec<TypeDependency> = interfaces
            .iter()
            .filter(|interface| **interface != object_type)
            .filter(|interface| inspector.is_assignable_from(interface, &object_type))
            .map(|interface| TypeDependency::completed(TypeRef::runtime(interface.clone(), TypeContext::Output)))
            .collect();
        if dependencies.is_empty() {
            continue;
        }
        let Some(ty) = registry.get(slot) else {
            continue;
        };
        let before = ty.dependencies().len();
        let updated = ty.clone().add_dependencies(dependencies);
        links += updated.dependencies().len() - before;
        registry.register(updated);
    }

    registry.rebuild_indexes();
    debug!(links, "linked implicit interfaces");
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use typegraph_core::{
        CompletionKind, InterfaceType, ObjectType, RuntimeTypeTable, SchemaTypeId, TypeSystemObject,
    };
    use typegraph_registry::{DiscoveryContext, RegisteredType};

    fn register(registry: &mut TypeRegistry, object: impl Into<TypeSystemObject>) -> TypeSlot {
        registry.register(RegisteredType::new(object.into(), [], vec![], DiscoveryContext::default()))
    }

    #[test]
    fn assignable_objects_depend_on_interfaces() {
        let mut registry = TypeRegistry::new();
        let user = register(
            &mut registry,
            ObjectType::new(SchemaTypeId::new("ObjectType<User>"), RuntimeType::named("User")),
        );
        let order = register(
            &mut registry,
            ObjectType::new(SchemaTypeId::new("ObjectType<Order>"), RuntimeType::named("Order")),
        );
        register(
            &mut registry,
            InterfaceType::new(SchemaTypeId::new("InterfaceType<INode>"), RuntimeType::named("INode")),
        );

        let mut table = RuntimeTypeTable::new();
        table.implements(RuntimeType::named("User"), RuntimeType::named("INode"));

        assert_eq!(link_implicit_interfaces(&mut registry, &table), 1);
        let deps: Vec<_> = registry
            .get(user)
            .unwrap()
            .dependencies_of(CompletionKind::Completed)
            .cloned()
            .collect();
        assert_eq!(deps, [TypeRef::runtime(RuntimeType::named("INode"), TypeContext::Output)]);
        assert!(registry.get(order).unwrap().dependencies().is_empty());

        // linking again adds nothing
        assert_eq!(link_implicit_interfaces(&mut registry, &table), 0);
    }

    #[test]
    fn types_without_runtime_types_are_ignored() {
        let mut registry = TypeRegistry::new();
        let user = register(
            &mut registry,
            ObjectType::new(SchemaTypeId::new("User"), RuntimeType::object()).named("User"),
        );
        register(
            &mut registry,
            InterfaceType::new(SchemaTypeId::new("Node"), RuntimeType::object()).named("Node"),
        );

        // everything is assignable to `object`
        assert_eq!(link_implicit_interfaces(&mut registry, &RuntimeTypeTable::new()), 0);
        assert!(registry.get(user).unwrap().dependencies().is_empty());
    }
}
