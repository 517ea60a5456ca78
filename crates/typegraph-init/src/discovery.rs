//! Type discovery.
//!
//! Breadth-first closure over the seed references. Every reference that does
//! not already resolve is turned into a type by the [`DescriptorProvider`];
//! the references the new type mentions are queued in turn.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use typegraph_core::{SchemaError, TypeContext, TypeRef};
use typegraph_registry::TypeRegistry;

use crate::DescriptorProvider;

/// Discovers every type reachable from a set of seeds.
pub struct TypeDiscoverer<'a> {
    registry: &'a mut TypeRegistry,
    provider: &'a dyn DescriptorProvider,
}

impl<'a> TypeDiscoverer<'a> {
    pub fn new(registry: &'a mut TypeRegistry, provider: &'a dyn DescriptorProvider) -> Self {
        Self { registry, provider }
    }

    /// Register the closure of `seeds`. Returns every provider failure.
    ///
    /// Seeds are visited in order, so the registration order (and everything
    /// that iterates the registry) is deterministic.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn discover(&mut self, seeds: &[TypeRef]) -> Vec<SchemaError> {
        let mut errors = Vec::new();
        let mut queue: VecDeque<TypeRef> = seeds.iter().cloned().collect();
        // keyed on the exact context; `TypeRef` equality treats `None` as a wildcard
        let mut seen: FxHashSet<(TypeRef, TypeContext)> = FxHashSet::default();

        while let Some(reference) = queue.pop_front() {
            // syntax references resolve by name after name completion
            if reference.is_syntax() || !seen.insert((reference.clone(), reference.context())) {
                continue;
            }
            if self.resolves(&reference) {
                continue;
            }

            let descriptor = match self.provider.create(&reference) {
                Ok(descriptor) => descriptor,
                Err(error) => {
                    debug!(%reference, "type discovery failed");
                    errors.push(error);
                    continue;
                }
            };

            // Another reference already produced this type.
            if let Some(slot) = self.registry.find(&descriptor.schema_reference()) {
                if let Some(existing) = self.registry.get(slot) {
                    let updated = existing.clone().with_reference(reference);
                    self.registry.register(updated);
                }
                continue;
            }

            for dependency in &descriptor.dependencies {
                queue.push_back(dependency.reference.clone());
            }
            queue.extend(descriptor.object.references());

            let registered = descriptor.into_registered(reference);
            trace!(name = %registered.display_name(), "discovered type");
            self.registry.register(registered);
        }

        debug!(types = self.registry.len(), errors = errors.len(), "discovery finished");
        errors
    }

    /// Whether `reference` already denotes a registered type usable in its context.
    fn resolves(&self, reference: &TypeRef) -> bool {
        self.registry
            .find(reference)
            .and_then(|slot| self.registry.get(slot))
            .is_some_and(|ty| ty.kind().accepts(reference.context()))
    }
}
