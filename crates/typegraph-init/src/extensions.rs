//! Extension merging.
//!
//! Extensions are grouped by the name they extend, in first-seen order, and
//! folded into the named base type. The merge is idempotent: fields with the
//! same name are replaced, interfaces, union members and enum values are
//! de-duplicated and dependencies are unioned by normalized identity.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use typegraph_core::{
    ErrorCode, FieldDefinition, SchemaError, TypeDependency, TypeHeader, TypeRef, TypeSystemObject,
};
use typegraph_registry::{RegisteredType, TypeRegistry, TypeSlot};

use crate::{ErrorAggregator, ResolverMap, TypeLookup, TypeState, UnmatchedExtensionPolicy};

/// Counts of one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub merged: usize,
    pub dropped: usize,
}

/// Merge every extension into its base type and rebuild the indexes.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn merge_extensions(
    registry: &mut TypeRegistry,
    resolvers: &mut ResolverMap,
    states: &mut FxHashMap<TypeSlot, TypeState>,
    policy: UnmatchedExtensionPolicy,
    errors: &mut ErrorAggregator,
) -> MergeOutcome {
    let mut groups: IndexMap<String, Vec<TypeSlot>> = IndexMap::new();
    for (slot, ty) in registry.iter() {
        if let (true, Some(name)) = (ty.is_extension(), ty.name()) {
            groups.entry(name.to_string()).or_default().push(slot);
        }
    }

    let mut outcome = MergeOutcome::default();
    for (name, extensions) in groups {
        let Some(base_slot) = registry.find_by_name(&name) else {
            match policy {
                UnmatchedExtensionPolicy::Drop => {
                    warn!(%name, extensions = extensions.len(), "dropping extensions without a base type");
                    outcome.dropped += extensions.len();
                }
                UnmatchedExtensionPolicy::Error => {
                    for slot in extensions {
                        let id = registry
                            .get(slot)
                            .map(|t| t.object().id().to_string())
                            .unwrap_or_default();
                        errors.push(
                            SchemaError::new(
                                ErrorCode::ExtensionTargetMissing,
                                format!("Unable to find the type `{name}` extended by `{id}`."),
                            )
                            .with_type(name.clone()),
                        );
                    }
                }
            }
            continue;
        };

        for ext_slot in extensions {
            let (Some(base), Some(extension)) = (registry.get(base_slot), registry.get(ext_slot)) else {
                continue;
            };
            if extension.kind() != base.kind() {
                errors.push(
                    SchemaError::new(
                        ErrorCode::ExtensionKindMismatch,
                        format!("The kind of the extension does not match the kind of the type `{name}`."),
                    )
                    .with_type(name.clone())
                    .with_extension("extension", extension.object().id().to_string()),
                );
                break;
            }

            let updated = merge_into(registry, base, extension, resolvers);
            registry.register(updated);

            let alternate_names = states
                .get(&ext_slot)
                .map(|s| s.alternate_names.clone())
                .unwrap_or_else(|| extension_alternate_names(registry, ext_slot));
            states
                .entry(base_slot)
                .or_default()
                .add_alternate_names(&alternate_names);

            outcome.merged += 1;
        }
    }

    registry.rebuild_indexes();
    debug!(merged = outcome.merged, dropped = outcome.dropped, "merged extensions");
    outcome
}

fn extension_alternate_names(registry: &TypeRegistry, slot: TypeSlot) -> Vec<String> {
    registry
        .get(slot)
        .map(|t| t.discovery().alternate_names.clone())
        .unwrap_or_default()
}

fn merge_into(
    registry: &TypeRegistry,
    base: &RegisteredType,
    extension: &RegisteredType,
    resolvers: &mut ResolverMap,
) -> RegisteredType {
    let merged = match extension.object().as_extension() {
        Some(ext) => merge_object(base.object(), &ext.body),
        None => base.object().clone(),
    };

    // dependency union by normalized identity
    let lookup = TypeLookup::new(registry);
    let existing: Vec<TypeDependency> = base
        .dependencies()
        .iter()
        .map(|d| TypeDependency::new(lookup.normalize_or_keep(&d.reference), d.kind))
        .collect();
    let added: Vec<TypeDependency> = extension
        .dependencies()
        .iter()
        .filter(|d| {
            let normalized = TypeDependency::new(lookup.normalize_or_keep(&d.reference), d.kind);
            !existing.contains(&normalized)
        })
        .cloned()
        .collect();

    // Extension resolvers now resolve on the base runtime type. Members still
    // live on the extension's runtime type, which becomes the resolver type.
    let base_type = base.runtime_type();
    for (field, resolver) in &extension.discovery().resolvers {
        let mut retargeted = resolver.clone();
        if retargeted.resolver_type.is_none() && retargeted.source_type != *base_type {
            retargeted.resolver_type = Some(retargeted.source_type.clone());
        }
        resolvers.insert(field.clone(), retargeted.with_source_type(base_type.clone()));
    }

    base.clone().with_object(merged).add_dependencies(added)
}

/// Fold an extension body into a base object of the same kind.
pub fn merge_object(base: &TypeSystemObject, body: &TypeSystemObject) -> TypeSystemObject {
    let mut merged = base.clone();
    match (&mut merged, body) {
        (TypeSystemObject::Object(b), TypeSystemObject::Object(e)) => {
            merge_fields(&mut b.fields, &e.fields);
            merge_references(&mut b.interfaces, &e.interfaces);
            if b.is_of_type.is_none() {
                b.is_of_type = e.is_of_type.clone();
            }
        }
        (TypeSystemObject::Interface(b), TypeSystemObject::Interface(e)) => {
            merge_fields(&mut b.fields, &e.fields);
            merge_references(&mut b.interfaces, &e.interfaces);
        }
        (TypeSystemObject::Union(b), TypeSystemObject::Union(e)) => {
            merge_references(&mut b.members, &e.members);
        }
        (TypeSystemObject::InputObject(b), TypeSystemObject::InputObject(e)) => {
            merge_fields(&mut b.fields, &e.fields);
        }
        (TypeSystemObject::Enum(b), TypeSystemObject::Enum(e)) => {
            for value in &e.values {
                if !b.values.contains(value) {
                    b.values.push(value.clone());
                }
            }
        }
        _ => {}
    }
    merge_description(merged.header_mut(), body.header());
    merged
}

fn merge_fields(base: &mut Vec<FieldDefinition>, extension: &[FieldDefinition]) {
    for field in extension {
        match base.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field.clone(),
            None => base.push(field.clone()),
        }
    }
}

fn merge_references(base: &mut Vec<TypeRef>, extension: &[TypeRef]) {
    for reference in extension {
        if !base.contains(reference) {
            base.push(reference.clone());
        }
    }
}

fn merge_description(base: &mut TypeHeader, extension: &TypeHeader) {
    if base.description.is_none() {
        base.description = extension.description.clone();
    }
}
