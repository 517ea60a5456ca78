//! Resolver binding and compilation.
//!
//! Bindings come from two places:
//!
//! - the discovery context of every type (first registration of a field wins)
//! - external [`ResolverProvider`]s, scanned once names are complete; their
//!   bindings overwrite implicit ones for the same field
//!
//! [`compile_resolvers`] then turns every member binding into a
//! [`FieldResolver`].

use indexmap::IndexMap;
use tracing::debug;

use typegraph_core::{
    ErrorCode, FieldBinding, FieldMember, FieldReference, FieldResolver, MemberDescriptor,
    MemberKind, RegisteredResolver, RuntimeType, SchemaError, SchemaTypeId, TypeContext,
    TypeInspector, TypeKind, TypeRef, parent_property,
};
use typegraph_registry::{TypeRegistry, TypeSlot};

use crate::{ErrorAggregator, NamingConventions};

/// Field bindings keyed by field, in registration order.
pub type ResolverMap = IndexMap<FieldReference, RegisteredResolver>;

/// A type a resolver provider augments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverTarget {
    /// By completed type name.
    Name(String),
    /// By runtime type (output context).
    Runtime(RuntimeType),
    /// By schema type.
    Schema(SchemaTypeId),
}

/// A host type whose members resolve fields of other types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverProvider {
    pub runtime_type: RuntimeType,
    pub targets: Vec<ResolverTarget>,
}

impl ResolverProvider {
    pub fn new(runtime_type: RuntimeType) -> Self {
        Self {
            runtime_type,
            targets: Vec::new(),
        }
    }

    pub fn for_name(mut self, name: impl Into<String>) -> Self {
        self.targets.push(ResolverTarget::Name(name.into()));
        self
    }

    pub fn for_runtime(mut self, runtime_type: RuntimeType) -> Self {
        self.targets.push(ResolverTarget::Runtime(runtime_type));
        self
    }

    pub fn for_schema(mut self, id: SchemaTypeId) -> Self {
        self.targets.push(ResolverTarget::Schema(id));
        self
    }
}

/// Collect the resolvers of every discovery context. First registration wins.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn register_resolvers(registry: &TypeRegistry, resolvers: &mut ResolverMap) -> usize {
    let before = resolvers.len();
    for ty in registry.types() {
        for (field, resolver) in &ty.discovery().resolvers {
            resolvers
                .entry(field.clone())
                .or_insert_with(|| resolver.clone());
        }
    }
    resolvers.len() - before
}

/// Bind the relevant members of every provider to its target types.
///
/// Targets that do not resolve to an object type are skipped.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn register_external_resolvers(
    registry: &TypeRegistry,
    providers: &[ResolverProvider],
    inspector: &dyn TypeInspector,
    naming: &NamingConventions,
    resolvers: &mut ResolverMap,
) -> usize {
    let mut bound = 0;
    for provider in providers {
        let members = inspector.members(&provider.runtime_type);
        for target in &provider.targets {
            let Some(ty) = find_target(registry, target).and_then(|slot| registry.get(slot)) else {
                debug!(provider = %provider.runtime_type, ?target, "resolver target not found");
                continue;
            };
            let Some(type_name) = ty.name().filter(|_| ty.kind() == TypeKind::Object) else {
                continue;
            };
            let target_type = ty.runtime_type();

            for member in members.iter().filter(|m| is_relevant(m, target_type, inspector)) {
                let field_name = naming.member_name(&member.name);
                let field = FieldMember::new(type_name, field_name, member.clone());
                resolvers.insert(
                    field.to_field_reference(),
                    RegisteredResolver::external(
                        provider.runtime_type.clone(),
                        target_type.clone(),
                        field,
                    ),
                );
                bound += 1;
            }
        }
    }
    bound
}

fn find_target(registry: &TypeRegistry, target: &ResolverTarget) -> Option<TypeSlot> {
    match target {
        ResolverTarget::Name(name) => registry.find_by_name(name),
        ResolverTarget::Runtime(runtime) => registry.find_runtime(runtime, TypeContext::Output, None),
        ResolverTarget::Schema(id) => registry.find(&TypeRef::schema(id.clone())),
    }
}

/// Properties always apply; methods apply when they take no parent value or
/// their first parent parameter accepts the target type.
fn is_relevant(member: &MemberDescriptor, target: &RuntimeType, inspector: &dyn TypeInspector) -> bool {
    match &member.kind {
        MemberKind::Property => true,
        MemberKind::Method { .. } => member
            .parent_parameters()
            .next()
            .is_none_or(|parent| inspector.is_assignable_from(&parent.ty, target)),
    }
}

/// Compile every member binding. Returns the number compiled.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_resolvers(
    resolvers: &mut ResolverMap,
    inspector: &dyn TypeInspector,
    errors: &mut ErrorAggregator,
) -> usize {
    let mut compiled = 0;
    for (field, resolver) in resolvers.iter_mut() {
        match compile(resolver, inspector) {
            Ok(Some(compiled_resolver)) => {
                resolver.field = FieldBinding::Compiled(compiled_resolver);
                compiled += 1;
            }
            Ok(None) => {}
            Err(message) => errors.push(
                SchemaError::new(ErrorCode::ResolverCompilation, message).with_field(field.clone()),
            ),
        }
    }
    debug!(compiled, "compiled resolvers");
    compiled
}

fn compile(
    resolver: &RegisteredResolver,
    inspector: &dyn TypeInspector,
) -> Result<Option<FieldResolver>, String> {
    let FieldBinding::Member(field) = &resolver.field else {
        return Ok(None);
    };
    let member = &field.member;
    let source = &resolver.source_type;

    match &resolver.resolver_type {
        Some(provider) if !resolver.is_source_resolver() => {
            if member.declaring_type != *provider {
                return Err(format!(
                    "The member `{}` is not declared on the resolver type `{provider}`.",
                    member.name
                ));
            }
        }
        _ => {
            if !inspector.is_assignable_from(&member.declaring_type, source) {
                return Err(format!(
                    "The member `{}` of `{}` cannot be resolved on the source type `{source}`.",
                    member.name, member.declaring_type
                ));
            }
        }
    }

    let mut parents = member.parent_parameters();
    if let Some(parent) = parents.next() {
        if parents.next().is_some() {
            return Err(format!(
                "The member `{}` declares more than one parent parameter.",
                member.name
            ));
        }
        if !inspector.is_assignable_from(&parent.ty, source) {
            return Err(format!(
                "The parent parameter `{}` of `{}` does not accept `{source}`.",
                parent.name, member.name
            ));
        }
    }

    match (&member.invoker, &member.kind) {
        (Some(invoker), _) => Ok(Some(invoker.clone())),
        (None, MemberKind::Property) => Ok(Some(parent_property(member.name.clone()))),
        (None, MemberKind::Method { .. }) => {
            Err(format!("The method `{}` has no invoker.", member.name))
        }
    }
}
