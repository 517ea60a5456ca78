//! Name and structural completion of single types.
//!
//! Both functions work on a clone of the registered object. The caller
//! writes the completed object back to the registry once the context is
//! dropped.

use std::sync::Arc;

use typegraph_core::{
    ArgumentDefinition, DirectiveType, ErrorCode, FieldDefinition, FieldReference, FieldResolver,
    InterfaceType, ObjectType, SchemaError, TypeKind, TypeRef, TypeSystemObject, UnionType, Value,
    parent_property,
};

use crate::{CompletionContext, NamingConventions};

/// Which positions a reference may appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Output,
    Input,
}

impl Position {
    fn accepts(self, kind: TypeKind) -> bool {
        match self {
            Position::Output => kind.is_output(),
            Position::Input => kind.is_input(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Position::Output => "an output type",
            Position::Input => "an input type",
        }
    }
}

// ==========================================================================
// Name completion
// ==========================================================================

/// Fix the name of `object`.
///
/// An explicit name wins. Otherwise the name is derived from the runtime
/// type; types without a runtime type must carry an explicit name.
pub fn complete_name(ctx: &mut CompletionContext<'_>, object: &mut TypeSystemObject) -> bool {
    let name = match object.name() {
        Some(name) => name.to_string(),
        None if object.runtime_type().is_object() => {
            ctx.report(SchemaError::new(
                ErrorCode::InvalidName,
                format!("Unable to infer a name for the type `{}`.", object.id()),
            ));
            return false;
        }
        None => ctx.naming().type_name(object.runtime_type(), object.kind()),
    };

    if !NamingConventions::is_valid_name(&name) {
        ctx.report(
            SchemaError::new(
                ErrorCode::InvalidName,
                format!("The name `{name}` of the type `{}` is not a valid name.", object.id()),
            )
            .with_type(name),
        );
        return false;
    }

    object.header_mut().name = Some(name);
    true
}

// ==========================================================================
// Structural completion
// ==========================================================================

/// Resolve the structure of `object`. Extensions are left alone.
///
/// Returns false when any error was reported while completing the type.
pub fn complete_type(ctx: &mut CompletionContext<'_>, object: &mut TypeSystemObject) -> bool {
    let before = ctx.reported();
    match object {
        TypeSystemObject::Extension(_) => return true,
        TypeSystemObject::Object(o) => complete_object(ctx, o),
        TypeSystemObject::Interface(i) => complete_interface(ctx, i),
        TypeSystemObject::Union(u) => complete_union(ctx, u),
        TypeSystemObject::InputObject(i) => {
            let owner = owner_name(&i.header.name);
            complete_fields(ctx, &owner, &mut i.fields, Position::Input);
        }
        TypeSystemObject::Enum(e) => {
            if e.values.is_empty() {
                let owner = owner_name(&e.header.name);
                ctx.report(
                    SchemaError::new(
                        ErrorCode::InvalidStructure,
                        format!("The enum type `{owner}` has no values."),
                    )
                    .with_type(owner),
                );
            }
        }
        TypeSystemObject::Scalar(_) => {}
        TypeSystemObject::Directive(d) => complete_directive(ctx, d),
    }
    ctx.reported() == before
}

fn owner_name(name: &Option<String>) -> String {
    name.clone().unwrap_or_default()
}

fn complete_object(ctx: &mut CompletionContext<'_>, object: &mut ObjectType) {
    let owner = owner_name(&object.header.name);
    complete_fields(ctx, &owner, &mut object.fields, Position::Output);
    object.implements = interface_names(ctx, &owner, &object.interfaces);

    for field in &mut object.fields {
        let resolver = field_resolver(ctx, &owner, field);
        field.pipeline = Some(ctx.build_pipeline(resolver));
    }

    if object.is_of_type.is_none() {
        let fallback = ctx.is_of_type.clone();
        let name = owner.clone();
        object.is_of_type = Some(Arc::new(move |value: &Value| fallback(&name, value)));
    }
    object.is_query_type = ctx.state().is_query_type;
}

fn complete_interface(ctx: &mut CompletionContext<'_>, interface: &mut InterfaceType) {
    let owner = owner_name(&interface.header.name);
    complete_fields(ctx, &owner, &mut interface.fields, Position::Output);
    interface.implements = interface_names(ctx, &owner, &interface.interfaces);
}

fn complete_union(ctx: &mut CompletionContext<'_>, ty: &mut UnionType) {
    let owner = owner_name(&ty.header.name);
    if ty.members.is_empty() {
        ctx.report(
            SchemaError::new(
                ErrorCode::InvalidStructure,
                format!("The union type `{owner}` has no member types."),
            )
            .with_type(owner),
        );
        return;
    }

    let mut names: Vec<String> = Vec::with_capacity(ty.members.len());
    for member in &ty.members {
        let Some(target) = ctx.resolve_type(member) else {
            ctx.report(unresolved(member, &owner));
            continue;
        };
        let name = target.display_name();
        if target.kind() != TypeKind::Object {
            ctx.report(
                SchemaError::new(
                    ErrorCode::InvalidTypeReference,
                    format!("The type `{name}` is not an object type and cannot be a member of the union `{owner}`."),
                )
                .with_type(owner.clone())
                .with_reference(member.clone()),
            );
            continue;
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }
    ty.resolved_members = names;
}

fn complete_directive(ctx: &mut CompletionContext<'_>, directive: &mut DirectiveType) {
    let owner = format!("@{}", owner_name(&directive.header.name));
    complete_arguments(ctx, &owner, None, &mut directive.arguments);
    if directive.locations.is_empty() {
        ctx.report(
            SchemaError::new(
                ErrorCode::InvalidStructure,
                format!("The directive `{owner}` declares no locations."),
            )
            .with_type(owner),
        );
    }
}

fn complete_fields(
    ctx: &mut CompletionContext<'_>,
    owner: &str,
    fields: &mut [FieldDefinition],
    position: Position,
) {
    for field in fields {
        let reference = FieldReference::new(owner, field.name.as_str());
        field.resolved_type = resolve_named(ctx, &field.ty.reference, position, || {
            SchemaError::new(ErrorCode::InvalidTypeReference, String::new()).with_field(reference.clone())
        })
        .map(|name| field.ty.render(&name));
        complete_arguments(ctx, owner, Some(&reference), &mut field.arguments);
    }
}

fn complete_arguments(
    ctx: &mut CompletionContext<'_>,
    owner: &str,
    field: Option<&FieldReference>,
    arguments: &mut [ArgumentDefinition],
) {
    for argument in arguments {
        argument.resolved_type = resolve_named(ctx, &argument.ty.reference, Position::Input, || {
            let error = SchemaError::new(ErrorCode::InvalidTypeReference, String::new())
                .with_type(owner)
                .with_extension("argument", argument.name.clone());
            match field {
                Some(field) => error.with_field(field.clone()),
                None => error,
            }
        })
        .map(|name| argument.ty.render(&name));
    }
}

/// Resolve `reference` to a completed type name usable in `position`.
///
/// `located` builds an error carrying the owner details; its code and message
/// are filled in here.
fn resolve_named(
    ctx: &mut CompletionContext<'_>,
    reference: &TypeRef,
    position: Position,
    located: impl Fn() -> SchemaError,
) -> Option<String> {
    let Some(target) = ctx.resolve_type(reference) else {
        let mut error = located();
        error.code = ErrorCode::UnresolvedFieldType;
        error.message = format!("Unable to resolve the type reference `{reference}`.");
        ctx.report(error.with_reference(reference.clone()));
        return None;
    };

    let name = target.display_name();
    if target.is_extension() || !position.accepts(target.kind()) {
        let mut error = located();
        error.message = format!(
            "The {} type `{name}` cannot be used as {}.",
            target.kind(),
            position.describe()
        );
        ctx.report(error.with_reference(reference.clone()));
        return None;
    }
    Some(name)
}

fn interface_names(ctx: &mut CompletionContext<'_>, owner: &str, interfaces: &[TypeRef]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(interfaces.len());
    for reference in interfaces {
        let Some(target) = ctx.resolve_type(reference) else {
            ctx.report(unresolved(reference, owner));
            continue;
        };
        let name = target.display_name();
        if target.kind() != TypeKind::Interface || target.is_extension() {
            ctx.report(
                SchemaError::new(
                    ErrorCode::InvalidTypeReference,
                    format!("The type `{name}` is not an interface and cannot be implemented by `{owner}`."),
                )
                .with_type(owner)
                .with_reference(reference.clone()),
            );
            continue;
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn unresolved(reference: &TypeRef, owner: &str) -> SchemaError {
    SchemaError::new(
        ErrorCode::UnresolvedReference,
        format!("Unable to resolve the type reference `{reference}` used by `{owner}`."),
    )
    .with_type(owner)
    .with_reference(reference.clone())
}

/// The compiled resolver bound to the field, or a read of the parent value.
fn field_resolver(ctx: &CompletionContext<'_>, owner: &str, field: &FieldDefinition) -> FieldResolver {
    if let Some(resolver) = ctx.resolver(&FieldReference::new(owner, field.name.as_str())) {
        return resolver.clone();
    }
    match &field.member {
        Some(member) if member.is_property() => parent_property(member.name.clone()),
        _ => parent_property(field.name.clone()),
    }
}
