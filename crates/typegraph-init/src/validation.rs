//! Schema validation of a fully completed registry.

use typegraph_core::{ErrorCode, FieldDefinition, SchemaError, TypeSystemObject};
use typegraph_registry::TypeRegistry;

/// Checks a completed registry. Only runs when no error was collected.
pub trait SchemaValidator {
    fn validate(&self, registry: &TypeRegistry) -> Vec<SchemaError>;
}

/// Structural rules every schema must satisfy.
///
/// - object and interface types declare at least one field
/// - object types declare every field of the interfaces they implement
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl SchemaValidator for DefaultValidator {
    fn validate(&self, registry: &TypeRegistry) -> Vec<SchemaError> {
        let mut errors = Vec::new();
        for ty in registry.types().filter(|t| t.is_named_type()) {
            let name = ty.display_name();
            let (kind, fields) = match ty.object() {
                TypeSystemObject::Object(o) => ("object", &o.fields),
                TypeSystemObject::Interface(i) => ("interface", &i.fields),
                _ => continue,
            };
            if fields.is_empty() {
                errors.push(
                    SchemaError::new(
                        ErrorCode::Validation,
                        format!("The {kind} type `{name}` has to at least define one field."),
                    )
                    .with_type(name.clone()),
                );
            }

            let Some(object) = ty.object().as_object() else {
                continue;
            };
            for interface in &object.implements {
                let Some(declared) = registry
                    .get_by_name(interface)
                    .and_then(|t| t.object().as_interface())
                else {
                    continue;
                };
                for field in declared.fields.iter().filter(|f| !declares(&object.fields, f)) {
                    errors.push(
                        SchemaError::new(
                            ErrorCode::Validation,
                            format!(
                                "The field `{}` of interface `{interface}` must be implemented by object type `{name}`.",
                                field.name
                            ),
                        )
                        .with_type(name.clone())
                        .with_extension("interface", interface.clone()),
                    );
                }
            }
        }
        errors
    }
}

fn declares(fields: &[FieldDefinition], field: &FieldDefinition) -> bool {
    fields.iter().any(|f| f.name == field.name)
}
