//! Core identities and data model for schema type-graph construction.
//!
//! - [`TypeHash`], [`RuntimeType`], [`SchemaTypeId`], [`TypeRef`]: type identities
//! - [`TypeSystemObject`]: the closed set of type roles and their structure
//! - [`FieldReference`], [`RegisteredResolver`]: resolver binding model
//! - [`SchemaError`], [`SchemaErrors`]: error reporting
//! - [`TypeInspector`]: the seam to the host type system

mod definition;
mod dependency;
mod error;
mod field;
mod inspector;
mod kinds;
mod resolver;
mod runtime_type;
mod type_hash;
mod type_ref;
mod value;

pub use definition::{
    ArgumentDefinition, DirectiveType, EnumType, FieldDefinition, FieldType, InputObjectType,
    InterfaceType, ObjectType, ScalarType, TypeExtension, TypeHeader, TypeSystemObject, UnionType,
    Wrapper,
};
pub use dependency::TypeDependency;
pub use error::{ErrorCode, FieldError, InitError, SchemaError, SchemaErrors, UnresolvedReference};
pub use field::{FieldMember, FieldReference, MemberDescriptor, MemberKind, ParameterDescriptor};
pub use inspector::{RuntimeTypeTable, TypeInspector};
pub use kinds::{CompletionKind, DirectiveLocation, TypeKind, TypeStatus};
pub use resolver::{
    FieldBinding, FieldDelegate, FieldMiddleware, FieldResolver, IsOfType, IsOfTypeFallback,
    MemberInvoker, RegisteredResolver, ResolverContext, parent_property, typename_is_of_type,
};
pub use runtime_type::RuntimeType;
pub use type_hash::{TypeHash, hash_constants};
pub use type_ref::{SchemaTypeId, TypeContext, TypeRef, TypeTarget};
pub use value::Value;
