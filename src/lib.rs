//! Schema type-graph initialization.
//!
//! This crate re-exports the workspace crates under one roof:
//!
//! - [`core`]: identities, type-system objects, resolvers and errors
//! - [`registry`]: type storage and dependency graphs
//! - [`init`]: the initialization pipeline and the completed [`TypeGraph`]
//!
//! ```
//! use typegraph::prelude::*;
//!
//! let catalog = DescriptorCatalog::new()
//!     .with(TypeDescriptor::new(
//!         ObjectType::new(SchemaTypeId::new("Query"), RuntimeType::object())
//!             .named("Query")
//!             .field(FieldDefinition::new("hello", TypeRef::syntax("String", TypeContext::Output))),
//!     ))
//!     .with(TypeDescriptor::new(
//!         ScalarType::new(SchemaTypeId::new("String"), RuntimeType::named("String")).named("String"),
//!     ));
//!
//! let graph = TypeInitializer::builder()
//!     .with_catalog(catalog)
//!     .with_inspector(RuntimeTypeTable::new())
//!     .build()
//!     .unwrap()
//!     .initialize()
//!     .unwrap();
//!
//! assert!(graph.query_type().is_some());
//! ```

pub use typegraph_core as core;
pub use typegraph_init as init;
pub use typegraph_registry as registry;

pub use typegraph_init::{SchemaHandle, TypeGraph, TypeInitializer, TypeInitializerBuilder};

pub mod prelude {
    pub use typegraph_core::{
        ArgumentDefinition, CompletionKind, DirectiveLocation, DirectiveType, EnumType, ErrorCode,
        FieldDefinition, FieldDelegate, FieldError, FieldMember, FieldReference, FieldResolver,
        FieldType, InitError, InputObjectType, InterfaceType, MemberDescriptor, ObjectType,
        ParameterDescriptor, RegisteredResolver, ResolverContext, RuntimeType, RuntimeTypeTable,
        ScalarType, SchemaError, SchemaErrors, SchemaTypeId, TypeContext, TypeDependency,
        TypeExtension, TypeInspector, TypeKind, TypeRef, TypeSystemObject, UnionType, Value,
    };
    pub use typegraph_init::{
        DescriptorCatalog, DescriptorProvider, NamingConventions, ResolverProvider, SchemaHandle,
        SchemaOptions, SchemaValidator, TypeDescriptor, TypeGraph, TypeInitializer,
        TypeInitializerBuilder, TypeInterceptor, TypeState, UnmatchedExtensionPolicy,
    };
    pub use typegraph_registry::{RegisteredType, TypeRegistry, TypeSlot};
}
