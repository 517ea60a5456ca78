//! The descriptor front end seam.
//!
//! Discovery never inspects host types itself. It asks a
//! [`DescriptorProvider`] to turn a reference into a [`TypeDescriptor`]: the
//! type object plus the references, dependencies and resolver bindings the
//! front end collected for it.

use std::sync::Arc;

use indexmap::IndexMap;

use typegraph_core::{
    ErrorCode, FieldMember, FieldReference, RegisteredResolver, SchemaError,
    TypeDependency, TypeRef, TypeSystemObject, TypeTarget,
};
use typegraph_registry::{DiscoveryContext, RegisteredType};

/// Everything the front end knows about one type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub object: TypeSystemObject,
    /// Extra references the type can be found by.
    pub references: Vec<TypeRef>,
    pub dependencies: Vec<TypeDependency>,
    pub resolvers: IndexMap<FieldReference, RegisteredResolver>,
    pub errors: Vec<SchemaError>,
    pub alternate_names: Vec<String>,
    pub scope: Option<Arc<str>>,
}

impl TypeDescriptor {
    pub fn new(object: impl Into<TypeSystemObject>) -> Self {
        Self {
            object: object.into(),
            references: Vec::new(),
            dependencies: Vec::new(),
            resolvers: IndexMap::new(),
            errors: Vec::new(),
            alternate_names: Vec::new(),
            scope: None,
        }
    }

    pub fn reference(mut self, reference: TypeRef) -> Self {
        self.references.push(reference);
        self
    }

    pub fn dependency(mut self, dependency: TypeDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Bind a member declared on the type's own runtime type.
    pub fn member(self, member: FieldMember) -> Self {
        let source = self.object.runtime_type().clone();
        let key = member.to_field_reference();
        self.resolver(key, RegisteredResolver::source(source, member))
    }

    /// Bind a resolver to a field. The first binding for a field wins.
    pub fn resolver(mut self, field: FieldReference, resolver: RegisteredResolver) -> Self {
        self.resolvers.entry(field).or_insert(resolver);
        self
    }

    pub fn error(mut self, error: SchemaError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn alternate_name(mut self, name: impl Into<String>) -> Self {
        self.alternate_names.push(name.into());
        self
    }

    pub fn scope(mut self, scope: impl Into<Arc<str>>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Canonical reference of the described type.
    pub fn schema_reference(&self) -> TypeRef {
        TypeRef::schema(self.object.id().clone()).with_scope(self.scope.clone())
    }

    /// Whether this descriptor describes the type `reference` denotes.
    pub fn matches(&self, reference: &TypeRef) -> bool {
        if reference.scope() != self.scope.as_deref() {
            return false;
        }
        if self.references.contains(reference) {
            return true;
        }
        match reference.target() {
            TypeTarget::Schema(id) => self.object.id() == id,
            TypeTarget::Runtime(runtime) => {
                let object = &self.object;
                object.is_named_type()
                    && !object.runtime_type().is_object()
                    && object.runtime_type() == runtime
                    && object.kind().accepts(reference.context())
            }
            TypeTarget::Syntax(_) => false,
        }
    }

    pub fn into_registered(self, found_by: TypeRef) -> RegisteredType {
        let discovery = DiscoveryContext {
            errors: self.errors,
            resolvers: self.resolvers,
            alternate_names: self.alternate_names,
            scope: self.scope,
        };
        let references = self.references.into_iter().chain(std::iter::once(found_by));
        RegisteredType::new(self.object, references, self.dependencies, discovery)
    }
}

/// Creates descriptors for references.
pub trait DescriptorProvider {
    fn create(&self, reference: &TypeRef) -> Result<TypeDescriptor, SchemaError>;
}

/// A [`DescriptorProvider`] over a fixed list of descriptors.
///
/// The first descriptor that matches a reference wins.
#[derive(Debug, Clone, Default)]
pub struct DescriptorCatalog {
    descriptors: Vec<TypeDescriptor>,
}

impl DescriptorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Canonical references of every descriptor, in insertion order.
    pub fn schema_references(&self) -> Vec<TypeRef> {
        self.descriptors.iter().map(TypeDescriptor::schema_reference).collect()
    }
}

impl DescriptorProvider for DescriptorCatalog {
    fn create(&self, reference: &TypeRef) -> Result<TypeDescriptor, SchemaError> {
        self.descriptors
            .iter()
            .find(|d| d.matches(reference))
            .cloned()
            .ok_or_else(|| {
                SchemaError::new(
                    ErrorCode::Discovery,
                    format!("Unable to create a type for the reference `{reference}`."),
                )
                .with_reference(reference.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typegraph_core::{InputObjectType, MemberDescriptor, ObjectType, RuntimeType, SchemaTypeId, TypeContext};

    fn user_object() -> TypeDescriptor {
        TypeDescriptor::new(ObjectType::new(
            SchemaTypeId::new("ObjectType<User>"),
            RuntimeType::named("User"),
        ))
    }

    fn user_input() -> TypeDescriptor {
        TypeDescriptor::new(InputObjectType::new(
            SchemaTypeId::new("InputObjectType<User>"),
            RuntimeType::named("User"),
        ))
    }

    #[test]
    fn catalog_picks_descriptor_by_context() {
        let catalog = DescriptorCatalog::new().with(user_object()).with(user_input());
        let user = RuntimeType::named("User");

        let output = catalog.create(&TypeRef::runtime(user.clone(), TypeContext::Output)).unwrap();
        assert_eq!(output.object.id().name(), "ObjectType<User>");

        let input = catalog.create(&TypeRef::runtime(user.clone(), TypeContext::Input)).unwrap();
        assert_eq!(input.object.id().name(), "InputObjectType<User>");

        let any = catalog.create(&TypeRef::runtime(user, TypeContext::None)).unwrap();
        assert_eq!(any.object.id().name(), "ObjectType<User>");
    }

    #[test]
    fn unknown_reference_is_a_discovery_error() {
        let catalog = DescriptorCatalog::new().with(user_object());
        let ghost = TypeRef::runtime(RuntimeType::named("Ghost"), TypeContext::Output);
        let err = catalog.create(&ghost).unwrap_err();
        assert_eq!(err.code, ErrorCode::Discovery);
        assert_eq!(err.reference, Some(ghost));
    }

    #[test]
    fn scope_must_match() {
        let catalog = DescriptorCatalog::new().with(user_object().scope("admin"));
        let plain = TypeRef::schema(SchemaTypeId::new("ObjectType<User>"));
        assert!(catalog.create(&plain).is_err());
        assert!(catalog.create(&plain.with_scope(Some("admin".into()))).is_ok());
    }

    #[test]
    fn member_bindings_use_the_object_runtime_type() {
        let user = RuntimeType::named("User");
        let descriptor = user_object()
            .member(FieldMember::new("User", "name", MemberDescriptor::property(user.clone(), "name")))
            .member(FieldMember::new("User", "name", MemberDescriptor::property(user.clone(), "other")));

        assert_eq!(descriptor.resolvers.len(), 1);
        let resolver = &descriptor.resolvers[&FieldReference::new("User", "name")];
        assert_eq!(resolver.source_type, user);
        assert!(resolver.is_source_resolver());
    }

    #[test]
    fn registered_record_keeps_discovery_context() {
        let found_by = TypeRef::runtime(RuntimeType::named("User"), TypeContext::Output);
        let registered = user_object()
            .alternate_name("Person")
            .into_registered(found_by.clone());
        assert_eq!(registered.references()[1], found_by);
        assert_eq!(registered.discovery().alternate_names, ["Person"]);
    }
}
