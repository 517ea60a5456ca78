//! Type-system objects.
//!
//! [`TypeSystemObject`] is a closed enum over every role a registered type can
//! play. Each variant owns its structural builder: the declared references
//! (fields, interfaces, members) before completion and the resolved names,
//! compiled field pipelines and predicates after completion.
//!
//! Extensions wrap a partial body of the kind they extend. The body's name is
//! the name of the base type the extension is merged into.

use std::fmt;

use crate::{
    DirectiveLocation, FieldDelegate, IsOfType, MemberDescriptor, RuntimeType, SchemaTypeId,
    TypeKind, TypeRef,
};

/// List / non-null wrapper around a named type, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapper {
    List,
    NonNull,
}

/// A possibly wrapped reference to a named type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldType {
    pub reference: TypeRef,
    pub wrappers: Vec<Wrapper>,
}

impl FieldType {
    pub fn new(reference: TypeRef) -> Self {
        Self {
            reference,
            wrappers: Vec::new(),
        }
    }

    /// Wrap the current type in a non-null wrapper.
    pub fn non_null(mut self) -> Self {
        self.wrappers.insert(0, Wrapper::NonNull);
        self
    }

    /// Wrap the current type in a list wrapper.
    pub fn list(mut self) -> Self {
        self.wrappers.insert(0, Wrapper::List);
        self
    }

    /// Render the wrapped type around a resolved named type, e.g. `[User!]!`.
    pub fn render(&self, named: &str) -> String {
        let mut rendered = named.to_string();
        for wrapper in self.wrappers.iter().rev() {
            rendered = match wrapper {
                Wrapper::List => format!("[{rendered}]"),
                Wrapper::NonNull => format!("{rendered}!"),
            };
        }
        rendered
    }
}

impl From<TypeRef> for FieldType {
    fn from(reference: TypeRef) -> Self {
        Self::new(reference)
    }
}

/// An argument of a field or directive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub ty: FieldType,
    /// Rendered type after completion.
    pub resolved_type: Option<String>,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            resolved_type: None,
        }
    }
}

/// A field of an object, interface or input object.
#[derive(Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: FieldType,
    pub arguments: Vec<ArgumentDefinition>,
    /// Member the field was declared from, if any.
    pub member: Option<MemberDescriptor>,
    /// Rendered type after completion.
    pub resolved_type: Option<String>,
    /// Compiled resolver wrapped by the global middleware, after completion.
    pub pipeline: Option<FieldDelegate>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty: ty.into(),
            arguments: Vec::new(),
            member: None,
            resolved_type: None,
            pipeline: None,
        }
    }

    pub fn with_argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.member = Some(member);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// All references this field mentions.
    pub fn references(&self) -> impl Iterator<Item = &TypeRef> {
        std::iter::once(&self.ty.reference).chain(self.arguments.iter().map(|a| &a.ty.reference))
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("arguments", &self.arguments)
            .field("member", &self.member)
            .field("resolved_type", &self.resolved_type)
            .field("has_pipeline", &self.pipeline.is_some())
            .finish()
    }
}

/// Data common to every type-system object.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeHeader {
    pub id: SchemaTypeId,
    /// Explicit name before name completion, completed name afterwards.
    pub name: Option<String>,
    pub description: Option<String>,
    pub runtime_type: RuntimeType,
}

impl TypeHeader {
    pub fn new(id: SchemaTypeId, runtime_type: RuntimeType) -> Self {
        Self {
            id,
            name: None,
            description: None,
            runtime_type,
        }
    }
}

macro_rules! header_builders {
    ($ty:ident) => {
        impl $ty {
            /// Set an explicit name.
            pub fn named(mut self, name: impl Into<String>) -> Self {
                self.header.name = Some(name.into());
                self
            }

            pub fn with_description(mut self, description: impl Into<String>) -> Self {
                self.header.description = Some(description.into());
                self
            }
        }
    };
}

#[derive(Clone)]
pub struct ObjectType {
    pub header: TypeHeader,
    pub fields: Vec<FieldDefinition>,
    pub interfaces: Vec<TypeRef>,
    /// Interface names, after completion.
    pub implements: Vec<String>,
    pub is_of_type: Option<IsOfType>,
    pub is_query_type: bool,
}

impl ObjectType {
    pub fn new(id: SchemaTypeId, runtime_type: RuntimeType) -> Self {
        Self {
            header: TypeHeader::new(id, runtime_type),
            fields: Vec::new(),
            interfaces: Vec::new(),
            implements: Vec::new(),
            is_of_type: None,
            is_query_type: false,
        }
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_is_of_type(mut self, is_of_type: IsOfType) -> Self {
        self.is_of_type = Some(is_of_type);
        self
    }
}

header_builders!(ObjectType);

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("header", &self.header)
            .field("fields", &self.fields)
            .field("interfaces", &self.interfaces)
            .field("implements", &self.implements)
            .field("has_is_of_type", &self.is_of_type.is_some())
            .field("is_query_type", &self.is_query_type)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub header: TypeHeader,
    pub fields: Vec<FieldDefinition>,
    pub interfaces: Vec<TypeRef>,
    pub implements: Vec<String>,
}

impl InterfaceType {
    pub fn new(id: SchemaTypeId, runtime_type: RuntimeType) -> Self {
        Self {
            header: TypeHeader::new(id, runtime_type),
            fields: Vec::new(),
            interfaces: Vec::new(),
            implements: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }
}

header_builders!(InterfaceType);

#[derive(Debug, Clone)]
pub struct UnionType {
    pub header: TypeHeader,
    pub members: Vec<TypeRef>,
    /// Member names, after completion.
    pub resolved_members: Vec<String>,
}

impl UnionType {
    pub fn new(id: SchemaTypeId, runtime_type: RuntimeType) -> Self {
        Self {
            header: TypeHeader::new(id, runtime_type),
            members: Vec::new(),
            resolved_members: Vec::new(),
        }
    }

    pub fn member(mut self, member: TypeRef) -> Self {
        self.members.push(member);
        self
    }
}

header_builders!(UnionType);

#[derive(Debug, Clone)]
pub struct InputObjectType {
    pub header: TypeHeader,
    pub fields: Vec<FieldDefinition>,
}

impl InputObjectType {
    pub fn new(id: SchemaTypeId, runtime_type: RuntimeType) -> Self {
        Self {
            header: TypeHeader::new(id, runtime_type),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }
}

header_builders!(InputObjectType);

#[derive(Debug, Clone)]
pub struct EnumType {
    pub header: TypeHeader,
    pub values: Vec<String>,
}

impl EnumType {
    pub fn new(id: SchemaTypeId, runtime_type: RuntimeType) -> Self {
        Self {
            header: TypeHeader::new(id, runtime_type),
            values: Vec::new(),
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }
}

header_builders!(EnumType);

#[derive(Debug, Clone)]
pub struct ScalarType {
    pub header: TypeHeader,
}

impl ScalarType {
    pub fn new(id: SchemaTypeId, runtime_type: RuntimeType) -> Self {
        Self {
            header: TypeHeader::new(id, runtime_type),
        }
    }
}

header_builders!(ScalarType);

#[derive(Debug, Clone)]
pub struct DirectiveType {
    pub header: TypeHeader,
    pub arguments: Vec<ArgumentDefinition>,
    pub locations: DirectiveLocation,
    pub repeatable: bool,
}

impl DirectiveType {
    pub fn new(id: SchemaTypeId, runtime_type: RuntimeType) -> Self {
        Self {
            header: TypeHeader::new(id, runtime_type),
            arguments: Vec::new(),
            locations: DirectiveLocation::empty(),
            repeatable: false,
        }
    }

    pub fn argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn location(mut self, location: DirectiveLocation) -> Self {
        self.locations |= location;
        self
    }
}

header_builders!(DirectiveType);

/// Extension of a named type; `body` holds the additions.
#[derive(Debug, Clone)]
pub struct TypeExtension {
    pub body: Box<TypeSystemObject>,
}

impl TypeExtension {
    pub fn new(body: impl Into<TypeSystemObject>) -> Self {
        Self {
            body: Box::new(body.into()),
        }
    }

    /// Kind of the type being extended.
    pub fn target_kind(&self) -> TypeKind {
        self.body.kind()
    }
}

/// Every role a registered type can play.
#[derive(Debug, Clone)]
pub enum TypeSystemObject {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    InputObject(InputObjectType),
    Enum(EnumType),
    Scalar(ScalarType),
    Directive(DirectiveType),
    Extension(TypeExtension),
}

impl TypeSystemObject {
    pub fn header(&self) -> &TypeHeader {
        match self {
            TypeSystemObject::Object(t) => &t.header,
            TypeSystemObject::Interface(t) => &t.header,
            TypeSystemObject::Union(t) => &t.header,
            TypeSystemObject::InputObject(t) => &t.header,
            TypeSystemObject::Enum(t) => &t.header,
            TypeSystemObject::Scalar(t) => &t.header,
            TypeSystemObject::Directive(t) => &t.header,
            TypeSystemObject::Extension(t) => t.body.header(),
        }
    }

    pub fn header_mut(&mut self) -> &mut TypeHeader {
        match self {
            TypeSystemObject::Object(t) => &mut t.header,
            TypeSystemObject::Interface(t) => &mut t.header,
            TypeSystemObject::Union(t) => &mut t.header,
            TypeSystemObject::InputObject(t) => &mut t.header,
            TypeSystemObject::Enum(t) => &mut t.header,
            TypeSystemObject::Scalar(t) => &mut t.header,
            TypeSystemObject::Directive(t) => &mut t.header,
            TypeSystemObject::Extension(t) => t.body.header_mut(),
        }
    }

    pub fn id(&self) -> &SchemaTypeId {
        &self.header().id
    }

    pub fn name(&self) -> Option<&str> {
        self.header().name.as_deref()
    }

    pub fn runtime_type(&self) -> &RuntimeType {
        &self.header().runtime_type
    }

    /// Kind of this type; for extensions, the kind being extended.
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeSystemObject::Object(_) => TypeKind::Object,
            TypeSystemObject::Interface(_) => TypeKind::Interface,
            TypeSystemObject::Union(_) => TypeKind::Union,
            TypeSystemObject::InputObject(_) => TypeKind::InputObject,
            TypeSystemObject::Enum(_) => TypeKind::Enum,
            TypeSystemObject::Scalar(_) => TypeKind::Scalar,
            TypeSystemObject::Directive(_) => TypeKind::Directive,
            TypeSystemObject::Extension(t) => t.target_kind(),
        }
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, TypeSystemObject::Extension(_))
    }

    pub fn is_directive(&self) -> bool {
        matches!(self, TypeSystemObject::Directive(_))
    }

    /// Named types: everything except directives and extensions.
    pub fn is_named_type(&self) -> bool {
        !self.is_directive() && !self.is_extension()
    }

    /// Fields of object, interface and input object types (and their extensions).
    pub fn fields(&self) -> &[FieldDefinition] {
        match self {
            TypeSystemObject::Object(t) => &t.fields,
            TypeSystemObject::Interface(t) => &t.fields,
            TypeSystemObject::InputObject(t) => &t.fields,
            TypeSystemObject::Extension(t) => t.body.fields(),
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Every reference this object mentions structurally.
    pub fn references(&self) -> Vec<TypeRef> {
        let mut refs: Vec<TypeRef> = Vec::new();
        match self {
            TypeSystemObject::Object(t) => {
                refs.extend(t.fields.iter().flat_map(|f| f.references().cloned()));
                refs.extend(t.interfaces.iter().cloned());
            }
            TypeSystemObject::Interface(t) => {
                refs.extend(t.fields.iter().flat_map(|f| f.references().cloned()));
                refs.extend(t.interfaces.iter().cloned());
            }
            TypeSystemObject::Union(t) => refs.extend(t.members.iter().cloned()),
            TypeSystemObject::InputObject(t) => {
                refs.extend(t.fields.iter().flat_map(|f| f.references().cloned()));
            }
            TypeSystemObject::Directive(t) => {
                refs.extend(t.arguments.iter().map(|a| a.ty.reference.clone()));
            }
            TypeSystemObject::Enum(_) | TypeSystemObject::Scalar(_) => {}
            TypeSystemObject::Extension(t) => refs.extend(t.body.references()),
        }
        refs
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeSystemObject::Object(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            TypeSystemObject::Interface(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            TypeSystemObject::Union(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            TypeSystemObject::Enum(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_directive(&self) -> Option<&DirectiveType> {
        match self {
            TypeSystemObject::Directive(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_extension(&self) -> Option<&TypeExtension> {
        match self {
            TypeSystemObject::Extension(t) => Some(t),
            _ => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for TypeSystemObject {
                fn from(value: $ty) -> Self {
                    TypeSystemObject::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    ObjectType => Object,
    InterfaceType => Interface,
    UnionType => Union,
    InputObjectType => InputObject,
    EnumType => Enum,
    ScalarType => Scalar,
    DirectiveType => Directive,
    TypeExtension => Extension,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeContext;

    fn output(name: &str) -> TypeRef {
        TypeRef::runtime(RuntimeType::named(name), TypeContext::Output)
    }

    #[test]
    fn render_wrappers() {
        let ty = FieldType::new(output("User"));
        assert_eq!(ty.render("User"), "User");
        assert_eq!(ty.clone().non_null().render("User"), "User!");
        assert_eq!(ty.clone().non_null().list().non_null().render("User"), "[User!]!");
        assert_eq!(ty.list().render("User"), "[User]");
    }

    #[test]
    fn object_references_cover_fields_arguments_and_interfaces() {
        let object = ObjectType::new(SchemaTypeId::new("ObjectType<User>"), RuntimeType::named("User"))
            .field(
                FieldDefinition::new("friends", output("User")).with_argument(ArgumentDefinition::new(
                    "first",
                    TypeRef::syntax("Int", TypeContext::Input),
                )),
            )
            .implements(TypeRef::syntax("Node", TypeContext::Output));
        let refs = TypeSystemObject::from(object).references();
        assert_eq!(refs.len(), 3);
        assert!(refs.contains(&TypeRef::syntax("Node", TypeContext::Output)));
    }

    #[test]
    fn extension_reports_target_kind() {
        let body = InterfaceType::new(SchemaTypeId::new("NodeExtension"), RuntimeType::object()).named("Node");
        let ext = TypeSystemObject::from(TypeExtension::new(body));
        assert!(ext.is_extension());
        assert!(!ext.is_named_type());
        assert_eq!(ext.kind(), TypeKind::Interface);
        assert_eq!(ext.name(), Some("Node"));
    }
}
