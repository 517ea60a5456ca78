//! Field identities and member descriptors.
//!
//! A [`MemberDescriptor`] is what the descriptor front end reports for a
//! property or method on a runtime type. A [`FieldMember`] ties such a member
//! to a concrete schema field, and [`FieldReference`] is the key used to bind
//! resolvers independent of the owning type's completion state.

use std::fmt;
use std::sync::Arc;

use crate::{MemberInvoker, RuntimeType};

/// Identifies a field by owning type name and field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldReference {
    pub type_name: Arc<str>,
    pub field_name: Arc<str>,
}

impl FieldReference {
    pub fn new(type_name: impl Into<Arc<str>>, field_name: impl Into<Arc<str>>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl fmt::Display for FieldReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

/// A method parameter as reported by the descriptor front end.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub ty: RuntimeType,
    /// Marks the parameter that receives the parent (source) value.
    pub is_parent: bool,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, ty: RuntimeType) -> Self {
        Self {
            name: name.into(),
            ty,
            is_parent: false,
        }
    }

    pub fn parent(name: impl Into<String>, ty: RuntimeType) -> Self {
        Self {
            is_parent: true,
            ..Self::new(name, ty)
        }
    }
}

/// Shape of a member.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Property,
    Method { parameters: Vec<ParameterDescriptor> },
}

/// A property or method on a runtime type.
#[derive(Clone)]
pub struct MemberDescriptor {
    pub name: String,
    pub declaring_type: RuntimeType,
    pub kind: MemberKind,
    pub invoker: Option<MemberInvoker>,
}

impl MemberDescriptor {
    pub fn property(declaring_type: RuntimeType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            kind: MemberKind::Property,
            invoker: None,
        }
    }

    pub fn method(
        declaring_type: RuntimeType,
        name: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            kind: MemberKind::Method { parameters },
            invoker: None,
        }
    }

    /// Attach the callable that implements this member.
    pub fn with_invoker(mut self, invoker: MemberInvoker) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn is_property(&self) -> bool {
        matches!(self.kind, MemberKind::Property)
    }

    /// Method parameters; empty for properties.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        match &self.kind {
            MemberKind::Property => &[],
            MemberKind::Method { parameters } => parameters,
        }
    }

    /// Parameters marked as receiving the parent value.
    pub fn parent_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters().iter().filter(|p| p.is_parent)
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type)
            .field("kind", &self.kind)
            .field("has_invoker", &self.invoker.is_some())
            .finish()
    }
}

/// A member bound to a specific schema field.
#[derive(Debug, Clone)]
pub struct FieldMember {
    pub type_name: Arc<str>,
    pub field_name: Arc<str>,
    pub member: MemberDescriptor,
}

impl FieldMember {
    pub fn new(
        type_name: impl Into<Arc<str>>,
        field_name: impl Into<Arc<str>>,
        member: MemberDescriptor,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
            member,
        }
    }

    pub fn to_field_reference(&self) -> FieldReference {
        FieldReference::new(self.type_name.clone(), self.field_name.clone())
    }
}
