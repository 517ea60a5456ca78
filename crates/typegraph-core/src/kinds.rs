//! Type kinds, completion phases and directive locations.

use std::fmt;

use bitflags::bitflags;

use crate::TypeContext;

/// Kind of a type-system object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    InputObject,
    Enum,
    Scalar,
    Directive,
}

impl TypeKind {
    /// Kinds allowed as field result types.
    pub fn is_output(self) -> bool {
        matches!(
            self,
            TypeKind::Object | TypeKind::Interface | TypeKind::Union | TypeKind::Enum | TypeKind::Scalar
        )
    }

    /// Kinds allowed as argument and input field types.
    pub fn is_input(self) -> bool {
        matches!(self, TypeKind::InputObject | TypeKind::Enum | TypeKind::Scalar)
    }

    /// Position a type of this kind lives in. Enums and scalars serve both.
    pub fn context(self) -> TypeContext {
        match self {
            TypeKind::Object | TypeKind::Interface | TypeKind::Union => TypeContext::Output,
            TypeKind::InputObject => TypeContext::Input,
            _ => TypeContext::None,
        }
    }

    /// Whether a reference in `context` may denote a type of this kind.
    pub fn accepts(self, context: TypeContext) -> bool {
        match context {
            TypeContext::None => true,
            TypeContext::Input => self.is_input(),
            TypeContext::Output => self.is_output(),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::InputObject => "input object",
            TypeKind::Enum => "enum",
            TypeKind::Scalar => "scalar",
            TypeKind::Directive => "directive",
        };
        f.write_str(s)
    }
}

/// Completion phases, in the order a type passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompletionKind {
    /// Name and identity fixed.
    Named,
    /// Full structure fixed.
    Completed,
}

impl fmt::Display for CompletionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionKind::Named => f.write_str("named"),
            CompletionKind::Completed => f.write_str("completed"),
        }
    }
}

/// Current status of a type during initialization. Never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TypeStatus {
    #[default]
    Initialized,
    Named,
    Completed,
}

bitflags! {
    /// Locations a directive may be applied to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirectiveLocation: u32 {
        const QUERY = 1 << 0;
        const MUTATION = 1 << 1;
        const SUBSCRIPTION = 1 << 2;
        const FIELD = 1 << 3;
        const FRAGMENT_DEFINITION = 1 << 4;
        const FRAGMENT_SPREAD = 1 << 5;
        const INLINE_FRAGMENT = 1 << 6;
        const SCHEMA = 1 << 7;
        const SCALAR = 1 << 8;
        const OBJECT = 1 << 9;
        const FIELD_DEFINITION = 1 << 10;
        const ARGUMENT_DEFINITION = 1 << 11;
        const INTERFACE = 1 << 12;
        const UNION = 1 << 13;
        const ENUM = 1 << 14;
        const ENUM_VALUE = 1 << 15;
        const INPUT_OBJECT = 1 << 16;
        const INPUT_FIELD_DEFINITION = 1 << 17;

        const EXECUTABLE = Self::QUERY.bits()
            | Self::MUTATION.bits()
            | Self::SUBSCRIPTION.bits()
            | Self::FIELD.bits()
            | Self::FRAGMENT_DEFINITION.bits()
            | Self::FRAGMENT_SPREAD.bits()
            | Self::INLINE_FRAGMENT.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_kinds_are_ordered() {
        assert!(CompletionKind::Named < CompletionKind::Completed);
        assert!(TypeStatus::Initialized < TypeStatus::Named);
        assert!(TypeStatus::Named < TypeStatus::Completed);
    }

    #[test]
    fn input_and_output_positions() {
        assert!(TypeKind::Object.is_output());
        assert!(!TypeKind::Object.is_input());
        assert!(TypeKind::InputObject.is_input());
        assert!(!TypeKind::InputObject.is_output());
        assert!(TypeKind::Enum.is_input() && TypeKind::Enum.is_output());
        assert!(!TypeKind::Directive.is_input() && !TypeKind::Directive.is_output());
    }

    #[test]
    fn kinds_accept_their_own_context() {
        assert_eq!(TypeKind::Union.context(), TypeContext::Output);
        assert_eq!(TypeKind::InputObject.context(), TypeContext::Input);
        assert_eq!(TypeKind::Scalar.context(), TypeContext::None);
        assert!(TypeKind::InputObject.accepts(TypeContext::None));
        assert!(!TypeKind::InputObject.accepts(TypeContext::Output));
        assert!(TypeKind::Enum.accepts(TypeContext::Input));
    }

    #[test]
    fn executable_locations() {
        assert!(DirectiveLocation::EXECUTABLE.contains(DirectiveLocation::FIELD));
        assert!(!DirectiveLocation::EXECUTABLE.contains(DirectiveLocation::OBJECT));
    }
}
