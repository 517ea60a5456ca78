//! Error types for schema initialization.
//!
//! ## Error Hierarchy
//!
//! ```text
//! SchemaErrors (terminal aggregated failure)
//! └── SchemaError        - one problem, with a stable ErrorCode
//! UnresolvedReference    - a reference the registry cannot normalize
//! InitError              - misconfiguration detected before any phase runs
//! FieldError             - failure of a compiled resolver at call time
//! ```
//!
//! Phases never fail fast: every [`SchemaError`] is collected and the run
//! terminates with one [`SchemaErrors`] containing all of them.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::{FieldReference, TypeRef};

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A reference could not be instantiated or normalized.
    UnresolvedReference,
    /// Two named types claim the same name.
    DuplicateName,
    /// Types left with unmet dependencies after all batches ran.
    UnresolvedDependency,
    /// An extension's kind differs from its base type's kind.
    ExtensionKindMismatch,
    /// An extension has no base type (strict policy only).
    ExtensionTargetMissing,
    /// A resolver binding could not be compiled.
    ResolverCompilation,
    /// A type name is missing or not a valid name.
    InvalidName,
    /// A field, argument, interface or member type could not be resolved.
    UnresolvedFieldType,
    /// A reference resolved to a type of the wrong kind.
    InvalidTypeReference,
    /// A type's structure is incomplete (e.g. an enum without values).
    InvalidStructure,
    /// Reported by the schema validator.
    Validation,
    /// Reported by the descriptor front end.
    Discovery,
}

impl ErrorCode {
    /// The stable string form of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnresolvedReference => "SCHEMA_UNRESOLVED_REFERENCE",
            ErrorCode::DuplicateName => "SCHEMA_DUPLICATE_NAME",
            ErrorCode::UnresolvedDependency => "SCHEMA_UNRESOLVED_DEPENDENCY",
            ErrorCode::ExtensionKindMismatch => "SCHEMA_EXTENSION_KIND_MISMATCH",
            ErrorCode::ExtensionTargetMissing => "SCHEMA_EXTENSION_TARGET_MISSING",
            ErrorCode::ResolverCompilation => "SCHEMA_RESOLVER_COMPILATION",
            ErrorCode::InvalidName => "SCHEMA_INVALID_NAME",
            ErrorCode::UnresolvedFieldType => "SCHEMA_UNRESOLVED_FIELD_TYPE",
            ErrorCode::InvalidTypeReference => "SCHEMA_INVALID_TYPE_REFERENCE",
            ErrorCode::InvalidStructure => "SCHEMA_INVALID_STRUCTURE",
            ErrorCode::Validation => "SCHEMA_VALIDATION",
            ErrorCode::Discovery => "SCHEMA_DISCOVERY",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single schema problem.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} ({code})")]
pub struct SchemaError {
    pub code: ErrorCode,
    pub message: String,
    /// Offending type, when known.
    pub type_name: Option<String>,
    /// Offending field, when known.
    pub field: Option<FieldReference>,
    /// Offending reference, when known.
    pub reference: Option<TypeRef>,
    /// Additional structured data (e.g. a dependency cycle).
    pub extensions: BTreeMap<String, String>,
}

impl SchemaError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            type_name: None,
            field: None,
            reference: None,
            extensions: BTreeMap::new(),
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_field(mut self, field: FieldReference) -> Self {
        if self.type_name.is_none() {
            self.type_name = Some(field.type_name.to_string());
        }
        self.field = Some(field);
        self
    }

    pub fn with_reference(mut self, reference: TypeRef) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }
}

/// Terminal failure carrying every collected schema error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("schema initialization failed with {} error(s)", .errors.len())]
pub struct SchemaErrors {
    errors: Vec<SchemaError>,
}

impl SchemaErrors {
    pub fn new(errors: Vec<SchemaError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[SchemaError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SchemaError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors carrying the given code.
    pub fn with_code(&self, code: ErrorCode) -> impl Iterator<Item = &SchemaError> {
        self.errors.iter().filter(move |e| e.code == code)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaError> {
        self.errors.iter()
    }
}

impl From<SchemaError> for SchemaErrors {
    fn from(error: SchemaError) -> Self {
        Self::new(vec![error])
    }
}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// A reference the registry could not match to any registered type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unable to resolve type reference `{0}`")]
pub struct UnresolvedReference(pub TypeRef);

impl From<UnresolvedReference> for SchemaError {
    fn from(err: UnresolvedReference) -> Self {
        SchemaError::new(ErrorCode::UnresolvedReference, err.to_string()).with_reference(err.0)
    }
}

/// Misconfiguration raised before any initialization phase runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("missing required component: {0}")]
    MissingComponent(&'static str),

    #[error("the schema handle is already bound to a type graph")]
    SchemaAlreadyBound,
}

/// Failure of a compiled resolver when invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
