//! Resolver bindings and their compiled form.
//!
//! A field starts out bound to a [`FieldMember`] (what the front end
//! discovered) and is replaced by a compiled [`FieldResolver`] once the
//! source type of the binding is fixed.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{FieldError, FieldMember, RuntimeType, Value};

/// Inputs handed to a compiled resolver.
#[derive(Debug, Clone, Copy)]
pub struct ResolverContext<'a> {
    /// The parent (source) value the field is resolved on.
    pub parent: &'a Value,
    /// Field arguments by name.
    pub arguments: &'a FxHashMap<String, Value>,
}

impl<'a> ResolverContext<'a> {
    pub fn new(parent: &'a Value, arguments: &'a FxHashMap<String, Value>) -> Self {
        Self { parent, arguments }
    }

    pub fn argument(&self, name: &str) -> Option<&'a Value> {
        self.arguments.get(name)
    }
}

/// A compiled, invokable field behavior.
pub type FieldResolver =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> Result<Value, FieldError> + Send + Sync>;

/// A resolver wrapped by middleware. Same shape as [`FieldResolver`].
pub type FieldDelegate = FieldResolver;

/// Wraps a delegate into another delegate.
pub type FieldMiddleware = Arc<dyn Fn(FieldDelegate) -> FieldDelegate + Send + Sync>;

/// Callable implementing a member on the host side.
pub type MemberInvoker = FieldResolver;

/// Per-object predicate deciding whether a value is an instance of the type.
pub type IsOfType = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Fallback predicate used for object types that don't declare [`IsOfType`].
/// Receives the completed type name.
pub type IsOfTypeFallback = Arc<dyn Fn(&str, &Value) -> bool + Send + Sync>;

/// Resolver that reads `key` from the parent object value.
pub fn parent_property(key: impl Into<String>) -> FieldResolver {
    let key = key.into();
    Arc::new(move |ctx: &ResolverContext<'_>| match ctx.parent {
        Value::Object(map) => Ok(map.get(&key).cloned().unwrap_or(Value::Null)),
        Value::Null => Ok(Value::Null),
        other => Err(FieldError::new(format!(
            "cannot read `{key}` from a non-object parent value {other:?}"
        ))),
    })
}

/// The fallback used when none is configured: compares `__typename`.
pub fn typename_is_of_type() -> IsOfTypeFallback {
    Arc::new(|type_name: &str, value: &Value| {
        value.get("__typename").and_then(Value::as_str) == Some(type_name)
    })
}

/// A field binding before or after compilation.
#[derive(Clone)]
pub enum FieldBinding {
    Member(FieldMember),
    Compiled(FieldResolver),
}

impl FieldBinding {
    pub fn is_compiled(&self) -> bool {
        matches!(self, FieldBinding::Compiled(_))
    }

    pub fn compiled(&self) -> Option<&FieldResolver> {
        match self {
            FieldBinding::Compiled(r) => Some(r),
            FieldBinding::Member(_) => None,
        }
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldBinding::Member(m) => f.debug_tuple("Member").field(m).finish(),
            FieldBinding::Compiled(_) => f.write_str("Compiled(..)"),
        }
    }
}

/// A resolver registered for a field.
#[derive(Debug, Clone)]
pub struct RegisteredResolver {
    /// Provider type declaring the member, when distinct from the source type.
    pub resolver_type: Option<RuntimeType>,
    /// Runtime type of the parent value.
    pub source_type: RuntimeType,
    pub field: FieldBinding,
}

impl RegisteredResolver {
    /// A resolver declared on the source type itself.
    pub fn source(source_type: RuntimeType, member: FieldMember) -> Self {
        Self {
            resolver_type: None,
            source_type,
            field: FieldBinding::Member(member),
        }
    }

    /// A resolver declared on an external provider type.
    pub fn external(resolver_type: RuntimeType, source_type: RuntimeType, member: FieldMember) -> Self {
        Self {
            resolver_type: Some(resolver_type),
            source_type,
            field: FieldBinding::Member(member),
        }
    }

    /// Whether the member lives on the source type.
    pub fn is_source_resolver(&self) -> bool {
        match &self.resolver_type {
            None => true,
            Some(ty) => *ty == self.source_type,
        }
    }

    pub fn with_source_type(mut self, source_type: RuntimeType) -> Self {
        self.source_type = source_type;
        self
    }

    pub fn with_field(mut self, field: FieldBinding) -> Self {
        self.field = field;
        self
    }
}
