//! Type references.
//!
//! A [`TypeRef`] identifies "a type that may or may not be registered yet".
//! It points at one of three targets:
//!
//! - [`TypeTarget::Runtime`]: a host runtime type in an input or output position
//! - [`TypeTarget::Schema`]: an explicit schema type identity
//! - [`TypeTarget::Syntax`]: a type named in the schema language, resolvable
//!   only once names have been completed
//!
//! # Equality
//!
//! Two references are equal when their targets denote the same identity,
//! their contexts are compatible (equal, or either one is [`TypeContext::None`])
//! and their scopes are equal. Hashing covers target and scope only so it
//! stays consistent with the context wildcard.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{RuntimeType, TypeHash};

/// Position a reference is used in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeContext {
    /// Either position.
    #[default]
    None,
    /// Argument / input object position.
    Input,
    /// Field result position.
    Output,
}

impl TypeContext {
    /// Contexts match when equal or when either one is `None`.
    #[inline]
    pub fn is_compatible(self, other: TypeContext) -> bool {
        self == other || self == TypeContext::None || other == TypeContext::None
    }
}

/// Identity of a type-system object, e.g. `ObjectType<User>`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SchemaTypeId {
    name: Arc<str>,
    hash: TypeHash,
}

impl SchemaTypeId {
    /// Create an identity from its display name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        let hash = TypeHash::from_schema_name(&name);
        Self { name, hash }
    }

    /// Display name of this identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash of this identity.
    pub fn type_hash(&self) -> TypeHash {
        self.hash
    }
}

impl fmt::Debug for SchemaTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaTypeId({})", self.name)
    }
}

impl fmt::Display for SchemaTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// What a reference points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTarget {
    /// A host runtime type.
    Runtime(RuntimeType),
    /// An explicit schema type identity.
    Schema(SchemaTypeId),
    /// A schema-language type name.
    Syntax(Arc<str>),
}

/// Reference to a type, resolved through the registry.
#[derive(Debug, Clone)]
pub struct TypeRef {
    target: TypeTarget,
    context: TypeContext,
    scope: Option<Arc<str>>,
}

impl TypeRef {
    /// Reference a runtime type in the given position.
    pub fn runtime(ty: RuntimeType, context: TypeContext) -> Self {
        Self {
            target: TypeTarget::Runtime(ty),
            context,
            scope: None,
        }
    }

    /// Reference a schema type identity.
    pub fn schema(id: SchemaTypeId) -> Self {
        Self {
            target: TypeTarget::Schema(id),
            context: TypeContext::None,
            scope: None,
        }
    }

    /// Reference a type by its schema name.
    pub fn syntax(name: impl Into<Arc<str>>, context: TypeContext) -> Self {
        Self {
            target: TypeTarget::Syntax(name.into()),
            context,
            scope: None,
        }
    }

    /// Return a copy of this reference with a scope tag.
    pub fn with_scope(mut self, scope: Option<Arc<str>>) -> Self {
        self.scope = scope;
        self
    }

    /// Return a copy of this reference in another position.
    pub fn with_context(mut self, context: TypeContext) -> Self {
        self.context = context;
        self
    }

    pub fn target(&self) -> &TypeTarget {
        &self.target
    }

    pub fn context(&self) -> TypeContext {
        self.context
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// The runtime type, for runtime references.
    pub fn runtime_type(&self) -> Option<&RuntimeType> {
        match &self.target {
            TypeTarget::Runtime(ty) => Some(ty),
            _ => None,
        }
    }

    /// The schema identity, for schema references.
    pub fn schema_id(&self) -> Option<&SchemaTypeId> {
        match &self.target {
            TypeTarget::Schema(id) => Some(id),
            _ => None,
        }
    }

    /// The schema name, for syntax references.
    pub fn syntax_name(&self) -> Option<&str> {
        match &self.target {
            TypeTarget::Syntax(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self.target, TypeTarget::Syntax(_))
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.context.is_compatible(other.context)
            && self.scope == other.scope
            && self.target == other.target
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
        self.scope.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "{scope}:")?;
        }
        match &self.target {
            TypeTarget::Runtime(ty) => write!(f, "{ty}")?,
            TypeTarget::Schema(id) => write!(f, "{id}")?,
            TypeTarget::Syntax(name) => write!(f, "{name}")?,
        }
        match self.context {
            TypeContext::None => Ok(()),
            TypeContext::Input => write!(f, " (input)"),
            TypeContext::Output => write!(f, " (output)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(r: &TypeRef) -> u64 {
        let mut h = DefaultHasher::new();
        r.hash(&mut h);
        h.finish()
    }

    #[test]
    fn none_context_matches_any_context() {
        let user = RuntimeType::named("User");
        let any = TypeRef::runtime(user.clone(), TypeContext::None);
        let output = TypeRef::runtime(user.clone(), TypeContext::Output);
        let input = TypeRef::runtime(user, TypeContext::Input);

        assert_eq!(any, output);
        assert_eq!(any, input);
        assert_ne!(input, output);
    }

    #[test]
    fn equal_references_hash_equal() {
        let user = RuntimeType::named("User");
        let any = TypeRef::runtime(user.clone(), TypeContext::None);
        let output = TypeRef::runtime(user, TypeContext::Output);
        assert_eq!(hash_of(&any), hash_of(&output));
    }

    #[test]
    fn scope_must_match() {
        let user = RuntimeType::named("User");
        let plain = TypeRef::runtime(user.clone(), TypeContext::Output);
        let scoped = TypeRef::runtime(user, TypeContext::Output).with_scope(Some("admin".into()));
        assert_ne!(plain, scoped);
    }

    #[test]
    fn different_targets_never_equal() {
        let by_name = TypeRef::syntax("User", TypeContext::None);
        let by_schema = TypeRef::schema(SchemaTypeId::new("User"));
        let by_runtime = TypeRef::runtime(RuntimeType::named("User"), TypeContext::None);
        assert_ne!(by_name, by_schema);
        assert_ne!(by_name, by_runtime);
        assert_ne!(by_schema, by_runtime);
    }

    #[test]
    fn generic_references_deduplicate_in_sets() {
        let make = || {
            TypeRef::runtime(
                RuntimeType::generic("Connection", vec![RuntimeType::named("User")]),
                TypeContext::Output,
            )
        };
        let mut set = FxHashSet::default();
        set.insert(make());
        set.insert(make());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display() {
        let r = TypeRef::runtime(RuntimeType::named("User"), TypeContext::Input)
            .with_scope(Some("admin".into()));
        assert_eq!(r.to_string(), "admin:User (input)");
        assert_eq!(TypeRef::schema(SchemaTypeId::new("ObjectType<User>")).to_string(), "ObjectType<User>");
    }
}
