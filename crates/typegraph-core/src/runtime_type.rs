//! Runtime type handles.
//!
//! A [`RuntimeType`] names the host-side type a schema type is backed by
//! (the "runtime type"). Generic runtime types carry their arguments, and
//! the cached [`TypeHash`] is computed structurally over them so that
//! `Connection<User>` always hashes the same way regardless of how it was
//! constructed.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::TypeHash;

/// Name of the distinguished "no concrete runtime type" handle.
const OBJECT_NAME: &str = "object";

/// A host-side type handle.
#[derive(Clone)]
pub struct RuntimeType {
    name: Arc<str>,
    args: Arc<[RuntimeType]>,
    hash: TypeHash,
}

impl RuntimeType {
    /// A non-generic runtime type.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self {
            name,
            args: Arc::from(Vec::new()),
            hash,
        }
    }

    /// A generic runtime type with ordered type arguments.
    pub fn generic(name: impl Into<Arc<str>>, args: Vec<RuntimeType>) -> Self {
        let name = name.into();
        let arg_hashes: Vec<TypeHash> = args.iter().map(|a| a.hash).collect();
        let hash = TypeHash::from_generic(&name, &arg_hashes);
        Self {
            name,
            args: Arc::from(args),
            hash,
        }
    }

    /// The generic `object` handle used by types without a concrete runtime type.
    pub fn object() -> Self {
        Self::named(OBJECT_NAME)
    }

    /// Whether this is the generic `object` handle.
    pub fn is_object(&self) -> bool {
        self.args.is_empty() && &*self.name == OBJECT_NAME
    }

    /// Base name without type arguments.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generic type arguments, in declaration order.
    pub fn args(&self) -> &[RuntimeType] {
        &self.args
    }

    /// Whether this type has generic arguments.
    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// Structural hash of this type.
    pub fn type_hash(&self) -> TypeHash {
        self.hash
    }
}

impl PartialEq for RuntimeType {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.name == other.name && self.args == other.args
    }
}

impl Eq for RuntimeType {}

impl Hash for RuntimeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuntimeType({self})")
    }
}

impl From<&str> for RuntimeType {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn structural_equality() {
        let a = RuntimeType::generic("Connection", vec![RuntimeType::named("User")]);
        let b = RuntimeType::generic("Connection", vec![RuntimeType::named("User")]);
        assert_eq!(a, b);
        assert_eq!(a.type_hash(), b.type_hash());
    }

    #[test]
    fn argument_order_is_significant() {
        let a = RuntimeType::generic(
            "Pair",
            vec![RuntimeType::named("A"), RuntimeType::named("B")],
        );
        let b = RuntimeType::generic(
            "Pair",
            vec![RuntimeType::named("B"), RuntimeType::named("A")],
        );
        assert_ne!(a, b);

        let mut set = FxHashSet::default();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn object_handle() {
        assert!(RuntimeType::object().is_object());
        assert!(!RuntimeType::named("User").is_object());
        assert!(!RuntimeType::generic("object", vec![RuntimeType::named("A")]).is_object());
    }

    #[test]
    fn display_nested() {
        let ty = RuntimeType::generic(
            "Map",
            vec![
                RuntimeType::named("String"),
                RuntimeType::generic("List", vec![RuntimeType::named("User")]),
            ],
        );
        assert_eq!(ty.to_string(), "Map<String, List<User>>");
    }
}
