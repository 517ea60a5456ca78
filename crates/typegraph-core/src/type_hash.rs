//! Deterministic hash-based identity for runtime and schema types.
//!
//! [`TypeHash`] is a 64-bit hash computed from a type name and, for generic
//! types, the hashes of its type arguments. Identical inputs always produce
//! the same hash, which keeps dependency comparisons stable across runs and
//! lets references be built before the type they point at is registered.
//!
//! # Hash Computation
//!
//! Uses XXHash64 with domain-specific mixing constants so that a runtime type
//! and a schema type sharing a name never collide.
//!
//! # Examples
//!
//! ```
//! use typegraph_core::TypeHash;
//!
//! let user = TypeHash::from_name("User");
//! assert_eq!(user, TypeHash::from_name("User"));
//!
//! let a = TypeHash::from_generic("Pair", &[TypeHash::from_name("A"), TypeHash::from_name("B")]);
//! let b = TypeHash::from_generic("Pair", &[TypeHash::from_name("B"), TypeHash::from_name("A")]);
//! assert_ne!(a, b); // argument order matters
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant mixed between generic arguments.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for runtime type hashes.
    pub const RUNTIME: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for generic runtime type hashes.
    pub const GENERIC: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for schema type identities.
    pub const SCHEMA: u64 = 0x7d3c8b4a92e15f6d;

    /// Argument position mixing constants.
    /// Each position gets its own constant so argument order matters.
    pub const ARG_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash identifying a runtime or schema type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a hash from a (non-generic) runtime type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::RUNTIME ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a hash for a generic runtime type from its base name and the
    /// hashes of its type arguments.
    ///
    /// With no arguments this is identical to [`TypeHash::from_name`], so
    /// `Foo` and `Foo<>` denote the same type.
    #[inline]
    pub fn from_generic(name: &str, args: &[TypeHash]) -> Self {
        if args.is_empty() {
            return Self::from_name(name);
        }
        let mut hash = hash_constants::GENERIC ^ xxh64(name.as_bytes(), 0);
        for (i, arg) in args.iter().enumerate() {
            let marker = hash_constants::ARG_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::ARG_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul keeps the fold non-commutative
            hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(marker ^ arg.0);
        }
        TypeHash(hash)
    }

    /// Create a hash for a schema type identity (e.g. `ObjectType<User>`).
    #[inline]
    pub fn from_schema_name(name: &str) -> Self {
        TypeHash(hash_constants::SCHEMA ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is the empty hash.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_deterministic() {
        assert_eq!(TypeHash::from_name("User"), TypeHash::from_name("User"));
        assert_ne!(TypeHash::from_name("User"), TypeHash::from_name("Order"));
    }

    #[test]
    fn runtime_and_schema_domains_differ() {
        assert_ne!(
            TypeHash::from_name("User"),
            TypeHash::from_schema_name("User")
        );
    }

    #[test]
    fn generic_without_args_equals_plain_name() {
        assert_eq!(
            TypeHash::from_generic("User", &[]),
            TypeHash::from_name("User")
        );
    }

    #[test]
    fn generic_argument_order_matters() {
        let a = TypeHash::from_name("A");
        let b = TypeHash::from_name("B");
        assert_ne!(
            TypeHash::from_generic("Pair", &[a, b]),
            TypeHash::from_generic("Pair", &[b, a])
        );
    }

    #[test]
    fn nested_generics_differ_from_flat() {
        let a = TypeHash::from_name("A");
        let list_a = TypeHash::from_generic("List", &[a]);
        assert_ne!(
            TypeHash::from_generic("Connection", &[list_a]),
            TypeHash::from_generic("Connection", &[a])
        );
    }

    #[test]
    fn many_arguments_use_fallback_markers() {
        let args: Vec<TypeHash> = (0..20).map(|i| TypeHash::from_name(&i.to_string())).collect();
        let mut reversed = args.clone();
        reversed.reverse();
        assert_ne!(
            TypeHash::from_generic("Tuple", &args),
            TypeHash::from_generic("Tuple", &reversed)
        );
    }
}
