//! Host type inspection.
//!
//! The initializer never reflects over host types itself. Everything it needs
//! to know about runtime types (assignability and the members a resolver
//! provider exposes) comes through [`TypeInspector`].

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{MemberDescriptor, RuntimeType};

/// Answers questions about runtime types.
pub trait TypeInspector {
    /// Whether a value of `source` can be used where `target` is expected.
    fn is_assignable_from(&self, target: &RuntimeType, source: &RuntimeType) -> bool;

    /// Members declared on `ty`, in declaration order.
    fn members(&self, ty: &RuntimeType) -> Vec<MemberDescriptor>;
}

#[derive(Debug, Default, Clone)]
struct RuntimeTypeInfo {
    supertypes: Vec<RuntimeType>,
    members: Vec<MemberDescriptor>,
}

/// Table-driven [`TypeInspector`].
///
/// Assignability is reflexive and follows declared supertypes transitively.
/// Every type is assignable to the generic `object` handle.
#[derive(Debug, Default, Clone)]
pub struct RuntimeTypeTable {
    types: FxHashMap<RuntimeType, RuntimeTypeInfo>,
}

impl RuntimeTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `ty` is assignable to `supertype`.
    pub fn implements(&mut self, ty: RuntimeType, supertype: RuntimeType) -> &mut Self {
        let info = self.types.entry(ty).or_default();
        if !info.supertypes.contains(&supertype) {
            info.supertypes.push(supertype);
        }
        self
    }

    /// Add a member to `ty`.
    pub fn member(&mut self, ty: RuntimeType, member: MemberDescriptor) -> &mut Self {
        self.types.entry(ty).or_default().members.push(member);
        self
    }

    fn supertypes(&self, ty: &RuntimeType) -> &[RuntimeType] {
        self.types
            .get(ty)
            .map(|info| info.supertypes.as_slice())
            .unwrap_or(&[])
    }
}

impl TypeInspector for RuntimeTypeTable {
    fn is_assignable_from(&self, target: &RuntimeType, source: &RuntimeType) -> bool {
        if target == source || target.is_object() {
            return true;
        }

        let mut visited = FxHashSet::default();
        let mut stack: Vec<&RuntimeType> = vec![source];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for supertype in self.supertypes(current) {
                if supertype == target {
                    return true;
                }
                stack.push(supertype);
            }
        }
        false
    }

    fn members(&self, ty: &RuntimeType) -> Vec<MemberDescriptor> {
        self.types
            .get(ty)
            .map(|info| info.members.clone())
            .unwrap_or_default()
    }
}
