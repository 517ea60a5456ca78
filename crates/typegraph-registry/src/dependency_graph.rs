//! Dependency Graph - one completion kind's dependency edges as a petgraph.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: one per registered type, node index == slot index
//! - Edges: `dependent -> dependency` for every dependency of the chosen kind
//!   that resolves to a registered type
//!
//! The batch processor schedules without this graph; it is built when a run
//! deadlocks to explain which types wait on each other.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use typegraph_core::{CompletionKind, TypeRef};

use crate::{TypeRegistry, TypeSlot};

/// Dependency edges of one completion kind.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<TypeSlot, ()>,
    /// Slot -> index of its cycle in `cycles`.
    cycle_of: FxHashMap<TypeSlot, usize>,
    cycles: Vec<Vec<TypeSlot>>,
}

impl DependencyGraph {
    /// Build the graph for `kind`, resolving dependency references with `resolve`.
    ///
    /// Dependencies `resolve` cannot map to a slot produce no edge.
    pub fn build(
        registry: &TypeRegistry,
        kind: CompletionKind,
        resolve: impl Fn(&TypeRef) -> Option<TypeSlot>,
    ) -> Self {
        let mut graph = DiGraph::with_capacity(registry.len(), registry.len());
        for slot in registry.slots() {
            graph.add_node(slot);
        }

        for (slot, ty) in registry.iter() {
            for reference in ty.dependencies_of(kind) {
                if let Some(target) = resolve(reference) {
                    let from = NodeIndex::new(slot.index());
                    let to = NodeIndex::new(target.index());
                    if graph.find_edge(from, to).is_none() {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        let mut cycles: Vec<Vec<TypeSlot>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&n| graph.find_edge(n, n).is_some())
            })
            .map(|component| {
                let mut slots: Vec<TypeSlot> = component.iter().map(|&n| graph[n]).collect();
                slots.sort();
                slots
            })
            .collect();
        cycles.sort();

        let mut cycle_of = FxHashMap::default();
        for (index, cycle) in cycles.iter().enumerate() {
            for &slot in cycle {
                cycle_of.insert(slot, index);
            }
        }

        Self {
            graph,
            cycle_of,
            cycles,
        }
    }

    /// Every dependency cycle, each sorted by slot.
    pub fn cycles(&self) -> &[Vec<TypeSlot>] {
        &self.cycles
    }

    /// The cycle `slot` is part of, if any.
    pub fn cycle_of(&self, slot: TypeSlot) -> Option<&[TypeSlot]> {
        self.cycle_of
            .get(&slot)
            .map(|&index| self.cycles[index].as_slice())
    }

    /// Direct dependencies of `slot`.
    pub fn dependencies(&self, slot: TypeSlot) -> impl Iterator<Item = TypeSlot> + '_ {
        self.graph
            .neighbors(NodeIndex::new(slot.index()))
            .map(|n| self.graph[n])
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiscoveryContext, RegisteredType};
    use typegraph_core::{ObjectType, RuntimeType, SchemaTypeId, TypeDependency, TypeSystemObject};

    fn schema_ref(name: &str) -> TypeRef {
        TypeRef::schema(SchemaTypeId::new(name))
    }

    fn register(registry: &mut TypeRegistry, name: &str, deps: &[&str]) -> TypeSlot {
        let object: TypeSystemObject =
            ObjectType::new(SchemaTypeId::new(name), RuntimeType::named(name)).into();
        let deps = deps
            .iter()
            .map(|d| TypeDependency::completed(schema_ref(d)))
            .collect();
        registry.register(RegisteredType::new(object, [], deps, DiscoveryContext::default()))
    }

    #[test]
    fn finds_two_type_cycle() {
        let mut registry = TypeRegistry::new();
        let a = register(&mut registry, "A", &["B"]);
        let b = register(&mut registry, "B", &["A"]);
        let c = register(&mut registry, "C", &["A"]);

        let graph = DependencyGraph::build(&registry, CompletionKind::Completed, |r| registry.find(r));

        assert_eq!(graph.cycles(), &[vec![a, b]]);
        assert_eq!(graph.cycle_of(a), Some(&[a, b][..]));
        assert_eq!(graph.cycle_of(c), None);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut registry = TypeRegistry::new();
        let a = register(&mut registry, "A", &["A"]);
        let graph = DependencyGraph::build(&registry, CompletionKind::Completed, |r| registry.find(r));
        assert_eq!(graph.cycles(), &[vec![a]]);
    }

    #[test]
    fn other_kinds_are_ignored() {
        let mut registry = TypeRegistry::new();
        register(&mut registry, "A", &["B"]);
        register(&mut registry, "B", &["A"]);
        let graph = DependencyGraph::build(&registry, CompletionKind::Named, |r| registry.find(r));
        assert!(graph.cycles().is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn unresolved_dependencies_have_no_edges() {
        let mut registry = TypeRegistry::new();
        let a = register(&mut registry, "A", &["Ghost"]);
        let graph = DependencyGraph::build(&registry, CompletionKind::Completed, |r| registry.find(r));
        assert_eq!(graph.dependencies(a).count(), 0);
    }
}
