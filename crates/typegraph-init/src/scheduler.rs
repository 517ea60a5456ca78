//! Dependency-ordered batch processing.
//!
//! One run walks every registered type for a single [`CompletionKind`] in
//! levels:
//!
//! 1. The first batch holds every type with no unprocessed dependency of the
//!    kind. Dependencies of the other kind are ignored.
//! 2. The action runs for each type of the batch; the type's references are
//!    then recorded as processed. A failing action marks the run failed but
//!    the rest of the batch still runs.
//! 3. The next batch holds every unprocessed type whose normalized
//!    dependencies are all processed. Normalization is recomputed per batch
//!    because earlier batches may register names that syntax references
//!    resolve through.
//! 4. The run stops when every type is processed, a batch failed, or no batch
//!    can be formed.
//!
//! When types remain but no batch can be formed the run reports one
//! `UnresolvedDependency` error per stuck type, listing the dependencies it
//! still waits on and, when it is part of one, the dependency cycle.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use typegraph_core::{CompletionKind, ErrorCode, SchemaError, TypeRef};
use typegraph_registry::{DependencyGraph, TypeRegistry, TypeSlot};

use crate::{ErrorAggregator, TypeLookup};

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchRun {
    /// Batches in the order they ran.
    pub batches: Vec<Vec<TypeSlot>>,
    /// Types that were never processed.
    pub unprocessed: Vec<TypeSlot>,
    pub success: bool,
}

impl BatchRun {
    pub fn processed(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

/// Run `action` over every registered type in dependency order for `kind`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn process_types<F>(
    registry: &mut TypeRegistry,
    kind: CompletionKind,
    errors: &mut ErrorAggregator,
    mut action: F,
) -> BatchRun
where
    F: FnMut(&mut TypeRegistry, TypeSlot, &mut ErrorAggregator) -> bool,
{
    let mut processed: FxHashSet<TypeRef> = FxHashSet::default();
    let mut done = vec![false; registry.len()];
    let mut remaining = registry.len();
    let mut run = BatchRun {
        success: true,
        ..BatchRun::default()
    };

    while remaining > 0 {
        let batch = next_batch(registry, kind, &processed, &done);
        if batch.is_empty() {
            break;
        }

        for &slot in &batch {
            if !action(registry, slot, errors) {
                run.success = false;
            }
            if let Some(ty) = registry.get(slot) {
                processed.extend(ty.references().iter().cloned());
            }
            done[slot.index()] = true;
            remaining -= 1;
        }
        debug!(%kind, batch = run.batches.len(), types = batch.len(), "processed batch");
        run.batches.push(batch);

        if !run.success {
            break;
        }
    }

    run.unprocessed = registry.slots().filter(|s| !done[s.index()]).collect();
    if run.success && !run.unprocessed.is_empty() {
        run.success = false;
        report_deadlock(registry, kind, &processed, &run.unprocessed, errors);
    }
    run
}

fn next_batch(
    registry: &TypeRegistry,
    kind: CompletionKind,
    processed: &FxHashSet<TypeRef>,
    done: &[bool],
) -> Vec<TypeSlot> {
    let lookup = TypeLookup::new(registry);
    registry
        .iter()
        .filter(|(slot, _)| !done[slot.index()])
        .filter(|(_, ty)| {
            ty.dependencies_of(kind)
                .all(|d| processed.contains(&lookup.normalize_or_keep(d)))
        })
        .map(|(slot, _)| slot)
        .collect()
}

fn report_deadlock(
    registry: &TypeRegistry,
    kind: CompletionKind,
    processed: &FxHashSet<TypeRef>,
    stuck: &[TypeSlot],
    errors: &mut ErrorAggregator,
) {
    let lookup = TypeLookup::new(registry);
    let graph = DependencyGraph::build(registry, kind, |r| lookup.find(r));
    let display = |reference: &TypeRef| match lookup.resolve(reference) {
        Some(ty) => ty.display_name(),
        None => reference.to_string(),
    };

    warn!(%kind, types = stuck.len(), cycles = graph.cycles().len(), "unable to resolve dependencies");

    for &slot in stuck {
        let Some(ty) = registry.get(slot) else {
            continue;
        };
        let missing: Vec<String> = lookup
            .normalize_all(ty.dependencies_of(kind))
            .iter()
            .filter(|r| !processed.contains(*r))
            .map(|r| display(r))
            .collect();
        let name = ty.display_name();
        let listed = missing
            .iter()
            .map(|m| format!("`{m}`"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut error = SchemaError::new(
            ErrorCode::UnresolvedDependency,
            format!("Unable to resolve dependencies {listed} for type `{name}`."),
        )
        .with_type(name)
        .with_extension("kind", kind.to_string())
        .with_extension("dependencies", missing.join(", "));

        if let Some(cycle) = graph.cycle_of(slot) {
            let members: Vec<String> = cycle
                .iter()
                .filter_map(|&s| registry.get(s))
                .map(|t| t.display_name())
                .collect();
            error = error.with_extension("cycle", members.join(" -> "));
        }
        errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use typegraph_core::{ObjectType, RuntimeType, SchemaTypeId, TypeContext, TypeDependency};
    use typegraph_registry::{DiscoveryContext, RegisteredType};

    fn output(name: &str) -> TypeRef {
        TypeRef::runtime(RuntimeType::named(name), TypeContext::Output)
    }

    fn register(registry: &mut TypeRegistry, name: &str, deps: Vec<TypeDependency>) -> TypeSlot {
        let object = ObjectType::new(SchemaTypeId::new(name), RuntimeType::named(name)).named(name);
        registry.register(RegisteredType::new(object.into(), [], deps, DiscoveryContext::default()))
    }

    #[test]
    fn processes_levels_in_dependency_order() {
        let mut registry = TypeRegistry::new();
        let a = register(&mut registry, "A", vec![TypeDependency::completed(output("B"))]);
        let b = register(&mut registry, "B", vec![TypeDependency::completed(output("C"))]);
        let c = register(&mut registry, "C", vec![]);
        let d = register(&mut registry, "D", vec![]);

        let mut errors = ErrorAggregator::new();
        let mut order = Vec::new();
        let run = process_types(&mut registry, CompletionKind::Completed, &mut errors, |_, slot, _| {
            order.push(slot);
            true
        });

        assert!(run.success);
        assert_eq!(run.batches, vec![vec![c, d], vec![b], vec![a]]);
        assert_eq!(order, vec![c, d, b, a]);
        assert!(errors.is_empty());
    }

    #[test]
    fn other_kinds_do_not_gate() {
        let mut registry = TypeRegistry::new();
        let a = register(&mut registry, "A", vec![TypeDependency::completed(output("B"))]);
        let b = register(&mut registry, "B", vec![TypeDependency::completed(output("A"))]);

        let mut errors = ErrorAggregator::new();
        let run = process_types(&mut registry, CompletionKind::Named, &mut errors, |_, _, _| true);
        assert!(run.success);
        assert_eq!(run.batches, vec![vec![a, b]]);
    }

    #[test]
    fn cycle_reports_each_stuck_type() {
        let mut registry = TypeRegistry::new();
        let a = register(&mut registry, "A", vec![TypeDependency::completed(output("B"))]);
        let b = register(&mut registry, "B", vec![TypeDependency::completed(output("A"))]);

        let mut errors = ErrorAggregator::new();
        let run = process_types(&mut registry, CompletionKind::Completed, &mut errors, |_, _, _| true);

        assert!(!run.success);
        assert!(run.batches.is_empty());
        assert_eq!(run.unprocessed, vec![a, b]);
        let messages: Vec<_> = errors.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Unable to resolve dependencies `B` for type `A`.",
                "Unable to resolve dependencies `A` for type `B`.",
            ]
        );
        assert_eq!(errors.errors()[0].extensions["cycle"], "A -> B");
    }

    #[test]
    fn missing_dependency_is_listed_by_reference() {
        let mut registry = TypeRegistry::new();
        register(&mut registry, "A", vec![TypeDependency::named(output("Ghost"))]);

        let mut errors = ErrorAggregator::new();
        let run = process_types(&mut registry, CompletionKind::Named, &mut errors, |_, _, _| true);

        assert!(!run.success);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].code, ErrorCode::UnresolvedDependency);
        assert_eq!(errors.errors()[0].extensions["dependencies"], "Ghost (output)");
        assert!(!errors.errors()[0].extensions.contains_key("cycle"));
    }

    #[test]
    fn failure_finishes_the_batch_then_stops() {
        let mut registry = TypeRegistry::new();
        let a = register(&mut registry, "A", vec![]);
        let b = register(&mut registry, "B", vec![]);
        let c = register(&mut registry, "C", vec![TypeDependency::completed(output("A"))]);

        let mut errors = ErrorAggregator::new();
        let mut seen = Vec::new();
        let run = process_types(&mut registry, CompletionKind::Completed, &mut errors, |_, slot, _| {
            seen.push(slot);
            slot != a
        });

        assert!(!run.success);
        assert_eq!(seen, vec![a, b]);
        assert_eq!(run.unprocessed, vec![c]);
        // a failed run does not add deadlock errors on top
        assert!(errors.is_empty());
    }

    #[test]
    fn syntax_dependencies_wait_for_names() {
        let mut registry = TypeRegistry::new();
        let a = register(
            &mut registry,
            "A",
            vec![TypeDependency::named(TypeRef::syntax("B", TypeContext::Output))],
        );
        let b = register(&mut registry, "B", vec![]);

        let mut errors = ErrorAggregator::new();
        let run = process_types(&mut registry, CompletionKind::Named, &mut errors, |registry, slot, _| {
            registry.register_name(slot).is_ok()
        });

        assert!(run.success);
        assert_eq!(run.batches, vec![vec![b], vec![a]]);
    }
}
