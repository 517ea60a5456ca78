//! Run-scoped error collection.

use typegraph_core::{SchemaError, SchemaErrors};
use typegraph_registry::TypeRegistry;

/// Ordered list of every error reported during one initialization run.
///
/// Phases push into the aggregator and keep going; the pipeline checks it
/// with [`ensure_no_errors`](Self::ensure_no_errors) between phases.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    errors: Vec<SchemaError>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: SchemaError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = SchemaError>) {
        self.errors.extend(errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SchemaError] {
        &self.errors
    }

    /// Fail with every collected error plus the errors recorded in the
    /// discovery context of each registered type.
    pub fn ensure_no_errors(&self, registry: &TypeRegistry) -> Result<(), SchemaErrors> {
        let discovered = registry.types().flat_map(|t| t.discovery().errors.iter());
        let all: Vec<SchemaError> = self.errors.iter().chain(discovered).cloned().collect();
        if all.is_empty() {
            Ok(())
        } else {
            Err(SchemaErrors::new(all))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typegraph_core::{ErrorCode, ObjectType, RuntimeType, SchemaTypeId};
    use typegraph_registry::{DiscoveryContext, RegisteredType};

    #[test]
    fn empty_run_passes() {
        let errors = ErrorAggregator::new();
        assert!(errors.ensure_no_errors(&TypeRegistry::new()).is_ok());
    }

    #[test]
    fn includes_discovery_errors_after_collected_ones() {
        let mut registry = TypeRegistry::new();
        let discovery = DiscoveryContext {
            errors: vec![SchemaError::new(ErrorCode::Discovery, "bad field")],
            ..Default::default()
        };
        registry.register(RegisteredType::new(
            ObjectType::new(SchemaTypeId::new("ObjectType<User>"), RuntimeType::named("User")).into(),
            [],
            vec![],
            discovery,
        ));

        let mut errors = ErrorAggregator::new();
        errors.push(SchemaError::new(ErrorCode::DuplicateName, "taken"));

        let failure = errors.ensure_no_errors(&registry).unwrap_err();
        let codes: Vec<_> = failure.iter().map(|e| e.code).collect();
        assert_eq!(codes, [ErrorCode::DuplicateName, ErrorCode::Discovery]);
    }
}
