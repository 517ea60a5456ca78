//! Hooks into the initialization pipeline.

use typegraph_core::TypeSystemObject;
use typegraph_registry::TypeRegistry;

use crate::TypeState;

/// Observes types as they move through the pipeline.
///
/// Per-type hooks always fire. Aggregate hooks (`on_types_*`) only fire when
/// [`trigger_aggregations`](Self::trigger_aggregations) returns true.
pub trait TypeInterceptor {
    fn trigger_aggregations(&self) -> bool {
        false
    }

    /// Discovery finished.
    fn on_types_initialized(&mut self, _registry: &TypeRegistry) {}

    fn on_after_complete_name(&mut self, _object: &TypeSystemObject, _state: &TypeState) {}

    /// Every type completed its name. Extensions are not merged yet.
    fn on_types_completed_name(&mut self, _registry: &TypeRegistry) {}

    fn on_after_complete_type(&mut self, _object: &TypeSystemObject, _state: &TypeState) {}

    /// Every type completed.
    fn on_types_completed(&mut self, _registry: &TypeRegistry) {}
}

/// Interceptor that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInterceptor;

impl TypeInterceptor for NoopInterceptor {}
