//! Per-type completion state and the view handed to completion functions.

use indexmap::IndexMap;

use typegraph_core::{
    FieldDelegate, FieldMiddleware, FieldReference, FieldResolver, IsOfTypeFallback,
    RegisteredResolver, SchemaError, TypeRef, TypeStatus,
};
use typegraph_registry::{RegisteredType, TypeSlot};

use crate::{ErrorAggregator, NamingConventions, SchemaHandle, TypeLookup};

/// State of one type, created when it enters name completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeState {
    status: TypeStatus,
    pub is_query_type: bool,
    pub alternate_names: Vec<String>,
}

impl TypeState {
    pub fn new(alternate_names: Vec<String>) -> Self {
        Self {
            alternate_names,
            ..Self::default()
        }
    }

    pub fn status(&self) -> TypeStatus {
        self.status
    }

    /// Move to `status`. Returns false, leaving the state unchanged, if that
    /// would move backwards.
    pub fn advance(&mut self, status: TypeStatus) -> bool {
        if status < self.status {
            return false;
        }
        self.status = status;
        true
    }

    pub fn add_alternate_names<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) {
        for name in names {
            if !self.alternate_names.contains(name) {
                self.alternate_names.push(name.clone());
            }
        }
    }
}

/// Everything a completion function may see while completing one type.
///
/// Borrows the registry through `lookup`, so the registry only changes once
/// the context is dropped and the completed object is re-registered.
pub struct CompletionContext<'a> {
    pub(crate) slot: TypeSlot,
    pub(crate) state: &'a mut TypeState,
    pub(crate) lookup: TypeLookup<'a>,
    pub(crate) resolvers: &'a IndexMap<FieldReference, RegisteredResolver>,
    pub(crate) middleware: &'a [FieldMiddleware],
    pub(crate) is_of_type: &'a IsOfTypeFallback,
    pub(crate) schema: &'a SchemaHandle,
    pub(crate) naming: &'a NamingConventions,
    pub(crate) errors: &'a mut ErrorAggregator,
    reported: usize,
}

impl<'a> CompletionContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        slot: TypeSlot,
        state: &'a mut TypeState,
        lookup: TypeLookup<'a>,
        resolvers: &'a IndexMap<FieldReference, RegisteredResolver>,
        middleware: &'a [FieldMiddleware],
        is_of_type: &'a IsOfTypeFallback,
        schema: &'a SchemaHandle,
        naming: &'a NamingConventions,
        errors: &'a mut ErrorAggregator,
    ) -> Self {
        Self {
            slot,
            state,
            lookup,
            resolvers,
            middleware,
            is_of_type,
            schema,
            naming,
            errors,
            reported: 0,
        }
    }

    pub fn slot(&self) -> TypeSlot {
        self.slot
    }

    pub fn state(&self) -> &TypeState {
        self.state
    }

    pub fn schema(&self) -> &SchemaHandle {
        self.schema
    }

    pub fn naming(&self) -> &NamingConventions {
        self.naming
    }

    /// The registered type `reference` denotes.
    pub fn resolve_type(&self, reference: &TypeRef) -> Option<&'a RegisteredType> {
        self.lookup.resolve(reference)
    }

    /// Compiled resolver bound to `field`, if any.
    pub fn resolver(&self, field: &FieldReference) -> Option<&'a FieldResolver> {
        self.resolvers.get(field).and_then(|r| r.field.compiled())
    }

    pub fn report(&mut self, error: SchemaError) {
        self.reported += 1;
        self.errors.push(error);
    }

    /// Errors reported through this context.
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Wrap `resolver` in the global middleware. The first middleware is the
    /// outermost.
    pub fn build_pipeline(&self, resolver: FieldResolver) -> FieldDelegate {
        self.middleware
            .iter()
            .rev()
            .fold(resolver, |next, middleware| middleware(next))
    }
}
