//! The initialization pipeline.
//!
//! [`TypeInitializerBuilder`] wires the collaborators; [`TypeInitializer`]
//! runs every phase in order and either returns the completed
//! [`TypeGraph`] or every error collected up to the first failing check.
//!
//! Phases:
//!
//! 1. discovery from the seed references
//! 2. implicit resolver registration and implicit interface linking
//! 3. name completion in `Named` dependency order
//! 4. extension merging
//! 5. external resolver binding and resolver compilation
//! 6. structural completion in `Completed` dependency order
//! 7. validation
//!
//! Errors are checked after discovery, naming, merging, compilation and
//! completion.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use typegraph_core::{
    CompletionKind, ErrorCode, FieldBinding, FieldDelegate, FieldMiddleware, FieldReference,
    FieldResolver, InitError, IsOfTypeFallback, SchemaError, SchemaErrors, TypeInspector, TypeKind,
    TypeRef, TypeStatus, TypeSystemObject, Value, typename_is_of_type,
};
use typegraph_registry::{TypeRegistry, TypeSlot};

use crate::{
    CompletionContext, DefaultValidator, DescriptorCatalog, DescriptorProvider, ErrorAggregator,
    NoopInterceptor, ResolverMap, ResolverProvider, SchemaHandle, SchemaOptions, SchemaValidator,
    TypeDiscoverer, TypeGraph, TypeInterceptor, TypeLookup, TypeState, compile_resolvers,
    complete_name, complete_type, link_implicit_interfaces, merge_extensions, process_types,
    register_external_resolvers, register_resolvers,
};

/// Decides which object type is the query root.
pub type QueryTypePredicate = Box<dyn Fn(&TypeSystemObject) -> bool + Send + Sync>;

type TypeStates = FxHashMap<TypeSlot, TypeState>;

fn default_query_type(object: &TypeSystemObject) -> bool {
    object.kind() == TypeKind::Object && !object.is_extension() && object.name() == Some("Query")
}

/// Builder for [`TypeInitializer`].
pub struct TypeInitializerBuilder {
    seeds: Vec<TypeRef>,
    descriptors: Option<Box<dyn DescriptorProvider>>,
    inspector: Option<Box<dyn TypeInspector>>,
    resolver_providers: Vec<ResolverProvider>,
    middleware: Vec<FieldMiddleware>,
    is_of_type: Option<IsOfTypeFallback>,
    query_type: Option<QueryTypePredicate>,
    interceptor: Option<Box<dyn TypeInterceptor>>,
    validator: Option<Box<dyn SchemaValidator>>,
    options: SchemaOptions,
    schema: Option<SchemaHandle>,
}

impl TypeInitializerBuilder {
    pub fn new() -> Self {
        Self {
            seeds: Vec::new(),
            descriptors: None,
            inspector: None,
            resolver_providers: Vec::new(),
            middleware: Vec::new(),
            is_of_type: None,
            query_type: None,
            interceptor: None,
            validator: None,
            options: SchemaOptions::default(),
            schema: None,
        }
    }

    pub fn with_seed(mut self, reference: TypeRef) -> Self {
        self.seeds.push(reference);
        self
    }

    pub fn with_seeds<I>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = TypeRef>,
    {
        self.seeds.extend(references);
        self
    }

    pub fn with_descriptors<P>(mut self, provider: P) -> Self
    where
        P: DescriptorProvider + 'static,
    {
        self.descriptors = Some(Box::new(provider));
        self
    }

    /// Use `catalog` as the descriptor provider and seed every type it holds.
    pub fn with_catalog(self, catalog: DescriptorCatalog) -> Self {
        let seeds = catalog.schema_references();
        self.with_seeds(seeds).with_descriptors(catalog)
    }

    pub fn with_inspector<I>(mut self, inspector: I) -> Self
    where
        I: TypeInspector + 'static,
    {
        self.inspector = Some(Box::new(inspector));
        self
    }

    pub fn with_resolver_provider(mut self, provider: ResolverProvider) -> Self {
        self.resolver_providers.push(provider);
        self
    }

    /// Append a field middleware. Middleware added first runs outermost.
    pub fn with_middleware<F>(mut self, middleware: F) -> Self
    where
        F: Fn(FieldDelegate) -> FieldDelegate + Send + Sync + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn with_is_of_type<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&str, &Value) -> bool + Send + Sync + 'static,
    {
        self.is_of_type = Some(Arc::new(fallback));
        self
    }

    pub fn with_query_type<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TypeSystemObject) -> bool + Send + Sync + 'static,
    {
        self.query_type = Some(Box::new(predicate));
        self
    }

    pub fn with_interceptor<I>(mut self, interceptor: I) -> Self
    where
        I: TypeInterceptor + 'static,
    {
        self.interceptor = Some(Box::new(interceptor));
        self
    }

    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: SchemaValidator + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn with_options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    /// Publish the completed graph through `schema`.
    pub fn with_schema_handle(mut self, schema: SchemaHandle) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn build(self) -> Result<TypeInitializer, InitError> {
        let descriptors = self.descriptors.ok_or(InitError::MissingComponent("descriptor provider"))?;
        let inspector = self.inspector.ok_or(InitError::MissingComponent("type inspector"))?;
        let schema = self.schema.unwrap_or_default();
        if schema.is_bound() {
            return Err(InitError::SchemaAlreadyBound);
        }

        Ok(TypeInitializer {
            seeds: self.seeds,
            descriptors,
            inspector,
            resolver_providers: self.resolver_providers,
            middleware: self.middleware,
            is_of_type: self.is_of_type.unwrap_or_else(typename_is_of_type),
            query_type: self.query_type.unwrap_or_else(|| Box::new(default_query_type)),
            interceptor: self.interceptor.unwrap_or_else(|| Box::new(NoopInterceptor)),
            validator: self.validator.unwrap_or_else(|| Box::new(DefaultValidator)),
            options: self.options,
            schema,
        })
    }
}

impl Default for TypeInitializerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One initialization run. Consumed by [`initialize`](Self::initialize).
pub struct TypeInitializer {
    seeds: Vec<TypeRef>,
    descriptors: Box<dyn DescriptorProvider>,
    inspector: Box<dyn TypeInspector>,
    resolver_providers: Vec<ResolverProvider>,
    middleware: Vec<FieldMiddleware>,
    is_of_type: IsOfTypeFallback,
    query_type: QueryTypePredicate,
    interceptor: Box<dyn TypeInterceptor>,
    validator: Box<dyn SchemaValidator>,
    options: SchemaOptions,
    schema: SchemaHandle,
}

impl TypeInitializer {
    pub fn builder() -> TypeInitializerBuilder {
        TypeInitializerBuilder::new()
    }

    /// Handle the graph is published through on success.
    pub fn schema(&self) -> &SchemaHandle {
        &self.schema
    }

    /// Run every phase.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn initialize(mut self) -> Result<Arc<TypeGraph>, SchemaErrors> {
        info!(seeds = self.seeds.len(), "initializing type graph");
        let mut registry = TypeRegistry::new();
        let mut errors = ErrorAggregator::new();
        let mut states = TypeStates::default();

        self.discover(&mut registry, &mut errors);
        errors.ensure_no_errors(&registry)?;
        if self.interceptor.trigger_aggregations() {
            self.interceptor.on_types_initialized(&registry);
        }

        let mut resolvers = ResolverMap::new();
        let implicit = register_resolvers(&registry, &mut resolvers);
        let links = link_implicit_interfaces(&mut registry, self.inspector.as_ref());
        debug!(resolvers = implicit, links, "prepared registry");

        self.complete_names(&mut registry, &mut states, &resolvers, &mut errors);
        errors.ensure_no_errors(&registry)?;
        if self.interceptor.trigger_aggregations() {
            self.interceptor.on_types_completed_name(&registry);
        }

        merge_extensions(
            &mut registry,
            &mut resolvers,
            &mut states,
            self.options.unmatched_extensions,
            &mut errors,
        );
        errors.ensure_no_errors(&registry)?;

        register_external_resolvers(
            &registry,
            &self.resolver_providers,
            self.inspector.as_ref(),
            &self.options.naming,
            &mut resolvers,
        );
        compile_resolvers(&mut resolvers, self.inspector.as_ref(), &mut errors);
        errors.ensure_no_errors(&registry)?;

        self.complete_types(&mut registry, &mut states, &resolvers, &mut errors);
        errors.ensure_no_errors(&registry)?;
        if self.interceptor.trigger_aggregations() {
            self.interceptor.on_types_completed(&registry);
        }

        if self.options.validate {
            errors.extend(self.validator.validate(&registry));
            errors.ensure_no_errors(&registry)?;
        }

        let graph = Arc::new(self.build_graph(registry, resolvers, &states));
        self.schema.bind(Arc::clone(&graph)).map_err(|err| {
            SchemaErrors::from(SchemaError::new(ErrorCode::InvalidStructure, err.to_string()))
        })?;
        info!(types = graph.len(), "initialized type graph");
        Ok(graph)
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn discover(&self, registry: &mut TypeRegistry, errors: &mut ErrorAggregator) {
        let found = TypeDiscoverer::new(registry, self.descriptors.as_ref()).discover(&self.seeds);
        errors.extend(found);
        debug!(types = registry.len(), "discovered types");
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn complete_names(
        &mut self,
        registry: &mut TypeRegistry,
        states: &mut TypeStates,
        resolvers: &ResolverMap,
        errors: &mut ErrorAggregator,
    ) {
        let naming = &self.options.naming;
        let middleware = &self.middleware;
        let is_of_type = &self.is_of_type;
        let schema = &self.schema;
        let interceptor = &mut self.interceptor;

        let run = process_types(registry, CompletionKind::Named, errors, |registry, slot, errors| {
            let Some(ty) = registry.get(slot) else {
                return false;
            };
            let mut object = ty.object().clone();
            let state = states
                .entry(slot)
                .or_insert_with(|| TypeState::new(ty.discovery().alternate_names.clone()));

            let mut ctx = CompletionContext::new(
                slot,
                state,
                TypeLookup::new(registry),
                resolvers,
                middleware,
                is_of_type,
                schema,
                naming,
                errors,
            );
            if !complete_name(&mut ctx, &mut object) {
                return false;
            }
            drop(ctx);

            let updated = ty.clone().with_object(object);
            registry.register(updated);
            if let Err(existing) = registry.register_name(slot) {
                errors.push(duplicate_name(registry, slot, existing));
                return false;
            }

            state.advance(TypeStatus::Named);
            if let Some(ty) = registry.get(slot) {
                interceptor.on_after_complete_name(ty.object(), state);
            }
            true
        });
        debug!(batches = run.batches.len(), processed = run.processed(), "completed names");
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn complete_types(
        &mut self,
        registry: &mut TypeRegistry,
        states: &mut TypeStates,
        resolvers: &ResolverMap,
        errors: &mut ErrorAggregator,
    ) {
        let naming = &self.options.naming;
        let middleware = &self.middleware;
        let is_of_type = &self.is_of_type;
        let schema = &self.schema;
        let query_type = &self.query_type;
        let interceptor = &mut self.interceptor;

        let run = process_types(registry, CompletionKind::Completed, errors, |registry, slot, errors| {
            let Some(ty) = registry.get(slot) else {
                return false;
            };
            // merged into their base types
            if ty.is_extension() {
                return true;
            }
            let mut object = ty.object().clone();
            let state = states.entry(slot).or_default();
            state.is_query_type = query_type(&object);

            let mut ctx = CompletionContext::new(
                slot,
                state,
                TypeLookup::new(registry),
                resolvers,
                middleware,
                is_of_type,
                schema,
                naming,
                errors,
            );
            let completed = complete_type(&mut ctx, &mut object);
            drop(ctx);

            let updated = ty.clone().with_object(object);
            registry.register(updated);
            if !completed {
                return false;
            }

            state.advance(TypeStatus::Completed);
            if let Some(ty) = registry.get(slot) {
                interceptor.on_after_complete_type(ty.object(), state);
            }
            true
        });
        debug!(batches = run.batches.len(), processed = run.processed(), "completed types");
    }

    fn build_graph(&self, registry: TypeRegistry, resolvers: ResolverMap, states: &TypeStates) -> TypeGraph {
        let compiled: IndexMap<FieldReference, FieldResolver> = resolvers
            .into_iter()
            .filter_map(|(field, resolver)| match resolver.field {
                FieldBinding::Compiled(compiled) => Some((field, compiled)),
                FieldBinding::Member(_) => None,
            })
            .collect();

        let mut slots: Vec<TypeSlot> = states.keys().copied().collect();
        slots.sort();
        let mut alternate_names: FxHashMap<String, TypeSlot> = FxHashMap::default();
        for slot in slots {
            if !registry.get(slot).is_some_and(|t| t.is_named_type()) {
                continue;
            }
            for name in &states[&slot].alternate_names {
                alternate_names.entry(name.clone()).or_insert(slot);
            }
        }

        TypeGraph::new(registry, compiled, alternate_names)
    }
}

fn duplicate_name(registry: &TypeRegistry, slot: TypeSlot, existing: TypeSlot) -> SchemaError {
    let name = registry
        .get(slot)
        .map(|t| t.display_name())
        .unwrap_or_default();
    let other = registry
        .get(existing)
        .map(|t| t.object().id().to_string())
        .unwrap_or_default();
    SchemaError::new(
        ErrorCode::DuplicateName,
        format!("The name `{name}` was already registered by another type."),
    )
    .with_type(name)
    .with_extension("registeredBy", other)
}
