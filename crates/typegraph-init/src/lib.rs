//! Type-graph initialization pipeline.
//!
//! Turns a set of seed references into a completed [`TypeGraph`]:
//!
//! - [`TypeDiscoverer`]: breadth-first discovery through a [`DescriptorProvider`]
//! - [`process_types`]: dependency-ordered batches for one completion kind
//! - [`complete_name`] / [`complete_type`]: per-type completion
//! - [`merge_extensions`]: folds extensions into their base types
//! - [`register_resolvers`], [`register_external_resolvers`],
//!   [`compile_resolvers`]: resolver binding and compilation
//! - [`TypeInitializer`]: runs every phase and publishes the graph

mod completion;
mod context;
mod descriptor;
mod discovery;
mod errors;
mod extensions;
mod graph;
mod initializer;
mod interceptor;
mod interfaces;
mod lookup;
mod options;
mod resolvers;
mod scheduler;
mod validation;

pub use completion::{complete_name, complete_type};
pub use context::{CompletionContext, TypeState};
pub use descriptor::{DescriptorCatalog, DescriptorProvider, TypeDescriptor};
pub use discovery::TypeDiscoverer;
pub use errors::ErrorAggregator;
pub use extensions::{MergeOutcome, merge_extensions, merge_object};
pub use graph::{SchemaHandle, TypeGraph};
pub use initializer::{QueryTypePredicate, TypeInitializer, TypeInitializerBuilder};
pub use interceptor::{NoopInterceptor, TypeInterceptor};
pub use interfaces::link_implicit_interfaces;
pub use lookup::TypeLookup;
pub use options::{NamingConventions, SchemaOptions, UnmatchedExtensionPolicy};
pub use resolvers::{
    ResolverMap, ResolverProvider, ResolverTarget, compile_resolvers, register_external_resolvers,
    register_resolvers,
};
pub use scheduler::{BatchRun, process_types};
pub use validation::{DefaultValidator, SchemaValidator};
