//! Type storage for one initialization run.
//!
//! - [`TypeRegistry`]: registered types with O(1) lookup by reference,
//!   runtime type and completed name
//! - [`RegisteredType`]: an immutable record, updated by re-registration
//! - [`DependencyGraph`]: petgraph view of one completion kind's dependencies

mod dependency_graph;
mod registered_type;
mod registry;

pub use dependency_graph::DependencyGraph;
pub use registered_type::{DiscoveryContext, RegisteredType};
pub use registry::{TypeRegistry, TypeSlot};
