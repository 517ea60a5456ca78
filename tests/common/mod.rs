//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use typegraph::prelude::*;

/// Route `tracing` output through the test writer. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn output(name: &str) -> TypeRef {
    TypeRef::runtime(RuntimeType::named(name), TypeContext::Output)
}

pub fn syntax(name: &str) -> TypeRef {
    TypeRef::syntax(name, TypeContext::None)
}

pub fn string_scalar() -> TypeDescriptor {
    TypeDescriptor::new(ScalarType::new(SchemaTypeId::new("ScalarType<String>"), RuntimeType::named("String")))
}

/// An object type named `name` with no runtime type.
pub fn schema_object(name: &str) -> ObjectType {
    ObjectType::new(SchemaTypeId::new(name), RuntimeType::object()).named(name)
}

pub fn initialize(catalog: DescriptorCatalog, inspector: RuntimeTypeTable) -> Result<Arc<TypeGraph>, SchemaErrors> {
    init_tracing();
    TypeInitializer::builder()
        .with_catalog(catalog)
        .with_inspector(inspector)
        .build()
        .expect("initializer builds")
        .initialize()
}

pub fn codes(errors: &SchemaErrors) -> Vec<ErrorCode> {
    errors.iter().map(|e| e.code).collect()
}

/// Records every interceptor event as `event:name`.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Names recorded for one event, in order.
    pub fn names(&self, event: &str) -> Vec<String> {
        let prefix = format!("{event}:");
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    fn push(&self, event: &str, object: &TypeSystemObject) {
        let name = object.name().unwrap_or("?");
        self.events.lock().unwrap().push(format!("{event}:{name}"));
    }
}

impl TypeInterceptor for Recorder {
    fn trigger_aggregations(&self) -> bool {
        true
    }

    fn on_types_initialized(&mut self, registry: &TypeRegistry) {
        self.events.lock().unwrap().push(format!("initialized:{}", registry.len()));
    }

    fn on_after_complete_name(&mut self, object: &TypeSystemObject, _state: &TypeState) {
        self.push("named", object);
    }

    fn on_types_completed_name(&mut self, _registry: &TypeRegistry) {
        self.events.lock().unwrap().push("all_named".to_string());
    }

    fn on_after_complete_type(&mut self, object: &TypeSystemObject, _state: &TypeState) {
        self.push("completed", object);
    }

    fn on_types_completed(&mut self, _registry: &TypeRegistry) {
        self.events.lock().unwrap().push("all_completed".to_string());
    }
}
