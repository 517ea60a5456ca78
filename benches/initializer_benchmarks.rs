//! Benchmarks for the type-graph initialization pipeline.
//!
//! Measures full runs over synthetic schemas of growing size, with deep
//! dependency chains and with wide interface hierarchies.
//!
//! ## Profiling with Puffin
//!
//! Run with the `profile-with-puffin` feature to collect phase timings:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use typegraph::prelude::*;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

fn output(name: &str) -> TypeRef {
    TypeRef::runtime(RuntimeType::named(name), TypeContext::Output)
}

fn string_scalar() -> TypeDescriptor {
    TypeDescriptor::new(ScalarType::new(SchemaTypeId::new("ScalarType<String>"), RuntimeType::named("String")))
}

/// `size` object types, each with a few scalar fields and a link to the next.
fn flat_schema(size: usize) -> DescriptorCatalog {
    let mut catalog = DescriptorCatalog::new().with(string_scalar());
    for i in 0..size {
        let name = format!("Type{i}");
        let next = format!("Type{}", (i + 1) % size);
        let object = ObjectType::new(SchemaTypeId::new(format!("ObjectType<{name}>")), RuntimeType::named(name.as_str()))
            .field(FieldDefinition::new("id", output("String")))
            .field(FieldDefinition::new("label", output("String")))
            .field(FieldDefinition::new("next", output(&next)));
        catalog.add(TypeDescriptor::new(object));
    }
    catalog
}

/// A chain where every type must complete after the previous one.
fn chained_schema(depth: usize) -> DescriptorCatalog {
    let mut catalog = DescriptorCatalog::new().with(string_scalar());
    for i in 0..depth {
        let name = format!("Link{i}");
        let object = ObjectType::new(SchemaTypeId::new(name.as_str()), RuntimeType::object())
            .named(name.as_str())
            .field(FieldDefinition::new("id", output("String")));
        let mut descriptor = TypeDescriptor::new(object);
        if i > 0 {
            let previous = SchemaTypeId::new(format!("Link{}", i - 1));
            descriptor = descriptor.dependency(TypeDependency::completed(TypeRef::schema(previous)));
        }
        catalog.add(descriptor);
    }
    catalog
}

/// `width` objects each implementing `interfaces` interfaces implicitly.
fn interface_schema(width: usize, interfaces: usize) -> (DescriptorCatalog, RuntimeTypeTable) {
    let mut catalog = DescriptorCatalog::new().with(string_scalar());
    let mut table = RuntimeTypeTable::new();
    for j in 0..interfaces {
        let name = format!("INode{j}");
        let interface = InterfaceType::new(SchemaTypeId::new(format!("InterfaceType<{name}>")), RuntimeType::named(name.as_str()))
            .field(FieldDefinition::new("id", output("String")));
        catalog.add(TypeDescriptor::new(interface));
    }
    for i in 0..width {
        let name = format!("Entity{i}");
        let object = ObjectType::new(SchemaTypeId::new(format!("ObjectType<{name}>")), RuntimeType::named(name.as_str()))
            .field(FieldDefinition::new("id", output("String")));
        catalog.add(TypeDescriptor::new(object));
        for j in 0..interfaces {
            table.implements(RuntimeType::named(name.as_str()), RuntimeType::named(format!("INode{j}")));
        }
    }
    (catalog, table)
}

fn run(catalog: DescriptorCatalog, table: RuntimeTypeTable) -> usize {
    let graph = TypeInitializer::builder()
        .with_catalog(catalog)
        .with_inspector(table)
        .build()
        .unwrap()
        .initialize()
        .unwrap();
    end_profiling_frame();
    graph.len()
}

fn schema_size_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("initialize/flat");
    for size in [10, 100, 1000] {
        let catalog = flat_schema(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| black_box(run(catalog.clone(), RuntimeTypeTable::new())));
        });
    }
    group.finish();
}

fn dependency_depth_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("initialize/chain");
    for depth in [10, 100, 500] {
        let catalog = chained_schema(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &catalog, |b, catalog| {
            b.iter(|| black_box(run(catalog.clone(), RuntimeTypeTable::new())));
        });
    }
    group.finish();
}

fn interface_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("initialize/interfaces");
    for (width, interfaces) in [(50, 2), (200, 5)] {
        let (catalog, table) = interface_schema(width, interfaces);
        group.bench_function(format!("{width}x{interfaces}"), |b| {
            b.iter(|| black_box(run(catalog.clone(), table.clone())));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    schema_size_benchmarks,
    dependency_depth_benchmarks,
    interface_benchmarks
);
criterion_main!(benches);
