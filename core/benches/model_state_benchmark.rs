use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use forzium_modelstate::api::*;
use serde_json::json;
use std::hint::black_box;
use std::time::Duration;

fn populated_store(items: usize) -> ModelStateDictionary {
    let mut state = ModelStateDictionary::new();
    for i in 0..items {
        let key = format!("Items[{}].Name", i);
        state.set_value(&key, ValueProviderResult::new(json!(format!("item-{}", i))));
        state.mark_field_valid(&key).unwrap();
    }
    state.mark_field_valid("Customer.Address.City").unwrap();
    state
}

fn benchmark_prefix_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefix_matching");

    let cases = [
        ("dotted", "Address", "Address.City"),
        ("indexer", "Items", "Items[10].Name"),
        ("leading_indexer", "Name", "[3].Name"),
        ("textual_reject", "Foo", "Foobar"),
        ("root", "", "Anything.Else"),
    ];

    for (name, prefix, candidate) in cases.iter() {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(is_prefix_match(black_box(prefix), black_box(candidate))));
        });
    }

    group.finish();
}

fn benchmark_field_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_validation_state");
    group.measurement_time(Duration::from_secs(5));

    for size in [10, 100, 1000].iter() {
        let state = populated_store(*size);

        group.bench_with_input(BenchmarkId::new("subtree", size), &state, |b, state| {
            b.iter(|| black_box(state.get_field_validation_state(black_box("Items"))));
        });

        group.bench_with_input(BenchmarkId::new("whole_store", size), &state, |b, state| {
            b.iter(|| black_box(state.is_valid()));
        });
    }

    group.finish();
}

fn benchmark_branching(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_on_write");
    let parent = populated_store(1000);

    group.bench_function("branch_read_only", |b| {
        b.iter(|| {
            let child = ModelStateDictionary::from_parent(black_box(&parent));
            black_box(child.get_validation_state("Items[500].Name"))
        });
    });

    group.bench_function("branch_then_write", |b| {
        b.iter(|| {
            let mut child = ModelStateDictionary::from_parent(black_box(&parent));
            child.add_error("Items[500].Name", "taken");
            black_box(child.error_count())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_prefix_matching,
    benchmark_field_state,
    benchmark_branching
);
criterion_main!(benches);
