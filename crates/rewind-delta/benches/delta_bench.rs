//! Benchmarks for the structural delta engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rewind_delta::{DeltaEngine, StructuralEngine};
use serde_json::{json, Value};

/// Build a wide-ish nested state with `slices` top-level keys
fn sample_state(slices: usize, revision: usize) -> Value {
    let mut root = serde_json::Map::new();
    for i in 0..slices {
        root.insert(
            format!("slice{i}"),
            json!({
                "counter": i * 10 + revision,
                "label": format!("entry-{i}"),
                "items": [i, i + 1, i + 2],
                "nested": {"enabled": i % 2 == 0, "revision": revision},
            }),
        );
    }
    Value::Object(root)
}

fn bench_diff(c: &mut Criterion) {
    let engine = StructuralEngine::new();
    let before = sample_state(32, 0);
    let after = sample_state(32, 1);

    c.bench_function("diff_32_slices", |b| {
        b.iter(|| engine.diff(black_box(&before), black_box(&after)));
    });
}

fn bench_patch(c: &mut Criterion) {
    let engine = StructuralEngine::new();
    let before = sample_state(32, 0);
    let after = sample_state(32, 1);
    let delta = engine.diff(&before, &after);

    c.bench_function("patch_32_slices", |b| {
        b.iter(|| {
            engine
                .patch(black_box(before.clone()), black_box(&delta))
                .unwrap()
        });
    });
}

fn bench_reverse(c: &mut Criterion) {
    let engine = StructuralEngine::new();
    let before = sample_state(32, 0);
    let after = sample_state(32, 1);
    let delta = engine.diff(&before, &after);

    c.bench_function("reverse_32_slices", |b| {
        b.iter(|| engine.reverse(black_box(&delta)));
    });
}

criterion_group!(benches, bench_diff, bench_patch, bench_reverse);
criterion_main!(benches);
