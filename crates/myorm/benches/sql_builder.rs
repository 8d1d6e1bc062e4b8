use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use myorm::prelude::*;

/// SELECT col0, col1, ... FROM `t` WHERE `col0` = ? AND `col1` = ? ...
fn build_select(n: usize) -> Query {
    let columns: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let mut q = table("t");
    q.select(&columns);
    for (i, col) in columns.iter().enumerate() {
        q.where_eq(col, i as i64);
    }
    q
}

fn model_registry(n: usize) -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry
        .register(
            Model::new("users")
                .alias("u")
                .fields((0..n).map(|i| format!("col{i}"))),
        )
        .register(
            Model::new("posts")
                .alias("p")
                .fields((0..n).map(|i| format!("col{i}")))
                .join("author", |q| {
                    q.left_join("u", "u.id", "=", "p.user_id");
                })
                .filter("published", |q| {
                    q.where_eq("p.status", "published");
                }),
        );
    registry
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/render");

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.build()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).build()));
        });
    }

    group.finish();
}

fn bench_where_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/where_in");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let built = table("t").where_in("id", values.iter().copied()).build();
                black_box(built)
            });
        });
    }

    group.finish();
}

fn bench_model_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/model_resolution");

    for n in [5, 20, 100] {
        let registry = model_registry(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &registry, |b, registry| {
            b.iter(|| {
                let built = registry.query("p").map(|q| q.build());
                black_box(built)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render,
    bench_build_and_render,
    bench_where_in,
    bench_model_resolution
);
criterion_main!(benches);
