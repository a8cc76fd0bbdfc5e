//! Criterion benchmarks for the query pipeline on the reference grid.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use gridclip_bench::{batch, random_lines, random_points, random_polygons, reference_profile, REFERENCE_SIDE};
use gridclip_engine::{Engine, IntersectOptions};

const EXTENT: f64 = REFERENCE_SIDE as f64;

fn engine(use_index: bool) -> Engine {
    Engine::new(Arc::new(reference_profile()), use_index, false).unwrap()
}

/// Benchmark: candidates for 1000 points and 100 rectangles.
fn bench_candidates(c: &mut Criterion) {
    let e = engine(true);
    let points = batch(random_points(1000, EXTENT, 42));
    let polys = batch(random_polygons(100, 5.0, EXTENT, 42));
    c.bench_function("candidates_points_1k", |b| {
        b.iter(|| black_box(e.query_candidates(points.clone()).unwrap()));
    });
    c.bench_function("candidates_polygons_100", |b| {
        b.iter(|| black_box(e.query_candidates(polys.clone()).unwrap()));
    });
}

/// Benchmark: locate 10K points.
fn bench_point_to_cell(c: &mut Criterion) {
    let e = engine(true);
    let points = batch(random_points(10_000, EXTENT, 7));
    c.bench_function("point_to_cell_10k", |b| {
        b.iter(|| black_box(e.query_point_to_cell(points.clone(), false).unwrap()));
    });
}

/// Benchmark: clip lines and polygons, indexed and scanning.
fn bench_intersection(c: &mut Criterion) {
    let opts = IntersectOptions::default();
    let lines = batch(random_lines(50, 20, 3.0, EXTENT, 3));
    let polys = batch(random_polygons(50, 5.0, EXTENT, 3));
    for use_index in [true, false] {
        let e = engine(use_index);
        let suffix = if use_index { "indexed" } else { "scan" };
        c.bench_function(&format!("intersect_lines_50_{suffix}"), |b| {
            b.iter(|| black_box(e.query_intersection_many(&lines, &opts).unwrap()));
        });
        c.bench_function(&format!("intersect_polygons_50_{suffix}"), |b| {
            b.iter(|| black_box(e.query_intersection_many(&polys, &opts).unwrap()));
        });
    }
}

criterion_group!(
    benches,
    bench_candidates,
    bench_point_to_cell,
    bench_intersection
);
criterion_main!(benches);
