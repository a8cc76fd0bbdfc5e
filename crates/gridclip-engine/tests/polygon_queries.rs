//! Integration test: polygon clipping, holes and the area filters.

use std::sync::Arc;

use approx::assert_relative_eq;
use geo::{polygon, Geometry, LineString, MultiPolygon, Polygon};
use gridclip_core::Shape;
use gridclip_engine::{Engine, IntersectOptions};
use gridclip_space::GridSource;
use gridclip_table::ResultTable;
use gridclip_test_utils::{rect_grid, tri_grid, unit_grid};

fn engine(grid: impl GridSource + 'static) -> Engine {
    Engine::new(Arc::new(grid), true, false).unwrap()
}

fn ids(t: &ResultTable) -> Vec<usize> {
    t.cellids().iter().map(|c| c.unwrap().0).collect()
}

fn intersect(e: &Engine, shape: impl Into<Shape>, opts: IntersectOptions) -> ResultTable {
    e.query_intersection(shape.into(), &opts).unwrap()
}

fn ring(xy: &[(f64, f64)]) -> LineString<f64> {
    xy.iter().copied().collect()
}

/// An L-shaped notch: outline 5..25 x -5..15 with a hole 9..21 x -1..11.
fn notched() -> Polygon<f64> {
    Polygon::new(
        ring(&[(5.0, 5.0), (5.0, 15.0), (25.0, 15.0), (25.0, -5.0), (5.0, -5.0)]),
        vec![ring(&[(9.0, -1.0), (9.0, 11.0), (21.0, 11.0), (21.0, -1.0)])],
    )
}

// ── Structured grid ──────────────────────────────────────────

#[test]
fn rect_polygon_with_hole() {
    let t = intersect(&engine(rect_grid()), notched(), IntersectOptions::default());
    assert_eq!(ids(&t), vec![0, 1, 2]);
    assert_relative_eq!(t.total_area(), 104.0, epsilon = 1e-9);
    let areas: Vec<f64> = t.areas().unwrap().iter().map(|a| a.unwrap()).collect();
    assert_relative_eq!(areas[0], 24.0, epsilon = 1e-9);
    assert_relative_eq!(areas[1], 40.0, epsilon = 1e-9);
    assert_relative_eq!(areas[2], 40.0, epsilon = 1e-9);
}

#[test]
fn rect_polygon_min_area() {
    let t = intersect(
        &engine(rect_grid()),
        notched(),
        IntersectOptions::default().with_min_area_fraction(0.39),
    );
    assert_eq!(ids(&t), vec![1, 2]);
}

#[test]
fn rect_polygon_contains_centroid() {
    let shape = Polygon::new(
        ring(&[(6.0, 5.0), (4.0, 16.0), (25.0, 14.0), (25.0, -5.0), (6.0, -5.0)]),
        vec![ring(&[(9.0, -1.0), (9.0, 11.0), (21.0, 11.0), (21.0, -1.0)])],
    );
    let e = engine(rect_grid());
    let plain = intersect(&e, shape.clone(), IntersectOptions::default());
    assert_eq!(ids(&plain), vec![0, 1, 2]);
    let t = intersect(&e, shape, IntersectOptions::default().with_contains_centroid(true));
    assert_eq!(ids(&t), vec![0]);
}

#[test]
fn rect_polygon_straddling_two_cells() {
    let shape = polygon![(x: 2.5, y: 5.0), (x: 7.5, y: 5.0), (x: 7.5, y: 15.0), (x: 2.5, y: 15.0)];
    let t = intersect(&engine(rect_grid()), shape, IntersectOptions::default());
    assert_eq!(ids(&t), vec![0, 2]);
    assert_relative_eq!(t.total_area(), 50.0, epsilon = 1e-9);
    assert!(t
        .geometries()
        .unwrap()
        .iter()
        .all(|g| matches!(g, Some(Geometry::Polygon(_)))));
}

#[test]
fn rect_polygon_on_outer_boundary_is_empty() {
    let shape = polygon![(x: 20.0, y: 5.0), (x: 25.0, y: 5.0), (x: 25.0, y: 15.0), (x: 20.0, y: 15.0)];
    let t = intersect(&engine(rect_grid()), shape, IntersectOptions::default());
    assert!(t.is_empty());
    assert!(t.areas().is_some());
}

#[test]
fn rect_polygon_on_inner_boundary() {
    let shape = polygon![(x: 5.0, y: 10.0), (x: 15.0, y: 10.0), (x: 15.0, y: 5.0), (x: 5.0, y: 5.0)];
    let t = intersect(&engine(rect_grid()), shape, IntersectOptions::default());
    assert_eq!(ids(&t), vec![2, 3]);
    assert_relative_eq!(t.total_area(), 50.0, epsilon = 1e-9);
}

#[test]
fn rect_polygon_edge_in_cell() {
    let shape = polygon![
        (x: 0.0, y: 5.0), (x: 3.0, y: 0.0), (x: 7.0, y: 0.0),
        (x: 10.0, y: 5.0), (x: 10.0, y: -1.0), (x: 0.0, y: -1.0)
    ];
    let t = intersect(&engine(rect_grid()), shape, IntersectOptions::default());
    assert_eq!(ids(&t), vec![2]);
    assert_relative_eq!(t.total_area(), 15.0, epsilon = 1e-9);
    assert!(matches!(
        t.geometries().unwrap()[0],
        Some(Geometry::MultiPolygon(ref mp)) if mp.0.len() == 2
    ));
}

#[test]
fn rect_multipolygon_sums_parts() {
    let shape = MultiPolygon::new(vec![
        polygon![(x: 1.0, y: 1.0), (x: 4.0, y: 1.0), (x: 4.0, y: 4.0), (x: 1.0, y: 4.0)],
        polygon![(x: 12.0, y: 12.0), (x: 18.0, y: 12.0), (x: 18.0, y: 18.0), (x: 12.0, y: 18.0)],
    ]);
    let t = intersect(&engine(rect_grid()), shape, IntersectOptions::default());
    assert_eq!(ids(&t), vec![1, 2]);
    assert_relative_eq!(t.areas().unwrap()[0].unwrap(), 36.0, epsilon = 1e-9);
    assert_relative_eq!(t.areas().unwrap()[1].unwrap(), 9.0, epsilon = 1e-9);
}

#[test]
fn hole_over_cell_zero() {
    let shape = Polygon::new(
        ring(&[(-1.0, -1.0), (3.0, -1.0), (3.0, 3.0), (-1.0, 3.0)]),
        vec![ring(&[(0.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)])],
    );
    let t = intersect(&engine(unit_grid()), shape, IntersectOptions::default());
    assert_eq!(ids(&t), vec![1, 2, 3]);
    for area in t.areas().unwrap() {
        assert_relative_eq!(area.unwrap(), 1.0, epsilon = 1e-9);
    }
}

// ── Triangular grid ──────────────────────────────────────────

#[test]
fn tri_polygon_straddling_two_cells() {
    let shape = polygon![(x: 2.5, y: 5.0), (x: 5.0, y: 5.0), (x: 5.0, y: 15.0), (x: 2.5, y: 15.0)];
    let t = intersect(&engine(tri_grid()), shape, IntersectOptions::default());
    assert_eq!(ids(&t), vec![1, 3]);
    assert_relative_eq!(t.total_area(), 25.0, epsilon = 1e-9);
}

#[test]
fn tri_polygon_on_inner_boundary() {
    let shape = polygon![(x: 5.0, y: 10.0), (x: 15.0, y: 10.0), (x: 15.0, y: 5.0), (x: 5.0, y: 5.0)];
    let t = intersect(&engine(tri_grid()), shape, IntersectOptions::default());
    assert_eq!(ids(&t), vec![1, 4, 5, 6]);
    assert_relative_eq!(t.total_area(), 50.0, epsilon = 1e-9);
}

#[test]
fn tri_polygon_with_hole() {
    let t = intersect(&engine(tri_grid()), notched(), IntersectOptions::default());
    assert_eq!(ids(&t), vec![0, 1, 2, 3, 4, 7]);
    assert_relative_eq!(t.total_area(), 104.0, epsilon = 1e-9);
}

#[test]
fn tri_polygon_min_area() {
    let t = intersect(
        &engine(tri_grid()),
        notched(),
        IntersectOptions::default().with_min_area_fraction(0.5),
    );
    assert_eq!(ids(&t), vec![0, 4]);
}
