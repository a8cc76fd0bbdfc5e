//! Benchmark profiles and shape generators for gridclip.
//!
//! - [`reference_profile`]: 100x100 structured grid (10K unit cells)
//! - [`stress_profile`]: 316x316 structured grid (~100K unit cells)
//! - [`random_points`], [`random_lines`], [`random_polygons`]: deterministic
//!   query shapes inside a grid extent, derived from a seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use geo::{Coord, LineString, Polygon};
use gridclip_core::{PointZ, Shape, ShapeBatch};
use gridclip_space::StructuredGrid;

/// Side length of the [`reference_profile`] grid.
pub const REFERENCE_SIDE: usize = 100;

/// Side length of the [`stress_profile`] grid.
pub const STRESS_SIDE: usize = 316;

/// 100x100 grid of unit cells.
pub fn reference_profile() -> StructuredGrid {
    square_grid(REFERENCE_SIDE)
}

/// 316x316 grid of unit cells.
pub fn stress_profile() -> StructuredGrid {
    square_grid(STRESS_SIDE)
}

fn square_grid(side: usize) -> StructuredGrid {
    match StructuredGrid::uniform(side, side, 1.0) {
        Ok(g) => g,
        Err(e) => panic!("benchmark grid {side}x{side} rejected: {e}"),
    }
}

/// Deterministic value in `[0, 1)` for draw `i` of stream `salt`.
fn unit(seed: u64, i: u64, salt: u64) -> f64 {
    let mut x = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(i.wrapping_mul(1442695040888963407))
        .wrapping_add(salt.wrapping_mul(2862933555777941757));
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51afd7ed558ccd);
    x ^= x >> 33;
    (x >> 11) as f64 / (1u64 << 53) as f64
}

fn coord(seed: u64, i: u64, salt: u64, extent: f64) -> Coord<f64> {
    Coord {
        x: unit(seed, i, salt) * extent,
        y: unit(seed, i, salt + 1) * extent,
    }
}

/// `n` points in `[0, extent)^2`.
pub fn random_points(n: usize, extent: f64, seed: u64) -> Vec<Shape> {
    (0..n as u64)
        .map(|i| Shape::Point(PointZ::from(coord(seed, i, 0, extent))))
        .collect()
}

/// `n` polylines of `vertices` vertices, each a random walk with steps of
/// at most `step` clamped to `[0, extent]^2`.
pub fn random_lines(n: usize, vertices: usize, step: f64, extent: f64, seed: u64) -> Vec<Shape> {
    (0..n as u64)
        .map(|i| {
            let mut c = coord(seed, i, 10, extent);
            let mut coords = Vec::with_capacity(vertices);
            coords.push(c);
            for v in 1..vertices as u64 {
                let k = i * vertices as u64 + v;
                c.x = (c.x + (unit(seed, k, 20) - 0.5) * 2.0 * step).clamp(0.0, extent);
                c.y = (c.y + (unit(seed, k, 21) - 0.5) * 2.0 * step).clamp(0.0, extent);
                coords.push(c);
            }
            Shape::LineString(LineString::new(coords))
        })
        .collect()
}

/// `n` axis-aligned rectangles with sides up to `max_side`, anchored inside
/// `[0, extent)^2`.
pub fn random_polygons(n: usize, max_side: f64, extent: f64, seed: u64) -> Vec<Shape> {
    (0..n as u64)
        .map(|i| {
            let o = coord(seed, i, 30, extent);
            let w = 0.1 + unit(seed, i, 40) * max_side;
            let h = 0.1 + unit(seed, i, 41) * max_side;
            Shape::Polygon(Polygon::new(
                LineString::from(vec![
                    (o.x, o.y),
                    (o.x + w, o.y),
                    (o.x + w, o.y + h),
                    (o.x, o.y + h),
                ]),
                vec![],
            ))
        })
        .collect()
}

/// Wrap generated shapes in a batch.
pub fn batch(shapes: Vec<Shape>) -> ShapeBatch {
    match ShapeBatch::new(shapes) {
        Ok(b) => b,
        Err(e) => panic!("generated shapes do not form a batch: {e}"),
    }
}
