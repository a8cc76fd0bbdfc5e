//! Standard grids shared by the integration tests.
//!
//! - [`rect_grid`]: 2 x 2 structured grid of 10 m cells, 20 m square.
//! - [`tri_grid`]: the same square split into eight triangles around its
//!   centre.
//! - [`rect_vertex_grid`]: the [`rect_grid`] layout as a vertex grid.
//! - [`unit_grid`] and [`half_grid`]: 2 x 2 grids of 1 and 0.5 unit cells.
//! - [`elevation_grid`]: [`rect_grid`] with layer elevations.

use geo::Coord;
use gridclip_core::CoordinateTransform;
use gridclip_space::{StructuredGrid, VertexGrid};

fn coords(xy: &[(f64, f64)]) -> Vec<Coord<f64>> {
    xy.iter().map(|&(x, y)| Coord { x, y }).collect()
}

/// 2 x 2 grid of 10 m cells. Cell 0 is the top-left cell.
pub fn rect_grid() -> StructuredGrid {
    StructuredGrid::uniform(2, 2, 10.0).expect("valid spacing")
}

/// Eight triangles sharing the vertex (10, 10) of a 20 m square.
///
/// Cell 0 is (10, 10), (20, 20), (20, 10) and cell 4 is (10, 0), (0, 0),
/// (10, 10); every quadrant holds two cells split along its diagonal
/// through the centre.
pub fn tri_grid() -> VertexGrid {
    let vertices = coords(&[
        (0.0, 0.0),
        (0.0, 20.0),
        (20.0, 20.0),
        (20.0, 0.0),
        (10.0, 10.0),
        (0.0, 10.0),
        (10.0, 0.0),
        (20.0, 10.0),
        (10.0, 20.0),
    ]);
    let cells = vec![
        vec![4, 2, 7],
        vec![4, 0, 5],
        vec![1, 8, 4],
        vec![5, 1, 4],
        vec![6, 0, 4],
        vec![4, 3, 6],
        vec![7, 3, 4],
        vec![8, 2, 4],
    ];
    VertexGrid::new(vertices, cells).expect("valid triangles")
}

/// The [`rect_grid`] cells given as a vertex grid, rows from the bottom.
pub fn rect_vertex_grid() -> VertexGrid {
    let vertices = coords(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (20.0, 0.0),
        (0.0, 10.0),
        (10.0, 10.0),
        (20.0, 10.0),
        (0.0, 20.0),
        (10.0, 20.0),
        (20.0, 20.0),
    ]);
    let cells = vec![
        vec![0, 1, 4, 3],
        vec![1, 2, 5, 4],
        vec![3, 4, 7, 6],
        vec![4, 5, 8, 7],
    ];
    VertexGrid::new(vertices, cells).expect("valid quads")
}

/// 2 x 2 grid of unit cells.
pub fn unit_grid() -> StructuredGrid {
    StructuredGrid::uniform(2, 2, 1.0).expect("valid spacing")
}

/// 2 x 2 grid of 0.5 unit cells.
pub fn half_grid() -> StructuredGrid {
    StructuredGrid::uniform(2, 2, 0.5).expect("valid spacing")
}

/// [`rect_grid`] with a top of 2 and one layer per entry of `botm`, each
/// bottom uniform across the cells.
pub fn elevation_grid(botm: &[f64]) -> StructuredGrid {
    rect_grid()
        .with_elevations(vec![2.0; 4], botm.iter().map(|&b| vec![b; 4]).collect())
        .expect("decreasing elevations")
}

/// 45 degree rotation about a local origin placed at (10, 10).
pub fn rotation() -> CoordinateTransform {
    CoordinateTransform::from_degrees(10.0, 10.0, 45.0)
}
