//! Grid of arbitrary polygonal cells.

use crate::grid::{check_cellid, Elevations, GridSource};
use geo::{Coord, LineString, Polygon};
use gridclip_core::{CellId, CoordinateTransform, GridError, GridKind, RowCol};
use smallvec::SmallVec;

/// A grid whose cells are given as rings of indices into a shared vertex
/// list, in local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexGrid {
    vertices: Vec<Coord<f64>>,
    cells: Vec<Vec<usize>>,
    transform: CoordinateTransform,
    elevations: Option<Elevations>,
}

impl VertexGrid {
    /// Create a grid from vertex coordinates and per-cell vertex rings.
    ///
    /// Rings may be listed in either orientation and need not repeat the
    /// first vertex. Each ring must reference at least three distinct
    /// vertices, all of them in range.
    pub fn new(vertices: Vec<Coord<f64>>, cells: Vec<Vec<usize>>) -> Result<Self, GridError> {
        if cells.is_empty() {
            return Err(GridError::Inconsistent {
                reason: "vertex grid has no cells".into(),
            });
        }
        for (cell, ring) in cells.iter().enumerate() {
            if let Some(bad) = ring.iter().find(|&&v| v >= vertices.len()) {
                return Err(GridError::Inconsistent {
                    reason: format!(
                        "cell {cell} references vertex {bad}, grid has {}",
                        vertices.len()
                    ),
                });
            }
            let mut distinct = ring.clone();
            distinct.sort_unstable();
            distinct.dedup();
            if distinct.len() < 3 {
                return Err(GridError::Inconsistent {
                    reason: format!("cell {cell} has fewer than three distinct vertices"),
                });
            }
        }
        Ok(Self {
            vertices,
            cells,
            transform: CoordinateTransform::IDENTITY,
            elevations: None,
        })
    }

    /// Place the grid in world space.
    pub fn with_transform(mut self, transform: CoordinateTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Attach layer elevations; see
    /// [`StructuredGrid::with_elevations`](crate::StructuredGrid::with_elevations).
    pub fn with_elevations(mut self, top: Vec<f64>, botm: Vec<Vec<f64>>) -> Result<Self, GridError> {
        self.elevations = Some(Elevations::new(top, botm, self.cells.len())?);
        Ok(self)
    }

    /// Shared vertex list.
    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.vertices
    }
}

impl GridSource for VertexGrid {
    fn grid_kind(&self) -> GridKind {
        GridKind::Vertex
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell_polygon(&self, cellid: CellId) -> Result<Polygon<f64>, GridError> {
        check_cellid(cellid, self.cell_count())?;
        let ring: Vec<Coord<f64>> = self.cells[cellid.0]
            .iter()
            .map(|&v| self.vertices[v])
            .collect();
        Ok(Polygon::new(LineString::new(ring), vec![]))
    }

    fn cellid_to_row_col(&self, _cellid: CellId) -> Result<RowCol, GridError> {
        Err(GridError::NotStructured {
            kind: GridKind::Vertex,
        })
    }

    fn coordinate_transform(&self) -> CoordinateTransform {
        self.transform
    }

    fn layer_elevation_bounds(&self, cellid: CellId) -> Result<SmallVec<[f64; 8]>, GridError> {
        check_cellid(cellid, self.cell_count())?;
        let elevations = self.elevations.as_ref().ok_or(GridError::NoElevations)?;
        Ok(elevations.bounds(cellid.0))
    }
}
