//! Regular row/column grid.

use crate::grid::{check_cellid, Elevations, GridSource, StructuredEdges};
use geo::{Coord, LineString, Polygon};
use gridclip_core::{CellId, CoordinateTransform, GridError, GridKind, RowCol};
use smallvec::SmallVec;

/// A rectilinear grid defined by column widths and row heights.
///
/// The local origin is the lower-left corner. Row 0 is the top row and
/// column 0 the left column; `cellid = row * ncol + col`.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredGrid {
    delr: Vec<f64>,
    delc: Vec<f64>,
    transform: CoordinateTransform,
    elevations: Option<Elevations>,
}

impl StructuredGrid {
    /// Create a grid from column widths `delr` (along x, one per column) and
    /// row heights `delc` (along y, one per row, top row first).
    ///
    /// Returns [`GridError::Inconsistent`] if either array is empty or holds
    /// a non-positive or non-finite spacing.
    pub fn new(delr: Vec<f64>, delc: Vec<f64>) -> Result<Self, GridError> {
        for (name, values) in [("delr", &delr), ("delc", &delc)] {
            if values.is_empty() {
                return Err(GridError::Inconsistent {
                    reason: format!("{name} is empty"),
                });
            }
            if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
                return Err(GridError::Inconsistent {
                    reason: format!("{name} contains invalid spacing {bad}"),
                });
            }
        }
        Ok(Self {
            delr,
            delc,
            transform: CoordinateTransform::IDENTITY,
            elevations: None,
        })
    }

    /// An `nrow` x `ncol` grid of square cells.
    pub fn uniform(nrow: usize, ncol: usize, cell_size: f64) -> Result<Self, GridError> {
        Self::new(vec![cell_size; ncol], vec![cell_size; nrow])
    }

    /// Place the grid in world space.
    pub fn with_transform(mut self, transform: CoordinateTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Attach layer elevations: `top` has one value per cell, `botm` one
    /// array per layer, each with one value per cell.
    pub fn with_elevations(mut self, top: Vec<f64>, botm: Vec<Vec<f64>>) -> Result<Self, GridError> {
        self.elevations = Some(Elevations::new(top, botm, self.cell_count())?);
        Ok(self)
    }

    /// Number of rows.
    pub fn nrow(&self) -> usize {
        self.delc.len()
    }

    /// Number of columns.
    pub fn ncol(&self) -> usize {
        self.delr.len()
    }

    /// Number of layers, if elevations are attached.
    pub fn nlay(&self) -> Option<usize> {
        self.elevations.as_ref().map(|e| e.botm.len())
    }

    fn edges(&self) -> StructuredEdges {
        let mut x = Vec::with_capacity(self.ncol() + 1);
        let mut acc = 0.0;
        x.push(acc);
        for w in &self.delr {
            acc += w;
            x.push(acc);
        }
        let height: f64 = self.delc.iter().sum();
        let mut y = Vec::with_capacity(self.nrow() + 1);
        let mut acc = height;
        y.push(acc);
        for h in &self.delc {
            acc -= h;
            y.push(acc);
        }
        // Close exactly on the origin regardless of summation order.
        if let Some(last) = y.last_mut() {
            *last = 0.0;
        }
        StructuredEdges { x, y }
    }
}

/// Counter-clockwise rectangle from its bounds.
pub(crate) fn rect_ring(x0: f64, x1: f64, ybot: f64, ytop: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::new(vec![
            Coord { x: x0, y: ybot },
            Coord { x: x1, y: ybot },
            Coord { x: x1, y: ytop },
            Coord { x: x0, y: ytop },
            Coord { x: x0, y: ybot },
        ]),
        vec![],
    )
}

impl GridSource for StructuredGrid {
    fn grid_kind(&self) -> GridKind {
        GridKind::Structured
    }

    fn cell_count(&self) -> usize {
        self.nrow() * self.ncol()
    }

    fn cell_polygon(&self, cellid: CellId) -> Result<Polygon<f64>, GridError> {
        let RowCol { row, col } = self.cellid_to_row_col(cellid)?;
        let edges = self.edges();
        Ok(rect_ring(
            edges.x[col],
            edges.x[col + 1],
            edges.y[row + 1],
            edges.y[row],
        ))
    }

    fn structured_edges(&self) -> Option<StructuredEdges> {
        Some(self.edges())
    }

    fn cellid_to_row_col(&self, cellid: CellId) -> Result<RowCol, GridError> {
        check_cellid(cellid, self.cell_count())?;
        Ok(RowCol::from_cellid(cellid, self.ncol()))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use geo::Area;

    fn rect_grid() -> StructuredGrid {
        StructuredGrid::uniform(2, 2, 10.0).unwrap()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn rejects_empty_spacing() {
        assert!(StructuredGrid::new(vec![], vec![1.0]).is_err());
        assert!(StructuredGrid::new(vec![1.0], vec![]).is_err());
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let err = StructuredGrid::new(vec![1.0, 0.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, GridError::Inconsistent { .. }));
        assert!(StructuredGrid::new(vec![1.0], vec![f64::NAN]).is_err());
    }

    #[test]
    fn edges_run_top_down() {
        let g = StructuredGrid::new(vec![1.0, 2.0, 3.0], vec![4.0, 5.0]).unwrap();
        let e = g.structured_edges().unwrap();
        assert_eq!(e.x, vec![0.0, 1.0, 3.0, 6.0]);
        assert_eq!(e.y, vec![9.0, 5.0, 0.0]);
        assert_eq!((e.nrow(), e.ncol()), (2, 3));
    }

    // ── Cell geometry ───────────────────────────────────────────

    #[test]
    fn row_zero_is_the_top_row() {
        let g = rect_grid();
        let p = g.cell_polygon(CellId(0)).unwrap();
        let ys: Vec<f64> = p.exterior().coords().map(|c| c.y).collect();
        assert!(ys.iter().all(|y| (10.0..=20.0).contains(y)));
        let p = g.cell_polygon(CellId(2)).unwrap();
        let xs: Vec<f64> = p.exterior().coords().map(|c| c.x).collect();
        assert!(xs.iter().all(|x| (0.0..=10.0).contains(x)));
    }

    #[test]
    fn cells_are_counter_clockwise() {
        let g = rect_grid();
        for i in 0..g.cell_count() {
            let p = g.cell_polygon(CellId(i)).unwrap();
            assert!(p.signed_area() > 0.0);
        }
    }

    #[test]
    fn row_col_lookup() {
        let g = rect_grid();
        assert_eq!(g.cellid_to_row_col(CellId(3)).unwrap(), RowCol::new(1, 1));
        assert!(matches!(
            g.cellid_to_row_col(CellId(4)),
            Err(GridError::CellOutOfRange { .. })
        ));
    }

    // ── Elevations ──────────────────────────────────────────────

    #[test]
    fn layer_bounds_without_elevations() {
        assert_eq!(
            rect_grid().layer_elevation_bounds(CellId(0)),
            Err(GridError::NoElevations)
        );
    }

    #[test]
    fn layer_bounds_with_elevations() {
        let g = rect_grid()
            .with_elevations(vec![2.0; 4], vec![vec![1.0; 4], vec![0.5; 4], vec![0.0; 4]])
            .unwrap();
        assert_eq!(g.nlay(), Some(3));
        assert_eq!(
            g.layer_elevation_bounds(CellId(2)).unwrap().as_slice(),
            &[2.0, 1.0, 0.5, 0.0]
        );
    }

    // ── Compliance ──────────────────────────────────────────────

    #[test]
    fn compliance_rect_grid() {
        compliance::run_full_compliance(&rect_grid());
    }

    #[test]
    fn compliance_irregular_spacing() {
        let g = StructuredGrid::new(vec![1.0, 2.5, 0.25], vec![3.0, 0.5, 1.5, 2.0])
            .unwrap()
            .with_elevations(vec![5.0; 12], vec![vec![0.0; 12]])
            .unwrap();
        compliance::run_full_compliance(&g);
    }
}
