//! Grid models that misbehave in controlled ways.

use geo::{Coord, LineString, Polygon};
use gridclip_core::{CellId, GridError, GridKind, RowCol};
use gridclip_space::GridSource;

fn unit_square(i: usize) -> Polygon<f64> {
    let x = i as f64;
    Polygon::new(
        LineString::new(vec![
            Coord { x, y: 0.0 },
            Coord { x: x + 1.0, y: 0.0 },
            Coord { x: x + 1.0, y: 1.0 },
            Coord { x, y: 1.0 },
            Coord { x, y: 0.0 },
        ]),
        vec![],
    )
}

/// A strip of unit squares along x whose `fail_at` cell cannot be
/// described. With `fail_at` out of range it is a valid custom grid.
pub struct FailingGrid {
    pub cells: usize,
    pub fail_at: usize,
}

impl FailingGrid {
    pub fn new(cells: usize, fail_at: usize) -> Self {
        Self { cells, fail_at }
    }
}

impl GridSource for FailingGrid {
    fn grid_kind(&self) -> GridKind {
        GridKind::Vertex
    }

    fn cell_count(&self) -> usize {
        self.cells
    }

    fn cell_polygon(&self, cellid: CellId) -> Result<Polygon<f64>, GridError> {
        if cellid.0 == self.fail_at {
            return Err(GridError::Inconsistent {
                reason: format!("cell {cellid} is corrupt"),
            });
        }
        if cellid.0 >= self.cells {
            return Err(GridError::CellOutOfRange {
                cellid,
                cell_count: self.cells,
            });
        }
        Ok(unit_square(cellid.0))
    }

    fn cellid_to_row_col(&self, _cellid: CellId) -> Result<RowCol, GridError> {
        Err(GridError::NotStructured {
            kind: GridKind::Vertex,
        })
    }
}

/// Two cells, the second of which collapses to a zero-area sliver.
pub struct SliverGrid;

impl GridSource for SliverGrid {
    fn grid_kind(&self) -> GridKind {
        GridKind::Vertex
    }

    fn cell_count(&self) -> usize {
        2
    }

    fn cell_polygon(&self, cellid: CellId) -> Result<Polygon<f64>, GridError> {
        match cellid.0 {
            0 => Ok(unit_square(0)),
            1 => Ok(Polygon::new(
                LineString::new(vec![
                    Coord { x: 1.0, y: 0.0 },
                    Coord { x: 2.0, y: 0.0 },
                    Coord { x: 3.0, y: 0.0 },
                    Coord { x: 1.0, y: 0.0 },
                ]),
                vec![],
            )),
            _ => Err(GridError::CellOutOfRange {
                cellid,
                cell_count: 2,
            }),
        }
    }

    fn cellid_to_row_col(&self, _cellid: CellId) -> Result<RowCol, GridError> {
        Err(GridError::NotStructured {
            kind: GridKind::Vertex,
        })
    }
}
