//! Strongly-typed identifiers for cells and query shapes.

use std::fmt;

/// Identifies a grid cell.
///
/// Cell ids are dense: a grid with `n` cells uses ids `0..n`. For
/// structured grids `CellId(row * ncol + col)` with row 0 at the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

impl CellId {
    /// The id as an index into per-cell arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for CellId {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Position of a shape within the query that produced a result row.
///
/// A single-shape query always reports `ShapeId(0)`. Batched queries
/// report the index of the shape in the submitted batch, and point-to-cell
/// queries report the index of the individual point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ShapeId {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Row/column address of a structured-grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowCol {
    /// Row index, 0 at the top (maximum y) of the grid.
    pub row: usize,
    /// Column index, 0 at the left (minimum x) of the grid.
    pub col: usize,
}

impl RowCol {
    /// Create a row/column pair.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Flatten to a cell id for a grid with `ncol` columns.
    pub fn to_cellid(self, ncol: usize) -> CellId {
        CellId(self.row * ncol + self.col)
    }

    /// Split a cell id of a grid with `ncol` columns.
    pub fn from_cellid(cellid: CellId, ncol: usize) -> Self {
        Self {
            row: cellid.0 / ncol,
            col: cellid.0 % ncol,
        }
    }
}

impl fmt::Display for RowCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
