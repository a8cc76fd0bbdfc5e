//! The `GridSource` trait: everything the engine asks of a grid model.

use geo::Polygon;
use gridclip_core::{CellId, CoordinateTransform, GridError, GridKind, RowCol};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Edge coordinates of a structured grid, in the local frame.
///
/// `x` holds the `ncol + 1` column edges in ascending order; `y` holds the
/// `nrow + 1` row edges in descending order, so row 0 is the top row.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredEdges {
    /// Column edges, ascending.
    pub x: Vec<f64>,
    /// Row edges, descending.
    pub y: Vec<f64>,
}

impl StructuredEdges {
    /// Number of rows.
    pub fn nrow(&self) -> usize {
        self.y.len().saturating_sub(1)
    }

    /// Number of columns.
    pub fn ncol(&self) -> usize {
        self.x.len().saturating_sub(1)
    }
}

/// Grid model consumed by the engine.
///
/// Implementations describe cells in the grid's local frame and report the
/// transform that places that frame in world space; the engine applies the
/// transform itself, once, when it builds its cell polygons.
///
/// # Thread Safety
///
/// `Sync` is required because an engine shares its grid between concurrent
/// queries and may build cell polygons on a worker pool.
pub trait GridSource: Send + Sync {
    /// Structured or vertex grid.
    fn grid_kind(&self) -> GridKind;

    /// Number of 2D cells.
    fn cell_count(&self) -> usize;

    /// Outline of one cell in local coordinates.
    fn cell_polygon(&self, cellid: CellId) -> Result<Polygon<f64>, GridError>;

    /// Bulk description of a structured lattice.
    ///
    /// When present, the engine builds every cell from the edge arrays in a
    /// single pass instead of calling [`cell_polygon`](Self::cell_polygon)
    /// per cell. Defaults to `None`.
    fn structured_edges(&self) -> Option<StructuredEdges> {
        None
    }

    /// Row/column address of a cell. Structured grids only.
    fn cellid_to_row_col(&self, cellid: CellId) -> Result<RowCol, GridError>;

    /// Offset and rotation of the local frame. Defaults to identity.
    fn coordinate_transform(&self) -> CoordinateTransform {
        CoordinateTransform::IDENTITY
    }

    /// Elevation bounds of a cell column, top first, strictly decreasing.
    ///
    /// `n` layers have `n + 1` bounds. Defaults to
    /// [`GridError::NoElevations`].
    fn layer_elevation_bounds(&self, cellid: CellId) -> Result<SmallVec<[f64; 8]>, GridError> {
        let _ = cellid;
        Err(GridError::NoElevations)
    }
}

pub(crate) fn check_cellid(cellid: CellId, cell_count: usize) -> Result<(), GridError> {
    if cellid.0 < cell_count {
        Ok(())
    } else {
        Err(GridError::CellOutOfRange { cellid, cell_count })
    }
}

/// Layer bounds shared by the reference grids: one top per cell and one
/// bottom array per layer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Elevations {
    pub(crate) top: Vec<f64>,
    pub(crate) botm: Vec<Vec<f64>>,
}

impl Elevations {
    pub(crate) fn new(
        top: Vec<f64>,
        botm: Vec<Vec<f64>>,
        cell_count: usize,
    ) -> Result<Self, GridError> {
        if top.len() != cell_count {
            return Err(GridError::Inconsistent {
                reason: format!("top has {} values, expected {cell_count}", top.len()),
            });
        }
        if botm.is_empty() {
            return Err(GridError::Inconsistent {
                reason: "at least one bottom layer is required".into(),
            });
        }
        for (layer, b) in botm.iter().enumerate() {
            if b.len() != cell_count {
                return Err(GridError::Inconsistent {
                    reason: format!(
                        "botm layer {layer} has {} values, expected {cell_count}",
                        b.len()
                    ),
                });
            }
        }
        let elevations = Self { top, botm };
        for cell in 0..cell_count {
            let bounds = elevations.bounds(cell);
            if bounds
                .windows(2)
                .any(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Greater))
            {
                return Err(GridError::Inconsistent {
                    reason: format!("elevations of cell {cell} are not strictly decreasing"),
                });
            }
        }
        Ok(elevations)
    }

    pub(crate) fn bounds(&self, cell: usize) -> SmallVec<[f64; 8]> {
        let mut out = SmallVec::with_capacity(self.botm.len() + 1);
        out.push(self.top[cell]);
        out.extend(self.botm.iter().map(|layer| layer[cell]));
        out
    }
}
