//! Exact intersects check applied to index candidates.

use geo::{Intersects, Polygon, Rect};
use gridclip_core::{CellId, Shape};
use gridclip_space::CellPolygons;

/// A shape with its bounding box computed once for repeated cell tests.
#[derive(Clone, Debug)]
pub struct PreparedShape<'a> {
    shape: &'a Shape,
    bounds: Option<Rect<f64>>,
}

impl<'a> PreparedShape<'a> {
    /// Prepare `shape` for filtering.
    pub fn new(shape: &'a Shape) -> Self {
        Self {
            shape,
            bounds: shape.bounding_rect(),
        }
    }

    /// The wrapped shape.
    pub fn shape(&self) -> &'a Shape {
        self.shape
    }

    /// Bounding box, `None` for an empty shape.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    /// True if the shape touches `cell`, boundary contact included.
    pub fn intersects_cell(&self, cell: &Polygon<f64>, cell_bounds: &Rect<f64>) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        if !bounds.intersects(cell_bounds) {
            return false;
        }
        match self.shape {
            Shape::Point(p) => cell.intersects(&p.point()),
            Shape::MultiPoint(pts) => pts.iter().any(|p| cell.intersects(&p.point())),
            Shape::LineString(ls) => cell.intersects(ls),
            Shape::MultiLineString(mls) => mls.0.iter().any(|ls| cell.intersects(ls)),
            Shape::Polygon(p) => cell.intersects(p),
            Shape::MultiPolygon(mp) => mp.0.iter().any(|p| cell.intersects(p)),
        }
    }
}

/// Keep the candidates whose cell polygon truly intersects the shape.
///
/// Order of `candidates` is preserved.
pub fn filter(
    prepared: &PreparedShape<'_>,
    cells: &CellPolygons,
    candidates: &[CellId],
) -> Vec<CellId> {
    candidates
        .iter()
        .copied()
        .filter(|&id| {
            cells
                .get(id)
                .is_some_and(|p| prepared.intersects_cell(p, &cells.bounds(id)))
        })
        .collect()
}
