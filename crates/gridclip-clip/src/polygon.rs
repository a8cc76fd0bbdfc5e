//! Polygon and multipolygon clipping.

use crate::ownership::ClipPart;
use geo::{Area, BooleanOps, BoundingRect, Intersects, MultiPolygon, Point, Polygon};
use tracing::trace;

/// Parts smaller than this fraction of the cell area are artifacts.
const AREA_EPS: f64 = 1e-9;

/// The part of a polygonal shape inside one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonClip {
    polygons: MultiPolygon<f64>,
    cell_area: f64,
}

impl PolygonClip {
    /// Intersect `shape` with `cell`, whose area is `cell_area`.
    ///
    /// Slivers and the line or point residue of a shape that only grazes
    /// the cell are dropped.
    pub fn clip(shape: &MultiPolygon<f64>, cell: &Polygon<f64>, cell_area: f64) -> Self {
        let raw = MultiPolygon::new(vec![cell.clone()]).intersection(shape);
        Self::from_raw(raw, cell_area)
    }

    fn from_raw(raw: MultiPolygon<f64>, cell_area: f64) -> Self {
        let floor = AREA_EPS * cell_area;
        let parts: Vec<Polygon<f64>> = raw
            .into_iter()
            .filter(|p| {
                let area = p.unsigned_area();
                if area <= floor {
                    trace!(area, "dropped degenerate polygon part");
                }
                area > floor
            })
            .collect();
        Self {
            polygons: MultiPolygon::new(parts),
            cell_area,
        }
    }

    /// Clipped parts.
    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    /// Unwrap into the clipped parts.
    pub fn into_polygons(self) -> MultiPolygon<f64> {
        self.polygons
    }

    /// Area of the clipped parts.
    pub fn area(&self) -> f64 {
        self.polygons.unsigned_area()
    }

    /// Clipped area over the cell area.
    pub fn area_fraction(&self) -> f64 {
        self.area() / self.cell_area
    }

    /// True if `point` is inside or on the boundary of a clipped part.
    pub fn covers(&self, point: &Point<f64>) -> bool {
        self.polygons.0.iter().any(|p| p.intersects(point))
    }
}

impl ClipPart for PolygonClip {
    fn subtract(&self, others: &[&Self]) -> Self {
        let floor = AREA_EPS * self.cell_area;
        let mut current = self.polygons.clone();
        for other in others {
            if current.0.is_empty() {
                break;
            }
            let disjoint = match (current.bounding_rect(), other.polygons.bounding_rect()) {
                (Some(a), Some(b)) => !a.intersects(&b),
                _ => true,
            };
            if disjoint {
                continue;
            }
            // Shared edges have zero overlap; only a real overlap warrants
            // the difference, which would otherwise perturb the vertices.
            let overlap = current.intersection(&other.polygons).unsigned_area();
            if overlap > floor {
                current = current.difference(&other.polygons);
            }
        }
        Self::from_raw(current, self.cell_area)
    }

    fn is_empty(&self) -> bool {
        self.polygons.0.is_empty()
    }
}
