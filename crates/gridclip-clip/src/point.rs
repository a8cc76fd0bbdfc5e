//! Point and multipoint clipping.

use crate::ownership::ClipPart;
use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Geometry, MultiPoint, Polygon};
use gridclip_core::{CellId, PointZ};
use gridclip_space::CellPolygons;
use indexmap::IndexSet;

/// Points of a shape that lie in one cell, in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointClip {
    points: Vec<PointZ>,
}

type PointKey = (u64, u64, Option<u64>);

/// Bit pattern of the full coordinate; `+ 0.0` folds `-0.0` into `0.0`.
fn key(p: &PointZ) -> PointKey {
    (
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        p.z.map(|z| (z + 0.0).to_bits()),
    )
}

fn in_cell(p: &PointZ, cell: &Polygon<f64>) -> bool {
    cell.coordinate_position(&p.coord()) != CoordPos::Outside
}

impl PointClip {
    /// Points of `points` inside or on the boundary of `cell`.
    pub fn clip(points: &[PointZ], cell: &Polygon<f64>) -> Self {
        Self {
            points: points.iter().filter(|p| in_cell(p, cell)).copied().collect(),
        }
    }

    /// Surviving points.
    pub fn points(&self) -> &[PointZ] {
        &self.points
    }

    /// Drop repeated coordinates, keeping the first occurrence.
    pub fn collapse_duplicates(&mut self) {
        let mut seen = IndexSet::with_capacity(self.points.len());
        self.points.retain(|p| seen.insert(key(p)));
    }

    /// Elevation of the first point that has one.
    pub fn first_z(&self) -> Option<f64> {
        self.points.iter().find_map(|p| p.z)
    }

    /// A `Point` for a single survivor, a `MultiPoint` otherwise.
    pub fn to_geometry(&self) -> Geometry<f64> {
        match self.points.as_slice() {
            [single] => Geometry::Point(single.point()),
            many => Geometry::MultiPoint(MultiPoint::new(many.iter().map(PointZ::point).collect())),
        }
    }
}

impl ClipPart for PointClip {
    fn subtract(&self, others: &[&Self]) -> Self {
        let taken: IndexSet<PointKey> = others
            .iter()
            .flat_map(|o| o.points.iter().map(key))
            .collect();
        Self {
            points: self
                .points
                .iter()
                .filter(|p| !taken.contains(&key(p)))
                .copied()
                .collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Lowest cell among `candidates` containing `point`, boundary included.
///
/// `candidates` must be in ascending cellid order.
pub fn owning_cell(point: &PointZ, cells: &CellPolygons, candidates: &[CellId]) -> Option<CellId> {
    candidates
        .iter()
        .copied()
        .find(|&id| cells.get(id).is_some_and(|cell| in_cell(point, cell)))
}
