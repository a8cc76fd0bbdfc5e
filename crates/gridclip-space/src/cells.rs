//! Cell polygon array built once per engine.

use crate::grid::{GridSource, StructuredEdges};
use crate::structured::rect_ring;
use geo::{Area, BoundingRect, Centroid, Coord, MapCoords, Point, Polygon, Rect};
use gridclip_core::{CellId, CoordinateTransform, GridError};
use rayon::prelude::*;
use std::sync::OnceLock;
use tracing::debug;

/// Closed cell outlines indexed by [`CellId`], with their bounding boxes.
///
/// Outlines are counter-clockwise and already in query space: either the
/// grid's local frame, or world space after the grid's offset and rotation.
/// Areas and centroids are computed on first use and cached.
#[derive(Debug)]
pub struct CellPolygons {
    polygons: Vec<Polygon<f64>>,
    bounds: Vec<Rect<f64>>,
    transformed: bool,
    areas: OnceLock<Vec<f64>>,
    centroids: OnceLock<Vec<Point<f64>>>,
}

impl CellPolygons {
    /// Build the outline of every cell of `grid`.
    ///
    /// With `local` set, outlines stay in the grid's local frame; otherwise
    /// the grid's coordinate transform is applied here, once. Structured
    /// grids are built in one pass from their edge arrays; other grids are
    /// queried cell by cell, on the rayon pool when `parallel` is set.
    pub fn build(grid: &dyn GridSource, local: bool, parallel: bool) -> Result<Self, GridError> {
        let cell_count = grid.cell_count();
        let polygons = match grid.structured_edges() {
            Some(edges) => from_edges(&edges, cell_count)?,
            None if parallel => (0..cell_count)
                .into_par_iter()
                .map(|i| grid.cell_polygon(CellId(i)))
                .collect::<Result<Vec<_>, _>>()?,
            None => (0..cell_count)
                .map(|i| grid.cell_polygon(CellId(i)))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let transform = if local {
            CoordinateTransform::IDENTITY
        } else {
            grid.coordinate_transform()
        };
        let transformed = !transform.is_identity();
        let polygons: Vec<Polygon<f64>> = polygons
            .into_iter()
            .map(|p| {
                let p = if transformed {
                    p.map_coords(move |c: Coord<f64>| transform.apply(c))
                } else {
                    p
                };
                orient_ccw(p)
            })
            .collect();

        let mut bounds = Vec::with_capacity(polygons.len());
        for (i, p) in polygons.iter().enumerate() {
            let rect = p.bounding_rect().ok_or_else(|| GridError::Inconsistent {
                reason: format!("cell {i} has an empty outline"),
            })?;
            let area = p.unsigned_area();
            if area.is_nan() || area <= 0.0 {
                return Err(GridError::Inconsistent {
                    reason: format!("cell {i} has zero area"),
                });
            }
            bounds.push(rect);
        }

        debug!(cells = polygons.len(), local, transformed, "built cell polygons");
        Ok(Self {
            polygons,
            bounds,
            transformed,
            areas: OnceLock::new(),
            centroids: OnceLock::new(),
        })
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// True for a grid without cells.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Whether the grid transform was applied.
    pub fn is_transformed(&self) -> bool {
        self.transformed
    }

    /// Outline of a cell, or `None` if out of range.
    pub fn get(&self, cellid: CellId) -> Option<&Polygon<f64>> {
        self.polygons.get(cellid.0)
    }

    /// Outline of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `cellid` is out of range.
    pub fn polygon(&self, cellid: CellId) -> &Polygon<f64> {
        &self.polygons[cellid.0]
    }

    /// Bounding box of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `cellid` is out of range.
    pub fn bounds(&self, cellid: CellId) -> Rect<f64> {
        self.bounds[cellid.0]
    }

    /// All outlines in cellid order.
    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    /// All bounding boxes in cellid order.
    pub fn all_bounds(&self) -> &[Rect<f64>] {
        &self.bounds
    }

    /// Bounding box of the whole grid.
    pub fn extent(&self) -> Option<Rect<f64>> {
        let first = *self.bounds.first()?;
        Some(self.bounds.iter().fold(first, |acc, r| {
            Rect::new(
                Coord {
                    x: acc.min().x.min(r.min().x),
                    y: acc.min().y.min(r.min().y),
                },
                Coord {
                    x: acc.max().x.max(r.max().x),
                    y: acc.max().y.max(r.max().y),
                },
            )
        }))
    }

    /// Area of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `cellid` is out of range.
    pub fn area(&self, cellid: CellId) -> f64 {
        self.areas
            .get_or_init(|| self.polygons.iter().map(|p| p.unsigned_area()).collect())[cellid.0]
    }

    /// Centroid of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `cellid` is out of range.
    pub fn centroid(&self, cellid: CellId) -> Point<f64> {
        self.centroids.get_or_init(|| {
            self.polygons
                .iter()
                .zip(&self.bounds)
                .map(|(p, r)| p.centroid().unwrap_or_else(|| r.center().into()))
                .collect()
        })[cellid.0]
    }

    /// Iterate `(cellid, outline)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Polygon<f64>)> + '_ {
        self.polygons
            .iter()
            .enumerate()
            .map(|(i, p)| (CellId(i), p))
    }
}

fn from_edges(edges: &StructuredEdges, cell_count: usize) -> Result<Vec<Polygon<f64>>, GridError> {
    let (nrow, ncol) = (edges.nrow(), edges.ncol());
    if nrow * ncol != cell_count {
        return Err(GridError::Inconsistent {
            reason: format!(
                "edge arrays describe {nrow}x{ncol} cells but the grid reports {cell_count}"
            ),
        });
    }
    let mut polygons = Vec::with_capacity(cell_count);
    for row in 0..nrow {
        let (ytop, ybot) = (edges.y[row], edges.y[row + 1]);
        for col in 0..ncol {
            polygons.push(rect_ring(edges.x[col], edges.x[col + 1], ybot, ytop));
        }
    }
    Ok(polygons)
}

fn orient_ccw(polygon: Polygon<f64>) -> Polygon<f64> {
    if polygon.signed_area() >= 0.0 {
        return polygon;
    }
    let (mut exterior, interiors) = polygon.into_inner();
    exterior.0.reverse();
    Polygon::new(exterior, interiors)
}
