//! The intersection engine: one build, many read-only queries.

use crate::config::{EngineConfig, IntersectOptions};
use crate::elevation::{classify, classify_many};
use geo::{Polygon, Rect};
use gridclip_clip::{clip_shape, filter, owning_cell, ClippedCell, PreparedShape};
use gridclip_core::{
    CellId, GridError, GridKind, PointZ, QueryError, QueryInput, RowCol, Shape, ShapeBatch,
    ShapeFamily, ShapeId, ShapeKind, StructuralError,
};
use gridclip_space::{build_index, CellPolygons, GridSource, SpatialIndex};
use gridclip_table::{ResultTable, RowInput, TableBuilder, TableSchema};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Intersection engine over one grid.
///
/// Cell polygons and the spatial index are built eagerly and never change
/// afterwards, so an engine can be shared freely between threads.
///
/// ```
/// use std::sync::Arc;
/// use gridclip_core::{PointZ, Shape};
/// use gridclip_engine::Engine;
/// use gridclip_space::StructuredGrid;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let grid = StructuredGrid::uniform(2, 2, 10.0)?;
/// let engine = Engine::new(Arc::new(grid), true, false)?;
/// let table = engine.query_point_to_cell(Shape::Point(PointZ::new(15.0, 5.0)), false)?;
/// assert_eq!(table.cellids()[0].map(|c| c.0), Some(3));
/// # Ok(())
/// # }
/// ```
pub struct Engine {
    grid: Arc<dyn GridSource>,
    cells: Arc<CellPolygons>,
    index: Arc<dyn SpatialIndex>,
    config: EngineConfig,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("grid_kind", &self.grid.grid_kind())
            .field("cell_count", &self.cells.len())
            .field("indexed", &self.index.is_indexed())
            .field("config", &self.config)
            .finish()
    }
}

impl Engine {
    /// Build the cell polygons and, if configured, the spatial index.
    ///
    /// Fails if the grid describes an inconsistent or degenerate cell.
    pub fn build(grid: Arc<dyn GridSource>, config: EngineConfig) -> Result<Self, GridError> {
        let start = Instant::now();
        let cells = CellPolygons::build(grid.as_ref(), config.use_local_coords, config.parallel)?;
        let index: Arc<dyn SpatialIndex> = Arc::from(build_index(&cells, config.use_index));
        info!(
            grid_kind = %grid.grid_kind(),
            cells = cells.len(),
            indexed = index.is_indexed(),
            local = config.use_local_coords,
            elapsed_us = start.elapsed().as_micros() as u64,
            "engine built"
        );
        Ok(Self {
            grid,
            cells: Arc::new(cells),
            index,
            config,
        })
    }

    /// [`build`](Self::build) with the remaining settings at their defaults.
    pub fn new(
        grid: Arc<dyn GridSource>,
        use_index: bool,
        use_local_coords: bool,
    ) -> Result<Self, GridError> {
        Self::build(
            grid,
            EngineConfig {
                use_index,
                use_local_coords,
                ..EngineConfig::default()
            },
        )
    }

    // ── Accessors ──────────────────────────────────────────────

    /// Build settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Structured or vertex grid.
    pub fn grid_kind(&self) -> GridKind {
        self.grid.grid_kind()
    }

    /// True if lookups go through the R-tree.
    pub fn is_indexed(&self) -> bool {
        self.index.is_indexed()
    }

    /// Cell outline in query space.
    pub fn cell_polygon(&self, cellid: CellId) -> Result<&Polygon<f64>, GridError> {
        self.cells.get(cellid).ok_or(GridError::CellOutOfRange {
            cellid,
            cell_count: self.cells.len(),
        })
    }

    /// All cell outlines in query space.
    pub fn cells(&self) -> &CellPolygons {
        &self.cells
    }

    /// Row/column address of a cell. Structured grids only.
    pub fn cellid_to_row_col(&self, cellid: CellId) -> Result<RowCol, GridError> {
        self.grid.cellid_to_row_col(cellid)
    }

    /// Layer of elevation `z` in the column of `cellid`.
    ///
    /// A missing `z` is `Ok(None)` without consulting the grid; a present
    /// one on a grid without elevations is [`GridError::NoElevations`].
    pub fn layer_for(&self, cellid: CellId, z: Option<f64>) -> Result<Option<usize>, GridError> {
        if z.is_none() {
            return Ok(None);
        }
        let bounds = self.grid.layer_elevation_bounds(cellid)?;
        Ok(classify(&bounds, z))
    }

    fn has_row_col(&self) -> bool {
        self.grid.grid_kind() == GridKind::Structured
    }

    fn row_col(&self, cellid: CellId) -> Result<Option<RowCol>, GridError> {
        if self.has_row_col() {
            self.grid.cellid_to_row_col(cellid).map(Some)
        } else {
            Ok(None)
        }
    }

    // ── Pipeline stages ────────────────────────────────────────

    /// Index lookup followed by the exact intersects filter.
    fn shape_candidates(&self, shape: &Shape) -> Vec<CellId> {
        let prepared = PreparedShape::new(shape);
        let Some(bounds) = prepared.bounds() else {
            return Vec::new();
        };
        let coarse = self.index.candidates(&bounds);
        filter(&prepared, &self.cells, &coarse)
    }

    fn intersect_rows(
        &self,
        shape_id: ShapeId,
        shape: &Shape,
        opts: &IntersectOptions,
    ) -> Result<Vec<RowInput>, QueryError> {
        let candidates = self.shape_candidates(shape);
        let clipped = clip_shape(shape, &self.cells, &candidates, &opts.clip_settings());
        let classify_z = opts.classify_elevation && shape.family() == ShapeFamily::Point;
        let rows = clipped
            .into_iter()
            .map(|c: ClippedCell| -> Result<RowInput, GridError> {
                let layer = if classify_z {
                    self.layer_for(c.cellid, c.z)?
                } else {
                    None
                };
                Ok(RowInput {
                    row_col: self.row_col(c.cellid)?,
                    geometry: Some(c.geometry),
                    length: c.length,
                    area: c.area,
                    layer,
                    ..RowInput::new(shape_id, Some(c.cellid))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            shape_id = %shape_id,
            kind = %shape.kind(),
            candidates = candidates.len(),
            rows = rows.len(),
            "clipped shape"
        );
        Ok(rows)
    }

    fn point_row(&self, shape_id: ShapeId, point: &PointZ) -> Result<RowInput, GridError> {
        let c = point.coord();
        let coarse = self.index.candidates(&Rect::new(c, c));
        let cellid = owning_cell(point, &self.cells, &coarse);
        let row_col = match cellid {
            Some(id) => self.row_col(id)?,
            None => None,
        };
        Ok(RowInput {
            row_col,
            ..RowInput::new(shape_id, cellid)
        })
    }

    /// Fill the layer column of located point rows in one batch. Rows
    /// without a cell or a z stay null and never consult the grid.
    fn assign_layers(&self, rows: &mut [RowInput], points: &[PointZ]) -> Result<(), GridError> {
        let (slots, pairs): (Vec<usize>, Vec<(CellId, Option<f64>)>) = rows
            .iter()
            .zip(points)
            .enumerate()
            .filter_map(|(i, (row, p))| Some((i, (row.cellid?, Some(p.z?)))))
            .unzip();
        let layers = classify_many(&*self.grid, &pairs)?;
        for (slot, layer) in slots.into_iter().zip(layers) {
            rows[slot].layer = layer;
        }
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────

    /// Cells touched by each shape, without clipping.
    ///
    /// Boundary contact counts, so a point on a shared corner lists every
    /// cell meeting there. Works with and without the index.
    pub fn query_candidates(&self, input: impl Into<QueryInput>) -> Result<ResultTable, QueryError> {
        let input = input.into();
        let mut builder = TableBuilder::new(TableSchema::candidates(self.has_row_col()));
        for (shape_id, shape) in input.iter() {
            for cellid in self.shape_candidates(shape) {
                builder.push(RowInput {
                    row_col: self.row_col(cellid)?,
                    ..RowInput::new(shape_id, Some(cellid))
                });
            }
        }
        let table = builder.finish();
        debug!(shapes = input.len(), rows = table.len(), "candidates query");
        Ok(table)
    }

    /// Clipped geometry and measures of one shape per cell.
    ///
    /// `input` must hold exactly one shape; a larger batch is
    /// [`StructuralError::MultipleShapes`]. No intersection gives an empty
    /// table.
    pub fn query_intersection(
        &self,
        input: impl Into<QueryInput>,
        opts: &IntersectOptions,
    ) -> Result<ResultTable, QueryError> {
        opts.validate()?;
        let input = input.into();
        let shape = match input.shapes() {
            [shape] => shape,
            shapes => {
                return Err(StructuralError::MultipleShapes {
                    operation: "query_intersection",
                    count: shapes.len(),
                }
                .into())
            }
        };
        let schema = TableSchema::intersection(
            shape.family(),
            self.has_row_col(),
            opts.classify_elevation,
        );
        let mut builder = TableBuilder::new(schema);
        for row in self.intersect_rows(ShapeId(0), shape, opts)? {
            builder.push(row);
        }
        Ok(builder.finish())
    }

    /// [`query_intersection`](Self::query_intersection) for every shape of
    /// `batch`, rows ordered by shape id.
    ///
    /// Shapes are processed on the rayon pool when
    /// [`EngineConfig::parallel`] is set.
    pub fn query_intersection_many(
        &self,
        batch: &ShapeBatch,
        opts: &IntersectOptions,
    ) -> Result<ResultTable, QueryError> {
        opts.validate()?;
        let run = |(i, shape): (usize, &Shape)| self.intersect_rows(ShapeId(i), shape, opts);
        let per_shape: Vec<Vec<RowInput>> = if self.config.parallel {
            batch.shapes().par_iter().enumerate().map(run).collect::<Result<_, _>>()?
        } else {
            batch.shapes().iter().enumerate().map(run).collect::<Result<_, _>>()?
        };
        let schema = TableSchema::intersection(
            batch.kind().family(),
            self.has_row_col(),
            opts.classify_elevation,
        );
        let mut builder = TableBuilder::new(schema);
        for row in per_shape.into_iter().flatten() {
            builder.push(row);
        }
        let table = builder.finish();
        debug!(shapes = batch.len(), rows = table.len(), "batched intersection query");
        Ok(table)
    }

    /// Owning cell of every input point.
    ///
    /// Accepts a point, a multipoint (one row per member point) or a batch
    /// of points. Each point gets exactly one row: the lowest cell containing
    /// it, boundary included, or a null cell when it lies outside the grid.
    /// With `classify_elevation`, a `layer` column is derived from z.
    ///
    /// Requires the spatial index.
    pub fn query_point_to_cell(
        &self,
        input: impl Into<QueryInput>,
        classify_elevation: bool,
    ) -> Result<ResultTable, QueryError> {
        const OPERATION: &str = "query_point_to_cell";
        if !self.index.is_indexed() {
            return Err(StructuralError::IndexDisabled {
                operation: OPERATION,
            }
            .into());
        }
        let input = input.into();
        let points: Vec<PointZ> = match (&input, input.kind()) {
            (QueryInput::Single(shape), ShapeKind::Point | ShapeKind::MultiPoint) => {
                shape.points().to_vec()
            }
            (QueryInput::Batch(batch), ShapeKind::Point) => batch
                .shapes()
                .iter()
                .flat_map(|s| s.points().iter().copied())
                .collect(),
            (_, kind) => {
                return Err(StructuralError::WrongFamily {
                    operation: OPERATION,
                    kind,
                }
                .into())
            }
        };

        let locate = |(i, p): (usize, &PointZ)| self.point_row(ShapeId(i), p);
        let mut rows: Vec<RowInput> = if self.config.parallel {
            points.par_iter().enumerate().map(locate).collect::<Result<_, _>>()?
        } else {
            points.iter().enumerate().map(locate).collect::<Result<_, _>>()?
        };
        if classify_elevation {
            self.assign_layers(&mut rows, &points)?;
        }
        let mut builder = TableBuilder::new(TableSchema::point_to_cell(
            self.has_row_col(),
            classify_elevation,
        ));
        for row in rows {
            builder.push(row);
        }
        let table = builder.finish();
        debug!(points = points.len(), rows = table.len(), "point-to-cell query");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridclip_space::StructuredGrid;

    fn engine(use_index: bool) -> Engine {
        let g = StructuredGrid::uniform(2, 2, 10.0).unwrap();
        Engine::new(Arc::new(g), use_index, false).unwrap()
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn accessors() {
        let e = engine(true);
        assert_eq!(e.cell_count(), 4);
        assert_eq!(e.grid_kind(), GridKind::Structured);
        assert!(e.is_indexed());
        assert_eq!(e.cellid_to_row_col(CellId(3)).unwrap(), RowCol::new(1, 1));
        assert!(matches!(
            e.cell_polygon(CellId(4)),
            Err(GridError::CellOutOfRange { .. })
        ));
        assert!(format!("{e:?}").contains("cell_count: 4"));
    }

    #[test]
    fn point_to_cell_requires_index() {
        let err = engine(false)
            .query_point_to_cell(Shape::Point(PointZ::new(1.0, 1.0)), false)
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::Structural(StructuralError::IndexDisabled {
                operation: "query_point_to_cell"
            })
        );
    }

    #[test]
    fn intersection_rejects_several_shapes() {
        let batch = ShapeBatch::new(vec![
            Shape::Point(PointZ::new(1.0, 1.0)),
            Shape::Point(PointZ::new(2.0, 2.0)),
        ])
        .unwrap();
        let err = engine(true)
            .query_intersection(batch, &IntersectOptions::default())
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn invalid_options_fail_fast() {
        let opts = IntersectOptions::default().with_min_area_fraction(-1.0);
        let err = engine(true)
            .query_intersection(Shape::Point(PointZ::new(1.0, 1.0)), &opts)
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn layer_for_without_z_skips_grid() {
        let e = engine(true);
        assert_eq!(e.layer_for(CellId(0), None), Ok(None));
        assert_eq!(e.layer_for(CellId(0), Some(1.0)), Err(GridError::NoElevations));
    }

    #[test]
    fn point_layers_follow_cell_columns() {
        let g = StructuredGrid::uniform(2, 2, 10.0)
            .unwrap()
            .with_elevations(vec![2.0; 4], vec![vec![1.0; 4], vec![0.5; 4], vec![0.0; 4]])
            .unwrap();
        let e = Engine::new(Arc::new(g), true, false).unwrap();
        let points = Shape::MultiPoint(vec![
            PointZ::with_z(15.0, 5.0, 0.2),
            PointZ::new(5.0, 15.0),
            PointZ::with_z(25.0, 5.0, 1.5),
            PointZ::with_z(5.0, 5.0, 1.5),
            PointZ::with_z(5.0, 5.0, 9.0),
        ]);
        let t = e.query_point_to_cell(points, true).unwrap();
        assert_eq!(
            t.cellids(),
            &[Some(CellId(3)), Some(CellId(0)), None, Some(CellId(2)), Some(CellId(2))]
        );
        assert_eq!(t.layers().unwrap(), &[Some(2), None, None, Some(0), None]);
    }

    #[test]
    fn flat_points_never_consult_elevations() {
        let e = engine(true);
        let flat = Shape::MultiPoint(vec![PointZ::new(1.0, 1.0), PointZ::new(25.0, 25.0)]);
        let t = e.query_point_to_cell(flat, true).unwrap();
        assert_eq!(t.layers().unwrap(), &[None, None]);
        let err = e
            .query_point_to_cell(Shape::Point(PointZ::with_z(1.0, 1.0, 0.5)), true)
            .unwrap_err();
        assert_eq!(err, QueryError::Configuration(GridError::NoElevations));
    }
}
