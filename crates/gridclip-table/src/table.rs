//! Columnar result table and its builder.

use crate::schema::TableSchema;
use geo::Geometry;
use gridclip_core::{CellId, RowCol, ShapeId};

/// One row handed to a [`TableBuilder`].
///
/// Values for columns missing from the builder's schema are discarded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowInput {
    /// Shape position in the query input.
    pub shape_id: ShapeId,
    /// Owning cell, `None` when the shape lies outside the grid.
    pub cellid: Option<CellId>,
    /// Structured address of the cell.
    pub row_col: Option<RowCol>,
    /// Clipped geometry.
    pub geometry: Option<Geometry<f64>>,
    /// Clipped length.
    pub length: Option<f64>,
    /// Clipped area.
    pub area: Option<f64>,
    /// Layer index, `None` when out of range or unknown.
    pub layer: Option<usize>,
}

impl RowInput {
    /// A row with only its identifiers set.
    pub fn new(shape_id: ShapeId, cellid: Option<CellId>) -> Self {
        Self {
            shape_id,
            cellid,
            ..Self::default()
        }
    }
}

/// Borrowed view of one table row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableRow<'a> {
    /// Shape position in the query input.
    pub shape_id: ShapeId,
    /// Owning cell.
    pub cellid: Option<CellId>,
    /// Structured address.
    pub row_col: Option<RowCol>,
    /// Clipped geometry.
    pub geometry: Option<&'a Geometry<f64>>,
    /// Clipped length.
    pub length: Option<f64>,
    /// Clipped area.
    pub area: Option<f64>,
    /// Layer index.
    pub layer: Option<usize>,
}

/// Query result in parallel typed columns, sorted by `(shape_id, cellid)`.
///
/// Optional columns are `None` when absent from the schema; inside a present
/// column, `None` marks a null value.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultTable {
    schema: TableSchema,
    shape_id: Vec<ShapeId>,
    cellid: Vec<Option<CellId>>,
    row_col: Option<Vec<Option<RowCol>>>,
    geometry: Option<Vec<Option<Geometry<f64>>>>,
    length: Option<Vec<Option<f64>>>,
    area: Option<Vec<Option<f64>>>,
    layer: Option<Vec<Option<usize>>>,
}

fn column<T>(present: bool) -> Option<Vec<T>> {
    present.then(Vec::new)
}

fn push<T>(col: &mut Option<Vec<T>>, value: T) {
    if let Some(c) = col {
        c.push(value);
    }
}

fn reorder<T>(col: Option<Vec<T>>, order: &[usize]) -> Option<Vec<T>> {
    col.map(|values| {
        let mut slots: Vec<Option<T>> = values.into_iter().map(Some).collect();
        order.iter().filter_map(|&i| slots[i].take()).collect()
    })
}

/// Accumulates rows for a [`ResultTable`].
#[derive(Debug)]
pub struct TableBuilder {
    table: ResultTable,
}

impl TableBuilder {
    /// Empty builder for `schema`.
    pub fn new(schema: TableSchema) -> Self {
        Self {
            table: ResultTable::empty(schema),
        }
    }

    /// Append a row.
    pub fn push(&mut self, row: RowInput) {
        let t = &mut self.table;
        t.shape_id.push(row.shape_id);
        t.cellid.push(row.cellid);
        push(&mut t.row_col, row.row_col);
        push(&mut t.geometry, row.geometry);
        push(&mut t.length, row.length);
        push(&mut t.area, row.area);
        push(&mut t.layer, row.layer);
    }

    /// Rows pushed so far.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True before the first push.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Sort by `(shape_id, cellid)` and return the table.
    ///
    /// The sort is stable: rows with equal keys keep their push order.
    pub fn finish(self) -> ResultTable {
        let t = self.table;
        let mut order: Vec<usize> = (0..t.shape_id.len()).collect();
        order.sort_by_key(|&i| (t.shape_id[i], t.cellid[i]));
        if order.iter().enumerate().all(|(pos, &i)| pos == i) {
            return t;
        }
        ResultTable {
            schema: t.schema,
            shape_id: order.iter().map(|&i| t.shape_id[i]).collect(),
            cellid: order.iter().map(|&i| t.cellid[i]).collect(),
            row_col: reorder(t.row_col, &order),
            geometry: reorder(t.geometry, &order),
            length: reorder(t.length, &order),
            area: reorder(t.area, &order),
            layer: reorder(t.layer, &order),
        }
    }
}

impl ResultTable {
    /// A zero-row table.
    pub fn empty(schema: TableSchema) -> Self {
        Self {
            schema,
            shape_id: Vec::new(),
            cellid: Vec::new(),
            row_col: column(schema.row_col),
            geometry: column(schema.geometry),
            length: column(schema.length),
            area: column(schema.area),
            layer: column(schema.layer),
        }
    }

    /// Column set.
    pub fn schema(&self) -> TableSchema {
        self.schema
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.shape_id.len()
    }

    /// True for a table without rows.
    pub fn is_empty(&self) -> bool {
        self.shape_id.is_empty()
    }

    /// `shape_id` column.
    pub fn shape_ids(&self) -> &[ShapeId] {
        &self.shape_id
    }

    /// `cellid` column.
    pub fn cellids(&self) -> &[Option<CellId>] {
        &self.cellid
    }

    /// `row`/`col` columns, if present.
    pub fn row_cols(&self) -> Option<&[Option<RowCol>]> {
        self.row_col.as_deref()
    }

    /// `geometry` column, if present.
    pub fn geometries(&self) -> Option<&[Option<Geometry<f64>>]> {
        self.geometry.as_deref()
    }

    /// `length` column, if present.
    pub fn lengths(&self) -> Option<&[Option<f64>]> {
        self.length.as_deref()
    }

    /// `area` column, if present.
    pub fn areas(&self) -> Option<&[Option<f64>]> {
        self.area.as_deref()
    }

    /// `layer` column, if present.
    pub fn layers(&self) -> Option<&[Option<usize>]> {
        self.layer.as_deref()
    }

    /// Row `index`, or `None` past the end.
    pub fn row(&self, index: usize) -> Option<TableRow<'_>> {
        let shape_id = *self.shape_id.get(index)?;
        let at = |c: &Option<Vec<Option<f64>>>| c.as_ref().and_then(|v| v[index]);
        Some(TableRow {
            shape_id,
            cellid: self.cellid[index],
            row_col: self.row_col.as_ref().and_then(|v| v[index]),
            geometry: self.geometry.as_ref().and_then(|v| v[index].as_ref()),
            length: at(&self.length),
            area: at(&self.area),
            layer: self.layer.as_ref().and_then(|v| v[index]),
        })
    }

    /// Rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> + '_ {
        (0..self.len()).filter_map(|i| self.row(i))
    }

    /// Cells recorded for `shape_id`, in ascending order; null cells skipped.
    pub fn cellids_for(&self, shape_id: ShapeId) -> Vec<CellId> {
        self.rows()
            .filter(|r| r.shape_id == shape_id)
            .filter_map(|r| r.cellid)
            .collect()
    }

    /// Sum of the `length` column; zero when absent.
    pub fn total_length(&self) -> f64 {
        self.length.iter().flatten().flatten().sum()
    }

    /// Sum of the `area` column; zero when absent.
    pub fn total_area(&self) -> f64 {
        self.area.iter().flatten().flatten().sum()
    }
}
