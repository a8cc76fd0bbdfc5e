//! Row-record and JSON exchange format.
//!
//! Each row becomes a flat [`TableRecord`] with the geometry written as WKT.
//! A null `cellid` is written as `null`; other unset values are omitted, and
//! the accompanying schema tells a null apart from an absent column. Reading
//! validates every record against the schema.

use crate::error::TableError;
use crate::schema::TableSchema;
use crate::table::{ResultTable, RowInput, TableBuilder};
use geo::Geometry;
use gridclip_core::{CellId, RowCol, ShapeId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wkt::ToWkt;

/// One table row in exchange form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Shape position in the query input.
    pub shape_id: usize,
    /// Owning cell; `None` is null.
    pub cellid: Option<usize>,
    /// Row of the cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Column of the cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    /// Clipped geometry as WKT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    /// Clipped length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Clipped area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// Layer index; `None` is null or absent, see the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<usize>,
}

/// A table in exchange form: its schema plus its records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Column set.
    pub schema: TableSchema,
    /// Rows in table order.
    pub records: Vec<TableRecord>,
}

fn parse_geometry(index: usize, text: &str) -> Result<Geometry<f64>, TableError> {
    wkt::Wkt::<f64>::from_str(text)
        .map_err(|e| TableError::Wkt {
            index,
            reason: e.to_string(),
        })
        .and_then(|w| {
            w.try_into().map_err(|e: wkt::conversion::Error| TableError::Wkt {
                index,
                reason: e.to_string(),
            })
        })
}

fn require<T>(
    present: bool,
    value: Option<T>,
    index: usize,
    column: &'static str,
) -> Result<Option<T>, TableError> {
    match (present, value) {
        (true, None) => Err(TableError::MissingColumn { index, column }),
        (false, Some(_)) => Err(TableError::UnexpectedColumn { index, column }),
        (_, value) => Ok(value),
    }
}

fn forbid<T>(
    present: bool,
    value: Option<T>,
    index: usize,
    column: &'static str,
) -> Result<Option<T>, TableError> {
    match (present, value) {
        (false, Some(_)) => Err(TableError::UnexpectedColumn { index, column }),
        (_, value) => Ok(value),
    }
}

impl ResultTable {
    /// Rows as exchange records.
    pub fn to_records(&self) -> Vec<TableRecord> {
        self.rows()
            .map(|r| TableRecord {
                shape_id: r.shape_id.0,
                cellid: r.cellid.map(CellId::index),
                row: r.row_col.map(|rc| rc.row),
                col: r.row_col.map(|rc| rc.col),
                geometry: r.geometry.map(|g| g.wkt_string()),
                length: r.length,
                area: r.area,
                layer: r.layer,
            })
            .collect()
    }

    /// Rebuild a table from records, validating each against `schema`.
    ///
    /// `geometry`, `length` and `area` must be set exactly when the schema
    /// has them. `row`/`col` must be set together, and only for rows with a
    /// cell. `layer` is nullable.
    pub fn from_records(
        schema: TableSchema,
        records: Vec<TableRecord>,
    ) -> Result<Self, TableError> {
        let mut builder = TableBuilder::new(schema);
        for (index, rec) in records.into_iter().enumerate() {
            let row_col = match (rec.row, rec.col) {
                (Some(row), Some(col)) => Some(RowCol::new(row, col)),
                (None, None) => None,
                (None, Some(_)) => {
                    return Err(TableError::MissingColumn {
                        index,
                        column: "row",
                    })
                }
                (Some(_), None) => {
                    return Err(TableError::MissingColumn {
                        index,
                        column: "col",
                    })
                }
            };
            let row_col = if rec.cellid.is_some() {
                require(schema.row_col, row_col, index, "row")?
            } else {
                forbid(false, row_col, index, "row")?
            };
            let geometry = require(schema.geometry, rec.geometry, index, "geometry")?
                .map(|text| parse_geometry(index, &text))
                .transpose()?;
            builder.push(RowInput {
                shape_id: ShapeId(rec.shape_id),
                cellid: rec.cellid.map(CellId),
                row_col,
                geometry,
                length: require(schema.length, rec.length, index, "length")?,
                area: require(schema.area, rec.area, index, "area")?,
                layer: forbid(schema.layer, rec.layer, index, "layer")?,
            });
        }
        Ok(builder.finish())
    }

    /// Schema and records together.
    pub fn to_document(&self) -> TableDocument {
        TableDocument {
            schema: self.schema(),
            records: self.to_records(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    /// Parse and validate JSON written by [`to_json`](Self::to_json).
    pub fn from_json(text: &str) -> Result<Self, TableError> {
        let doc: TableDocument = serde_json::from_str(text)?;
        Self::from_records(doc.schema, doc.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point};
    use gridclip_core::ShapeFamily;

    fn line_table() -> ResultTable {
        let mut b = TableBuilder::new(TableSchema::intersection(ShapeFamily::Line, true, false));
        b.push(RowInput {
            row_col: Some(RowCol::new(1, 0)),
            geometry: Some(Geometry::LineString(
                line_string![(x: 5.0, y: 5.0), (x: 10.0, y: 5.0)],
            )),
            length: Some(5.0),
            ..RowInput::new(ShapeId(0), Some(CellId(2)))
        });
        b.push(RowInput {
            row_col: Some(RowCol::new(1, 1)),
            geometry: Some(Geometry::LineString(
                line_string![(x: 10.0, y: 5.0), (x: 15.5, y: 5.0)],
            )),
            length: Some(5.5),
            ..RowInput::new(ShapeId(0), Some(CellId(3)))
        });
        b.finish()
    }

    #[test]
    fn json_round_trip_preserves_table() {
        let t = line_table();
        let json = t.to_json().unwrap();
        assert!(json.contains("LINESTRING"));
        assert_eq!(ResultTable::from_json(&json).unwrap(), t);
    }

    #[test]
    fn null_layer_and_cell_survive() {
        let mut b = TableBuilder::new(TableSchema::point_to_cell(false, true));
        b.push(RowInput {
            layer: Some(2),
            ..RowInput::new(ShapeId(0), Some(CellId(2)))
        });
        b.push(RowInput::new(ShapeId(1), None));
        let t = b.finish();
        let records = t.to_records();
        assert_eq!(records[1].cellid, None);
        assert_eq!(records[1].layer, None);
        let json = t.to_json().unwrap();
        assert_eq!(ResultTable::from_json(&json).unwrap(), t);
    }

    #[test]
    fn point_geometry_written_as_wkt() {
        let mut b = TableBuilder::new(TableSchema::intersection(ShapeFamily::Point, false, false));
        b.push(RowInput {
            geometry: Some(Geometry::Point(point!(x: 2.0, y: 3.0))),
            ..RowInput::new(ShapeId(0), Some(CellId(0)))
        });
        let records = b.finish().to_records();
        assert_eq!(records[0].geometry.as_deref(), Some("POINT(2 3)"));
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let mut records = line_table().to_records();
        records[1].length = None;
        let err = ResultTable::from_records(
            TableSchema::intersection(ShapeFamily::Line, true, false),
            records,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TableError::MissingColumn {
                index: 1,
                column: "length"
            }
        ));
    }

    #[test]
    fn unexpected_column_is_rejected() {
        let records = line_table().to_records();
        let err = ResultTable::from_records(TableSchema::candidates(true), records).unwrap_err();
        assert!(matches!(
            err,
            TableError::UnexpectedColumn {
                column: "geometry",
                ..
            }
        ));
    }

    #[test]
    fn half_address_is_rejected() {
        let mut records = line_table().to_records();
        records[0].col = None;
        let schema = TableSchema::intersection(ShapeFamily::Line, true, false);
        assert!(matches!(
            ResultTable::from_records(schema, records),
            Err(TableError::MissingColumn { column: "col", .. })
        ));
    }

    #[test]
    fn bad_wkt_is_rejected() {
        let mut records = line_table().to_records();
        records[0].geometry = Some("LINESTRING(oops)".into());
        let schema = TableSchema::intersection(ShapeFamily::Line, true, false);
        assert!(matches!(
            ResultTable::from_records(schema, records),
            Err(TableError::Wkt { index: 0, .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            ResultTable::from_json("{not json"),
            Err(TableError::Json(_))
        ));
    }
}
