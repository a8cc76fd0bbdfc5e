//! Which columns a result table carries.

use gridclip_core::ShapeFamily;
use serde::{Deserialize, Serialize};

/// Column set of a [`ResultTable`](crate::ResultTable).
///
/// `shape_id` and `cellid` are always present. `row`/`col` are present for
/// structured grids, `geometry` for clip queries, `length` for line shapes,
/// `area` for polygon shapes and `layer` when elevation classification was
/// requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableSchema {
    /// `row` and `col` columns.
    pub row_col: bool,
    /// `geometry` column.
    pub geometry: bool,
    /// `length` column.
    pub length: bool,
    /// `area` column.
    pub area: bool,
    /// `layer` column.
    pub layer: bool,
}

impl TableSchema {
    /// Schema of a candidates-only table.
    pub fn candidates(row_col: bool) -> Self {
        Self {
            row_col,
            ..Self::default()
        }
    }

    /// Schema of a point-to-cell table.
    pub fn point_to_cell(row_col: bool, layer: bool) -> Self {
        Self {
            row_col,
            layer,
            ..Self::default()
        }
    }

    /// Schema of a clip table for shapes of `family`.
    ///
    /// A `layer` column is only added for point shapes.
    pub fn intersection(family: ShapeFamily, row_col: bool, layer: bool) -> Self {
        Self {
            row_col,
            geometry: true,
            length: family == ShapeFamily::Line,
            area: family == ShapeFamily::Polygon,
            layer: layer && family == ShapeFamily::Point,
        }
    }

    /// Names of the present columns, in table order.
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec!["shape_id", "cellid"];
        if self.row_col {
            names.extend(["row", "col"]);
        }
        for (present, name) in [
            (self.geometry, "geometry"),
            (self.length, "length"),
            (self.area, "area"),
            (self.layer, "layer"),
        ] {
            if present {
                names.push(name);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_have_ids_only() {
        assert_eq!(TableSchema::candidates(false).column_names(), ["shape_id", "cellid"]);
        assert_eq!(
            TableSchema::candidates(true).column_names(),
            ["shape_id", "cellid", "row", "col"]
        );
    }

    #[test]
    fn intersection_measures_follow_family() {
        let lines = TableSchema::intersection(ShapeFamily::Line, false, true);
        assert!(lines.length && !lines.area && !lines.layer);
        let polys = TableSchema::intersection(ShapeFamily::Polygon, true, false);
        assert_eq!(
            polys.column_names(),
            ["shape_id", "cellid", "row", "col", "geometry", "area"]
        );
        let points = TableSchema::intersection(ShapeFamily::Point, false, true);
        assert_eq!(points.column_names(), ["shape_id", "cellid", "geometry", "layer"]);
    }

    #[test]
    fn point_to_cell_layer_is_optional() {
        assert!(TableSchema::point_to_cell(false, true).layer);
        assert!(!TableSchema::point_to_cell(false, false).layer);
    }
}
