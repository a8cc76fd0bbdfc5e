//! GridSource compliance test helpers.
//!
//! These functions verify that a grid implementation satisfies the
//! invariants the engine relies on. Reused across the grid test modules.

use crate::cells::CellPolygons;
use crate::grid::GridSource;
use geo::{Area, BooleanOps, Intersects, MultiPolygon};
use gridclip_core::{CellId, GridError, GridKind};
use indexmap::IndexSet;

/// Assert every cell builds into a closed, counter-clockwise, non-empty ring.
pub fn assert_cells_well_formed(grid: &dyn GridSource) {
    let cells = CellPolygons::build(grid, true, false).expect("cell polygons build");
    assert_eq!(cells.len(), grid.cell_count());
    for (id, p) in cells.iter() {
        let ring = &p.exterior().0;
        assert!(ring.len() >= 4, "cell {id} ring too short: {}", ring.len());
        assert_eq!(ring.first(), ring.last(), "cell {id} ring not closed");
        assert!(p.signed_area() > 0.0, "cell {id} not counter-clockwise");
    }
}

/// Assert no two cells overlap with positive area.
pub fn assert_cells_disjoint(grid: &dyn GridSource) {
    let cells = CellPolygons::build(grid, true, false).expect("cell polygons build");
    for (a, pa) in cells.iter() {
        for (b, pb) in cells.iter().filter(|(b, _)| *b > a) {
            if !cells.bounds(a).intersects(&cells.bounds(b)) {
                continue;
            }
            let overlap = MultiPolygon::new(vec![pa.clone()])
                .intersection(&MultiPolygon::new(vec![pb.clone()]))
                .unsigned_area();
            let scale = cells.area(a).min(cells.area(b));
            assert!(
                overlap <= scale * 1e-9,
                "cells {a} and {b} overlap by {overlap}"
            );
        }
    }
}

/// Assert that structured grids map cell ids to unique, in-range
/// rows and columns, and that vertex grids refuse the lookup.
pub fn assert_row_col_bijective(grid: &dyn GridSource) {
    match grid.grid_kind() {
        GridKind::Structured => {
            let mut seen = IndexSet::new();
            for i in 0..grid.cell_count() {
                let rc = grid.cellid_to_row_col(CellId(i)).expect("row/col lookup");
                assert!(seen.insert(rc), "duplicate row/col {rc} for cell {i}");
            }
            assert_eq!(seen.len(), grid.cell_count());
            let edges = grid.structured_edges().expect("structured grids expose edges");
            assert_eq!(edges.nrow() * edges.ncol(), grid.cell_count());
        }
        GridKind::Vertex => {
            assert_eq!(
                grid.cellid_to_row_col(CellId(0)),
                Err(GridError::NotStructured {
                    kind: GridKind::Vertex
                })
            );
        }
    }
}

/// Assert out-of-range cell ids are rejected rather than wrapped.
pub fn assert_out_of_range_rejected(grid: &dyn GridSource) {
    let beyond = CellId(grid.cell_count());
    assert!(matches!(
        grid.cell_polygon(beyond),
        Err(GridError::CellOutOfRange { .. })
    ));
}

/// Assert elevation bounds, where present, strictly decrease.
pub fn assert_elevations_decreasing(grid: &dyn GridSource) {
    for i in 0..grid.cell_count() {
        match grid.layer_elevation_bounds(CellId(i)) {
            Ok(bounds) => {
                assert!(bounds.len() >= 2, "cell {i} has fewer than two bounds");
                for w in bounds.windows(2) {
                    assert!(w[0] > w[1], "cell {i} bounds not decreasing: {bounds:?}");
                }
            }
            Err(GridError::NoElevations) => return,
            Err(e) => panic!("unexpected elevation error for cell {i}: {e}"),
        }
    }
}

/// Assert world-space outlines are the local outlines under the grid
/// transform, with areas preserved.
pub fn assert_transform_consistent(grid: &dyn GridSource) {
    let local = CellPolygons::build(grid, true, false).expect("local build");
    let world = CellPolygons::build(grid, false, false).expect("world build");
    let t = grid.coordinate_transform();
    for (id, p) in local.iter() {
        let w = world.polygon(id);
        for (a, b) in p.exterior().coords().zip(w.exterior().coords()) {
            let mapped = t.apply(*a);
            assert!(
                (mapped.x - b.x).abs() < 1e-9 && (mapped.y - b.y).abs() < 1e-9,
                "cell {id}: {a:?} maps to {mapped:?}, world has {b:?}"
            );
        }
        assert!((local.area(id) - world.area(id)).abs() <= 1e-9 * local.area(id));
    }
}

/// Run all compliance checks.
pub fn run_full_compliance(grid: &dyn GridSource) {
    assert_cells_well_formed(grid);
    assert_cells_disjoint(grid);
    assert_row_col_bijective(grid);
    assert_out_of_range_rejected(grid);
    assert_elevations_decreasing(grid);
    assert_transform_consistent(grid);
}
