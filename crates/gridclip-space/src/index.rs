//! Candidate lookup over cell bounding boxes.

use crate::cells::CellPolygons;
use geo::Rect;
use gridclip_core::CellId;
use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

/// Returns the cells whose bounding box may touch a query envelope.
///
/// Implementations may over-approximate but must never miss a cell whose
/// outline touches the envelope. Results are in ascending cellid order.
pub trait SpatialIndex: Send + Sync {
    /// Candidate cells for `envelope`.
    fn candidates(&self, envelope: &Rect<f64>) -> Vec<CellId>;

    /// True if lookups are pruned by an index structure.
    fn is_indexed(&self) -> bool;

    /// Number of cells covered.
    fn len(&self) -> usize;

    /// True for an index over zero cells.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug)]
struct CellEnvelope {
    cellid: CellId,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for CellEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn aabb(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// STR bulk-loaded R-tree over cell bounding boxes.
#[derive(Debug)]
pub struct RTreeIndex {
    tree: RTree<CellEnvelope>,
}

impl RTreeIndex {
    /// Bulk-load the tree from every cell of `cells`.
    pub fn build(cells: &CellPolygons) -> Self {
        let entries: Vec<CellEnvelope> = cells
            .all_bounds()
            .iter()
            .enumerate()
            .map(|(i, r)| CellEnvelope {
                cellid: CellId(i),
                envelope: aabb(r),
            })
            .collect();
        let tree = RTree::bulk_load(entries);
        debug!(cells = tree.size(), "bulk-loaded cell r-tree");
        Self { tree }
    }
}

impl SpatialIndex for RTreeIndex {
    fn candidates(&self, envelope: &Rect<f64>) -> Vec<CellId> {
        let mut out: Vec<CellId> = self
            .tree
            .locate_in_envelope_intersecting(&aabb(envelope))
            .map(|e| e.cellid)
            .collect();
        out.sort_unstable();
        out
    }

    fn is_indexed(&self) -> bool {
        true
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}

/// Index substitute that returns every cell.
///
/// Exact filtering downstream makes results identical to [`RTreeIndex`];
/// only the cost per query differs.
#[derive(Clone, Copy, Debug)]
pub struct LinearScan {
    cell_count: usize,
}

impl LinearScan {
    /// Scan over `cell_count` cells.
    pub fn new(cell_count: usize) -> Self {
        Self { cell_count }
    }
}

impl SpatialIndex for LinearScan {
    fn candidates(&self, _envelope: &Rect<f64>) -> Vec<CellId> {
        (0..self.cell_count).map(CellId).collect()
    }

    fn is_indexed(&self) -> bool {
        false
    }

    fn len(&self) -> usize {
        self.cell_count
    }
}

/// Build the index selected by `use_index`.
pub fn build_index(cells: &CellPolygons, use_index: bool) -> Box<dyn SpatialIndex> {
    if use_index {
        Box::new(RTreeIndex::build(cells))
    } else {
        Box::new(LinearScan::new(cells.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructuredGrid;
    use geo::coord;
    use proptest::prelude::*;

    fn cells(nrow: usize, ncol: usize) -> CellPolygons {
        let g = StructuredGrid::uniform(nrow, ncol, 1.0).unwrap();
        CellPolygons::build(&g, true, false).unwrap()
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect<f64> {
        Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 })
    }

    #[test]
    fn point_envelope_on_junction_hits_all_four_cells() {
        let idx = RTreeIndex::build(&cells(2, 2));
        let hits = idx.candidates(&rect(1.0, 1.0, 1.0, 1.0));
        assert_eq!(hits, vec![CellId(0), CellId(1), CellId(2), CellId(3)]);
    }

    #[test]
    fn envelope_outside_grid_is_empty() {
        let idx = RTreeIndex::build(&cells(2, 2));
        assert!(idx.candidates(&rect(5.0, 5.0, 6.0, 6.0)).is_empty());
    }

    #[test]
    fn linear_scan_returns_everything() {
        let scan = LinearScan::new(4);
        assert!(!scan.is_indexed());
        assert_eq!(scan.candidates(&rect(9.0, 9.0, 9.0, 9.0)).len(), 4);
    }

    #[test]
    fn build_index_respects_flag() {
        let c = cells(3, 3);
        assert!(build_index(&c, true).is_indexed());
        assert!(!build_index(&c, false).is_indexed());
        assert_eq!(build_index(&c, true).len(), 9);
    }

    proptest! {
        #[test]
        fn rtree_never_misses_a_touching_cell(
            x0 in -1.0f64..6.0,
            y0 in -1.0f64..6.0,
            w in 0.0f64..3.0,
            h in 0.0f64..3.0,
        ) {
            let c = cells(5, 5);
            let q = rect(x0, y0, x0 + w, y0 + h);
            let hits = RTreeIndex::build(&c).candidates(&q);
            for (id, _) in c.iter() {
                let b = c.bounds(id);
                let touches = b.min().x <= q.max().x
                    && b.max().x >= q.min().x
                    && b.min().y <= q.max().y
                    && b.max().y >= q.min().y;
                prop_assert_eq!(touches, hits.contains(&id));
            }
        }
    }
}
