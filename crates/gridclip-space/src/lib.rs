//! Grid collaborators, cell polygon building and spatial indexing.
//!
//! [`GridSource`] is the interface a grid model implements. Two reference
//! models ship here: [`StructuredGrid`] for row/column lattices and
//! [`VertexGrid`] for arbitrary polygonal cells. [`CellPolygons`] turns a
//! grid into query-space outlines once, and [`SpatialIndex`] narrows a
//! query envelope to candidate cells.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cells;
pub mod grid;
pub mod index;
pub mod structured;
pub mod vertex;

#[cfg(test)]
pub(crate) mod compliance;

pub use cells::CellPolygons;
pub use grid::{GridSource, StructuredEdges};
pub use index::{build_index, LinearScan, RTreeIndex, SpatialIndex};
pub use structured::StructuredGrid;
pub use vertex::VertexGrid;
