//! gridclip: intersect points, lines and polygons with model grids.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! gridclip sub-crates. For most users, adding `gridclip` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use gridclip::prelude::*;
//! use geo::line_string;
//!
//! // A 2×2 grid of 10 m cells; cell 0 is the top-left one.
//! let grid = StructuredGrid::uniform(2, 2, 10.0).unwrap();
//! let engine = Engine::new(Arc::new(grid), true, false).unwrap();
//!
//! let line = Shape::LineString(line_string![(x: 5.0, y: 5.0), (x: 15.0, y: 5.0)]);
//! let table = engine.query_intersection(line, &IntersectOptions::default()).unwrap();
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.cellids(), &[Some(CellId(2)), Some(CellId(3))]);
//! assert!((table.total_length() - 10.0).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gridclip-core` | IDs, shapes, batches, transforms, errors |
//! | [`space`] | `gridclip-space` | Grid models, cell polygons, spatial index |
//! | [`clip`] | `gridclip-clip` | Exact filtering, clipping and ownership |
//! | [`table`] | `gridclip-table` | Result tables and their JSON exchange form |
//! | [`engine`] | `gridclip-engine` | The query engine and layer classification |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and errors (`gridclip-core`).
///
/// Contains [`types::Shape`], [`types::ShapeBatch`], the cell and shape
/// identifiers, and the error taxonomy rooted at [`types::QueryError`].
pub use gridclip_core as types;

/// Grid models and spatial indexing (`gridclip-space`).
///
/// Provides the [`space::GridSource`] trait, the reference grids
/// [`space::StructuredGrid`] and [`space::VertexGrid`], and
/// [`space::SpatialIndex`].
pub use gridclip_space as space;

/// Clipping primitives (`gridclip-clip`).
///
/// Most users never call these directly; [`engine::Engine`] drives them.
pub use gridclip_clip as clip;

/// Result tables (`gridclip-table`).
///
/// [`table::ResultTable`] stores rows as typed columns and converts to and
/// from [`table::TableDocument`] JSON.
pub use gridclip_table as table;

/// The query engine (`gridclip-engine`).
pub use gridclip_engine as engine;

/// Common imports for typical gridclip usage.
///
/// ```rust
/// use gridclip::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use gridclip_core::{
        CellId, CoordinateTransform, GridKind, PointZ, RowCol, Shape, ShapeBatch, ShapeId,
        ShapeKind,
    };

    // Errors
    pub use gridclip_core::{GridError, QueryError, StructuralError};

    // Grids
    pub use gridclip_space::{GridSource, StructuredGrid, VertexGrid};

    // Results
    pub use gridclip_table::{ResultTable, TableError, TableSchema};

    // Engine
    pub use gridclip_engine::{Engine, EngineConfig, IntersectOptions};
}
