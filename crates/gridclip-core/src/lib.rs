//! Core types and errors for the gridclip intersection engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: cell and shape
//! identifiers, the query [`Shape`] union, homogeneous shape batches,
//! the grid coordinate transform, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod error;
pub mod grid;
pub mod id;
pub mod shape;

pub use batch::{QueryInput, ShapeBatch};
pub use error::{GridError, QueryError, StructuralError};
pub use grid::{CoordinateTransform, GridKind};
pub use id::{CellId, RowCol, ShapeId};
pub use shape::{PointZ, Shape, ShapeFamily, ShapeKind};
