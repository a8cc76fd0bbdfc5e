//! Error taxonomy for grid construction and queries.
//!
//! Two families are kept apart: [`StructuralError`] for caller contract
//! violations and [`GridError`] for inconsistent grid definitions. A query
//! that simply finds nothing is never an error; it yields an empty table.

use crate::grid::GridKind;
use crate::id::CellId;
use crate::shape::ShapeKind;
use thiserror::Error;

/// The caller asked for something the engine does not accept.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StructuralError {
    /// The input geometry kind cannot be clipped.
    #[error("unsupported shape kind: {kind}")]
    UnsupportedShape {
        /// Description of the rejected geometry.
        kind: String,
    },
    /// A batch mixed shapes of different kinds.
    #[error("batch mixes shape kinds: expected {expected}, found {found} at index {index}")]
    MixedBatch {
        /// Kind of the first shape in the batch.
        expected: ShapeKind,
        /// Kind of the offending shape.
        found: ShapeKind,
        /// Index of the offending shape.
        index: usize,
    },
    /// A batch contained no shapes.
    #[error("batch contains no shapes")]
    EmptyBatch,
    /// An operation that works on one shape received several.
    #[error("{operation} requires exactly one shape, got {count}")]
    MultipleShapes {
        /// Name of the operation.
        operation: &'static str,
        /// Number of shapes received.
        count: usize,
    },
    /// The operation needs the spatial index and it was disabled at build.
    #[error("{operation} requires the spatial index, which is disabled")]
    IndexDisabled {
        /// Name of the operation.
        operation: &'static str,
    },
    /// The operation does not handle this kind of shape.
    #[error("{operation} does not accept {kind} input")]
    WrongFamily {
        /// Name of the operation.
        operation: &'static str,
        /// Kind that was rejected.
        kind: ShapeKind,
    },
    /// A query option is out of its valid range.
    #[error("invalid option {name}: {reason}")]
    InvalidOption {
        /// Option name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// The grid collaborator is inconsistent or cannot answer a request.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridError {
    /// Row/column addressing was requested on a non-structured grid.
    #[error("row/col lookup requires a structured grid, got a {kind} grid")]
    NotStructured {
        /// Actual kind of the grid.
        kind: GridKind,
    },
    /// A cell id outside `[0, cell_count)`.
    #[error("cellid {cellid} out of range for a grid of {cell_count} cells")]
    CellOutOfRange {
        /// The requested id.
        cellid: CellId,
        /// Number of cells in the grid.
        cell_count: usize,
    },
    /// Layer classification was requested but the grid has no elevations.
    #[error("grid has no layer elevations")]
    NoElevations,
    /// The grid definition contradicts itself.
    #[error("inconsistent grid: {reason}")]
    Inconsistent {
        /// Description of the inconsistency.
        reason: String,
    },
}

/// Any failure of a public query operation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum QueryError {
    /// Caller contract violation.
    #[error(transparent)]
    Structural(#[from] StructuralError),
    /// Grid collaborator failure.
    #[error(transparent)]
    Configuration(#[from] GridError),
}

impl QueryError {
    /// True for caller contract violations.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }

    /// True for grid configuration failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
