//! Errors raised when reading a table back from its exchange format.

use thiserror::Error;

/// Failure to rebuild a [`ResultTable`](crate::ResultTable) from records.
#[derive(Debug, Error)]
pub enum TableError {
    /// A column the schema requires has no value.
    #[error("record {index}: column `{column}` is required by the schema")]
    MissingColumn {
        /// Record position.
        index: usize,
        /// Column name.
        column: &'static str,
    },

    /// A value is present for a column the schema does not have.
    #[error("record {index}: column `{column}` is not in the schema")]
    UnexpectedColumn {
        /// Record position.
        index: usize,
        /// Column name.
        column: &'static str,
    },

    /// Geometry text could not be parsed.
    #[error("record {index}: invalid WKT geometry: {reason}")]
    Wkt {
        /// Record position.
        index: usize,
        /// Parser message.
        reason: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON exchange failed: {0}")]
    Json(#[from] serde_json::Error),
}
