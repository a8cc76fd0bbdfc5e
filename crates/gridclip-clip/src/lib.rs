//! Exact clipping of query shapes against grid cells.
//!
//! The pipeline for one shape is: [`filter`] the index candidates down to
//! cells that truly intersect the shape, clip each survivor with the
//! family-specific clipper, then hand the per-cell pieces to
//! [`resolve_ownership`] so that boundary-coincident pieces are credited to
//! the lowest cellid only. [`clip_shape`] runs the whole pipeline.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dispatch;
pub mod filter;
pub mod line;
pub mod ownership;
pub mod point;
pub mod polygon;

pub use dispatch::{clip_shape, ClipSettings, ClippedCell};
pub use filter::{filter, PreparedShape};
pub use line::{LineClip, LinePiece};
pub use ownership::{resolve_ownership, CellClip, ClipPart};
pub use point::{owning_cell, PointClip};
pub use polygon::PolygonClip;
