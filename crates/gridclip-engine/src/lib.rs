//! Grid-geometry intersection engine.
//!
//! An [`Engine`] is built once per grid: it materializes the cell polygons in
//! query space and, unless disabled, bulk-loads an R-tree over their bounds.
//! It then answers any number of read-only queries:
//!
//! - [`Engine::query_candidates`]: cells each shape touches, no clipping.
//! - [`Engine::query_intersection`]: clipped geometry, length or area per
//!   cell for one shape.
//! - [`Engine::query_intersection_many`]: the same for every shape of a
//!   batch, fanned out over rayon.
//! - [`Engine::query_point_to_cell`]: one owning cell per point, with an
//!   optional layer.
//!
//! Results are [`ResultTable`](gridclip_table::ResultTable)s sorted by
//! `(shape_id, cellid)`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod elevation;
pub mod engine;

pub use config::{EngineConfig, IntersectOptions};
pub use elevation::{classify, classify_many};
pub use engine::Engine;
