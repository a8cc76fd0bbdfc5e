//! Test utilities for gridclip development.
//!
//! Provides the standard small grids used across the integration tests and
//! mock grid models that fail in controlled ways.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod mock;

pub use fixtures::{
    elevation_grid, half_grid, rect_grid, rect_vertex_grid, rotation, tri_grid, unit_grid,
};
pub use mock::{FailingGrid, SliverGrid};
