//! Result tables for gridclip queries.
//!
//! A [`ResultTable`] holds one row per retained `(shape_id, cellid)` pair in
//! parallel typed columns. Which columns exist is recorded in its
//! [`TableSchema`]; nullable values are `Option`s. Tables convert to and
//! from [`TableRecord`]s and JSON for exchange.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod exchange;
pub mod schema;
pub mod table;

pub use error::TableError;
pub use exchange::{TableDocument, TableRecord};
pub use schema::TableSchema;
pub use table::{ResultTable, RowInput, TableBuilder, TableRow};
