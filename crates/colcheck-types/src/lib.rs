//! Core type definitions for the colcheck conformance oracle.
//!
//! This crate holds everything the comparison engine and its collaborators
//! share: the immutable [`Schema`] tree describing a columnar file's typed
//! columns, the rolling [`RowBatch`] arena that decoded rows are written
//! into, the dynamic [`CellValue`] cell representation, and the
//! [`ColumnarSource`]/[`BatchCursor`] capability traits through which any
//! concrete binary-format reader is consumed.

pub mod batch;
pub mod layout;
pub mod schema;
pub mod source;

pub use batch::{CellValue, ColumnVector, RowBatch};
pub use layout::FixtureLayout;
pub use schema::{ColumnType, Field, Schema};
pub use source::{BatchCursor, ColumnarSource, VecSource, DEFAULT_BATCH_CAPACITY};
