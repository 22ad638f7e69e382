//! Conformance oracle: verify that a columnar reader reproduces a
//! pre-recorded golden reference row for row.
//!
//! The oracle drives a [`colcheck_types::ColumnarSource`] and a gzip golden
//! fixture in lockstep: each decoded row is rendered to JSON, both sides are
//! canonicalized, and the first divergence (content, or cardinality on
//! either side) ends the run.  A weaker structural path re-ingests the
//! golden text as batches and compares only counts; it reports, never
//! asserts.
//!
//! Everything is sequential and scoped: file handles, decompression streams,
//! and cursors live inside one comparison call and are released on every
//! exit path.

pub mod canon;
pub mod compare;
pub mod golden;
pub mod report;
pub mod structural;

pub use canon::canonicalize;
pub use compare::{compare_to_golden, compare_to_golden_with_capacity};
pub use golden::GoldenReader;
pub use report::{format_divergence, ComparisonOutcome};
pub use structural::{structural_check, StructuralReport};
