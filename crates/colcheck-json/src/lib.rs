//! JSON surfaces of the conformance oracle.
//!
//! Two directions share one set of spelling conventions:
//!
//! - [`render_row`] turns one row of a decoded batch into compact JSON text
//!   (the "actual" side of a comparison);
//! - [`JsonBatchReader`] parses newline-delimited JSON back into batches
//!   against a schema (the golden re-ingestion path, and the backing for
//!   test and CLI sources).
//!
//! Map entries are rendered as `{"_key":…,"_value":…}` objects; the reader
//! accepts both that spelling and the `key`/`value` spelling golden writers
//! use, since the canonicalizer reconciles the two at comparison time.

pub mod reader;
pub mod render;

pub use reader::{JsonBatchReader, JsonFileSource};
pub use render::render_row;
