//! Structural reconciliation: the weaker, count-only secondary check.
//!
//! The golden text is re-ingested as row batches through the same schema and
//! only row/column counts are compared — no per-field values.  This path
//! reports; it never asserts.  It exists as a secondary signal (is the
//! cardinality story even plausible?) and must not be the sole correctness
//! check — that is [`crate::compare::compare_to_golden`]'s job.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use colcheck_error::Result;
use colcheck_json::JsonBatchReader;
use colcheck_types::{BatchCursor, ColumnarSource, DEFAULT_BATCH_CAPACITY};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Counts from one structural reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReport {
    /// Rows decoded by the reader under test.
    pub actual_rows: u64,
    /// Rows re-ingested from the golden text.
    pub golden_rows: u64,
    /// Rows the file's metadata claims (the reader's `row_count`).
    pub declared_rows: u64,
    /// Top-level column count on each side (both derive from the shared
    /// schema, so a mismatch means the adapter dropped columns).
    pub actual_columns: usize,
    pub golden_columns: usize,
}

impl StructuralReport {
    #[must_use]
    pub fn rows_match(&self) -> bool {
        self.actual_rows == self.golden_rows
    }

    #[must_use]
    pub fn columns_match(&self) -> bool {
        self.actual_columns == self.golden_columns
    }

    /// All counts line up, including the file's declared row count.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.rows_match() && self.columns_match() && self.declared_rows == self.actual_rows
    }

    /// One-line summary for logs and CLI output.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "structural: actual_rows={} golden_rows={} declared_rows={} \
             actual_columns={} golden_columns={} ({})",
            self.actual_rows,
            self.golden_rows,
            self.declared_rows,
            self.actual_columns,
            self.golden_columns,
            if self.is_consistent() {
                "consistent"
            } else {
                "INCONSISTENT"
            }
        )
    }
}

/// Run the structural check: count rows on both sides under the same schema.
///
/// # Errors
///
/// I/O, decompression, and golden-parse failures propagate; count
/// disagreement does not — inspect the returned report.
pub fn structural_check(
    source: &mut dyn ColumnarSource,
    golden_path: &Path,
) -> Result<StructuralReport> {
    let schema = source.schema().clone();
    let declared_rows = source.row_count();
    let mut batch = schema.create_batch(DEFAULT_BATCH_CAPACITY);

    let mut actual_rows = 0u64;
    {
        let mut cursor = source.rows()?;
        while cursor.advance(&mut batch)? {
            actual_rows += batch.size() as u64;
        }
    }
    let actual_columns = batch.column_count();

    let file = BufReader::new(File::open(golden_path)?);
    let mut golden_reader = JsonBatchReader::new(&schema, BufReader::new(GzDecoder::new(file)));
    let mut golden_rows = 0u64;
    let mut golden_batch = schema.create_batch(DEFAULT_BATCH_CAPACITY);
    while golden_reader.advance(&mut golden_batch)? {
        golden_rows += golden_batch.size() as u64;
    }
    let golden_columns = golden_batch.column_count();

    let report = StructuralReport {
        actual_rows,
        golden_rows,
        declared_rows,
        actual_columns,
        golden_columns,
    };
    info!(summary = %report.summary(), "structural reconciliation finished");
    Ok(report)
}
