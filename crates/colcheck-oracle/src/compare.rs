//! The comparison engine: batch decoding against golden-line consumption,
//! in lockstep.

use std::path::Path;

use colcheck_error::Result;
use colcheck_json::render_row;
use colcheck_types::{BatchCursor as _, ColumnarSource, DEFAULT_BATCH_CAPACITY};
use tracing::{debug, info, warn};

use crate::canon::canonicalize;
use crate::golden::GoldenReader;
use crate::report::ComparisonOutcome;

/// Compare every row `source` decodes against the golden fixture at
/// `golden_path`, with the default batch capacity.
///
/// # Errors
///
/// I/O, decompression, decode, and render failures propagate; divergences
/// are returned as [`ComparisonOutcome`] data.
pub fn compare_to_golden(
    source: &mut dyn ColumnarSource,
    golden_path: &Path,
) -> Result<ComparisonOutcome> {
    compare_to_golden_with_capacity(source, golden_path, DEFAULT_BATCH_CAPACITY)
}

/// [`compare_to_golden`] with an explicit rows-per-batch capacity.
///
/// Rows are compared strictly in schema-declared column order and row
/// emission order.  The loop is fail-fast: the first content mismatch or
/// cardinality discrepancy ends the run.  Trailing golden lines after the
/// reader is exhausted are counted explicitly — they are a failure, never
/// silently ignored.
///
/// # Errors
///
/// See [`compare_to_golden`].
pub fn compare_to_golden_with_capacity(
    source: &mut dyn ColumnarSource,
    golden_path: &Path,
    batch_capacity: usize,
) -> Result<ComparisonOutcome> {
    let schema = source.schema().clone();
    let mut golden = GoldenReader::open(golden_path)?;
    let mut batch = schema.create_batch(batch_capacity);
    let mut cursor = source.rows()?;

    let mut row_index = 0u64;
    while cursor.advance(&mut batch)? {
        debug!(rows = batch.size(), row_index, "batch decoded");
        // The batch is a rolling arena: everything we need from this fetch
        // is rendered before the next advance overwrites it.
        for row in 0..batch.size() {
            let actual = canonicalize(&render_row(&batch, &schema, row)?);
            let Some(line) = golden.next_line()? else {
                warn!(row_index, "golden stream exhausted before reader");
                return Ok(ComparisonOutcome::GoldenExhausted { row_index });
            };
            let expected = canonicalize(&line);
            if expected != actual {
                warn!(row_index, "canonical text diverged");
                return Ok(ComparisonOutcome::ContentMismatch {
                    row_index,
                    expected,
                    actual,
                });
            }
            row_index += 1;
        }
    }

    let remaining = golden.drain()?;
    if remaining > 0 {
        warn!(remaining, "reader exhausted before golden stream");
        return Ok(ComparisonOutcome::ActualExhausted { remaining });
    }

    info!(rows_compared = row_index, "comparison matched");
    Ok(ComparisonOutcome::Match {
        rows_compared: row_index,
    })
}
