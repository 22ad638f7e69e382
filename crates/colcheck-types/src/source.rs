//! Reader capability traits.
//!
//! The binary columnar format is an external collaborator: the oracle never
//! sees a concrete reader type, only these traits.  Any library exposing
//! `{schema, row count, batch cursor}` plugs in, and tests substitute
//! [`VecSource`] without touching the comparison engine.

use colcheck_error::Result;

use crate::batch::{CellValue, RowBatch};
use crate::schema::Schema;

/// Default rows-per-batch used when a caller has no reason to choose.
pub const DEFAULT_BATCH_CAPACITY: usize = 1024;

/// Pull-based sequence of row batches.
///
/// `advance` decodes the next chunk of rows into `batch` (overwriting its
/// previous contents) and returns `false` once no rows remain.  After the
/// terminal `false` the cursor stays terminal: further calls leave the batch
/// empty and keep returning `false`.
pub trait BatchCursor {
    /// # Errors
    ///
    /// Decode failures are fatal and propagate.
    fn advance(&mut self, batch: &mut RowBatch) -> Result<bool>;
}

/// An opened columnar file session.
pub trait ColumnarSource {
    /// Schema declared by the file.  Immutable for the session's lifetime.
    fn schema(&self) -> &Schema;

    /// Total logical rows the file claims to hold.
    fn row_count(&self) -> u64;

    /// Open a fresh forward-only cursor over the file's rows.
    ///
    /// # Errors
    ///
    /// Propagates I/O or decode-session failures.
    fn rows(&mut self) -> Result<Box<dyn BatchCursor + '_>>;
}

/// In-memory source backed by a vector of rows; the test double for any
/// concrete format reader, and the backing for CLI demo inputs.
#[derive(Debug, Clone)]
pub struct VecSource {
    schema: Schema,
    rows: Vec<Vec<CellValue>>,
}

impl VecSource {
    /// Build a source over pre-decoded rows.
    ///
    /// # Errors
    ///
    /// Returns [`colcheck_error::CheckError::SchemaMismatch`] when any row
    /// has the wrong width or a cell that does not conform to its column
    /// type.
    pub fn new(schema: Schema, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != schema.column_count() {
                return Err(colcheck_error::CheckError::schema_mismatch(format!(
                    "row {row_idx} has {} cells, schema has {} columns",
                    row.len(),
                    schema.column_count()
                )));
            }
            for (cell, field) in row.iter().zip(schema.fields()) {
                if !cell.conforms_to(&field.ty) {
                    return Err(colcheck_error::CheckError::schema_mismatch(format!(
                        "row {row_idx} column `{}` holds a non-conforming cell",
                        field.name
                    )));
                }
            }
        }
        Ok(Self { schema, rows })
    }
}

impl ColumnarSource for VecSource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn row_count(&self) -> u64 {
        self.rows.len() as u64
    }

    fn rows(&mut self) -> Result<Box<dyn BatchCursor + '_>> {
        Ok(Box::new(VecCursor {
            rows: &self.rows,
            pos: 0,
        }))
    }
}

struct VecCursor<'a> {
    rows: &'a [Vec<CellValue>],
    pos: usize,
}

impl BatchCursor for VecCursor<'_> {
    fn advance(&mut self, batch: &mut RowBatch) -> Result<bool> {
        batch.reset();
        while self.pos < self.rows.len() && !batch.is_full() {
            batch.push_row(self.rows[self.pos].clone())?;
            self.pos += 1;
        }
        Ok(batch.size() > 0)
    }
}
