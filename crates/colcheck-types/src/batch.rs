//! Rolling row-batch arena and the dynamic cell representation.
//!
//! A [`RowBatch`] is a non-owning view in the sense that matters to callers:
//! every cursor `advance` overwrites the previous contents, so any cell value
//! needed beyond the current fetch must be cloned out before the next
//! `advance`.  Only row indices `[0, size)` are valid; the slots above
//! `size` hold stale or null cells and are never read by a correct consumer.

use colcheck_error::{CheckError, Result};
use serde::{Deserialize, Serialize};

use crate::schema::ColumnType;

/// One decoded cell.  The concrete binary reader decodes into these; the
/// renderer and the golden re-ingestion adapter agree on the same shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Null,
    Boolean(bool),
    /// All integer widths share one storage; width conformance is checked
    /// against the schema, not the carrier.
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Epoch microseconds.
    Timestamp(i64),
    Decimal {
        unscaled: i128,
        scale: u32,
    },
    List(Vec<CellValue>),
    Map(Vec<(CellValue, CellValue)>),
    Struct(Vec<CellValue>),
    Union {
        tag: usize,
        value: Box<CellValue>,
    },
}

impl CellValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check that this cell is a legal instance of `ty`.  Null conforms to
    /// every type.
    #[must_use]
    pub fn conforms_to(&self, ty: &ColumnType) -> bool {
        match (self, ty) {
            (Self::Null, _) => true,
            (Self::Boolean(_), ColumnType::Boolean) => true,
            (Self::Integer(v), ColumnType::TinyInt) => i8::try_from(*v).is_ok(),
            (Self::Integer(v), ColumnType::SmallInt) => i16::try_from(*v).is_ok(),
            (Self::Integer(v), ColumnType::Int) => i32::try_from(*v).is_ok(),
            (Self::Integer(_), ColumnType::BigInt) => true,
            (Self::Float(_), ColumnType::Float | ColumnType::Double) => true,
            (Self::Text(_), ColumnType::String) => true,
            (Self::Bytes(_), ColumnType::Binary) => true,
            (Self::Timestamp(_), ColumnType::Timestamp) => true,
            (
                Self::Decimal { unscaled, scale },
                ColumnType::Decimal {
                    precision,
                    scale: ty_scale,
                },
            ) => scale == ty_scale && unscaled.unsigned_abs() < 10u128.pow(u32::from(*precision)),
            (Self::List(items), ColumnType::List(elem)) => {
                items.iter().all(|item| item.conforms_to(elem))
            }
            (Self::Map(entries), ColumnType::Map { key, value }) => entries
                .iter()
                .all(|(k, v)| k.conforms_to(key) && v.conforms_to(value)),
            (Self::Struct(cells), ColumnType::Struct(fields)) => {
                cells.len() == fields.len()
                    && cells
                        .iter()
                        .zip(fields)
                        .all(|(cell, field)| cell.conforms_to(&field.ty))
            }
            (Self::Union { tag, value }, ColumnType::Union(variants)) => variants
                .get(*tag)
                .is_some_and(|variant| value.conforms_to(variant)),
            _ => false,
        }
    }
}

/// One column's slice of the batch arena: `capacity` pre-allocated cells.
#[derive(Debug, Clone)]
pub struct ColumnVector {
    cells: Vec<CellValue>,
}

impl ColumnVector {
    fn new(capacity: usize) -> Self {
        Self {
            cells: vec![CellValue::Null; capacity],
        }
    }

    /// Cell at `row`.  Callers must respect the batch `size` bound.
    #[must_use]
    pub fn cell(&self, row: usize) -> &CellValue {
        &self.cells[row]
    }

    fn set(&mut self, row: usize, value: CellValue) {
        self.cells[row] = value;
    }

    fn reset(&mut self) {
        self.cells.fill(CellValue::Null);
    }
}

/// Fixed-capacity columnar buffer holding one fetch's worth of decoded rows.
///
/// The batch has no identity beyond the current fetch cycle: `reset` is
/// called by the cursor at the top of every `advance`, and rows are appended
/// with [`RowBatch::push_row`] which maintains the `size` invariant.
#[derive(Debug, Clone)]
pub struct RowBatch {
    capacity: usize,
    size: usize,
    columns: Vec<ColumnVector>,
}

impl RowBatch {
    /// Allocate an arena of `column_count` vectors, `capacity` rows each.
    #[must_use]
    pub fn new(column_count: usize, capacity: usize) -> Self {
        Self {
            capacity,
            size: 0,
            columns: (0..column_count)
                .map(|_| ColumnVector::new(capacity))
                .collect(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently valid rows; only indices `[0, size)` may be read.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.size == self.capacity
    }

    /// Column vector `col`.
    #[must_use]
    pub fn column(&self, col: usize) -> &ColumnVector {
        &self.columns[col]
    }

    /// Cell at (`col`, `row`).  `row` must be below [`RowBatch::size`].
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> &CellValue {
        debug_assert!(row < self.size, "read of row {row} past size {}", self.size);
        self.columns[col].cell(row)
    }

    /// Null out the arena and invalidate all rows.  Cursors call this at the
    /// top of every `advance`.
    pub fn reset(&mut self) {
        for column in &mut self.columns {
            column.reset();
        }
        self.size = 0;
    }

    /// Append one row across all columns.
    ///
    /// # Errors
    ///
    /// [`CheckError::BatchOverflow`] when the arena is full, or
    /// [`CheckError::SchemaMismatch`] when `cells` has the wrong width.
    pub fn push_row(&mut self, cells: Vec<CellValue>) -> Result<()> {
        if self.size == self.capacity {
            return Err(CheckError::BatchOverflow {
                capacity: self.capacity,
            });
        }
        if cells.len() != self.columns.len() {
            return Err(CheckError::schema_mismatch(format!(
                "row has {} cells, schema has {} columns",
                cells.len(),
                self.columns.len()
            )));
        }
        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column.set(self.size, cell);
        }
        self.size += 1;
        Ok(())
    }
}
