//! Schema-driven re-ingestion: newline-delimited JSON text back into row
//! batches.
//!
//! This is the adapter the structural reconciliation path uses to treat a
//! golden fixture as an alternate input source, and the backing for CLI data
//! inputs.  Parsing is strict about types (a value that does not conform to
//! its column is fatal) but lenient about map-entry spelling: both
//! `key`/`value` and `_key`/`_value` are accepted, since the two emitters
//! this oracle reconciles disagree on exactly that.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use colcheck_error::{CheckError, Result};
use colcheck_types::{BatchCursor, CellValue, ColumnType, ColumnarSource, RowBatch, Schema};
use serde_json::Value;
use tracing::debug;

/// A [`BatchCursor`] over newline-delimited JSON rows.
///
/// One JSON object per line, one line per logical row.  Forward-only and
/// non-restartable; open a fresh reader for a fresh pass.
pub struct JsonBatchReader<'a, R: BufRead> {
    schema: &'a Schema,
    reader: R,
    line_no: u64,
    done: bool,
}

impl<'a, R: BufRead> JsonBatchReader<'a, R> {
    pub fn new(schema: &'a Schema, reader: R) -> Self {
        Self {
            schema,
            reader,
            line_no: 0,
            done: false,
        }
    }

    /// Read the next non-blank line, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if !buf.trim().is_empty() {
                return Ok(Some(buf));
            }
        }
    }

    fn parse_row(&self, line: &str) -> Result<Vec<CellValue>> {
        let parsed: Value = serde_json::from_str(line.trim()).map_err(|e| {
            CheckError::JsonParse {
                line: self.line_no,
                message: e.to_string(),
            }
        })?;
        let Value::Object(object) = parsed else {
            return Err(CheckError::JsonParse {
                line: self.line_no,
                message: "row is not a JSON object".to_owned(),
            });
        };

        let mut cells = Vec::with_capacity(self.schema.column_count());
        for field in self.schema.fields() {
            // Absent fields decode as null; golden writers may omit them.
            let value = object.get(&field.name).unwrap_or(&Value::Null);
            let cell = cell_from_json(value, &field.ty, &field.name)?;
            if !cell.conforms_to(&field.ty) {
                return Err(CheckError::schema_mismatch(format!(
                    "line {}: column `{}` value out of range for {:?}",
                    self.line_no, field.name, field.ty
                )));
            }
            cells.push(cell);
        }
        Ok(cells)
    }
}

impl<R: BufRead> BatchCursor for JsonBatchReader<'_, R> {
    fn advance(&mut self, batch: &mut RowBatch) -> Result<bool> {
        batch.reset();
        if self.done {
            return Ok(false);
        }
        while !batch.is_full() {
            match self.next_line()? {
                Some(line) => batch.push_row(self.parse_row(&line)?)?,
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        debug!(rows = batch.size(), line_no = self.line_no, "json batch decoded");
        Ok(batch.size() > 0)
    }
}

/// Fetch a map-entry or union field accepting both emitter spellings.
fn entry_field<'v>(object: &'v serde_json::Map<String, Value>, name: &str) -> &'v Value {
    object
        .get(name)
        .or_else(|| object.get(&format!("_{name}")))
        .unwrap_or(&Value::Null)
}

fn cell_from_json(value: &Value, ty: &ColumnType, path: &str) -> Result<CellValue> {
    let mismatch = |detail: &str| {
        CheckError::schema_mismatch(format!("column `{path}`: {detail} (expected {ty:?})"))
    };

    if value.is_null() {
        return Ok(CellValue::Null);
    }

    Ok(match ty {
        ColumnType::Boolean => CellValue::Boolean(
            value
                .as_bool()
                .ok_or_else(|| mismatch("not a boolean"))?,
        ),
        ColumnType::TinyInt | ColumnType::SmallInt | ColumnType::Int | ColumnType::BigInt => {
            CellValue::Integer(value.as_i64().ok_or_else(|| mismatch("not an integer"))?)
        }
        ColumnType::Float | ColumnType::Double => {
            CellValue::Float(value.as_f64().ok_or_else(|| mismatch("not a number"))?)
        }
        ColumnType::String => CellValue::Text(
            value
                .as_str()
                .ok_or_else(|| mismatch("not a string"))?
                .to_owned(),
        ),
        ColumnType::Binary => {
            let items = value.as_array().ok_or_else(|| mismatch("not a byte array"))?;
            let mut bytes = Vec::with_capacity(items.len());
            for item in items {
                let byte = item
                    .as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| mismatch("byte out of range"))?;
                bytes.push(byte);
            }
            CellValue::Bytes(bytes)
        }
        ColumnType::Timestamp => CellValue::Timestamp(
            value
                .as_i64()
                .ok_or_else(|| mismatch("not an epoch-microsecond number"))?,
        ),
        ColumnType::Decimal { scale, .. } => {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return Err(mismatch("not a decimal string")),
            };
            CellValue::Decimal {
                unscaled: parse_decimal(&text, *scale)
                    .ok_or_else(|| mismatch("malformed decimal"))?,
                scale: *scale,
            }
        }
        ColumnType::List(elem) => {
            let items = value.as_array().ok_or_else(|| mismatch("not an array"))?;
            let mut cells = Vec::with_capacity(items.len());
            for item in items {
                cells.push(cell_from_json(item, elem, path)?);
            }
            CellValue::List(cells)
        }
        ColumnType::Map { key, value: val_ty } => {
            let entries = value
                .as_array()
                .ok_or_else(|| mismatch("not an array of map entries"))?;
            let mut cells = Vec::with_capacity(entries.len());
            for entry in entries {
                let object = entry
                    .as_object()
                    .ok_or_else(|| mismatch("map entry is not an object"))?;
                let k = cell_from_json(entry_field(object, "key"), key, path)?;
                let v = cell_from_json(entry_field(object, "value"), val_ty, path)?;
                cells.push((k, v));
            }
            CellValue::Map(cells)
        }
        ColumnType::Struct(fields) => {
            let object = value.as_object().ok_or_else(|| mismatch("not an object"))?;
            let mut cells = Vec::with_capacity(fields.len());
            for field in fields {
                let inner = object.get(&field.name).unwrap_or(&Value::Null);
                cells.push(cell_from_json(inner, &field.ty, &field.name)?);
            }
            CellValue::Struct(cells)
        }
        ColumnType::Union(variants) => {
            let object = value.as_object().ok_or_else(|| mismatch("not an object"))?;
            let tag = object
                .get("tag")
                .and_then(Value::as_u64)
                .ok_or_else(|| mismatch("union without a numeric tag"))?
                as usize;
            let variant = variants
                .get(tag)
                .ok_or_else(|| mismatch("union tag out of range"))?;
            let inner = cell_from_json(entry_field(object, "value"), variant, path)?;
            CellValue::Union {
                tag,
                value: Box::new(inner),
            }
        }
    })
}

/// Parse a scaled decimal string into its unscaled integer at exactly
/// `scale` fractional digits.  `"12.3"` at scale 2 is `1230`; more
/// fractional digits than `scale` is a parse failure, not a rounding.
fn parse_decimal(text: &str, scale: u32) -> Option<i128> {
    let text = text.trim();
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1i128, rest),
        None => (1i128, text.strip_prefix('+').unwrap_or(text)),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rest, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let scale = scale as usize;
    if frac_part.len() > scale {
        return None;
    }
    let mut digits = String::with_capacity(int_part.len() + scale);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    for _ in frac_part.len()..scale {
        digits.push('0');
    }
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse::<i128>().ok().map(|u| sign * u)
}

/// A [`ColumnarSource`] over an on-disk newline-delimited JSON file.
///
/// The row count is established with one eager pass at open time; each
/// `rows()` call reopens the file for a fresh forward-only cursor.
pub struct JsonFileSource {
    schema: Schema,
    path: PathBuf,
    row_count: u64,
}

impl JsonFileSource {
    /// Open `path` and count its non-blank lines.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Io`] when the file cannot be read.
    pub fn open(schema: Schema, path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let mut row_count = 0u64;
        for line in file.lines() {
            if !line?.trim().is_empty() {
                row_count += 1;
            }
        }
        Ok(Self {
            schema,
            path: path.to_path_buf(),
            row_count,
        })
    }
}

impl ColumnarSource for JsonFileSource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn row_count(&self) -> u64 {
        self.row_count
    }

    fn rows(&mut self) -> Result<Box<dyn BatchCursor + '_>> {
        let file = BufReader::new(File::open(&self.path)?);
        Ok(Box::new(JsonBatchReader::new(&self.schema, file)))
    }
}
