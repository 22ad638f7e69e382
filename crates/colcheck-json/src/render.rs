//! Row rendering: one batch row to one line of compact JSON.
//!
//! Field order follows schema declaration order (`serde_json` is built with
//! `preserve_order`, so object insertion order survives serialization).
//! Rendering is pure: the same batch, schema, and row index always produce
//! the same text.

use colcheck_error::{CheckError, Result};
use colcheck_types::{CellValue, ColumnType, RowBatch, Schema};
use serde_json::{Map, Number, Value};

/// Render row `row` of `batch` as a compact JSON object.
///
/// Spelling conventions (shared with the re-ingestion reader):
/// - map columns become arrays of `{"_key":…,"_value":…}` objects,
/// - unions become `{"tag":…,"_value":…}`,
/// - binary becomes an array of byte integers,
/// - decimals become scaled decimal strings,
/// - timestamps become epoch-microsecond numbers.
///
/// # Errors
///
/// Returns [`CheckError::SchemaMismatch`] when a cell does not match its
/// declared column type.
pub fn render_row(batch: &RowBatch, schema: &Schema, row: usize) -> Result<String> {
    debug_assert!(row < batch.size(), "render of row {row} past batch size");
    let mut object = Map::with_capacity(schema.column_count());
    for (col, field) in schema.fields().iter().enumerate() {
        let value = cell_to_json(batch.cell(col, row), &field.ty, &field.name)?;
        object.insert(field.name.clone(), value);
    }
    serde_json::to_string(&Value::Object(object))
        .map_err(|e| CheckError::schema_mismatch(e.to_string()))
}

fn cell_to_json(cell: &CellValue, ty: &ColumnType, path: &str) -> Result<Value> {
    let mismatch = || {
        CheckError::schema_mismatch(format!(
            "column `{path}`: cell does not match declared type {ty:?}"
        ))
    };

    Ok(match (cell, ty) {
        (CellValue::Null, _) => Value::Null,
        (CellValue::Boolean(b), ColumnType::Boolean) => Value::Bool(*b),
        (
            CellValue::Integer(v),
            ColumnType::TinyInt | ColumnType::SmallInt | ColumnType::Int | ColumnType::BigInt,
        ) => {
            if !cell.conforms_to(ty) {
                return Err(mismatch());
            }
            Value::Number(Number::from(*v))
        }
        (CellValue::Float(f), ColumnType::Float | ColumnType::Double) => {
            // JSON has no NaN/Infinity; those render as null on both sides.
            Number::from_f64(*f).map_or(Value::Null, Value::Number)
        }
        (CellValue::Text(s), ColumnType::String) => Value::String(s.clone()),
        (CellValue::Bytes(bytes), ColumnType::Binary) => Value::Array(
            bytes
                .iter()
                .map(|b| Value::Number(Number::from(u64::from(*b))))
                .collect(),
        ),
        (CellValue::Timestamp(micros), ColumnType::Timestamp) => {
            Value::Number(Number::from(*micros))
        }
        (CellValue::Decimal { unscaled, scale }, ColumnType::Decimal { .. }) => {
            if !cell.conforms_to(ty) {
                return Err(mismatch());
            }
            Value::String(format_decimal(*unscaled, *scale))
        }
        (CellValue::List(items), ColumnType::List(elem)) => {
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                rendered.push(cell_to_json(item, elem, path)?);
            }
            Value::Array(rendered)
        }
        (CellValue::Map(entries), ColumnType::Map { key, value }) => {
            let mut rendered = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                let mut entry = Map::with_capacity(2);
                entry.insert("_key".to_owned(), cell_to_json(k, key, path)?);
                entry.insert("_value".to_owned(), cell_to_json(v, value, path)?);
                rendered.push(Value::Object(entry));
            }
            Value::Array(rendered)
        }
        (CellValue::Struct(cells), ColumnType::Struct(fields)) => {
            if cells.len() != fields.len() {
                return Err(mismatch());
            }
            let mut object = Map::with_capacity(fields.len());
            for (cell, field) in cells.iter().zip(fields) {
                object.insert(
                    field.name.clone(),
                    cell_to_json(cell, &field.ty, &field.name)?,
                );
            }
            Value::Object(object)
        }
        (CellValue::Union { tag, value }, ColumnType::Union(variants)) => {
            let variant = variants.get(*tag).ok_or_else(mismatch)?;
            let mut object = Map::with_capacity(2);
            object.insert("tag".to_owned(), Value::Number(Number::from(*tag as u64)));
            object.insert("_value".to_owned(), cell_to_json(value, variant, path)?);
            Value::Object(object)
        }
        _ => return Err(mismatch()),
    })
}

/// Format an unscaled decimal with `scale` fractional digits: `(1234, 2)`
/// becomes `"12.34"`, `(-5, 3)` becomes `"-0.005"`.
#[must_use]
pub fn format_decimal(unscaled: i128, scale: u32) -> String {
    let digits = unscaled.unsigned_abs().to_string();
    let sign = if unscaled < 0 { "-" } else { "" };
    if scale == 0 {
        return format!("{sign}{digits}");
    }
    let scale = scale as usize;
    if digits.len() <= scale {
        let frac = format!("{digits:0>scale$}");
        format!("{sign}0.{frac}")
    } else {
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        format!("{sign}{int_part}.{frac_part}")
    }
}
