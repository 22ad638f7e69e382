//! Schema tree: typed column descriptors for a columnar file.
//!
//! A [`Schema`] is obtained once when a file is opened and is immutable from
//! then on; every downstream component (renderer, golden re-ingestion,
//! comparison oracle) shares it by reference.  Object field order in rendered
//! JSON follows the declaration order of [`Field`]s here.

use colcheck_error::{CheckError, Result};
use serde::{Deserialize, Serialize};

use crate::batch::RowBatch;

/// Maximum decimal precision the format supports (digits of the unscaled
/// value).  `10^38` still fits an `i128`, so cell storage never overflows.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// A typed column descriptor.  Primitive kinds are leaves; compound kinds
/// carry their child descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    String,
    Binary,
    /// Epoch-microsecond instant.
    Timestamp,
    Decimal {
        precision: u8,
        scale: u32,
    },
    Struct(Vec<Field>),
    List(Box<ColumnType>),
    Map {
        key: Box<ColumnType>,
        value: Box<ColumnType>,
    },
    Union(Vec<ColumnType>),
}

/// A named field inside a struct (including the schema root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl ColumnType {
    /// Recursively validate a type tree.
    fn validate(&self) -> Result<()> {
        match self {
            Self::Decimal { precision, scale } => {
                if *precision == 0 || *precision > MAX_DECIMAL_PRECISION {
                    return Err(CheckError::invalid_schema(format!(
                        "decimal precision {precision} out of range 1..={MAX_DECIMAL_PRECISION}"
                    )));
                }
                if *scale > u32::from(*precision) {
                    return Err(CheckError::invalid_schema(format!(
                        "decimal scale {scale} exceeds precision {precision}"
                    )));
                }
                Ok(())
            }
            Self::Struct(fields) => validate_fields(fields),
            Self::List(elem) => elem.validate(),
            Self::Map { key, value } => {
                key.validate()?;
                value.validate()
            }
            Self::Union(variants) => {
                if variants.is_empty() {
                    return Err(CheckError::invalid_schema("union with no variants"));
                }
                for variant in variants {
                    variant.validate()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn validate_fields(fields: &[Field]) -> Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if field.name.is_empty() {
            return Err(CheckError::invalid_schema(format!(
                "field {i} has an empty name"
            )));
        }
        if fields[..i].iter().any(|f| f.name == field.name) {
            return Err(CheckError::invalid_schema(format!(
                "duplicate field name `{}`",
                field.name
            )));
        }
        field.ty.validate()?;
    }
    Ok(())
}

/// The schema of a columnar file: a struct root whose fields are the
/// top-level columns.  Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Construct a schema from its top-level columns.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidSchema`] on empty or duplicate field
    /// names, empty unions, or out-of-range decimal parameters.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        validate_fields(&fields)?;
        Ok(Self { fields })
    }

    /// Parse a schema from its JSON serialization (the `--schema` file the
    /// CLI accepts).
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidSchema`] when the JSON does not describe
    /// a valid schema.
    pub fn from_json(text: &str) -> Result<Self> {
        let parsed: Self = serde_json::from_str(text)
            .map_err(|e| CheckError::invalid_schema(e.to_string()))?;
        // Re-run validation: serde happily deserializes shapes `new` rejects.
        Self::new(parsed.fields)
    }

    /// Serialize the schema to JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }

    /// Number of top-level columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    /// Top-level columns in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Allocate a fresh, empty batch arena sized for this schema.
    #[must_use]
    pub fn create_batch(&self, capacity: usize) -> RowBatch {
        RowBatch::new(self.column_count(), capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_schema() -> Schema {
        Schema::new(vec![
            Field::new("id", ColumnType::BigInt),
            Field::new("name", ColumnType::String),
        ])
        .unwrap()
    }

    #[test]
    fn schema_reports_column_count() {
        assert_eq!(two_column_schema().column_count(), 2);
    }

    #[test]
    fn duplicate_field_names_rejected() {
        let err = Schema::new(vec![
            Field::new("x", ColumnType::Int),
            Field::new("x", ColumnType::Double),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate field name"));
    }

    #[test]
    fn empty_union_rejected() {
        let err = Schema::new(vec![Field::new("u", ColumnType::Union(vec![]))]).unwrap_err();
        assert!(err.to_string().contains("union"));
    }

    #[test]
    fn decimal_scale_must_not_exceed_precision() {
        let err = Schema::new(vec![Field::new(
            "d",
            ColumnType::Decimal {
                precision: 4,
                scale: 6,
            },
        )])
        .unwrap_err();
        assert!(matches!(err, CheckError::InvalidSchema { .. }));
    }

    #[test]
    fn nested_types_validated_recursively() {
        let err = Schema::new(vec![Field::new(
            "rows",
            ColumnType::List(Box::new(ColumnType::Struct(vec![
                Field::new("a", ColumnType::Int),
                Field::new("a", ColumnType::Int),
            ]))),
        )])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn json_round_trip_preserves_schema() {
        let schema = Schema::new(vec![
            Field::new("id", ColumnType::BigInt),
            Field::new(
                "tags",
                ColumnType::Map {
                    key: Box::new(ColumnType::String),
                    value: Box::new(ColumnType::Int),
                },
            ),
            Field::new(
                "amount",
                ColumnType::Decimal {
                    precision: 10,
                    scale: 2,
                },
            ),
        ])
        .unwrap();

        let text = schema.to_json();
        let back = Schema::from_json(&text).unwrap();
        assert_eq!(schema, back);
    }

    #[test]
    fn from_json_rejects_invalid_shapes() {
        assert!(Schema::from_json("not json").is_err());
        // Valid JSON, but duplicate names must still fail post-validation.
        let dup = r#"{"fields":[{"name":"a","type":"int"},{"name":"a","type":"int"}]}"#;
        assert!(Schema::from_json(dup).is_err());
    }

    #[test]
    fn create_batch_matches_schema_width() {
        let batch = two_column_schema().create_batch(16);
        assert_eq!(batch.column_count(), 2);
        assert_eq!(batch.capacity(), 16);
        assert_eq!(batch.size(), 0);
    }
}
