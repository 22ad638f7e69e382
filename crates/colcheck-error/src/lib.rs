//! Shared error type for the colcheck workspace.
//!
//! Every crate in the workspace funnels its fatal conditions through
//! [`CheckError`].  Conformance *divergences* (content mismatch, cardinality
//! mismatch) are deliberately not errors — they are reported as data by the
//! oracle crate so the caller decides how to fail.  Everything here is fatal
//! and non-retryable: a missing fixture or malformed golden line is
//! deterministic given fixed inputs.

use thiserror::Error;

/// Fatal error raised anywhere in the conformance pipeline.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Filesystem or decompression failure (missing fixture, truncated gzip,
    /// unreadable file).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A row line — golden fixture or newline-delimited data input — is not
    /// valid JSON.
    #[error("malformed JSON row at line {line}: {message}")]
    JsonParse { line: u64, message: String },

    /// A parsed value does not conform to the schema it is being decoded
    /// against.
    #[error("value does not conform to schema: {detail}")]
    SchemaMismatch { detail: String },

    /// A schema file could not be interpreted (bad JSON, non-struct root,
    /// zero-precision decimal, ...).
    #[error("invalid schema: {detail}")]
    InvalidSchema { detail: String },

    /// An attempt to append a row past the batch arena capacity.
    #[error("row batch overflow: capacity {capacity} exhausted")]
    BatchOverflow { capacity: usize },
}

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, CheckError>;

impl CheckError {
    /// Build a [`CheckError::SchemaMismatch`] from anything displayable.
    pub fn schema_mismatch(detail: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            detail: detail.into(),
        }
    }

    /// Build a [`CheckError::InvalidSchema`] from anything displayable.
    pub fn invalid_schema(detail: impl Into<String>) -> Self {
        Self::InvalidSchema {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line_number() {
        let err = CheckError::JsonParse {
            line: 17,
            message: "unexpected end of input".to_owned(),
        };
        let text = err.to_string();
        assert!(text.contains("line 17"), "got: {text}");
    }

    #[test]
    fn io_errors_convert() {
        fn open_missing() -> Result<()> {
            std::fs::File::open("/definitely/not/here")?;
            Ok(())
        }
        assert!(matches!(open_missing(), Err(CheckError::Io(_))));
    }
}
