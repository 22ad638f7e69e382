//! Fixture directory layout.
//!
//! The observed harness resolved fixtures against ambient working-directory
//! state; here that is an explicit value handed to whoever opens files.

use std::path::{Path, PathBuf};

/// Default extension for data inputs (newline-delimited JSON rows).
pub const DATA_EXTENSION: &str = ".jsonl";

/// Default extension for golden fixtures (gzip-compressed JSON lines).
pub const GOLDEN_EXTENSION: &str = ".jsn.gz";

/// Where a fixture corpus lives and how its files are named.
#[derive(Debug, Clone)]
pub struct FixtureLayout {
    root: PathBuf,
    data_extension: String,
    golden_extension: String,
}

impl FixtureLayout {
    /// Layout rooted at `root` with the default extensions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            data_extension: DATA_EXTENSION.to_owned(),
            golden_extension: GOLDEN_EXTENSION.to_owned(),
        }
    }

    /// Override the data-file extension (leading dot included).
    #[must_use]
    pub fn with_data_extension(mut self, ext: impl Into<String>) -> Self {
        self.data_extension = ext.into();
        self
    }

    /// Override the golden-file extension (leading dot included).
    #[must_use]
    pub fn with_golden_extension(mut self, ext: impl Into<String>) -> Self {
        self.golden_extension = ext.into();
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the data input for fixture `name`.
    #[must_use]
    pub fn data_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{}", self.data_extension))
    }

    /// Path of the golden fixture for `name`, under `expected/`.
    #[must_use]
    pub fn golden_path(&self, name: &str) -> PathBuf {
        self.root
            .join("expected")
            .join(format!("{name}{}", self.golden_extension))
    }
}
