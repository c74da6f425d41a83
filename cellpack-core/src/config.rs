use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Google Sheets refuses cells longer than 50k characters; keep some headroom.
pub const DEFAULT_CHUNK_LENGTH_BOUND: usize = 49_000;
/// A freshly created sheet is A..Z by 1000 rows.
pub const DEFAULT_MAX_COLUMNS: usize = 26;
pub const DEFAULT_MAX_ROWS: usize = 1_000;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct CodecConfig {
    pub chunk_length_bound: usize,
    pub max_rows: usize,
    pub max_columns: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            chunk_length_bound: DEFAULT_CHUNK_LENGTH_BOUND,
            max_rows: DEFAULT_MAX_ROWS,
            max_columns: DEFAULT_MAX_COLUMNS,
        }
    }
}

impl CodecConfig {
    pub fn new(chunk_length_bound: usize, max_rows: usize, max_columns: usize) -> Result<Self> {
        let cfg = Self { chunk_length_bound, max_rows, max_columns };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a JSON document; missing keys fall back to the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let cfg: CodecConfig = serde_json::from_reader(File::open(path)?)
            .map_err(|e| CodecError::Config(format!("parse {:?}: {e}", path)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_length_bound == 0 {
            return Err(CodecError::Config("chunk_length_bound must be > 0".into()));
        }
        if self.max_rows == 0 || self.max_columns == 0 {
            return Err(CodecError::Config("grid bounds must be > 0".into()));
        }
        if self.max_rows.checked_mul(self.max_columns).is_none() {
            return Err(CodecError::Config("grid capacity overflows usize".into()));
        }
        Ok(())
    }

    /// Number of cells available for chunks.
    pub fn capacity(&self) -> usize {
        self.max_rows * self.max_columns
    }
}
