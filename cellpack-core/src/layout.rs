use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::manifest::{Chunk, Manifest};

/// Row-major placement of chunks inside a bounded `max_rows x max_columns` sheet.
///
/// Only occupied cells are stored; every row but the last is full.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    max_rows: usize,
    max_columns: usize,
    cells: Vec<String>,
}

impl Grid {
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn max_columns(&self) -> usize {
        self.max_columns
    }

    pub fn capacity(&self) -> usize {
        self.max_rows * self.max_columns
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn used_rows(&self) -> usize {
        self.cells.len().div_ceil(self.max_columns)
    }

    /// (row, column) of the chunk at `index`, both 0-based.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.max_columns, index % self.max_columns)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if column >= self.max_columns {
            return None;
        }
        self.cells.get(row * self.max_columns + column).map(String::as_str)
    }

    /// Occupied rows as the 2D value matrix an adapter uploads; the last row may be short.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.cells.chunks(self.max_columns).map(|r| r.to_vec()).collect()
    }

    /// A1-notation range covering the occupied cells, e.g. `A1:Z3`.
    pub fn a1_range(&self) -> Option<String> {
        if self.cells.is_empty() {
            return None;
        }
        let last_col = if self.used_rows() > 1 { self.max_columns - 1 } else { self.cells.len() - 1 };
        Some(format!("A1:{}{}", column_letters(last_col), self.used_rows()))
    }
}

/// Spreadsheet column name for a 0-based column index (0 -> A, 26 -> AA).
pub fn column_letters(mut column: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (column % 26) as u8);
        if column < 26 {
            break;
        }
        column = column / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Place `chunks` row-major, `cfg.max_columns` per row.
pub fn layout(chunks: &[Chunk], cfg: &CodecConfig) -> Result<Grid> {
    cfg.validate()?;
    let capacity = cfg.capacity();
    if chunks.len() > capacity {
        return Err(CodecError::CapacityExceeded { chunks: chunks.len(), capacity });
    }
    let mut cells = Vec::with_capacity(chunks.len());
    for (i, ch) in chunks.iter().enumerate() {
        if ch.index != i as u64 {
            return Err(CodecError::malformed(i, format!("out of order (index {})", ch.index)));
        }
        if ch.is_empty() {
            return Err(CodecError::malformed(i, "empty chunk"));
        }
        cells.push(ch.content.clone());
    }
    let grid = Grid { max_rows: cfg.max_rows, max_columns: cfg.max_columns, cells };
    debug!(cells = grid.len(), rows = grid.used_rows(), "layout: grid filled");
    Ok(grid)
}

/// Read a retrieved cell matrix back into ordered chunks.
///
/// Rows may be ragged (remote sheets drop trailing empty cells) but no data may
/// sit outside `cfg`'s grid. Exactly `manifest.chunk_count` cells must be
/// non-empty and they must form a gap-free row-major prefix of
/// `cfg.max_columns`-wide rows.
pub fn unlayout(
    grid_data: &[Vec<String>],
    manifest: &Manifest,
    cfg: &CodecConfig,
) -> Result<Vec<Chunk>> {
    cfg.validate()?;
    let width = cfg.max_columns;
    for (r, row) in grid_data.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if !cell.is_empty() && (r >= cfg.max_rows || c >= width) {
                return Err(CodecError::malformed(
                    r * width + c,
                    format!("cell ({r}, {c}) outside a {}x{width} grid", cfg.max_rows),
                ));
            }
        }
    }

    let found = grid_data.iter().flatten().filter(|c| !c.is_empty()).count() as u64;
    if found != manifest.chunk_count {
        return Err(CodecError::ChunkCountMismatch { declared: manifest.chunk_count, found });
    }

    let wanted = manifest.chunk_count as usize;
    let mut chunks = Vec::with_capacity(wanted);
    'rows: for row in grid_data {
        for col in 0..width {
            if chunks.len() == wanted {
                break 'rows;
            }
            let index = chunks.len();
            let content = row.get(col).map(String::as_str).unwrap_or("");
            if content.is_empty() {
                return Err(CodecError::malformed(index, "empty cell before the last chunk"));
            }
            if !content.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CodecError::malformed(index, "non-digit character"));
            }
            chunks.push(Chunk { index: index as u64, content: content.to_string() });
        }
    }
    debug!(chunks = chunks.len(), width, "unlayout: chunks recovered");
    Ok(chunks)
}
