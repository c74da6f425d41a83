use serde::{Deserialize, Serialize};

/// The three redundant size fields carried by every stored file.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sizes {
    /// Byte length of the original payload.
    pub declared: u64,
    /// Significant decimal digits of the payload read as an integer.
    pub numeric: u64,
    /// Total characters across all chunks.
    pub encoded: u64,
}

/// Everything needed to reassemble and check a chunk sequence.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    pub sizes: Sizes,
    pub chunk_count: u64,
    pub chunk_length_bound: usize,
    pub checksum_hex: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub index: u64,
    pub content: String,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// BLAKE3 of `bytes`, lowercase hex.
pub fn checksum_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
