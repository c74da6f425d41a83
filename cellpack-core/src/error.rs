use std::fmt;
use thiserror::Error;

/// Which of the decoder's post-reassembly checks rejected the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityCheck {
    /// Significant decimal digits of the reassembled integer.
    NumericSize { expected: u64, actual: u64 },
    /// Sum of the received chunk lengths.
    EncodedSize { expected: u64, actual: u64 },
    /// BLAKE3 of the recovered buffer.
    Checksum { expected: String, actual: String },
    /// Recovered buffer length (the integer needed more bytes than declared).
    DeclaredLength { expected: u64, actual: u64 },
}

impl fmt::Display for IntegrityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityCheck::NumericSize { expected, actual } => {
                write!(f, "numeric size mismatch (expected {expected}, got {actual})")
            }
            IntegrityCheck::EncodedSize { expected, actual } => {
                write!(f, "encoded size mismatch (expected {expected}, got {actual})")
            }
            IntegrityCheck::Checksum { expected, actual } => {
                write!(f, "checksum mismatch (expected {expected}, got {actual})")
            }
            IntegrityCheck::DeclaredLength { expected, actual } => {
                write!(f, "declared length mismatch (expected {expected}, got {actual})")
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("capacity exceeded: {chunks} chunks do not fit in {capacity} cells")]
    CapacityExceeded { chunks: usize, capacity: usize },

    #[error("malformed chunk {index}: {reason}")]
    MalformedChunk { index: usize, reason: String },

    #[error("integrity error: {0}")]
    Integrity(IntegrityCheck),

    #[error("chunk count mismatch: manifest declares {declared}, grid holds {found}")]
    ChunkCountMismatch { declared: u64, found: u64 },

    #[error("metadata error: {0}")]
    Metadata(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage adapter error: {0:#}")]
    Adapter(anyhow::Error),
}

impl CodecError {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        CodecError::MalformedChunk { index, reason: reason.into() }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, CodecError>;
