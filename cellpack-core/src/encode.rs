use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::manifest::{checksum_hex, Chunk, Manifest, Sizes};
use crate::numeric;

/// Output of [`Encoder::encode`]: chunks concatenate to the payload's decimal form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoded {
    pub manifest: Manifest,
    pub chunks: Vec<Chunk>,
}

pub struct Encoder {
    chunk_length_bound: usize,
}

impl Encoder {
    pub fn new(chunk_length_bound: usize) -> Result<Self> {
        if chunk_length_bound == 0 {
            return Err(CodecError::Config("chunk_length_bound must be > 0".into()));
        }
        Ok(Self { chunk_length_bound })
    }

    pub fn from_config(cfg: &CodecConfig) -> Result<Self> {
        Self::new(cfg.chunk_length_bound)
    }

    /// Encode `bytes` into bounded decimal chunks.
    ///
    /// An empty buffer yields zero chunks and all sizes zero.
    pub fn encode(&self, bytes: &[u8]) -> Encoded {
        let checksum_hex = checksum_hex(bytes);
        if bytes.is_empty() {
            debug!("encode: empty payload, no chunks");
            return Encoded {
                manifest: Manifest {
                    sizes: Sizes::default(),
                    chunk_count: 0,
                    chunk_length_bound: self.chunk_length_bound,
                    checksum_hex,
                },
                chunks: Vec::new(),
            };
        }

        let digits = numeric::to_decimal(bytes);
        // ASCII only, so byte-wise splitting is char-safe
        let chunks: Vec<Chunk> = digits
            .as_bytes()
            .chunks(self.chunk_length_bound)
            .enumerate()
            .map(|(i, part)| Chunk {
                index: i as u64,
                content: String::from_utf8_lossy(part).into_owned(),
            })
            .collect();
        let encoded: u64 = chunks.iter().map(|c| c.len() as u64).sum();
        let sizes = Sizes {
            declared: bytes.len() as u64,
            numeric: digits.len() as u64,
            encoded,
        };
        debug!(
            declared = sizes.declared,
            numeric = sizes.numeric,
            chunks = chunks.len(),
            "encode: payload rendered"
        );
        Encoded {
            manifest: Manifest {
                sizes,
                chunk_count: chunks.len() as u64,
                chunk_length_bound: self.chunk_length_bound,
                checksum_hex,
            },
            chunks,
        }
    }
}
