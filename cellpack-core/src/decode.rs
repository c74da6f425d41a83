use tracing::{debug, warn};

use crate::error::{CodecError, IntegrityCheck, Result};
use crate::manifest::{Chunk, Manifest};
use crate::numeric;

static ZERO_BLOCK: [u8; 16 * 1024] = [0u8; 16 * 1024];

pub struct Decoder;

impl Decoder {
    /// Reassemble `chunks` and return the original bytes, or fail without a payload.
    ///
    /// Checks, in order: chunk shape, encoded size, numeric size, declared
    /// length, checksum. The checksum is streamed over the zero padding, so
    /// nothing is allocated for a declared size that does not verify.
    pub fn decode(manifest: &Manifest, chunks: &[Chunk]) -> Result<Vec<u8>> {
        if chunks.len() as u64 != manifest.chunk_count {
            return Err(CodecError::ChunkCountMismatch {
                declared: manifest.chunk_count,
                found: chunks.len() as u64,
            });
        }
        for (i, ch) in chunks.iter().enumerate() {
            check_chunk(i, ch, manifest.chunk_length_bound)?;
        }

        let encoded: u64 = chunks.iter().map(|c| c.len() as u64).sum();
        expect(IntegrityCheck::EncodedSize { expected: manifest.sizes.encoded, actual: encoded })?;

        let digits: String = chunks.iter().map(|c| c.content.as_str()).collect();
        let numeric = numeric::significant_digits(&digits) as u64;
        expect(IntegrityCheck::NumericSize { expected: manifest.sizes.numeric, actual: numeric })?;

        let natural = numeric::from_decimal(&digits)
            .ok_or_else(|| CodecError::malformed(0, "digits do not parse as an integer"))?;
        let declared = manifest.sizes.declared;
        if natural.len() as u64 > declared {
            return fail(IntegrityCheck::DeclaredLength {
                expected: declared,
                actual: natural.len() as u64,
            });
        }
        if declared > isize::MAX as u64 {
            return Err(CodecError::Metadata(format!("declared size {declared} too large")));
        }
        // leading zero bytes vanish in the integer; declared_size brings them back
        let padding = declared - natural.len() as u64;

        let mut hasher = blake3::Hasher::new();
        let mut left = padding;
        while left > 0 {
            let n = left.min(ZERO_BLOCK.len() as u64) as usize;
            hasher.update(&ZERO_BLOCK[..n]);
            left -= n as u64;
        }
        hasher.update(&natural);
        let actual = hasher.finalize().to_hex().to_string();
        if actual != manifest.checksum_hex {
            return fail(IntegrityCheck::Checksum {
                expected: manifest.checksum_hex.clone(),
                actual,
            });
        }

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(declared as usize)
            .map_err(|e| CodecError::Metadata(format!("declared size {declared}: {e}")))?;
        bytes.resize(padding as usize, 0);
        bytes.extend_from_slice(&natural);
        debug!(bytes = bytes.len(), chunks = chunks.len(), "decode: payload verified");
        Ok(bytes)
    }
}

fn check_chunk(position: usize, ch: &Chunk, bound: usize) -> Result<()> {
    if ch.index != position as u64 {
        return Err(CodecError::malformed(position, format!("out of order (index {})", ch.index)));
    }
    if ch.is_empty() {
        return Err(CodecError::malformed(position, "empty chunk"));
    }
    if bound > 0 && ch.len() > bound {
        return Err(CodecError::malformed(
            position,
            format!("length {} exceeds bound {}", ch.len(), bound),
        ));
    }
    if !ch.content.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::malformed(position, "non-digit character"));
    }
    Ok(())
}

fn expect(check: IntegrityCheck) -> Result<()> {
    let ok = match &check {
        IntegrityCheck::NumericSize { expected, actual }
        | IntegrityCheck::EncodedSize { expected, actual }
        | IntegrityCheck::DeclaredLength { expected, actual } => expected == actual,
        IntegrityCheck::Checksum { expected, actual } => expected == actual,
    };
    if ok {
        Ok(())
    } else {
        fail(check)
    }
}

fn fail<T>(check: IntegrityCheck) -> Result<T> {
    warn!(%check, "decode: integrity check failed");
    Err(CodecError::Integrity(check))
}
