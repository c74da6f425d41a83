//! Base-256 <-> base-10 conversion: the buffer is read as one big-endian
//! unsigned integer.

use num_bigint::BigUint;

/// Canonical decimal rendering of `bytes` (no sign, no leading zero, `"0"` for zero).
pub fn to_decimal(bytes: &[u8]) -> String {
    BigUint::from_bytes_be(bytes).to_str_radix(10)
}

/// Minimal big-endian bytes of the integer spelled by `digits` (empty for zero).
///
/// Returns `None` when `digits` holds anything but ASCII `0-9`.
pub fn from_decimal(digits: &str) -> Option<Vec<u8>> {
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return digits.bytes().all(|b| b == b'0').then(Vec::new);
    }
    if !significant.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(significant.as_bytes(), 10).map(|n| n.to_bytes_be())
}

/// Count of significant decimal digits; `"0"`/`"000"` count as one, `""` as zero.
pub fn significant_digits(digits: &str) -> usize {
    if digits.is_empty() {
        return 0;
    }
    digits.trim_start_matches('0').len().max(1)
}
