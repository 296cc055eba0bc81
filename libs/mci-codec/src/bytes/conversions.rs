//! Scalar to byte buffer conversions
//!
//! Provides the value encoder used by the word packer:
//! - Numeric narrowing from the `f64` holder to the target width
//! - Little-endian byte layout, zero-padded to the declared word span
//! - Splitting byte buffers into 16-bit little-endian words

use crate::types::ValueType;

// ============================================================================
// Numeric Narrowing
// ============================================================================

/// Narrow to i32 with modular wraparound
///
/// Goes through i64 so values outside the i32 range wrap the way a
/// two's-complement register would. NaN becomes 0.
#[inline]
pub fn narrow_i32(value: f64) -> i32 {
    value as i64 as i32
}

/// Narrow to u32 with modular wraparound (negative values wrap)
#[inline]
pub fn narrow_u32(value: f64) -> u32 {
    value as i64 as u32
}

/// Encode a one's-complement integer: `!x`, not `-x`
#[inline]
pub fn invert_i32(value: i32) -> i32 {
    !value
}

// ============================================================================
// Value Encoder
// ============================================================================

/// Encode a scalar at its natural width in little-endian byte order
///
/// 4 bytes for `dint`/`rint`/`uint`/`float`, 8 bytes for `double`.
pub fn encode_natural(value: f64, value_type: ValueType) -> Vec<u8> {
    match value_type {
        ValueType::Dint => narrow_i32(value).to_le_bytes().to_vec(),
        ValueType::Rint => invert_i32(narrow_i32(value)).to_le_bytes().to_vec(),
        ValueType::Uint => narrow_u32(value).to_le_bytes().to_vec(),
        ValueType::Float => (value as f32).to_le_bytes().to_vec(),
        ValueType::Double => value.to_le_bytes().to_vec(),
    }
}

/// Encode a scalar for a parameter spanning `word_count` words
///
/// The buffer is the natural encoding, zero-padded on the right up to
/// `2 * word_count` bytes. It is never shorter than the natural width.
pub fn encode_value(value: f64, value_type: ValueType, word_count: usize) -> Vec<u8> {
    let mut bytes = encode_natural(value, value_type);
    let span_bytes = word_count.saturating_mul(2);
    if bytes.len() < span_bytes {
        bytes.resize(span_bytes, 0);
    }
    bytes
}

// ============================================================================
// Bytes to Words
// ============================================================================

/// Read the little-endian word at `index` (missing bytes read as zero)
pub fn le_word_at(bytes: &[u8], index: usize) -> u16 {
    let offset = index * 2;
    let lo = bytes.get(offset).copied().unwrap_or(0);
    let hi = bytes.get(offset + 1).copied().unwrap_or(0);
    u16::from_le_bytes([lo, hi])
}

/// Concatenate words back into little-endian bytes
pub fn le_words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}
