//! Bit-level operations for 16-bit words
//!
//! Sub-word fields are addressed LSB-first: bit 0 is the least significant
//! bit of the word.

/// Low-bit mask of `width` bits (`width >= 16` yields a full word)
#[inline]
pub fn field_mask(width: u8) -> u16 {
    if width >= 16 {
        u16::MAX
    } else {
        ((1u32 << width) - 1) as u16
    }
}

/// Take the low bits of `value` for a field `start_bit..=end_bit` and move
/// them into position
///
/// Bits of `value` above the field width are discarded.
#[inline]
pub fn place_field(value: u16, start_bit: u8, end_bit: u8) -> u16 {
    debug_assert!(start_bit <= end_bit, "Bit range reversed: {}..={}", start_bit, end_bit);
    debug_assert!(end_bit < 16, "Bit index out of range: {}", end_bit);
    let width = end_bit - start_bit + 1;
    (value & field_mask(width)) << start_bit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_mask() {
        assert_eq!(field_mask(0), 0);
        assert_eq!(field_mask(1), 0x0001);
        assert_eq!(field_mask(8), 0x00FF);
        assert_eq!(field_mask(15), 0x7FFF);
        assert_eq!(field_mask(16), 0xFFFF);
        assert_eq!(field_mask(40), 0xFFFF);
    }

    #[test]
    fn test_place_field() {
        assert_eq!(place_field(0xAB, 0, 7), 0x00AB);
        assert_eq!(place_field(0xCD, 8, 15), 0xCD00);
        // Excess bits are masked off before shifting
        assert_eq!(place_field(0xFFFF, 4, 5), 0x0030);
        assert_eq!(place_field(1, 15, 15), 0x8000);
    }

    #[test]
    fn test_fields_in_one_word_do_not_collide() {
        let word = place_field(0b101, 3, 5) | place_field(0x3F, 10, 15);
        assert_eq!(word, 0xFC28);
    }
}
