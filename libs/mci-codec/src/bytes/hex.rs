//! Hex rendering of packed words
//!
//! Words go out as exactly four uppercase hex digits

use crate::error::{CodecError, Result};

/// Render one word as a zero-padded 4-digit uppercase hex string
/// Example: 300 -> "012C"
pub fn format_word(word: u16) -> String {
    format!("{:04X}", word)
}

/// Render a word slice, order preserved
pub fn format_words(words: &[u16]) -> Vec<String> {
    words.iter().map(|&w| format_word(w)).collect()
}

/// Parse a 4-digit hex word, either case, optional `0x` prefix
pub fn parse_word(s: &str) -> Result<u16> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CodecError::invalid_hex(format!(
            "expected 4 hex digits, got '{}'",
            s
        )));
    }

    u16::from_str_radix(digits, 16).map_err(|e| CodecError::invalid_hex(format!("{}: {}", s, e)))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_format_word_basic() {
        assert_eq!(format_word(300), "012C");
        assert_eq!(format_word(0xCDAB), "CDAB");
    }

    #[test]
    fn test_format_word_padding() {
        assert_eq!(format_word(0), "0000");
        assert_eq!(format_word(0xF), "000F");
        assert_eq!(format_word(0xFFFF), "FFFF");
    }

    #[test]
    fn test_format_words_order() {
        assert_eq!(
            format_words(&[0x0001, 0xBEEF, 0x0A00]),
            vec!["0001", "BEEF", "0A00"]
        );
        assert!(format_words(&[]).is_empty());
    }

    #[test]
    fn test_parse_word() {
        assert_eq!(parse_word("012C").unwrap(), 300);
        assert_eq!(parse_word("cdab").unwrap(), 0xCDAB);
        assert_eq!(parse_word("0xFFFF").unwrap(), 0xFFFF);
        assert_eq!(parse_word(" 0000 ").unwrap(), 0);
    }

    #[test]
    fn test_parse_word_rejects_malformed() {
        assert!(parse_word("12C").is_err());
        assert!(parse_word("10000").is_err());
        assert!(parse_word("G123").is_err());
        assert!(parse_word("+12C").is_err());
        assert!(parse_word("").is_err());
    }
}
