//! Record-level word order normalisation
//!
//! The MCI wire format expects a packed record with its words in reverse
//! construction order. The reversal applies once to the whole record, never
//! per field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order in which a packed record's words are emitted
///
/// For a record built as `[w0, w1, w2]`:
/// - `Reversed`: `[w2, w1, w0]` (MCI wire order)
/// - `Natural`: `[w0, w1, w2]` (construction order, for inspection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordOrder {
    /// Last constructed word first
    #[default]
    Reversed,

    /// Construction order, no post-processing
    Natural,
}

impl WordOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reversed => "reversed",
            Self::Natural => "natural",
        }
    }

    /// Apply this order to a packed word array
    pub fn apply(&self, words: Vec<u16>) -> Vec<u16> {
        match self {
            Self::Reversed => reverse_words(words),
            Self::Natural => words,
        }
    }
}

impl fmt::Display for WordOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reverse word order when more than one word is present
///
/// Arrays of length 0 or 1 come back unchanged.
pub fn reverse_words(mut words: Vec<u16>) -> Vec<u16> {
    if words.len() > 1 {
        words.reverse();
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_words_boundaries() {
        assert!(reverse_words(Vec::new()).is_empty());
        assert_eq!(reverse_words(vec![0x012C]), vec![0x012C]);
        assert_eq!(reverse_words(vec![1, 2]), vec![2, 1]);
        assert_eq!(reverse_words(vec![1, 2, 3, 4]), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_word_order_names() {
        assert_eq!(WordOrder::default(), WordOrder::Reversed);
        assert_eq!(WordOrder::Reversed.to_string(), "reversed");
        assert_eq!(WordOrder::Natural.to_string(), "natural");
    }

    #[test]
    fn test_word_order_apply() {
        assert_eq!(WordOrder::Reversed.apply(vec![1, 2, 3]), vec![3, 2, 1]);
        assert_eq!(WordOrder::Natural.apply(vec![1, 2, 3]), vec![1, 2, 3]);
    }
}
