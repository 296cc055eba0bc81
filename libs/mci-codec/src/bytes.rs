//! Word-level data processing
//!
//! Scalar encoding, bit-field placement, word order normalisation and hex
//! rendering for the MCI word codec. Nothing in here knows about records or
//! descriptors; the packer composes these pieces.

pub mod bit_ops;
pub mod conversions;
pub mod hex;
pub mod word_order;

pub use bit_ops::*;
pub use conversions::*;
pub use hex::{format_word, format_words, parse_word};
pub use word_order::{reverse_words, WordOrder};
