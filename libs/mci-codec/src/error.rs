//! Codec Error Types
//!
//! Errors raised by descriptor validation, the strict packing policies and
//! record loading.

use thiserror::Error;

/// Result type for mci-codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Codec errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Descriptor with an impossible word or bit range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Two bit fields claim the same bits of one word (strict overlap mode)
    #[error("Bit overlap in word {word}: '{name}' collides with mask 0x{used:04X}")]
    BitOverlap { word: usize, name: String, used: u16 },

    /// Parameter starts on a word that was already emitted (strict overlap mode)
    #[error("Word overlap: '{name}' starts at word {start_word}, words up to {emitted} already emitted")]
    WordOverlap {
        name: String,
        start_word: usize,
        emitted: usize,
    },

    /// Parameters not ascending by start word (reject ordering mode)
    #[error("Unsorted parameters: '{name}' at word {start_word} follows word {previous}")]
    UnsortedParameters {
        name: String,
        start_word: usize,
        previous: usize,
    },

    /// Malformed hex word string
    #[error("Invalid hex word: {0}")]
    InvalidHex(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record file decoding errors
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for CodecError {
    fn from(err: serde_yaml::Error) -> Self {
        CodecError::InvalidData(format!("YAML error: {}", err))
    }
}

// Helper methods for creating errors
impl CodecError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_hex(msg: impl Into<String>) -> Self {
        CodecError::InvalidHex(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        CodecError::Config(msg.into())
    }

    /// Check if this error was raised by one of the strict packing policies
    /// rather than by malformed input
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            CodecError::BitOverlap { .. }
                | CodecError::WordOverlap { .. }
                | CodecError::UnsortedParameters { .. }
        )
    }
}
