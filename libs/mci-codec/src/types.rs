//! Parameter and record types
//!
//! Descriptors are built by an external collaborator (form input, JSON
//! ingestion, database lookup) and consumed once by the packer.

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest addressable bit inside a 16-bit word
pub const MAX_BIT: u8 = 15;

/// Highest word index a descriptor may reach
pub const MAX_WORD_INDEX: usize = u16::MAX as usize;

// ============================================================================
// Value Types
// ============================================================================

/// Scalar kinds the value encoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Signed 32-bit integer
    Dint,
    /// Signed 32-bit integer stored as its bitwise one's-complement
    Rint,
    /// Unsigned 32-bit integer
    Uint,
    /// IEEE-754 single precision
    Float,
    /// IEEE-754 double precision
    Double,
}

impl ValueType {
    /// Parse from string representation (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dint" => Some(Self::Dint),
            "rint" => Some(Self::Rint),
            "uint" => Some(Self::Uint),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }

    /// Natural encoded width in bytes
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::Dint | Self::Rint | Self::Uint | Self::Float => 4,
            Self::Double => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dint => "dint",
            Self::Rint => "rint",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Parameter Descriptor
// ============================================================================

fn default_end_bit() -> u8 {
    MAX_BIT
}

/// One typed parameter and the word/bit range it occupies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDescriptor {
    /// Identifier, diagnostics only
    pub name: String,
    /// Raw type tag; unknown tags are kept and skipped at pack time
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: f64,
    pub start_word: usize,
    pub end_word: usize,
    #[serde(default)]
    pub start_bit: u8,
    #[serde(default = "default_end_bit")]
    pub end_bit: u8,
}

impl ParamDescriptor {
    /// Create a descriptor occupying whole words `start_word..=end_word`
    pub fn new(
        name: impl Into<String>,
        value_type: ValueType,
        value: f64,
        start_word: usize,
        end_word: usize,
    ) -> Self {
        Self {
            name: name.into(),
            type_tag: value_type.as_str().to_string(),
            value,
            start_word,
            end_word,
            start_bit: 0,
            end_bit: MAX_BIT,
        }
    }

    /// Restrict a single-word descriptor to bits `start_bit..=end_bit`
    pub fn with_bits(mut self, start_bit: u8, end_bit: u8) -> Self {
        self.start_bit = start_bit;
        self.end_bit = end_bit;
        self
    }

    /// Parsed value type, `None` for unsupported tags
    pub fn value_type(&self) -> Option<ValueType> {
        ValueType::parse(&self.type_tag)
    }

    /// Number of words covered by this parameter
    pub fn word_count(&self) -> usize {
        self.end_word
            .saturating_sub(self.start_word)
            .saturating_add(1)
    }

    pub fn is_multi_word(&self) -> bool {
        self.end_word > self.start_word
    }

    /// Single word with the full 0..=15 bit range
    pub fn is_whole_word(&self) -> bool {
        !self.is_multi_word() && self.start_bit == 0 && self.end_bit == MAX_BIT
    }

    /// Single word with a strict sub-range of bits
    pub fn is_bit_field(&self) -> bool {
        !self.is_multi_word() && !self.is_whole_word()
    }

    /// Mask of the bits this parameter occupies within its word
    pub fn bit_mask(&self) -> u16 {
        if self.is_multi_word() {
            return u16::MAX;
        }
        let width = self.end_bit.saturating_sub(self.start_bit).saturating_add(1);
        crate::bytes::field_mask(width)
            .checked_shl(u32::from(self.start_bit))
            .unwrap_or(0)
    }

    /// Reject ranges the packer cannot place
    pub fn validate(&self) -> Result<()> {
        if self.start_word > self.end_word {
            return Err(CodecError::invalid_parameter(
                &self.name,
                format!(
                    "start_word {} > end_word {}",
                    self.start_word, self.end_word
                ),
            ));
        }
        if self.end_word > MAX_WORD_INDEX {
            return Err(CodecError::invalid_parameter(
                &self.name,
                format!(
                    "end_word {} exceeds maximum word index {}",
                    self.end_word, MAX_WORD_INDEX
                ),
            ));
        }
        if self.is_multi_word() {
            // Bit range is ignored for multi-word spans
            return Ok(());
        }
        if self.start_bit > MAX_BIT || self.end_bit > MAX_BIT {
            return Err(CodecError::invalid_parameter(
                &self.name,
                format!(
                    "bit range {}..={} exceeds 0..={}",
                    self.start_bit, self.end_bit, MAX_BIT
                ),
            ));
        }
        if self.start_bit > self.end_bit {
            return Err(CodecError::invalid_parameter(
                &self.name,
                format!("start_bit {} > end_bit {}", self.start_bit, self.end_bit),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Record
// ============================================================================

/// Ordered set of parameters packed together into one word sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record-level type tag matched against the allow-list
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
}

impl Record {
    pub fn new(type_tag: impl Into<String>, params: Vec<ParamDescriptor>) -> Self {
        Self {
            type_tag: type_tag.into(),
            params,
        }
    }

    /// Highest word index any parameter reaches
    pub fn max_end_word(&self) -> Option<usize> {
        self.params.iter().map(|p| p.end_word).max()
    }

    /// Load a record list from JSON text
    pub fn list_from_json(text: &str) -> Result<Vec<Record>> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a record list from YAML text
    pub fn list_from_yaml(text: &str) -> Result<Vec<Record>> {
        Ok(serde_yaml::from_str(text)?)
    }
}
