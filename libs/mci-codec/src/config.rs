//! Codec configuration
//!
//! The allow-list and the packing policies are plain values handed to the
//! converter at construction. All fields carry serde defaults so a partial
//! config file (or none at all) yields the source-compatible behaviour.

use crate::bytes::WordOrder;
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Policies
// ============================================================================

/// How the packer treats parameters that are not ascending by start word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Stable sort by start word before packing
    #[default]
    Sort,
    /// Pack in the order given (output undefined for unsorted input)
    Preserve,
    /// Fail with `UnsortedParameters`
    Reject,
}

/// How the packer treats overlapping bit fields and word ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// OR-combine into the shared word and log a warning
    #[default]
    Combine,
    /// Fail with `BitOverlap` / `WordOverlap`
    Strict,
}

/// What happens to a trailing bit-field word whose bits are all zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroTail {
    /// Drop it (the final flush only fires for a non-zero accumulator)
    #[default]
    Drop,
    /// Emit it like any other word
    Emit,
}

macro_rules! policy_display {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $name,)+
                })
            }
        }
    };
}

policy_display!(OrderPolicy { Sort => "sort", Preserve => "preserve", Reject => "reject" });
policy_display!(OverlapPolicy { Combine => "combine", Strict => "strict" });
policy_display!(ZeroTail { Drop => "drop", Emit => "emit" });

// ============================================================================
// CodecConfig
// ============================================================================

/// Converter configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Record-level type tags the converter consumes (exact match)
    pub allow_list: BTreeSet<String>,
    pub order: OrderPolicy,
    pub overlap: OverlapPolicy,
    pub zero_tail: ZeroTail,
    pub word_order: WordOrder,
}

impl CodecConfig {
    /// Config with the given allow-list and default policies
    pub fn with_allow_list<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow_list: types.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn order(mut self, order: OrderPolicy) -> Self {
        self.order = order;
        self
    }

    pub fn overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn zero_tail(mut self, zero_tail: ZeroTail) -> Self {
        self.zero_tail = zero_tail;
        self
    }

    pub fn word_order(mut self, word_order: WordOrder) -> Self {
        self.word_order = word_order;
        self
    }

    /// Whether a record type tag is consumable
    pub fn allows(&self, type_tag: &str) -> bool {
        self.allow_list.contains(type_tag)
    }

    /// Reject allow-list entries that can never match a record
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self
            .allow_list
            .iter()
            .find(|t| t.trim().is_empty() || t.trim() != t.as_str())
        {
            return Err(CodecError::config(format!(
                "allow_list entry '{}' is blank or has surrounding whitespace",
                bad
            )));
        }
        Ok(())
    }
}
