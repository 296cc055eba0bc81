//! MCI Word Codec
//!
//! Packs typed telemetry/configuration parameters into 16-bit words for
//! word-addressed MCI register interfaces, rendered as 4-digit hex strings.
//!
//! # Architecture
//!
//! Data flows leaves-first through:
//! - **Value Encoder** (`bytes::conversions`): `f64` holder → little-endian bytes
//! - **Word Packer** (`packer`): gaps, shared bit-field words, multi-word spans
//! - **Word Order** (`bytes::word_order`): whole-record word reversal
//! - **Hex Formatter** (`bytes::hex`): `u16` → `"012C"`
//! - **Converter** (`converter`): allow-list selection over a pending collection
//!
//! Only the converter mutates anything (the pending collection it drains).
//!
//! # Example
//!
//! ```
//! use mci_codec::{CodecConfig, Converter, ParamDescriptor, Record, ValueType};
//!
//! let converter = Converter::new(CodecConfig::with_allow_list(["MCI_PARAMS"]));
//! let mut pending = vec![Record::new(
//!     "MCI_PARAMS",
//!     vec![ParamDescriptor::new("speed", ValueType::Uint, 300.0, 0, 0)],
//! )];
//!
//! let words = converter.drain(&mut pending).unwrap();
//! assert_eq!(words, vec!["012C"]);
//! assert!(pending.is_empty());
//! ```

pub mod bytes;
pub mod config;
pub mod converter;
pub mod error;
pub mod packer;
pub mod types;

// Re-export core types
pub use bytes::WordOrder;
pub use config::{CodecConfig, OrderPolicy, OverlapPolicy, ZeroTail};
pub use converter::{Conversion, Converter, PackedRecord};
pub use error::{CodecError, Result};
pub use packer::{PackReport, PackedWords, WordPacker};
pub use types::{ParamDescriptor, Record, ValueType};
