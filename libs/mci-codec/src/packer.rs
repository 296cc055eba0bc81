//! Word packer
//!
//! Walks a record's parameters once, in start-word order, and assembles the
//! 16-bit word array:
//!
//! - Words between two parameters are zero-filled; nothing is padded before
//!   the first parameter.
//! - A single-word parameter with bits 0..=15 is appended as a whole word.
//! - Sub-word bit fields are OR-ed into an accumulator. The accumulator is
//!   flushed once the next parameter moves to another word; the last
//!   parameter's field is left to the final flush.
//! - A multi-word parameter ignores its bit range and is appended as
//!   little-endian 16-bit chunks, one per spanned word.
//!
//! The final flush only emits a non-zero accumulator unless
//! [`ZeroTail::Emit`] is configured.

use crate::bytes::{encode_value, le_word_at, place_field};
use crate::config::{CodecConfig, OrderPolicy, OverlapPolicy, ZeroTail};
use crate::error::{CodecError, Result};
use crate::types::ParamDescriptor;
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, trace, warn};

// ============================================================================
// Pack Report
// ============================================================================

/// Diagnostics collected while packing one record
///
/// Every condition the packer tolerates without failing is counted here as
/// well as logged, so callers can audit a record without scraping logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackReport {
    /// Zero words inserted between parameters
    pub gap_words: usize,
    /// Parameters with an unsupported type tag (slot left zero)
    pub skipped_params: Vec<String>,
    /// Multi-word parameters whose natural width exceeded their span
    pub truncated_params: Vec<String>,
    /// Overlapping bit fields or word ranges combined under `Combine`
    pub overlaps: usize,
    /// Parameters were re-sorted by start word
    pub reordered: bool,
    /// A trailing all-zero bit-field word was dropped
    pub dropped_zero_tail: bool,
}

impl PackReport {
    /// True when nothing was skipped, truncated, combined or dropped
    pub fn is_clean(&self) -> bool {
        self.skipped_params.is_empty()
            && self.truncated_params.is_empty()
            && self.overlaps == 0
            && !self.dropped_zero_tail
    }
}

/// Packed words in construction order plus diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedWords {
    pub words: Vec<u16>,
    pub report: PackReport,
}

// ============================================================================
// WordPacker
// ============================================================================

/// Assembles parameter descriptors into a word array
#[derive(Debug, Clone, Copy, Default)]
pub struct WordPacker {
    order: OrderPolicy,
    overlap: OverlapPolicy,
    zero_tail: ZeroTail,
}

impl WordPacker {
    pub fn new(order: OrderPolicy, overlap: OverlapPolicy, zero_tail: ZeroTail) -> Self {
        Self {
            order,
            overlap,
            zero_tail,
        }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(config.order, config.overlap, config.zero_tail)
    }

    /// Pack one record's parameters into words (construction order)
    pub fn pack(&self, params: &[ParamDescriptor]) -> Result<PackedWords> {
        for param in params {
            param.validate()?;
        }

        let mut report = PackReport::default();
        let ordered = self.arrange(params, &mut report)?;

        let mut state = PackState::default();
        for (index, param) in ordered.iter().enumerate() {
            let next = ordered.get(index + 1);
            state.place(param, next, self.overlap, &mut report)?;
        }
        let words = state.finish(self.zero_tail, &mut report);

        trace!(
            "Packed {} params into {} words: {:04X?}",
            params.len(),
            words.len(),
            words
        );
        Ok(PackedWords { words, report })
    }

    /// Apply the ordering policy
    fn arrange<'a>(
        &self,
        params: &'a [ParamDescriptor],
        report: &mut PackReport,
    ) -> Result<Cow<'a, [ParamDescriptor]>> {
        let first_unsorted = params
            .windows(2)
            .find(|pair| pair[1].start_word < pair[0].start_word);

        let Some(pair) = first_unsorted else {
            return Ok(Cow::Borrowed(params));
        };

        match self.order {
            OrderPolicy::Preserve => {
                warn!(
                    "Param '{}' at word {} follows word {}, packing in given order",
                    pair[1].name, pair[1].start_word, pair[0].start_word
                );
                Ok(Cow::Borrowed(params))
            },
            OrderPolicy::Reject => Err(CodecError::UnsortedParameters {
                name: pair[1].name.clone(),
                start_word: pair[1].start_word,
                previous: pair[0].start_word,
            }),
            OrderPolicy::Sort => {
                debug!(
                    "Param '{}' at word {} follows word {}, sorting by start word",
                    pair[1].name, pair[1].start_word, pair[0].start_word
                );
                let mut sorted = params.to_vec();
                sorted.sort_by_key(|p| p.start_word);
                report.reordered = true;
                Ok(Cow::Owned(sorted))
            },
        }
    }
}

// ============================================================================
// Pack State
// ============================================================================

#[derive(Debug, Default)]
struct PackState {
    words: Vec<u16>,
    /// Last word index a parameter reached
    current_word: Option<usize>,
    /// Bits assembled for the in-progress shared word
    accumulator: u16,
    /// Which accumulator bits are already claimed
    claimed: u16,
    /// Word index the accumulator belongs to while a flush is deferred
    pending_word: Option<usize>,
}

impl PackState {
    fn place(
        &mut self,
        param: &ParamDescriptor,
        next: Option<&ParamDescriptor>,
        overlap: OverlapPolicy,
        report: &mut PackReport,
    ) -> Result<()> {
        self.fill_gap(param, report);
        self.check_word_overlap(param, overlap, report)?;

        let word_count = param.word_count();
        let bytes = match param.value_type() {
            Some(value_type) => encode_value(param.value, value_type, word_count),
            None => {
                warn!(
                    "Param '{}' has unsupported type '{}', leaving words {}..={} zero",
                    param.name, param.type_tag, param.start_word, param.end_word
                );
                report.skipped_params.push(param.name.clone());
                vec![0; word_count * 2]
            },
        };

        if param.is_multi_word() {
            if bytes.len() > word_count * 2 {
                warn!(
                    "Param '{}' encodes to {} bytes but spans {} words, truncating",
                    param.name,
                    bytes.len(),
                    word_count
                );
                report.truncated_params.push(param.name.clone());
            }
            self.words
                .extend((0..word_count).map(|i| le_word_at(&bytes, i)));
            self.reset_accumulator();
        } else if param.is_whole_word() {
            self.words.push(le_word_at(&bytes, 0));
            self.reset_accumulator();
        } else {
            self.merge_field(param, le_word_at(&bytes, 0), overlap, report)?;
            match next {
                Some(n) if n.start_word == param.start_word => {
                    trace!(
                        "Deferring flush of word {} for '{}'",
                        param.start_word,
                        n.name
                    );
                },
                Some(_) => self.flush(),
                // Last parameter: left to the final flush
                None => {},
            }
        }

        self.current_word = Some(param.end_word);
        Ok(())
    }

    fn fill_gap(&mut self, param: &ParamDescriptor, report: &mut PackReport) {
        let Some(next_free) = self.current_word.and_then(|w| w.checked_add(1)) else {
            return;
        };
        if param.start_word > next_free {
            let gap = param.start_word - next_free;
            trace!(
                "Zero-filling {} words before '{}' at word {}",
                gap,
                param.name,
                param.start_word
            );
            self.words.extend(std::iter::repeat(0).take(gap));
            report.gap_words += gap;
        }
    }

    /// A parameter may only start on an already-reached word when it is a
    /// bit field joining the deferred shared word
    fn check_word_overlap(
        &self,
        param: &ParamDescriptor,
        overlap: OverlapPolicy,
        report: &mut PackReport,
    ) -> Result<()> {
        let Some(current) = self.current_word else {
            return Ok(());
        };
        if param.start_word > current {
            return Ok(());
        }
        let joins_shared_word =
            param.is_bit_field() && self.pending_word == Some(param.start_word);
        if joins_shared_word {
            return Ok(());
        }

        match overlap {
            OverlapPolicy::Strict => Err(CodecError::WordOverlap {
                name: param.name.clone(),
                start_word: param.start_word,
                emitted: current,
            }),
            OverlapPolicy::Combine => {
                warn!(
                    "Param '{}' starts at word {} but words up to {} are already placed",
                    param.name, param.start_word, current
                );
                report.overlaps += 1;
                Ok(())
            },
        }
    }

    fn merge_field(
        &mut self,
        param: &ParamDescriptor,
        raw: u16,
        overlap: OverlapPolicy,
        report: &mut PackReport,
    ) -> Result<()> {
        let mask = param.bit_mask();
        if self.claimed & mask != 0 {
            match overlap {
                OverlapPolicy::Strict => {
                    return Err(CodecError::BitOverlap {
                        word: param.start_word,
                        name: param.name.clone(),
                        used: self.claimed,
                    });
                },
                OverlapPolicy::Combine => {
                    warn!(
                        "Param '{}' bits {}..={} overlap claimed mask 0x{:04X} in word {}, OR-combining",
                        param.name, param.start_bit, param.end_bit, self.claimed, param.start_word
                    );
                    report.overlaps += 1;
                },
            }
        }

        self.accumulator |= place_field(raw, param.start_bit, param.end_bit);
        self.claimed |= mask;
        self.pending_word = Some(param.start_word);
        Ok(())
    }

    fn flush(&mut self) {
        self.words.push(self.accumulator);
        self.reset_accumulator();
    }

    fn reset_accumulator(&mut self) {
        self.accumulator = 0;
        self.claimed = 0;
        self.pending_word = None;
    }

    fn finish(mut self, zero_tail: ZeroTail, report: &mut PackReport) -> Vec<u16> {
        if self.accumulator != 0 {
            self.flush();
        } else if let Some(word) = self.pending_word {
            match zero_tail {
                ZeroTail::Emit => self.flush(),
                ZeroTail::Drop => {
                    debug!("Dropping all-zero trailing bit-field word {}", word);
                    report.dropped_zero_tail = true;
                },
            }
        }
        self.words
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::types::ValueType;
    use tracing_test::traced_test;

    fn uint(name: &str, value: f64, word: usize) -> ParamDescriptor {
        ParamDescriptor::new(name, ValueType::Uint, value, word, word)
    }

    fn pack(params: &[ParamDescriptor]) -> PackedWords {
        WordPacker::default().pack(params).unwrap()
    }

    #[test]
    fn test_whole_word() {
        let packed = pack(&[uint("speed", 300.0, 0)]);
        assert_eq!(packed.words, vec![0x012C]);
        assert!(packed.report.is_clean());
    }

    #[test]
    fn test_empty_record() {
        let packed = pack(&[]);
        assert!(packed.words.is_empty());
    }

    #[test]
    fn test_bit_fields_share_word() {
        let packed = pack(&[
            uint("lo", 0xAB as f64, 0).with_bits(0, 7),
            uint("hi", 0xCD as f64, 0).with_bits(8, 15),
        ]);
        assert_eq!(packed.words, vec![0xCDAB]);
    }

    #[test]
    fn test_bit_field_flushed_when_next_word_differs() {
        let packed = pack(&[uint("flag", 1.0, 0).with_bits(3, 3), uint("count", 7.0, 1)]);
        assert_eq!(packed.words, vec![0x0008, 0x0007]);
    }

    #[test]
    fn test_bit_field_masks_excess_bits() {
        let packed = pack(&[
            uint("mode", 0xFF as f64, 0).with_bits(4, 5),
            uint("next", 1.0, 1),
        ]);
        assert_eq!(packed.words, vec![0x0030, 0x0001]);
    }

    #[test]
    fn test_gap_fill_between_params() {
        let packed = pack(&[uint("a", 1.0, 0), uint("b", 2.0, 3)]);
        assert_eq!(packed.words, vec![1, 0, 0, 2]);
        assert_eq!(packed.report.gap_words, 2);
    }

    #[test]
    fn test_no_padding_before_first_param() {
        let packed = pack(&[uint("late", 9.0, 5)]);
        assert_eq!(packed.words, vec![9]);
    }

    #[test]
    fn test_multi_word_double() {
        let value = -1234.5678_f64;
        let packed = pack(&[ParamDescriptor::new("d", ValueType::Double, value, 0, 3)]);
        assert_eq!(packed.words.len(), 4);
        let bytes = crate::bytes::le_words_to_bytes(&packed.words);
        assert_eq!(bytes, value.to_le_bytes().to_vec());
    }

    #[test]
    fn test_multi_word_pads_narrow_types() {
        let packed = pack(&[ParamDescriptor::new("u", ValueType::Uint, 0x0102_0304 as f64, 0, 2)]);
        assert_eq!(packed.words, vec![0x0304, 0x0102, 0x0000]);
    }

    #[test]
    fn test_multi_word_truncates_wide_types() {
        let packed = pack(&[ParamDescriptor::new("d", ValueType::Double, 1.0, 0, 1)]);
        assert_eq!(packed.words.len(), 2);
        assert_eq!(packed.report.truncated_params, vec!["d".to_string()]);
    }

    #[test]
    fn test_multi_word_ignores_bits() {
        let packed = pack(&[
            ParamDescriptor::new("f", ValueType::Float, 25.0, 0, 1).with_bits(4, 6)
        ]);
        assert_eq!(packed.words, vec![0x0000, 0x41C8]);
    }

    #[test]
    fn test_unsupported_type_leaves_zero_slot() {
        let mut odd = uint("odd", 77.0, 1);
        odd.type_tag = "string".to_string();
        let packed = pack(&[uint("a", 1.0, 0), odd, uint("b", 2.0, 2)]);
        assert_eq!(packed.words, vec![1, 0, 2]);
        assert_eq!(packed.report.skipped_params, vec!["odd".to_string()]);
    }

    #[test]
    fn test_zero_tail_dropped_by_default() {
        let packed = pack(&[uint("a", 5.0, 0), uint("flag", 0.0, 1).with_bits(0, 0)]);
        assert_eq!(packed.words, vec![5]);
        assert!(packed.report.dropped_zero_tail);
    }

    #[test]
    fn test_zero_tail_emitted_when_configured() {
        let packer = WordPacker::new(OrderPolicy::Sort, OverlapPolicy::Combine, ZeroTail::Emit);
        let packed = packer
            .pack(&[uint("a", 5.0, 0), uint("flag", 0.0, 1).with_bits(0, 0)])
            .unwrap();
        assert_eq!(packed.words, vec![5, 0]);
        assert!(!packed.report.dropped_zero_tail);
    }

    #[test]
    fn test_nonzero_tail_always_flushed() {
        let packed = pack(&[uint("flag", 1.0, 0).with_bits(15, 15)]);
        assert_eq!(packed.words, vec![0x8000]);
    }

    #[test]
    fn test_zero_field_mid_record_is_kept() {
        let packed = pack(&[uint("flag", 0.0, 0).with_bits(0, 3), uint("b", 2.0, 1)]);
        assert_eq!(packed.words, vec![0, 2]);
        assert!(!packed.report.dropped_zero_tail);
    }

    #[test]
    fn test_bit_overlap_combined_by_default() {
        let packed = pack(&[
            uint("a", 0x0F as f64, 0).with_bits(0, 7),
            uint("b", 0x3 as f64, 0).with_bits(4, 5),
        ]);
        assert_eq!(packed.words, vec![0x003F]);
        assert_eq!(packed.report.overlaps, 1);
    }

    #[test]
    fn test_bit_overlap_strict() {
        let packer = WordPacker::new(OrderPolicy::Sort, OverlapPolicy::Strict, ZeroTail::Drop);
        let err = packer
            .pack(&[
                uint("a", 1.0, 0).with_bits(0, 7),
                uint("b", 1.0, 0).with_bits(7, 9),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::BitOverlap {
                word: 0,
                name: "b".to_string(),
                used: 0x00FF,
            }
        );
    }

    #[test]
    fn test_word_overlap_strict() {
        let packer = WordPacker::new(OrderPolicy::Sort, OverlapPolicy::Strict, ZeroTail::Drop);
        let err = packer
            .pack(&[
                ParamDescriptor::new("span", ValueType::Uint, 1.0, 0, 1),
                uint("inside", 1.0, 1),
            ])
            .unwrap_err();
        assert!(matches!(err, CodecError::WordOverlap { start_word: 1, emitted: 1, .. }));
    }

    #[test]
    fn test_order_sort_default() {
        let packed = pack(&[uint("b", 2.0, 1), uint("a", 1.0, 0)]);
        assert_eq!(packed.words, vec![1, 2]);
        assert!(packed.report.reordered);
    }

    #[test]
    fn test_order_reject() {
        let packer = WordPacker::new(OrderPolicy::Reject, OverlapPolicy::Combine, ZeroTail::Drop);
        let err = packer
            .pack(&[uint("b", 2.0, 1), uint("a", 1.0, 0)])
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::UnsortedParameters {
                name: "a".to_string(),
                start_word: 0,
                previous: 1,
            }
        );
    }

    #[test]
    fn test_order_preserve_packs_as_given() {
        let packer = WordPacker::new(OrderPolicy::Preserve, OverlapPolicy::Combine, ZeroTail::Drop);
        let packed = packer
            .pack(&[uint("b", 2.0, 1), uint("a", 1.0, 0)])
            .unwrap();
        assert_eq!(packed.words, vec![2, 1]);
        assert!(!packed.report.reordered);
        assert_eq!(packed.report.overlaps, 1);
    }

    #[test]
    #[traced_test]
    fn test_unsupported_type_is_logged() {
        let mut odd = uint("label", 1.0, 0);
        odd.type_tag = "text".to_string();
        pack(&[odd]);
        assert!(logs_contain("Param 'label' has unsupported type 'text'"));
    }

    #[test]
    #[traced_test]
    fn test_overlap_and_zero_tail_are_logged() {
        pack(&[
            uint("a", 1.0, 0).with_bits(0, 3),
            uint("b", 1.0, 0).with_bits(2, 5),
            uint("c", 0.0, 1).with_bits(0, 0),
        ]);
        assert!(logs_contain("overlap claimed mask 0x000F in word 0"));
        assert!(logs_contain("Dropping all-zero trailing bit-field word 1"));
    }

    #[test]
    fn test_out_of_range_words_rejected() {
        let err = WordPacker::default()
            .pack(&[ParamDescriptor::new("span", ValueType::Double, 1.0, 0, usize::MAX)])
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidParameter { ref name, .. } if name == "span"));

        let far = crate::types::MAX_WORD_INDEX + 1;
        let err = WordPacker::default()
            .pack(&[uint("a", 1.0, far), uint("b", 2.0, far)])
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidParameter { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_params_on_last_word_index() {
        let last = crate::types::MAX_WORD_INDEX;
        let packed = pack(&[
            uint("lo", 0x0B as f64, last).with_bits(0, 3),
            uint("hi", 0x0A as f64, last).with_bits(4, 7),
        ]);
        assert_eq!(packed.words, vec![0x00AB]);

        let packed = pack(&[uint("a", 1.0, last), uint("b", 2.0, last)]);
        assert_eq!(packed.words, vec![1, 2]);
        assert_eq!(packed.report.overlaps, 1);
        assert_eq!(packed.report.gap_words, 0);
    }

    #[test]
    fn test_invalid_descriptor_rejected() {
        let err = WordPacker::default()
            .pack(&[uint("bad", 1.0, 0).with_bits(8, 2)])
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidParameter { .. }));
    }
}
