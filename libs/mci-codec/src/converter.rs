//! Converter driver
//!
//! Selects allow-listed records from a pending collection, runs each through
//! pack → word order → hex, and removes the consumed records. Records whose
//! type is not allow-listed stay pending for another pass or handler.

use crate::bytes::format_words;
use crate::config::CodecConfig;
use crate::error::Result;
use crate::packer::{PackReport, WordPacker};
use crate::types::Record;
use tracing::{debug, info, warn};

/// One converted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRecord {
    pub type_tag: String,
    /// Hex words in wire order
    pub words: Vec<String>,
    pub report: PackReport,
}

/// Result of a partitioning conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    /// Hex words of all consumed records, in record order
    pub words: Vec<String>,
    /// Records that were not allow-listed, original order kept
    pub remaining: Vec<Record>,
    /// One report per consumed record
    pub reports: Vec<PackReport>,
}

impl Conversion {
    pub fn consumed(&self) -> usize {
        self.reports.len()
    }
}

/// Record converter bound to one configuration
#[derive(Debug, Clone)]
pub struct Converter {
    config: CodecConfig,
    packer: WordPacker,
}

impl Converter {
    pub fn new(config: CodecConfig) -> Self {
        let packer = WordPacker::from_config(&config);
        Self { config, packer }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Whether a record would be consumed
    pub fn accepts(&self, record: &Record) -> bool {
        self.config.allows(&record.type_tag)
    }

    /// Convert one record, ignoring the allow-list
    pub fn convert_record(&self, record: &Record) -> Result<PackedRecord> {
        let packed = self.packer.pack(&record.params)?;
        let words = self.config.word_order.apply(packed.words);

        if !packed.report.is_clean() {
            warn!(
                "Record '{}' packed with diagnostics: {} skipped, {} truncated, {} overlaps, zero tail dropped: {}",
                record.type_tag,
                packed.report.skipped_params.len(),
                packed.report.truncated_params.len(),
                packed.report.overlaps,
                packed.report.dropped_zero_tail
            );
        }

        Ok(PackedRecord {
            type_tag: record.type_tag.clone(),
            words: format_words(&words),
            report: packed.report,
        })
    }

    /// Partition records into consumed and remaining, converting the consumed
    ///
    /// Fails on the first record that cannot be packed; the input is consumed
    /// either way, use [`Converter::drain`] to keep it on error.
    pub fn convert(&self, records: Vec<Record>) -> Result<Conversion> {
        let (selected, remaining): (Vec<Record>, Vec<Record>) =
            records.into_iter().partition(|r| self.accepts(r));

        let mut conversion = Conversion {
            remaining,
            ..Conversion::default()
        };
        for record in &selected {
            let packed = self.convert_record(record)?;
            conversion.words.extend(packed.words);
            conversion.reports.push(packed.report);
        }

        self.log_pass(conversion.consumed(), conversion.remaining.len(), conversion.words.len());
        Ok(conversion)
    }

    /// Convert allow-listed records in place, removing them from `pending`
    ///
    /// All selected records are packed before `pending` is modified, so on
    /// error the collection is left exactly as it was.
    pub fn drain(&self, pending: &mut Vec<Record>) -> Result<Vec<String>> {
        let mut words = Vec::new();
        let mut consumed = 0;
        for record in pending.iter() {
            if !self.accepts(record) {
                debug!("Record type '{}' not allow-listed, leaving pending", record.type_tag);
                continue;
            }
            words.extend(self.convert_record(record)?.words);
            consumed += 1;
        }

        pending.retain(|r| !self.accepts(r));
        self.log_pass(consumed, pending.len(), words.len());
        Ok(words)
    }

    fn log_pass(&self, consumed: usize, remaining: usize, words: usize) {
        if consumed > 0 {
            info!(
                "Converted {} records into {} words, {} left pending",
                consumed, words, remaining
            );
        } else {
            debug!("No allow-listed records, {} left pending", remaining);
        }
    }
}
