//! Record file loading

use anyhow::{bail, Context, Result};
use mci_codec::Record;
use std::path::Path;
use tracing::debug;

/// Word count a record's layout addresses (`1 + max(endWord)`)
///
/// The packed count can be lower: nothing is padded before the first
/// parameter and a trailing all-zero bit field may be dropped.
pub fn expected_word_count(record: &Record) -> usize {
    record
        .max_end_word()
        .map_or(0, |last| last.saturating_add(1))
}

/// Load pending records from a `.json`, `.yaml` or `.yml` file
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
        .context("Records file must have an extension")?;

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;

    let records = match extension.as_str() {
        "json" => Record::list_from_json(&text),
        "yaml" | "yml" => Record::list_from_yaml(&text),
        _ => bail!("Unsupported records file format: {}", extension),
    }
    .with_context(|| format!("Failed to parse records file {}", path.display()))?;

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
