use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use wordbook_io::{Download, KeyValueStore, StorageError};
use wordbook_types::VocabularyEntry;

use crate::StoreError;
use crate::export::{CSV_MIME, export_filename, to_csv};

pub const LIST_KEY: &str = "wordbook:list";

/// Last unreadable list value, kept so a reset never destroys data silently
pub const CORRUPT_KEY: &str = "wordbook:list.corrupt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub download: Download,
    /// Entries written, header excluded
    pub count: usize,
}

/// Ordered, append-only list of saved terms, unique by `term__gloss`
#[derive(Clone)]
pub struct VocabularyStore {
    kv: Arc<dyn KeyValueStore>,
}

impl VocabularyStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Saved entries in insertion order. A non-list value reads as empty; list
    /// elements that are not entries are skipped.
    pub fn entries(&self) -> Result<Vec<VocabularyEntry>, StoreError> {
        let Some(raw) = self.kv.get(LIST_KEY)? else {
            return Ok(Vec::new());
        };

        match decode(&raw) {
            Ok((entries, 0)) => Ok(entries),
            Ok((entries, skipped)) => {
                tracing::warn!("Skipped {skipped} unreadable wordbook entries");
                self.kv.set(CORRUPT_KEY, raw)?;
                Ok(entries)
            }
            Err(reason) => {
                tracing::warn!("Wordbook data is unreadable ({reason}), treating it as empty");
                self.kv.set(CORRUPT_KEY, raw)?;
                Ok(Vec::new())
            }
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Append unless an entry with the same key exists. Returns whether it was added.
    pub fn add(&self, entry: VocabularyEntry) -> Result<bool, StoreError> {
        let mut entries = self.entries()?;

        let key = entry.dedup_key();
        if entries.iter().any(|e| e.dedup_key() == key) {
            tracing::debug!("Already saved: {key}");
            return Ok(false);
        }

        entries.push(entry);
        let value = serde_json::to_value(&entries).map_err(StorageError::from)?;
        self.kv.set(LIST_KEY, value)?;
        tracing::info!("Saved {key} ({} entries)", entries.len());
        Ok(true)
    }

    /// CSV download named for today's date, `None` when there is nothing to export
    pub fn export_csv(&self) -> Result<Option<CsvExport>, StoreError> {
        self.export_csv_on(chrono::Utc::now().date_naive())
    }

    pub fn export_csv_on(&self, date: NaiveDate) -> Result<Option<CsvExport>, StoreError> {
        let entries = self.entries()?;
        if entries.is_empty() {
            return Ok(None);
        }

        let csv = to_csv(&entries)?;
        Ok(Some(CsvExport {
            download: Download {
                filename: export_filename(date),
                mime: CSV_MIME.to_string(),
                bytes: csv.into_bytes(),
            },
            count: entries.len(),
        }))
    }
}

/// Accepts a JSON array, or a string holding one (the older string-encoded layout).
/// Returns the readable entries and how many elements were skipped.
fn decode(raw: &Value) -> Result<(Vec<VocabularyEntry>, usize), String> {
    match raw {
        Value::Array(items) => Ok(decode_items(items)),
        Value::String(s) => {
            let inner: Value = serde_json::from_str(s).map_err(|e| e.to_string())?;
            match inner {
                Value::Array(items) => Ok(decode_items(&items)),
                _ => Err("string value does not hold a list".to_string()),
            }
        }
        other => Err(format!("expected a list, found {}", kind(other))),
    }
}

fn decode_items(items: &[Value]) -> (Vec<VocabularyEntry>, usize) {
    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (index, item) in items.iter().enumerate() {
        match VocabularyEntry::deserialize(item) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Wordbook entry {index} is unreadable: {e}");
                skipped += 1;
            }
        }
    }

    (entries, skipped)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
