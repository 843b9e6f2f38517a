use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use wordbook_types::VocabularyEntry;

use crate::StoreError;

pub const CSV_HEADER: [&str; 9] = [
    "term",
    "gloss",
    "pos",
    "example",
    "example_translation",
    "page_title",
    "page_url",
    "target_lang",
    "ts",
];

pub const CSV_MIME: &str = "text/csv";

pub fn export_filename(date: NaiveDate) -> String {
    format!("wordbook_{}.csv", date.format("%Y-%m-%d"))
}

/// Bare header line, then one fully quoted row per entry, `\n`-separated with no
/// trailing newline
pub fn to_csv(entries: &[VocabularyEntry]) -> Result<String, StoreError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for entry in entries {
        let ts = entry.timestamp.to_string();
        writer.write_record([
            entry.term.as_str(),
            entry.gloss.as_str(),
            entry.pos.as_str(),
            entry.example.as_str(),
            entry.example_translation.as_str(),
            entry.page_title.as_str(),
            entry.page_url.as_str(),
            entry.target_lang.as_str(),
            ts.as_str(),
        ])?;
    }

    let rows = writer
        .into_inner()
        .map_err(|e| StoreError::Csv(e.into_error().into()))?;
    let rows = String::from_utf8_lossy(&rows);

    let mut csv = CSV_HEADER.join(",");
    if !rows.is_empty() {
        csv.push('\n');
        csv.push_str(rows.trim_end_matches('\n'));
    }
    Ok(csv)
}
