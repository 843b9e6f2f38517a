mod credential;
mod export;
mod vocabulary;

pub use credential::{CREDENTIAL_KEY, CredentialStore};
pub use export::{CSV_HEADER, CSV_MIME, export_filename, to_csv};
pub use vocabulary::{CORRUPT_KEY, CsvExport, LIST_KEY, VocabularyStore};

use wordbook_io::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Please enter an API key")]
    EmptyCredential,
}
