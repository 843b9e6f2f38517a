pub mod clipboard;
pub mod downloads;
pub mod kv;
pub mod ws;

pub use downloads::{DirDownloads, Download, DownloadSink, MemoryDownloads};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
