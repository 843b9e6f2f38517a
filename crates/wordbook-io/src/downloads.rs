use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::StorageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Privileged save-as capability of the host
pub trait DownloadSink: Send + Sync {
    /// Store the file and return where it ended up
    fn save(&self, download: &Download) -> Result<PathBuf, StorageError>;
}

/// Writes into a directory, never overwriting an existing file
pub struct DirDownloads {
    dir: PathBuf,
}

impl DirDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirDownloads {
    fn save(&self, download: &Download) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = free_path(&self.dir, &download.filename);
        crate::kv::write_atomic(&path, &download.bytes)?;
        tracing::info!("Saved {} ({} bytes)", path.display(), download.bytes.len());
        Ok(path)
    }
}

/// `name.csv`, then `name (1).csv`, `name (2).csv`, ...
fn free_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (filename, String::new()),
    };

    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Keeps downloads in memory
#[derive(Default)]
pub struct MemoryDownloads {
    saved: Mutex<Vec<Download>>,
}

impl MemoryDownloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<Download> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl DownloadSink for MemoryDownloads {
    fn save(&self, download: &Download) -> Result<PathBuf, StorageError> {
        self.saved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(download.clone());
        Ok(PathBuf::from(&download.filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(name: &str) -> Download {
        Download {
            filename: name.to_string(),
            mime: "text/csv".to_string(),
            bytes: b"term\n".to_vec(),
        }
    }

    #[test]
    fn test_dir_downloads_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirDownloads::new(dir.path());

        let first = sink.save(&csv("wordbook_2024-01-01.csv")).unwrap();
        let second = sink.save(&csv("wordbook_2024-01-01.csv")).unwrap();

        assert_eq!(first, dir.path().join("wordbook_2024-01-01.csv"));
        assert_eq!(second, dir.path().join("wordbook_2024-01-01 (1).csv"));
        assert_eq!(fs::read(&second).unwrap(), b"term\n");
    }

    #[test]
    fn test_memory_downloads_records() {
        let sink = MemoryDownloads::new();
        sink.save(&csv("a.csv")).unwrap();
        assert_eq!(sink.saved().len(), 1);
    }
}
