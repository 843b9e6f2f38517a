use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env_string;

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Wordbook")
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(default_data_dir)
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Holds the key-value file and profiles
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Where exported CSV files are written
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            download_dir: default_download_dir(),
        }
    }
}

impl StorageConfig {
    pub fn new() -> Self {
        Self {
            data_dir: env_string("WORDBOOK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            download_dir: env_string("WORDBOOK_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_download_dir),
        }
    }

    pub fn kv_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.data_dir.join("profiles")
    }
}
