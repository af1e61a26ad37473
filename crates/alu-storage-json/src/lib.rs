//! alu-storage-json
//!
//! File-backed collaborators for running the configurator without the quoting
//! service: the catalog from `catalog.json`, quotes in `quotes.json`, and plain
//! text quote documents under `documents/`.

mod catalog;
mod documents;
mod quotes;

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use thiserror::Error;

pub use catalog::{CatalogFile, JsonCatalog};
pub use documents::TextDocumentGenerator;
pub use quotes::{JsonQuoteStore, QuoteBook};

const TMP_SUFFIX: &str = "tmp";
pub const CATALOG_FILE: &str = "catalog.json";
pub const QUOTES_FILE: &str = "quotes.json";
pub const DOCUMENTS_DIR: &str = "documents";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serde(err.to_string())
    }
}

/// Locations of the local data files, all under one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub catalog_file: PathBuf,
    pub quotes_file: PathBuf,
    pub documents_dir: PathBuf,
}

impl StoragePaths {
    pub fn under(data_dir: &Path) -> Self {
        Self {
            catalog_file: data_dir.join(CATALOG_FILE),
            quotes_file: data_dir.join(QUOTES_FILE),
            documents_dir: data_dir.join(DOCUMENTS_DIR),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let data = serde_json::to_string_pretty(value)?;
    write_atomic(path, data.as_bytes())
}
