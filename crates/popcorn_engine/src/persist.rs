use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use popcorn_logging::{popcorn_debug, popcorn_warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage directory missing or not writable: {0}")]
    Dir(String),
    #[error("storage path has no file name: {0:?}")]
    InvalidPath(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ensure a directory exists; create if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::Dir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::Dir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::Dir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Flat key-value store backed by one JSON object on disk.
///
/// Reads never fail: a missing or unparsable file, or a value of the wrong
/// shape, reads as absent.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    path: PathBuf,
}

impl KeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.read_entries()?;
        let value = entries.remove(key)?;
        match serde_json::from_value(value) {
            Ok(value) => Some(value),
            Err(err) => {
                popcorn_warn!("Ignoring stored {:?} in {:?}: {}", key, self.path, err);
                None
            }
        }
    }

    /// Stores `value` under `key`, keeping the other keys.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PersistError> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(key.to_string(), serde_json::to_value(value)?);
        let content = serde_json::to_string_pretty(&Value::Object(entries))?;

        let filename = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| PersistError::InvalidPath(self.path.clone()))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        AtomicFileWriter::new(dir).write(filename, &content)?;
        popcorn_debug!("Stored {:?} in {:?}", key, self.path);
        Ok(())
    }

    fn read_entries(&self) -> Option<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                popcorn_warn!("Failed to read {:?}: {}", self.path, err);
                return None;
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Some(entries),
            Ok(_) => {
                popcorn_warn!("Ignoring {:?}: not a JSON object", self.path);
                None
            }
            Err(err) => {
                popcorn_warn!("Failed to parse {:?}: {}", self.path, err);
                None
            }
        }
    }
}
