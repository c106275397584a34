//! File-backed library store: one JSON document per user under the data
//! directory. This is the default store for local, single-device use.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::PathBuf;

use super::{merge_payload, LibraryStore, StoreError, StoredLibrary};

#[derive(Debug, Clone)]
pub struct FileLibraryStore {
    data_dir: PathBuf,
}

impl FileLibraryStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    fn path(&self, user_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", user_id))
    }
}

impl LibraryStore for FileLibraryStore {
    async fn get(&self, user_id: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path(user_id);
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    // Corrupt files are repaired by the next write, not
                    // surfaced as errors.
                    tracing::warn!(path = %path.display(), error = %e, "unreadable library file");
                    Ok(None)
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    async fn set(&self, user_id: &str, payload: &StoredLibrary) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::Io {
            path: self.data_dir.clone(),
            source: e,
        })?;

        let path = self.path(user_id);
        let existing = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).ok(),
            Err(_) => None,
        };

        let merged = merge_payload(existing, payload)?;
        let contents = serde_json::to_string_pretty(&merged)?;
        fs::write(&path, contents).map_err(|e| StoreError::Io { path, source: e })?;
        Ok(())
    }
}
