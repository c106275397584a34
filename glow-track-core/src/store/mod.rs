//! Library store boundary.
//!
//! The manager requires only get/set-with-merge semantics keyed by user
//! identity. Writes replace the library wholesale (merge happens at the
//! top-level document fields only), so concurrent sessions resolve by
//! last-write-wins.

mod file;
mod memory;
mod rest;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

use crate::migrate::CURRENT_SCHEMA_VERSION;
use crate::models::Library;

pub use file::FileLibraryStore;
pub use memory::MemoryLibraryStore;
pub use rest::RestLibraryStore;

/// The versioned payload written back to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLibrary {
    pub schema_version: u32,
    pub routine_library: Library,
    pub updated_at: DateTime<Utc>,
}

impl StoredLibrary {
    /// Wraps a library snapshot at the current schema version.
    pub fn now(routine_library: Library) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            routine_library,
            updated_at: Utc::now(),
        }
    }
}

/// Errors that can occur talking to a library store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("request error: {0}")]
    Http(String),
    #[error("server returned status {0}")]
    Status(u16),
}

/// Remote persistence keyed by user identity.
///
/// `get` returns the raw stored document so legacy schema shapes reach the
/// migrator untouched; `set` merges the payload's top-level fields over
/// whatever is stored.
pub trait LibraryStore: Send + Sync {
    fn get(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    fn set(
        &self,
        user_id: &str,
        payload: &StoredLibrary,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Merges the payload's top-level fields over an existing stored document.
pub(crate) fn merge_payload(
    existing: Option<Value>,
    payload: &StoredLibrary,
) -> Result<Value, StoreError> {
    let mut doc = match existing {
        Some(Value::Object(map)) => Value::Object(map),
        _ => Value::Object(serde_json::Map::new()),
    };

    if let (Value::Object(target), Value::Object(fields)) =
        (&mut doc, serde_json::to_value(payload)?)
    {
        for (key, value) in fields {
            target.insert(key, value);
        }
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stored_library_wire_format() {
        let payload = StoredLibrary::now(Library::starter());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["schemaVersion"], json!(3));
        assert!(value["routineLibrary"]["items"].is_object());
        assert!(value["updatedAt"].is_string());
    }

    #[test]
    fn test_merge_payload_preserves_unknown_fields() {
        let existing = json!({"profile": {"theme": "pink"}, "schemaVersion": 1});
        let payload = StoredLibrary::now(Library::starter());

        let merged = merge_payload(Some(existing), &payload).unwrap();
        assert_eq!(merged["profile"]["theme"], json!("pink"));
        assert_eq!(merged["schemaVersion"], json!(3));
        assert!(merged["routineLibrary"].is_object());
    }

    #[test]
    fn test_merge_payload_replaces_non_object() {
        let merged = merge_payload(Some(json!("corrupt")), &StoredLibrary::now(Library::starter()))
            .unwrap();
        assert!(merged.is_object());
        assert_eq!(merged["schemaVersion"], json!(3));
    }
}
