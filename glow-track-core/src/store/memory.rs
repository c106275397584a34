//! In-memory library store for tests: counts writes and can inject a
//! one-shot failure.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{merge_payload, LibraryStore, StoreError, StoredLibrary};

#[derive(Debug, Default)]
pub struct MemoryLibraryStore {
    docs: Mutex<HashMap<String, Value>>,
    writes: AtomicUsize,
    fail_next_set: AtomicBool,
}

impl MemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-loads a stored document for a user.
    pub fn seed(&self, user_id: impl Into<String>, value: Value) {
        self.docs.lock().unwrap().insert(user_id.into(), value);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes the next `set` call fail.
    pub fn fail_next_set(&self) {
        self.fail_next_set.store(true, Ordering::SeqCst);
    }

    pub fn document(&self, user_id: &str) -> Option<Value> {
        self.docs.lock().unwrap().get(user_id).cloned()
    }
}

impl LibraryStore for MemoryLibraryStore {
    async fn get(&self, user_id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.docs.lock().unwrap().get(user_id).cloned())
    }

    async fn set(&self, user_id: &str, payload: &StoredLibrary) -> Result<(), StoreError> {
        if self.fail_next_set.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Http("injected failure".to_string()));
        }

        let mut docs = self.docs.lock().unwrap();
        let merged = merge_payload(docs.get(user_id).cloned(), payload)?;
        docs.insert(user_id.to_string(), merged);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
