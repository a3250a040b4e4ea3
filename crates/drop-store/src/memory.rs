//! In-memory object store for testing and demos

use crate::{ObjectRecord, ObjectStore, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// An in-memory object store
///
/// `take` is genuinely atomic here: two racing readers cannot both observe
/// the same record through it.
#[derive(Clone, Default)]
pub struct MemoryStore {
    objects: Arc<DashMap<String, ObjectRecord>>,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
        }
    }

    /// Get the number of live records
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Clear all records
    pub fn clear(&self) {
        self.objects.clear();
    }

    /// List all live codes
    pub fn list_codes(&self) -> Vec<String> {
        self.objects.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, record: &ObjectRecord) -> Result<()> {
        self.objects.insert(record.code.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Option<ObjectRecord>> {
        Ok(self.objects.get(code).map(|entry| entry.value().clone()))
    }

    async fn remove(&self, code: &str) -> Result<()> {
        self.objects.remove(code);
        Ok(())
    }

    async fn take(&self, code: &str) -> Result<Option<ObjectRecord>> {
        Ok(self.objects.remove(code).map(|(_, record)| record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Payload;

    fn record(code: &str) -> ObjectRecord {
        ObjectRecord {
            code: code.to_string(),
            file_name: "note.txt".to_string(),
            file_size: 10,
            file_type: "text/plain".to_string(),
            payload: Payload::Plain {
                data: "data:text/plain;base64,aGVsbG8=".to_string(),
            },
            uploaded_at: 0,
            expires_at: 69 * 60 * 1000,
        }
    }

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = MemoryStore::new();
        store.put(&record("AAAAAA")).await.unwrap();

        let fetched = store.get("AAAAAA").await.unwrap();
        assert_eq!(fetched.unwrap().file_name, "note.txt");

        store.remove("AAAAAA").await.unwrap();
        assert!(store.get("AAAAAA").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_absent_is_none_not_error() {
        let store = MemoryStore::new();
        assert!(store.get("ZZZZZZ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemoryStore::new();
        store.remove("ZZZZZZ").await.unwrap();
        store.put(&record("AAAAAA")).await.unwrap();
        store.remove("AAAAAA").await.unwrap();
        store.remove("AAAAAA").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_take_yields_record_exactly_once() {
        let store = MemoryStore::new();
        store.put(&record("AAAAAA")).await.unwrap();

        let first = store.take("AAAAAA").await.unwrap();
        let second = store.take("AAAAAA").await.unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
    }
}
