//! In-memory blob store

use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::storage::{BlobStore, StorageError};

/// Blob store held in memory, with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: Mutex<FxHashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBlobStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses writes once values exceed `quota` bytes in total.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(quota),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, FxHashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|error| StorageError::Unavailable(error.to_string()))
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.lock()?;

        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(_, stored)| stored.len())
                .sum();
            let needed = used.saturating_add(value.len());

            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available: quota,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn get_missing_key_is_none() -> TestResult {
        let store = MemoryBlobStore::new();

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn set_then_get_returns_value() -> TestResult {
        let store = MemoryBlobStore::new();

        store.set("cart", "[]")?;

        assert_eq!(store.get("cart")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn remove_missing_key_is_ok() -> TestResult {
        let store = MemoryBlobStore::new();

        store.remove("cart")?;
        store.set("cart", "[]")?;
        store.remove("cart")?;

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn quota_rejects_oversized_writes() -> TestResult {
        let store = MemoryBlobStore::with_quota(10);

        store.set("a", "12345")?;

        let result = store.set("b", "123456");

        assert!(matches!(
            result,
            Err(StorageError::QuotaExceeded { needed: 11, available: 10, .. })
        ));
        assert_eq!(store.get("b")?, None);

        Ok(())
    }

    #[test]
    fn quota_ignores_value_being_replaced() -> TestResult {
        let store = MemoryBlobStore::with_quota(10);

        store.set("a", "1234567890")?;
        store.set("a", "0987654321")?;

        assert_eq!(store.get("a")?.as_deref(), Some("0987654321"));

        Ok(())
    }
}
