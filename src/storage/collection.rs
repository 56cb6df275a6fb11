//! Persisted collections

use std::{fmt, marker::PhantomData, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::storage::{BlobStore, StorageError, StoreKey};

/// A sequence of `T` stored as a JSON array under one key.
///
/// Loading never fails: a missing, unreadable or unparsable value loads as an
/// empty sequence.
pub struct PersistedCollection<T> {
    store: Arc<dyn BlobStore>,
    key: StoreKey,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for PersistedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedCollection")
            .field("store", &self.store)
            .field("key", &self.key)
            .finish()
    }
}

impl<T> Clone for PersistedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> PersistedCollection<T> {
    /// Bind a collection to a key in a store.
    pub fn new(store: Arc<dyn BlobStore>, key: StoreKey) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    /// The key this collection is stored under.
    pub fn key(&self) -> StoreKey {
        self.key
    }

    /// Load the stored sequence, or an empty one.
    pub fn load(&self) -> Vec<T> {
        let raw = match self.store.get(self.key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                warn!(key = %self.key, %error, "failed to read stored collection");

                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(error) => {
                warn!(key = %self.key, %error, "discarding unparsable stored collection");

                Vec::new()
            }
        }
    }

    /// Serialize and write the sequence.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if serialization or the write fails. The
    /// caller's in-memory sequence stays authoritative.
    pub fn save(&self, items: &[T]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;

        self.store.set(self.key.as_str(), &raw)?;

        debug!(key = %self.key, items = items.len(), "saved collection");

        Ok(())
    }

    /// Remove the stored sequence entirely.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be written.
    pub fn remove(&self) -> Result<(), StorageError> {
        self.store.remove(self.key.as_str())
    }
}
