//! Storage
//!
//! A key-value blob store with no transactional guarantees, and the typed
//! collection wrapper the cart, wishlist and order history persist through.

use std::{fmt::Debug, io};

use thiserror::Error;

pub mod collection;
pub mod file;
pub mod memory;

pub use collection::PersistedCollection;
pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

/// Errors raised by a blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the value would exceed the store's capacity.
    #[error("storage quota exceeded writing {key}: {needed} bytes needed, {available} available")]
    QuotaExceeded {
        /// Key being written
        key: String,

        /// Bytes the store would hold after the write
        needed: usize,

        /// Store capacity in bytes
        available: usize,
    },

    /// The key cannot be used by this store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The store is not usable (for example, a poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// IO error from a file-backed store.
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// The value could not be serialized.
    #[error("failed to serialize stored value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value blob store. Each key is written independently.
pub trait BlobStore: Debug + Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write fails.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Stable keys of the collections the storefront persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Cart line items
    Cart,

    /// Wishlist entries
    Wishlist,

    /// Placed orders
    OrderHistory,

    /// Signed-in user
    SessionUser,
}

impl StoreKey {
    /// The key as written to the blob store.
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::Cart => "cart",
            StoreKey::Wishlist => "wishlist",
            StoreKey::OrderHistory => "order-history",
            StoreKey::SessionUser => "session-user",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
