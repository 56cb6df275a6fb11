//! File-backed blob store
//!
//! One file per key, `<root>/<key>.json`. Writes go to a temporary file that is
//! renamed over the target so a reader never sees a half-written value.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::storage::{BlobStore, StorageError};

/// Blob store that keeps each key in its own file under a root directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = self.root.join(format!(".{key}.json.tmp"));

        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        debug!(key, path = %path.display(), bytes = value.len(), "wrote blob");

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn round_trips_values_through_files() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileBlobStore::open(dir.path())?;

        store.set("order-history", r#"[{"id":1}]"#)?;

        assert_eq!(
            store.get("order-history")?.as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert!(dir.path().join("order-history.json").exists());

        Ok(())
    }

    #[test]
    fn missing_key_reads_as_none_and_removes_cleanly() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileBlobStore::open(dir.path())?;

        assert_eq!(store.get("cart")?, None);

        store.remove("cart")?;

        Ok(())
    }

    #[test]
    fn rejects_path_like_keys() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileBlobStore::open(dir.path())?;

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));

        Ok(())
    }

    #[test]
    fn open_creates_nested_root() -> TestResult {
        let dir = tempfile::tempdir()?;
        let root = dir.path().join("nested").join("data");

        let store = FileBlobStore::open(&root)?;

        assert!(store.root().is_dir());

        Ok(())
    }
}
