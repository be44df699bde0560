//! Opaque string key-value storage
//!
//! The save system only needs get/set/has/delete of one string blob. Backends:
//! - `MemoryStore`: process-local map (tests, embedding hosts)
//! - `FileStore`: one `<key>.json` file per key, written via tmp + rename
//! - `LocalStorage`: browser `window.localStorage` (wasm32 only)

use std::collections::HashMap;

/// Storage backend failure
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("storage i/o failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage backend rejected write for key '{0}'")]
    Rejected(String),
}

/// Minimal string blob storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn has(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }

    /// Remove the key; deleting a missing key is not an error
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value (e.g. a legacy save) before handing the store over
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.contains_key(key))
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{KeyValueStore, StorageError};

    /// Directory-backed storage; readers see either the old or the new file
    #[derive(Debug, Clone)]
    pub struct FileStore {
        root: PathBuf,
    }

    impl FileStore {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        pub fn root(&self) -> &Path {
            &self.root
        }

        fn path_for(&self, key: &str) -> PathBuf {
            self.root.join(format!("{key}.json"))
        }

        fn io_error(key: &str, source: std::io::Error) -> StorageError {
            StorageError::Io {
                key: key.to_string(),
                source,
            }
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(Self::io_error(key, e)),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            fs::create_dir_all(&self.root).map_err(|e| Self::io_error(key, e))?;

            let target = self.path_for(key);
            let tmp = target.with_extension("json.tmp");
            fs::write(&tmp, value).map_err(|e| Self::io_error(key, e))?;
            fs::rename(&tmp, &target).map_err(|e| Self::io_error(key, e))
        }

        fn has(&self, key: &str) -> Result<bool, StorageError> {
            Ok(self.path_for(key).is_file())
        }

        fn delete(&mut self, key: &str) -> Result<(), StorageError> {
            match fs::remove_file(self.path_for(key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(Self::io_error(key, e)),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, StorageError};

    /// Browser LocalStorage backend
    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        pub fn open() -> Result<Self, StorageError> {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StorageError::Unavailable)?;
            Ok(Self { storage })
        }
    }

    impl KeyValueStore for LocalStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage
                .get_item(key)
                .map_err(|_| StorageError::Unavailable)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            // Quota errors surface here
            self.storage
                .set_item(key, value)
                .map_err(|_| StorageError::Rejected(key.to_string()))
        }

        fn delete(&mut self, key: &str) -> Result<(), StorageError> {
            self.storage
                .remove_item(key)
                .map_err(|_| StorageError::Unavailable)
        }
    }
}
