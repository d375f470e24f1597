//! Persistent store adapter.
//!
//! Everything the storefront remembers between runs goes through a
//! [`KeyValueStore`]: string keys mapped to serialized JSON text. The
//! [`Storage`] handle wraps a backend and owns the JSON encoding, and it is
//! deliberately forgiving on the read side: a missing key, a backend read
//! failure, or text that is not valid JSON all read back as "no prior state".
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process map, used by tests and throwaway sessions
//! - [`FileStore`] - one `<key>.json` file per key in a data directory

pub mod file;
pub mod memory;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key contains characters the backend cannot represent.
    #[error("invalid store key: {0}")]
    InvalidKey(String),
}

/// A string-keyed store of serialized values.
///
/// Implementations know nothing about what the values mean.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Make previous writes durable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be synced.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// JSON-encoding handle over a shared backend.
///
/// Cheap to clone; every repository holds one.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
}

impl Storage {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Wrap a backend the caller keeps a handle to (e.g. to inspect it in tests).
    #[must_use]
    pub fn shared(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Read and parse the value stored under `key`.
    ///
    /// Returns `None` when the key is absent, the backend fails, or the
    /// stored text is not valid JSON. Failures are logged, never returned.
    #[must_use]
    pub fn load_json(&self, key: &str) -> Option<serde_json::Value> {
        let raw = match self.backend.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value, using defaults");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is not valid JSON, using defaults");
                None
            }
        }
    }

    /// Read the value stored under `key` as a `T`.
    ///
    /// A value that parses as JSON but has the wrong shape for `T` is
    /// treated like a missing one.
    #[must_use]
    pub fn load_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.load_json(key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value has an unexpected shape, using defaults");
                None
            }
        }
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if encoding or the backend write fails.
    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value)?;
        self.backend.save(key, &encoded)
    }

    /// Delete `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }

    /// Flush the backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be synced.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.backend.flush()
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
    }

    /// Backend whose reads always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }

        fn save(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let storage = Storage::new(MemoryStore::new());
        assert!(storage.load_json("nothing").is_none());
    }

    #[test]
    fn test_invalid_json_reads_as_none() {
        let storage = Storage::new(MemoryStore::with_entries([("k", "{not json")]));
        assert!(storage.load_json("k").is_none());
    }

    #[test]
    fn test_wrong_shape_reads_as_none() {
        let storage = Storage::new(MemoryStore::with_entries([("k", "[1, 2, 3]")]));
        assert!(storage.load_json("k").is_some());
        assert!(storage.load_as::<Sample>("k").is_none());
    }

    #[test]
    fn test_backend_read_failure_reads_as_none() {
        let storage = Storage::new(BrokenStore);
        assert!(storage.load_json("k").is_none());
    }

    #[test]
    fn test_backend_write_failure_is_reported() {
        let storage = Storage::new(BrokenStore);
        let result = storage.save_json("k", &Sample { name: "x".into() });
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn test_save_then_load() {
        let storage = Storage::new(MemoryStore::new());
        let sample = Sample {
            name: "lamp".into(),
        };
        storage.save_json("k", &sample).unwrap();
        assert_eq!(storage.load_as::<Sample>("k"), Some(sample));

        storage.remove("k").unwrap();
        assert!(storage.load_json("k").is_none());
    }
}
