use std::path::PathBuf;

use thiserror::Error;

pub mod file;
#[cfg(test)]
pub mod memory;
pub mod tasks;

/// Key holding the JSON array of tasks
pub const TASKS_KEY: &str = "todos";
/// Key holding the accent preference as a plain string
pub const ACCENT_KEY: &str = "accent";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove '{path}': {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize tasks to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },
}

/// Durable string key-value storage.
///
/// Every call is a single synchronous attempt; there are no retries.
pub trait Storage {
    /// Returns `None` when nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
