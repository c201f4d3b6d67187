// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Storage port for raw string-keyed blobs (browser `localStorage`, files, fakes).

use thiserror::Error;

/// Storage port for raw blobs keyed by logical name.
pub trait KvStore {
    /// Load a raw blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    /// Persist a raw blob, replacing any previous value.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;
    /// Delete a blob. Deleting a missing key succeeds.
    fn remove_raw(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).save_raw(key, data)
    }

    fn remove_raw(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_raw(key)
    }
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).save_raw(key, data)
    }

    fn remove_raw(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_raw(key)
    }
}

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Stored value does not have the expected list shape.
    #[error("corrupted value under `{key}`: {source}")]
    Corrupted {
        /// Key holding the bad value.
        key: String,
        /// Parse failure.
        source: serde_json::Error,
    },
    /// Record cannot be stored as-is.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    /// Backing store cannot be reached (no window, storage disabled, quota).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}
