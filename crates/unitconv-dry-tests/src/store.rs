// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory key-value store fake for testing without browser or filesystem I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use unitconv_core::store::{KvStore, StoreError};

/// In-memory implementation of [`KvStore`] for testing.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect or sabotage the store through another. Call counts are
/// tracked for verification.
///
/// # Example
///
/// ```
/// use unitconv_dry_tests::InMemoryKvStore;
/// use unitconv_core::Persistence;
///
/// let store = InMemoryKvStore::new();
/// let persistence = Persistence::new(store.clone());
///
/// assert!(persistence.get_history().is_empty());
/// assert_eq!(store.load_count(), 1);
/// assert_eq!(store.save_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryKvStore {
    inner: Arc<Mutex<InMemoryKvStoreInner>>,
}

#[derive(Default)]
struct InMemoryKvStoreInner {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    remove_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
    fail_on_remove: bool,
}

impl InMemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given key-value pairs.
    pub fn with_data(data: HashMap<String, Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryKvStoreInner {
                data,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryKvStoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Overwrite `key` with raw text, bypassing counters (e.g. to plant corrupted JSON).
    pub fn put_text(&self, key: &str, text: &str) {
        self.lock()
            .data
            .insert(key.to_string(), text.as_bytes().to_vec());
    }

    /// Stored value for `key` as UTF-8 text, bypassing counters.
    pub fn text(&self, key: &str) -> Option<String> {
        self.lock()
            .data
            .get(key)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Configure the store to fail on load operations.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Configure the store to fail on save operations.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// Configure the store to fail on remove operations.
    pub fn set_fail_on_remove(&self, fail: bool) {
        self.lock().fail_on_remove = fail;
    }

    /// Number of `load_raw` calls attempted, including failed ones.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// Number of `save_raw` calls attempted, including failed ones.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Number of `remove_raw` calls attempted, including failed ones.
    pub fn remove_count(&self) -> usize {
        self.lock().remove_count
    }

    /// Return all keys currently present in the store.
    pub fn keys(&self) -> Vec<String> {
        self.lock().data.keys().cloned().collect()
    }

    /// Check if a key exists in the store.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    /// Reset the store to its initial empty state (data, counters, and fail flags).
    pub fn reset(&self) {
        *self.lock() = InMemoryKvStoreInner::default();
    }
}

impl KvStore for InMemoryKvStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let mut inner = self.lock();
        inner.load_count += 1;

        if inner.fail_on_load {
            return Err(StoreError::Unavailable("simulated load failure".into()));
        }

        inner.data.get(key).cloned().ok_or(StoreError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.save_count += 1;

        if inner.fail_on_save {
            return Err(StoreError::Unavailable("simulated save failure".into()));
        }

        inner.data.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.remove_count += 1;

        if inner.fail_on_remove {
            return Err(StoreError::Unavailable("simulated remove failure".into()));
        }

        inner.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_save_load() {
        let store = InMemoryKvStore::new();
        store.save_raw("test", b"hello").unwrap();
        let loaded = store.load_raw("test").unwrap();
        assert_eq!(loaded, b"hello");
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn load_missing_key_returns_not_found() {
        let store = InMemoryKvStore::new();
        assert!(matches!(store.load_raw("missing"), Err(StoreError::NotFound)));
    }

    #[test]
    fn remove_missing_key_succeeds() {
        let store = InMemoryKvStore::new();
        store.remove_raw("missing").unwrap();
        assert_eq!(store.remove_count(), 1);
    }

    #[test]
    fn remove_deletes_value() {
        let store = InMemoryKvStore::new();
        store.save_raw("key", b"v").unwrap();
        store.remove_raw("key").unwrap();
        assert!(!store.contains_key("key"));
    }

    #[test]
    fn fail_flags_return_errors_and_still_count() {
        let store = InMemoryKvStore::new();
        store.set_fail_on_load(true);
        store.set_fail_on_save(true);
        store.set_fail_on_remove(true);

        assert!(matches!(store.load_raw("k"), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.save_raw("k", b"v"), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.remove_raw("k"), Err(StoreError::Unavailable(_))));

        assert_eq!(store.load_count(), 1);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.remove_count(), 1);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn fail_on_remove_keeps_value() {
        let store = InMemoryKvStore::new();
        store.save_raw("key", b"v").unwrap();
        store.set_fail_on_remove(true);
        let _ = store.remove_raw("key");
        assert!(store.contains_key("key"));
    }

    #[test]
    fn with_data_prepopulates_store() {
        let mut initial = HashMap::new();
        initial.insert("key1".to_string(), b"value1".to_vec());
        let store = InMemoryKvStore::with_data(initial);

        assert_eq!(store.load_raw("key1").unwrap(), b"value1");
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn put_text_and_text_bypass_counters() {
        let store = InMemoryKvStore::new();
        store.put_text("k", "invalid json{{{");
        assert_eq!(store.text("k").as_deref(), Some("invalid json{{{"));
        assert_eq!(store.load_count(), 0);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn clone_shares_state_and_reset() {
        let store1 = InMemoryKvStore::new();
        let store2 = store1.clone();

        store1.save_raw("shared", b"value").unwrap();
        assert_eq!(store2.load_raw("shared").unwrap(), b"value");

        store1.set_fail_on_save(true);
        store2.reset();

        assert!(store1.keys().is_empty());
        assert_eq!(store1.save_count(), 0);
        store1.save_raw("again", b"ok").unwrap();
    }
}
