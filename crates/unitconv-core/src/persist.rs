// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded, most-recent-first history and favorites lists over a [`KvStore`].
//!
//! The store is the single source of truth: every call reads the persisted
//! list, applies its change, and writes the list back. Nothing is cached.
//!
//! The plain methods (`save_history`, `get_favorites`, ...) never fail: storage
//! problems are logged and swallowed, and a corrupted list (a value that is not
//! a JSON array) is deleted and read back as empty. Each has a `try_` twin that
//! reports the failure instead. Single entries that do not parse are skipped
//! with a warning.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::record::{ConversionRecord, FavoritePair};
use crate::store::{KvStore, StoreError};

/// Storage keys and list capacities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageLayout {
    /// Key holding the JSON array of [`ConversionRecord`].
    pub history_key: String,
    /// Key holding the JSON array of [`FavoritePair`].
    pub favorites_key: String,
    /// Maximum number of history entries kept.
    pub history_capacity: usize,
    /// Maximum number of favorites kept.
    pub favorites_capacity: usize,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            history_key: "unitConverter_history".to_string(),
            favorites_key: "unitConverter_favorites".to_string(),
            history_capacity: 10,
            favorites_capacity: 5,
        }
    }
}

impl StorageLayout {
    /// Clamp capacities to at least one entry.
    pub fn validate(&mut self) {
        self.history_capacity = self.history_capacity.max(1);
        self.favorites_capacity = self.favorites_capacity.max(1);
    }
}

/// Insert at the head and evict from the tail down to `capacity`.
fn push_bounded<T>(list: &mut Vec<T>, item: T, capacity: usize) {
    list.insert(0, item);
    list.truncate(capacity);
}

/// History and favorites persistence over a key-value store.
pub struct Persistence<S> {
    store: S,
    layout: StorageLayout,
}

impl<S> Persistence<S> {
    /// Create a service with the default layout.
    pub fn new(store: S) -> Self {
        Self::with_layout(store, StorageLayout::default())
    }

    /// Create a service with a custom layout (capacities are validated).
    pub fn with_layout(store: S, mut layout: StorageLayout) -> Self {
        layout.validate();
        Self { store, layout }
    }

    /// Active layout.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> Persistence<S>
where
    S: KvStore,
{
    /// Load `key` as a list. Only a value that is not a JSON array counts as
    /// corrupted; individual entries that do not parse are skipped.
    fn read_list<T>(&self, key: &str) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let entries: Vec<serde_json::Value> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupted {
                key: key.to_string(),
                source,
            })?;
        let list: Vec<T> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(key = %key, index, error = %e, "skipping unreadable entry");
                    None
                }
            })
            .collect();
        Ok(list)
    }

    /// Read for a read-modify-write cycle: a corrupted value is replaced.
    fn read_for_update<T>(&self, key: &str) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        match self.read_list(key) {
            Err(StoreError::Corrupted { key, source }) => {
                debug!(key = %key, error = %source, "overwriting corrupted list");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn write_list<T>(&self, key: &str, list: &[T]) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec(list)?;
        self.store.save_raw(key, &data)?;
        debug!(key = %key, entries = list.len(), "persisted list");
        Ok(())
    }

    /// Self-healing read: corrupted values are deleted, every failure reads as empty.
    fn read_or_empty<T>(&self, key: &str) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        match self.read_list(key) {
            Ok(list) => list,
            Err(err @ StoreError::Corrupted { .. }) => {
                warn!(key = %key, error = %err, "discarding corrupted list");
                if let Err(e) = self.store.remove_raw(key) {
                    warn!(key = %key, error = %e, "failed to remove corrupted list");
                }
                Vec::new()
            }
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read list");
                Vec::new()
            }
        }
    }

    // ==================== history ====================

    /// Prepend `record` to the history, evicting the oldest past capacity.
    ///
    /// Records holding a non-finite number are refused: JSON has no encoding
    /// for them.
    pub fn try_save_history(&self, record: &ConversionRecord) -> Result<(), StoreError> {
        if !(record.input_value.is_finite() && record.result.is_finite()) {
            return Err(StoreError::InvalidRecord(format!(
                "non-finite value in {} {} -> {}",
                record.category, record.from_unit, record.to_unit
            )));
        }
        let key = &self.layout.history_key;
        let mut history: Vec<ConversionRecord> = self.read_for_update(key)?;
        push_bounded(&mut history, record.clone(), self.layout.history_capacity);
        self.write_list(key, &history)
    }

    /// [`try_save_history`](Self::try_save_history), logging and dropping failures.
    pub fn save_history(&self, record: &ConversionRecord) {
        if let Err(e) = self.try_save_history(record) {
            warn!(key = %self.layout.history_key, error = %e, "error saving history");
        }
    }

    /// History, most recent first. Reports a corrupted value without removing it.
    pub fn try_get_history(&self) -> Result<Vec<ConversionRecord>, StoreError> {
        self.read_list(&self.layout.history_key)
    }

    /// History, most recent first; empty when missing, unreadable, or corrupted.
    pub fn get_history(&self) -> Vec<ConversionRecord> {
        self.read_or_empty(&self.layout.history_key)
    }

    /// Delete the whole history. Clearing an empty history succeeds.
    pub fn try_clear_history(&self) -> Result<(), StoreError> {
        self.store.remove_raw(&self.layout.history_key)
    }

    /// [`try_clear_history`](Self::try_clear_history), logging and dropping failures.
    pub fn clear_history(&self) {
        if let Err(e) = self.try_clear_history() {
            warn!(key = %self.layout.history_key, error = %e, "error clearing history");
        }
    }

    // ==================== favorites ====================

    /// Prepend `pair` unless the same triple is already stored.
    ///
    /// Returns `Ok(false)` (and writes nothing) for a duplicate.
    pub fn try_save_favorite(&self, pair: &FavoritePair) -> Result<bool, StoreError> {
        let key = &self.layout.favorites_key;
        let mut favorites: Vec<FavoritePair> = self.read_for_update(key)?;
        if favorites.iter().any(|f| f == pair) {
            return Ok(false);
        }
        push_bounded(&mut favorites, pair.clone(), self.layout.favorites_capacity);
        self.write_list(key, &favorites)?;
        Ok(true)
    }

    /// [`try_save_favorite`](Self::try_save_favorite), logging and dropping failures.
    pub fn save_favorite(&self, pair: &FavoritePair) {
        if let Err(e) = self.try_save_favorite(pair) {
            warn!(key = %self.layout.favorites_key, error = %e, "error saving favorite");
        }
    }

    /// Favorites, most recent first. Reports a corrupted value without removing it.
    pub fn try_get_favorites(&self) -> Result<Vec<FavoritePair>, StoreError> {
        self.read_list(&self.layout.favorites_key)
    }

    /// Favorites, most recent first; empty when missing, unreadable, or corrupted.
    pub fn get_favorites(&self) -> Vec<FavoritePair> {
        self.read_or_empty(&self.layout.favorites_key)
    }

    /// Drop every entry matching `pair` and persist the rest.
    pub fn try_remove_favorite(&self, pair: &FavoritePair) -> Result<(), StoreError> {
        let key = &self.layout.favorites_key;
        let mut favorites: Vec<FavoritePair> = self.read_for_update(key)?;
        favorites.retain(|f| f != pair);
        self.write_list(key, &favorites)
    }

    /// [`try_remove_favorite`](Self::try_remove_favorite), logging and dropping failures.
    pub fn remove_favorite(&self, pair: &FavoritePair) {
        if let Err(e) = self.try_remove_favorite(pair) {
            warn!(key = %self.layout.favorites_key, error = %e, "error removing favorite");
        }
    }

    /// True iff `pair` is stored.
    pub fn is_favorite(&self, pair: &FavoritePair) -> bool {
        self.get_favorites().iter().any(|f| f == pair)
    }

    /// Remove `pair` if stored, add it otherwise. Returns whether it is a
    /// favorite afterwards.
    pub fn toggle_favorite(&self, pair: &FavoritePair) -> bool {
        if self.is_favorite(pair) {
            self.remove_favorite(pair);
            false
        } else {
            self.save_favorite(pair);
            true
        }
    }

    /// Remove both lists from the store.
    pub fn wipe(&self) -> Result<(), StoreError> {
        self.store.remove_raw(&self.layout.history_key)?;
        self.store.remove_raw(&self.layout.favorites_key)
    }
}
