// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `KvStore` over the browser's `window.localStorage`.

use unitconv_core::store::{KvStore, StoreError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

fn js_error(context: &str, err: &JsValue) -> StoreError {
    StoreError::Unavailable(format!("{context}: {err:?}"))
}

/// Stores each key as a UTF-8 string item in `localStorage`.
pub struct LocalStorageKvStore {
    storage: Storage,
}

impl LocalStorageKvStore {
    /// Wrap the current window's `localStorage`.
    pub fn from_window() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| js_error("localStorage access denied", &e))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KvStore for LocalStorageKvStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| js_error("getItem failed", &e))?
            .map(String::into_bytes)
            .ok_or(StoreError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let text = std::str::from_utf8(data).map_err(|e| StoreError::Other(e.to_string()))?;
        // Quota errors surface here.
        self.storage
            .set_item(key, text)
            .map_err(|e| js_error("setItem failed", &e))
    }

    fn remove_raw(&self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| js_error("removeItem failed", &e))
    }
}
