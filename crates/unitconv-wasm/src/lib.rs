// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Browser bindings for the unit converter widget.
//!
//! [`ConverterWidget`] is the functional surface a page calls into: convert,
//! validate, formula lookup, and history/favorites management. With the
//! `wasm` feature it is exported through `wasm-bindgen` and persists to
//! `window.localStorage`; without it, the same type runs natively over any
//! [`KvStore`] (which is how it is tested).
#![deny(missing_docs)]

#[cfg(feature = "wasm")]
mod local_storage;

#[cfg(feature = "wasm")]
pub use local_storage::LocalStorageKvStore;

use tracing::debug;
use unitconv_core::{
    convert_raw, formula_for, is_valid_number, units_for, ConversionCategory, ConversionRecord,
    FavoritePair, KvStore, Persistence, RawValue,
};

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

fn parse_category(category: &str) -> Result<ConversionCategory, String> {
    category
        .parse::<ConversionCategory>()
        .map_err(|e| e.to_string())
}

/// Numbers stay numbers, strings are parsed later, anything else is missing.
#[cfg(feature = "wasm")]
fn raw_from_js<'a>(value: &JsValue, text: Option<&'a str>) -> RawValue<'a> {
    if let Some(n) = value.as_f64() {
        RawValue::Number(n)
    } else {
        text.map_or(RawValue::Missing, RawValue::Text)
    }
}

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn now() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(all(feature = "wasm", target_arch = "wasm32")))]
fn now() -> u64 {
    unitconv_core::now_millis()
}

/// Widget core: the conversion engine plus persistence over a boxed store.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
pub struct ConverterWidget {
    persistence: Persistence<Box<dyn KvStore>>,
}

impl ConverterWidget {
    /// Create a widget over any store (host use).
    pub fn with_store(store: Box<dyn KvStore>) -> Self {
        Self {
            persistence: Persistence::new(store),
        }
    }

    /// Prepend an already built record to the history (host use).
    pub fn save_history(&self, record: &ConversionRecord) {
        self.persistence.save_history(record);
    }

    /// History as typed records (host use).
    pub fn history(&self) -> Vec<ConversionRecord> {
        self.persistence.get_history()
    }

    /// Favorites as typed pairs (host use).
    pub fn favorites(&self) -> Vec<FavoritePair> {
        self.persistence.get_favorites()
    }

    /// Convert `raw` (text or number). Errors carry the user-facing message.
    pub fn convert<'a>(
        &self,
        category: &str,
        raw: impl Into<RawValue<'a>>,
        from: &str,
        to: &str,
    ) -> Result<f64, String> {
        let category = parse_category(category)?;
        convert_raw(category, raw, from, to).map_err(|e| e.user_message().to_string())
    }

    /// Convert `raw` and, on success, prepend the conversion to the history.
    pub fn convert_and_record<'a>(
        &self,
        category: &str,
        raw: impl Into<RawValue<'a>>,
        from: &str,
        to: &str,
    ) -> Result<f64, String> {
        let category = parse_category(category)?;
        let outcome = raw.into().parse().and_then(|value| {
            ConversionRecord::from_conversion(category, value, from, to, now())
        });
        match outcome {
            Ok(record) => {
                self.persistence.save_history(&record);
                Ok(record.result)
            }
            Err(e) => {
                debug!(error = %e, "conversion rejected");
                Err(e.user_message().to_string())
            }
        }
    }

    fn pair(category: &str, from: &str, to: &str) -> Result<FavoritePair, String> {
        Ok(FavoritePair::new(parse_category(category)?, from, to))
    }
}

#[cfg_attr(feature = "wasm", wasm_bindgen)]
impl ConverterWidget {
    /// True when `raw` is present, non-blank, and a finite number.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = isValidText))]
    pub fn is_valid_text(raw: Option<String>) -> bool {
        is_valid_number(raw.as_deref())
    }

    /// Formula description for an ordered unit pair.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = formulaFor))]
    pub fn formula_for(category: &str, from: &str, to: &str) -> Result<String, String> {
        Ok(formula_for(parse_category(category)?, from, to).into_owned())
    }

    /// Unit options for a category as a JSON array of `{code, label}`.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = unitsJson))]
    pub fn units_json(category: &str) -> Result<String, String> {
        let units = units_for(parse_category(category)?);
        serde_json::to_string(units).map_err(|e| e.to_string())
    }

    /// History as a JSON array, most recent first.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = historyJson))]
    pub fn history_json(&self) -> String {
        serde_json::to_string(&self.history()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Delete the whole history.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = clearHistory))]
    pub fn clear_history(&self) {
        self.persistence.clear_history();
    }

    /// Favorites as a JSON array, most recent first.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = favoritesJson))]
    pub fn favorites_json(&self) -> String {
        serde_json::to_string(&self.favorites()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Add a favorite pair; adding an existing pair is a no-op.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = saveFavorite))]
    pub fn save_favorite(&self, category: &str, from: &str, to: &str) -> Result<(), String> {
        self.persistence
            .save_favorite(&Self::pair(category, from, to)?);
        Ok(())
    }

    /// Remove a favorite pair.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = removeFavorite))]
    pub fn remove_favorite(&self, category: &str, from: &str, to: &str) -> Result<(), String> {
        self.persistence
            .remove_favorite(&Self::pair(category, from, to)?);
        Ok(())
    }

    /// True when the pair is a favorite.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = isFavorite))]
    pub fn is_favorite(&self, category: &str, from: &str, to: &str) -> Result<bool, String> {
        Ok(self.persistence.is_favorite(&Self::pair(category, from, to)?))
    }

    /// Flip a pair's favorite state; returns the new state.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = toggleFavorite))]
    pub fn toggle_favorite(&self, category: &str, from: &str, to: &str) -> Result<bool, String> {
        Ok(self
            .persistence
            .toggle_favorite(&Self::pair(category, from, to)?))
    }
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl ConverterWidget {
    /// Create a widget persisting to `window.localStorage`.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ConverterWidget, JsValue> {
        #[cfg(feature = "console-panic")]
        console_error_panic_hook::set_once();

        let store = LocalStorageKvStore::from_window().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_store(Box::new(store)))
    }

    /// Convert a JS number or numeric string.
    #[wasm_bindgen(js_name = convert)]
    pub fn convert_js(
        &self,
        category: &str,
        value: &JsValue,
        from: &str,
        to: &str,
    ) -> Result<f64, String> {
        let text = value.as_string();
        self.convert(category, raw_from_js(value, text.as_deref()), from, to)
    }

    /// Convert a JS number or numeric string and record it in the history.
    #[wasm_bindgen(js_name = convertAndRecord)]
    pub fn convert_and_record_js(
        &self,
        category: &str,
        value: &JsValue,
        from: &str,
        to: &str,
    ) -> Result<f64, String> {
        let text = value.as_string();
        self.convert_and_record(category, raw_from_js(value, text.as_deref()), from, to)
    }

    /// Validate a raw JS value: numbers and numeric strings pass; `null`,
    /// `undefined`, blank text, `NaN`, and infinities do not.
    #[wasm_bindgen(js_name = isValidNumber)]
    pub fn is_valid_number_js(raw: &JsValue) -> bool {
        let text = raw.as_string();
        is_valid_number(raw_from_js(raw, text.as_deref()))
    }

    /// Prepend a `{category, value, fromUnit, toUnit, result, timestamp}` object
    /// to the history.
    #[wasm_bindgen(js_name = saveHistory)]
    pub fn save_history_js(&self, record: JsValue) -> Result<(), JsValue> {
        let record: ConversionRecord = serde_wasm_bindgen::from_value(record)?;
        self.save_history(&record);
        Ok(())
    }

    /// History as an array of plain JS objects.
    #[wasm_bindgen(js_name = getHistory)]
    pub fn get_history(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.history()).map_err(JsValue::from)
    }

    /// Favorites as an array of plain JS objects.
    #[wasm_bindgen(js_name = getFavorites)]
    pub fn get_favorites(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.favorites()).map_err(JsValue::from)
    }
}
