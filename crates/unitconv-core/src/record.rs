// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Records handed from the engine to the persistence store.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::category::ConversionCategory;
use crate::convert::{convert, ConversionError};

/// One successful conversion, as kept in the history list.
///
/// Entries written by the older widget carry no `category`; it is inferred
/// from the unit pair on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredRecord")]
pub struct ConversionRecord {
    /// Category the conversion ran in.
    pub category: ConversionCategory,
    /// Value the user entered.
    #[serde(rename = "value")]
    pub input_value: f64,
    /// Source unit code.
    pub from_unit: String,
    /// Target unit code.
    pub to_unit: String,
    /// Rounded result.
    pub result: f64,
    /// Creation time, milliseconds since the Unix epoch.
    #[serde(rename = "timestamp")]
    pub created_at: u64,
}

/// On-disk shape of a history entry, as accepted on read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    #[serde(default)]
    category: Option<ConversionCategory>,
    value: f64,
    from_unit: String,
    to_unit: String,
    result: f64,
    #[serde(alias = "createdAt")]
    timestamp: u64,
}

impl TryFrom<StoredRecord> for ConversionRecord {
    type Error = String;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        let category = match stored.category {
            Some(category) => category,
            None => ConversionCategory::ALL
                .into_iter()
                .find(|c| c.has_unit(&stored.from_unit) && c.has_unit(&stored.to_unit))
                .ok_or_else(|| {
                    format!(
                        "no category has units `{}` and `{}`",
                        stored.from_unit, stored.to_unit
                    )
                })?,
        };
        Ok(Self {
            category,
            input_value: stored.value,
            from_unit: stored.from_unit,
            to_unit: stored.to_unit,
            result: stored.result,
            created_at: stored.timestamp,
        })
    }
}

impl ConversionRecord {
    /// Build a record from its parts.
    pub fn new(
        category: ConversionCategory,
        input_value: f64,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
        result: f64,
        created_at: u64,
    ) -> Self {
        Self {
            category,
            input_value,
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            result,
            created_at,
        }
    }

    /// Run a conversion and stamp the successful outcome with `created_at`.
    pub fn from_conversion(
        category: ConversionCategory,
        value: f64,
        from: &str,
        to: &str,
        created_at: u64,
    ) -> Result<Self, ConversionError> {
        let result = convert(category, value, from, to)?;
        Ok(Self::new(category, value, from, to, result, created_at))
    }

    /// The unit pair this record converted between.
    pub fn pair(&self) -> FavoritePair {
        FavoritePair::new(self.category, &self.from_unit, &self.to_unit)
    }
}

/// Milliseconds since the Unix epoch from the system clock (0 if the clock is
/// before the epoch).
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// A reusable unit pair. Equality is the dedup triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePair {
    /// Category of both units.
    pub category: ConversionCategory,
    /// Source unit code.
    pub from_unit: String,
    /// Target unit code.
    pub to_unit: String,
}

impl FavoritePair {
    /// Build a pair.
    pub fn new(
        category: ConversionCategory,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
    ) -> Self {
        Self {
            category,
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
        }
    }
}
