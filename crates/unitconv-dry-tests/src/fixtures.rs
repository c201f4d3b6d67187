// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Small builders for records used across test suites.

use unitconv_core::{ConversionCategory, ConversionRecord, FavoritePair};

/// A km → mi history record for `value`, stamped with `value` as its timestamp.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn history_record(value: f64) -> ConversionRecord {
    ConversionRecord::new(
        ConversionCategory::Length,
        value,
        "km",
        "mi",
        value * 0.6214,
        // Whole-number test values only.
        value.max(0.0) as u64,
    )
}

/// A favorite pair from string parts.
pub fn favorite(category: ConversionCategory, from: &str, to: &str) -> FavoritePair {
    FavoritePair::new(category, from, to)
}
