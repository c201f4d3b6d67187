// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Human-readable formula descriptions for ordered unit pairs.

use std::borrow::Cow;

use crate::category::ConversionCategory;

type FormulaTable = [((&'static str, &'static str), &'static str)];

const LENGTH_FORMULAS: [((&str, &str), &str); 12] = [
    (("m", "km"), "1 m = 0.001 km"),
    (("km", "m"), "1 km = 1,000 m"),
    (("m", "ft"), "1 m = 3.2808 ft"),
    (("ft", "m"), "1 ft = 0.3048 m"),
    (("m", "mi"), "1 m = 0.000621 mi"),
    (("mi", "m"), "1 mi = 1,609.344 m"),
    (("km", "mi"), "1 km = 0.6214 mi"),
    (("mi", "km"), "1 mi = 1.6093 km"),
    (("km", "ft"), "1 km = 3,280.84 ft"),
    (("ft", "km"), "1 ft = 0.000305 km"),
    (("ft", "mi"), "1 ft = 0.000189 mi"),
    (("mi", "ft"), "1 mi = 5,280 ft"),
];

const WEIGHT_FORMULAS: [((&str, &str), &str); 2] = [
    (("kg", "lb"), "1 kg = 2.2046 lb"),
    (("lb", "kg"), "1 lb = 0.4536 kg"),
];

const TEMPERATURE_FORMULAS: [((&str, &str), &str); 6] = [
    (("C", "F"), "°F = °C × 9/5 + 32"),
    (("F", "C"), "°C = (°F - 32) × 5/9"),
    (("C", "K"), "K = °C + 273.15"),
    (("K", "C"), "°C = K - 273.15"),
    (("F", "K"), "K = (°F - 32) × 5/9 + 273.15"),
    (("K", "F"), "°F = (K - 273.15) × 9/5 + 32"),
];

fn table(category: ConversionCategory) -> &'static FormulaTable {
    match category {
        ConversionCategory::Length => &LENGTH_FORMULAS,
        ConversionCategory::Weight => &WEIGHT_FORMULAS,
        ConversionCategory::Temperature => &TEMPERATURE_FORMULAS,
    }
}

/// Formula text for converting `from` into `to`.
///
/// Pairs without a canned entry (including identity pairs and unknown codes)
/// fall back to `"{from} → {to}"`.
pub fn formula_for(category: ConversionCategory, from: &str, to: &str) -> Cow<'static, str> {
    table(category)
        .iter()
        .find(|((f, t), _)| *f == from && *t == to)
        .map_or_else(
            || Cow::Owned(format!("{from} → {to}")),
            |(_, text)| Cow::Borrowed(*text),
        )
}
