// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Conversion engine: input validation, base-unit conversion, and rounding.
//!
//! Every entry point validates its input before touching arithmetic. Results
//! are rounded once, to four decimal places, after the full conversion.

use thiserror::Error;

use crate::category::ConversionCategory;

/// Length factors to the metre.
const LENGTH_TO_METER: [(&str, f64); 4] = [
    ("m", 1.0),
    ("km", 1000.0),
    ("ft", 0.3048),
    ("mi", 1609.344),
];

/// Weight factors to the kilogram.
const WEIGHT_TO_KG: [(&str, f64); 2] = [("kg", 1.0), ("lb", 0.45359237)];

const ROUNDING_FACTOR: f64 = 10_000.0;

/// Failure of a conversion request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The value is missing, blank, not numeric, or not finite.
    #[error("Please enter a valid number")]
    InvalidInput,
    /// A unit code is outside the category's unit set.
    #[error("Conversion error: unknown {category} unit `{unit}`")]
    UnknownUnit {
        /// Category the unit was looked up in.
        category: ConversionCategory,
        /// The offending code.
        unit: String,
    },
    /// The input is finite but the converted value does not fit in an `f64`.
    #[error("Conversion error: result out of range")]
    OutOfRange,
}

impl ConversionError {
    /// Generic text shown to the user for this failure.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput => "Please enter a valid number",
            Self::UnknownUnit { .. } | Self::OutOfRange => "Conversion error",
        }
    }
}

/// A raw input value as handed over by a presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    /// No value at all (`null`/`undefined` on the JS side).
    Missing,
    /// An already numeric value.
    Number(f64),
    /// Text typed by the user.
    Text(&'a str),
}

impl RawValue<'_> {
    /// Parse and validate into a finite `f64`.
    ///
    /// Text is trimmed first; blank text, unparsable text, NaN, and infinities
    /// are all rejected with [`ConversionError::InvalidInput`].
    pub fn parse(self) -> Result<f64, ConversionError> {
        let value = match self {
            Self::Missing => return Err(ConversionError::InvalidInput),
            Self::Number(v) => v,
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(ConversionError::InvalidInput);
                }
                text.parse::<f64>()
                    .map_err(|_| ConversionError::InvalidInput)?
            }
        };
        ensure_finite(value)
    }
}

impl From<f64> for RawValue<'_> {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<Option<&'a str>> for RawValue<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(Self::Missing, Self::Text)
    }
}

/// True when `raw` is a present, non-blank, finite number.
pub fn is_valid_number<'a>(raw: impl Into<RawValue<'a>>) -> bool {
    raw.into().parse().is_ok()
}

fn ensure_finite(value: f64) -> Result<f64, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::InvalidInput)
    }
}

/// Round to four decimal places, halves away from zero.
///
/// Magnitudes too large to scale by 10^4 have no fractional digits left and
/// are returned unchanged.
pub fn round_to_4(value: f64) -> f64 {
    let scaled = value * ROUNDING_FACTOR;
    if scaled.is_finite() {
        scaled.round() / ROUNDING_FACTOR
    } else {
        value
    }
}

/// Round a converted value, rejecting overflow to infinity.
fn finish(result: f64) -> Result<f64, ConversionError> {
    if result.is_finite() {
        Ok(round_to_4(result))
    } else {
        Err(ConversionError::OutOfRange)
    }
}

fn factor(
    table: &[(&str, f64)],
    category: ConversionCategory,
    unit: &str,
) -> Result<f64, ConversionError> {
    table
        .iter()
        .find(|(code, _)| *code == unit)
        .map(|(_, f)| *f)
        .ok_or_else(|| ConversionError::UnknownUnit {
            category,
            unit: unit.to_string(),
        })
}

fn convert_through_base(
    table: &[(&str, f64)],
    category: ConversionCategory,
    value: f64,
    from: &str,
    to: &str,
) -> Result<f64, ConversionError> {
    let value = ensure_finite(value)?;
    let from_factor = factor(table, category, from)?;
    let to_factor = factor(table, category, to)?;
    let mut result = value * from_factor / to_factor;
    if !result.is_finite() {
        // Only the intermediate overflowed; divide first.
        result = value / to_factor * from_factor;
    }
    finish(result)
}

/// Convert between `m`, `km`, `ft`, and `mi`.
pub fn convert_length(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    convert_through_base(&LENGTH_TO_METER, ConversionCategory::Length, value, from, to)
}

/// Convert between `kg` and `lb`.
pub fn convert_weight(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    convert_through_base(&WEIGHT_TO_KG, ConversionCategory::Weight, value, from, to)
}

/// Convert between `C`, `F`, and `K`, going through Celsius.
pub fn convert_temperature(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    let value = ensure_finite(value)?;
    let unknown = |unit: &str| ConversionError::UnknownUnit {
        category: ConversionCategory::Temperature,
        unit: unit.to_string(),
    };

    let celsius = match from {
        "C" => value,
        "F" => (value - 32.0) * 5.0 / 9.0,
        "K" => value - 273.15,
        other => return Err(unknown(other)),
    };
    let result = match to {
        "C" => celsius,
        "F" => celsius * 9.0 / 5.0 + 32.0,
        "K" => celsius + 273.15,
        other => return Err(unknown(other)),
    };
    finish(result)
}

/// Convert `value` within `category`.
pub fn convert(
    category: ConversionCategory,
    value: f64,
    from: &str,
    to: &str,
) -> Result<f64, ConversionError> {
    match category {
        ConversionCategory::Length => convert_length(value, from, to),
        ConversionCategory::Weight => convert_weight(value, from, to),
        ConversionCategory::Temperature => convert_temperature(value, from, to),
    }
}

/// Parse `raw` and convert it within `category`.
pub fn convert_raw<'a>(
    category: ConversionCategory,
    raw: impl Into<RawValue<'a>>,
    from: &str,
    to: &str,
) -> Result<f64, ConversionError> {
    let value = raw.into().parse()?;
    convert(category, value, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_known_values() {
        assert_eq!(convert_length(100.0, "km", "mi"), Ok(62.1371));
        assert_eq!(convert_length(1.0, "mi", "km"), Ok(1.6093));
        assert_eq!(convert_length(1.0, "km", "m"), Ok(1000.0));
        assert_eq!(convert_length(1.0, "m", "ft"), Ok(3.2808));
        assert_eq!(convert_length(1.0, "ft", "m"), Ok(0.3048));
        assert_eq!(convert_length(1_000_000.0, "m", "km"), Ok(1000.0));
        assert_eq!(convert_length(0.0, "km", "mi"), Ok(0.0));
    }

    #[test]
    fn weight_known_values() {
        assert_eq!(convert_weight(1.0, "kg", "lb"), Ok(2.2046));
        assert_eq!(convert_weight(1.0, "lb", "kg"), Ok(0.4536));
        assert_eq!(convert_weight(0.5, "kg", "lb"), Ok(1.1023));
        assert_eq!(convert_weight(10.0, "kg", "kg"), Ok(10.0));
    }

    #[test]
    fn temperature_fixed_points() {
        assert_eq!(convert_temperature(0.0, "C", "F"), Ok(32.0));
        assert_eq!(convert_temperature(0.0, "C", "K"), Ok(273.15));
        assert_eq!(convert_temperature(32.0, "F", "C"), Ok(0.0));
        assert_eq!(convert_temperature(100.0, "C", "F"), Ok(212.0));
        assert_eq!(convert_temperature(273.15, "K", "C"), Ok(0.0));
        assert_eq!(convert_temperature(-10.0, "C", "F"), Ok(14.0));
        assert_eq!(convert_temperature(25.0, "C", "C"), Ok(25.0));
    }

    #[test]
    fn unknown_units_fail_instead_of_defaulting() {
        assert_eq!(
            convert_length(1.0, "yd", "m"),
            Err(ConversionError::UnknownUnit {
                category: ConversionCategory::Length,
                unit: "yd".into(),
            })
        );
        assert!(matches!(
            convert_weight(1.0, "kg", "oz"),
            Err(ConversionError::UnknownUnit { .. })
        ));
        assert!(matches!(
            convert_temperature(1.0, "c", "F"),
            Err(ConversionError::UnknownUnit { .. })
        ));
        assert!(matches!(
            convert(ConversionCategory::Weight, 1.0, "m", "km"),
            Err(ConversionError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn non_finite_values_are_invalid_input() {
        assert_eq!(convert_length(f64::NAN, "m", "km"), Err(ConversionError::InvalidInput));
        assert_eq!(
            convert_temperature(f64::INFINITY, "C", "F"),
            Err(ConversionError::InvalidInput)
        );
        // Input validation wins over unit validation.
        assert_eq!(
            convert_weight(f64::NEG_INFINITY, "oz", "lb"),
            Err(ConversionError::InvalidInput)
        );
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 1/32 scales to an exact half.
        assert_eq!(round_to_4(0.03125), 0.0313);
        assert_eq!(round_to_4(-0.03125), -0.0313);
        assert_eq!(round_to_4(2.0), 2.0);
    }

    #[test]
    fn huge_values_round_to_themselves() {
        assert_eq!(round_to_4(1e305), 1e305);
        assert_eq!(round_to_4(-f64::MAX), -f64::MAX);
        assert_eq!(convert_length(1e305, "m", "m"), Ok(1e305));
        assert_eq!(convert_weight(f64::MAX, "kg", "kg"), Ok(f64::MAX));
    }

    #[test]
    fn overflowing_results_are_out_of_range() {
        assert_eq!(convert_length(f64::MAX, "mi", "m"), Err(ConversionError::OutOfRange));
        assert_eq!(convert_weight(f64::MAX, "kg", "lb"), Err(ConversionError::OutOfRange));
        assert_eq!(
            convert_temperature(f64::MAX, "C", "F"),
            Err(ConversionError::OutOfRange)
        );
        assert_eq!(ConversionError::OutOfRange.user_message(), "Conversion error");
    }

    #[test]
    fn overflowing_intermediate_still_converts() {
        // 1e306 km is 1e309 m, but only ~6.2e305 mi.
        let miles = convert_length(1e306, "km", "mi").unwrap();
        assert!(miles.is_finite());
        assert!((miles / 6.213_711_922_373_34e305 - 1.0).abs() < 1e-12);
        let metres = convert_length(1e305, "mi", "m").unwrap();
        assert!((metres / 1.609_344e308 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn validation_rules() {
        assert!(is_valid_number(42.0));
        assert!(is_valid_number(0.0));
        assert!(is_valid_number(-5.0));
        assert!(is_valid_number(2.75));
        assert!(is_valid_number("  -12.5 "));
        assert!(is_valid_number("1e3"));

        assert!(!is_valid_number("abc"));
        assert!(!is_valid_number(""));
        assert!(!is_valid_number("   "));
        assert!(!is_valid_number(None::<&str>));
        assert!(!is_valid_number(RawValue::Missing));
        assert!(!is_valid_number(f64::NAN));
        assert!(!is_valid_number(f64::INFINITY));
        assert!(!is_valid_number("NaN"));
        assert!(!is_valid_number("inf"));
    }

    #[test]
    fn convert_raw_parses_text_first() {
        assert_eq!(
            convert_raw(ConversionCategory::Length, " 1 ", "km", "m"),
            Ok(1000.0)
        );
        assert_eq!(
            convert_raw(ConversionCategory::Length, "one", "zz", "m"),
            Err(ConversionError::InvalidInput)
        );
    }

    #[test]
    fn user_messages_are_generic() {
        assert_eq!(
            ConversionError::InvalidInput.user_message(),
            "Please enter a valid number"
        );
        let err = ConversionError::UnknownUnit {
            category: ConversionCategory::Temperature,
            unit: "R".into(),
        };
        assert_eq!(err.user_message(), "Conversion error");
        assert!(err.to_string().contains("`R`"));
    }
}
