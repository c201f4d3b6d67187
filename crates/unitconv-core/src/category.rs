// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Conversion categories and the unit catalogue offered for each one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Family of units that can be converted between each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionCategory {
    /// Distances, routed through the metre.
    Length,
    /// Masses, routed through the kilogram.
    Weight,
    /// Temperatures, routed through degrees Celsius.
    Temperature,
}

impl ConversionCategory {
    /// Every category, in tab order.
    pub const ALL: [Self; 3] = [Self::Length, Self::Weight, Self::Temperature];

    /// Lowercase name used in storage and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Weight => "weight",
            Self::Temperature => "temperature",
        }
    }

    /// True when `code` names a unit of this category (case-sensitive).
    pub fn has_unit(self, code: &str) -> bool {
        units_for(self).iter().any(|u| u.code == code)
    }
}

impl fmt::Display for ConversionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown conversion category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for ConversionCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(Self::Length),
            "weight" => Ok(Self::Weight),
            "temperature" => Ok(Self::Temperature),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A selectable unit: its symbolic code and a human label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitOption {
    /// Symbolic code accepted by the engine (e.g. `km`).
    pub code: &'static str,
    /// Label for pickers (e.g. `kilometer (km)`).
    pub label: &'static str,
}

const LENGTH_UNITS: [UnitOption; 4] = [
    UnitOption { code: "m", label: "meter (m)" },
    UnitOption { code: "km", label: "kilometer (km)" },
    UnitOption { code: "ft", label: "feet (ft)" },
    UnitOption { code: "mi", label: "mile (mi)" },
];

const WEIGHT_UNITS: [UnitOption; 2] = [
    UnitOption { code: "kg", label: "kilogram (kg)" },
    UnitOption { code: "lb", label: "pound (lb)" },
];

const TEMPERATURE_UNITS: [UnitOption; 3] = [
    UnitOption { code: "C", label: "Celsius (°C)" },
    UnitOption { code: "F", label: "Fahrenheit (°F)" },
    UnitOption { code: "K", label: "Kelvin (K)" },
];

/// Units offered for `category`, in picker order.
pub fn units_for(category: ConversionCategory) -> &'static [UnitOption] {
    match category {
        ConversionCategory::Length => &LENGTH_UNITS,
        ConversionCategory::Weight => &WEIGHT_UNITS,
        ConversionCategory::Temperature => &TEMPERATURE_UNITS,
    }
}

/// Initial (from, to) selection for a category: first and second unit.
pub fn default_pair(category: ConversionCategory) -> (&'static str, &'static str) {
    let units = units_for(category);
    let from = units[0].code;
    let to = units.get(1).map_or(from, |u| u.code);
    (from, to)
}
