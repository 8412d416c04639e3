//! Unit types and conversion tables
//!
//! Provides the validated `Unit` value type, the conversion families and the
//! fixed ratio tables used when merging shopping list quantities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conversion family a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionFamily {
    /// Liquid and dry volume (teaspoon, cup, liter, ...)
    Volume,
    /// Mass (milligram, oz, kg, ...)
    Weight,
    /// Non-additive amounts ("to taste", "pinch", "dash")
    Seasoning,
    /// Not convertible; grouped for display only
    None,
}

impl ConversionFamily {
    /// Ratio table for the family, if it has one
    pub fn conversions(&self) -> Option<&'static [(&'static str, f64)]> {
        match self {
            ConversionFamily::Volume => Some(VOLUME_CONVERSIONS),
            ConversionFamily::Weight => Some(WEIGHT_CONVERSIONS),
            ConversionFamily::Seasoning | ConversionFamily::None => None,
        }
    }
}

// ============================================================================
// Conversion Tables (ratio relative to the family's base unit)
// ============================================================================

/// Volume ratios; teaspoon is the base unit
pub const VOLUME_CONVERSIONS: &[(&str, f64)] = &[
    ("teaspoon", 1.0),
    ("tablespoon", 3.0),
    ("fl oz", 6.0),
    ("cup", 48.0),
    ("pint", 96.0),
    ("quart", 192.0),
    ("gallon", 768.0),
    ("milliliter", 0.2),
    ("liter", 202.9),
];

/// Weight ratios; milligram is the base unit
pub const WEIGHT_CONVERSIONS: &[(&str, f64)] = &[
    ("milligram", 1.0),
    ("gram", 1000.0),
    ("oz", 28349.5),
    ("lb", 453592.0),
    ("kg", 1000000.0),
    ("ton", 1000000000.0),
];

/// Units that never sum numerically
pub const SEASONING_UNITS: &[&str] = &["to taste", "pinch", "dash"];

/// Error raised when a unit string cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("Unit cannot be empty")]
    Empty,
}

/// A measurement unit as entered for a recipe ingredient or cart item.
///
/// Known units parse case-insensitively to a dedicated variant. Anything
/// else is kept verbatim in `Other` and classifies as
/// [`ConversionFamily::None`], so free text like "large" or "bunch" still
/// round-trips through storage but never merges numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    // Volume
    Teaspoon,
    Tablespoon,
    FlOz,
    Cup,
    Pint,
    Quart,
    Gallon,
    Milliliter,
    Liter,
    // Weight
    Milligram,
    Gram,
    Oz,
    Lb,
    Kg,
    Ton,
    // Seasoning
    ToTaste,
    Pinch,
    Dash,
    // Count
    Bottle,
    Can,
    Clove,
    Package,
    Piece,
    Slice,
    Whole,
    /// Free text outside the known vocabulary
    Other(String),
}

impl Unit {
    /// Every known unit, in data-entry order
    pub const KNOWN: &'static [Unit] = &[
        Unit::Teaspoon,
        Unit::Tablespoon,
        Unit::FlOz,
        Unit::Cup,
        Unit::Pint,
        Unit::Quart,
        Unit::Gallon,
        Unit::Milliliter,
        Unit::Liter,
        Unit::Milligram,
        Unit::Gram,
        Unit::Oz,
        Unit::Lb,
        Unit::Kg,
        Unit::Ton,
        Unit::ToTaste,
        Unit::Pinch,
        Unit::Dash,
        Unit::Bottle,
        Unit::Can,
        Unit::Clove,
        Unit::Package,
        Unit::Piece,
        Unit::Slice,
        Unit::Whole,
    ];

    /// Parse a unit string; only the empty string is rejected
    pub fn parse(s: &str) -> Result<Self, UnitError> {
        if s.trim().is_empty() {
            return Err(UnitError::Empty);
        }

        let lower = s.to_lowercase();
        let unit = match lower.as_str() {
            "teaspoon" => Unit::Teaspoon,
            "tablespoon" => Unit::Tablespoon,
            "fl oz" => Unit::FlOz,
            "cup" => Unit::Cup,
            "pint" => Unit::Pint,
            "quart" => Unit::Quart,
            "gallon" => Unit::Gallon,
            "milliliter" => Unit::Milliliter,
            "liter" => Unit::Liter,
            "milligram" => Unit::Milligram,
            "gram" => Unit::Gram,
            "oz" => Unit::Oz,
            "lb" => Unit::Lb,
            "kg" => Unit::Kg,
            "ton" => Unit::Ton,
            "to taste" => Unit::ToTaste,
            "pinch" => Unit::Pinch,
            "dash" => Unit::Dash,
            "bottle" => Unit::Bottle,
            "can" => Unit::Can,
            "clove" => Unit::Clove,
            "package" => Unit::Package,
            "piece" => Unit::Piece,
            "slice" => Unit::Slice,
            "whole" => Unit::Whole,
            _ => Unit::Other(s.to_string()),
        };

        Ok(unit)
    }

    /// Canonical name, or the original text for `Other`
    pub fn as_str(&self) -> &str {
        match self {
            Unit::Teaspoon => "teaspoon",
            Unit::Tablespoon => "tablespoon",
            Unit::FlOz => "fl oz",
            Unit::Cup => "cup",
            Unit::Pint => "pint",
            Unit::Quart => "quart",
            Unit::Gallon => "gallon",
            Unit::Milliliter => "milliliter",
            Unit::Liter => "liter",
            Unit::Milligram => "milligram",
            Unit::Gram => "gram",
            Unit::Oz => "oz",
            Unit::Lb => "lb",
            Unit::Kg => "kg",
            Unit::Ton => "ton",
            Unit::ToTaste => "to taste",
            Unit::Pinch => "pinch",
            Unit::Dash => "dash",
            Unit::Bottle => "bottle",
            Unit::Can => "can",
            Unit::Clove => "clove",
            Unit::Package => "package",
            Unit::Piece => "piece",
            Unit::Slice => "slice",
            Unit::Whole => "whole",
            Unit::Other(s) => s,
        }
    }

    /// Whether the unit is part of the known vocabulary
    pub fn is_known(&self) -> bool {
        !matches!(self, Unit::Other(_))
    }

    /// Conversion family of this unit
    pub fn family(&self) -> ConversionFamily {
        match self {
            Unit::Teaspoon
            | Unit::Tablespoon
            | Unit::FlOz
            | Unit::Cup
            | Unit::Pint
            | Unit::Quart
            | Unit::Gallon
            | Unit::Milliliter
            | Unit::Liter => ConversionFamily::Volume,
            Unit::Milligram | Unit::Gram | Unit::Oz | Unit::Lb | Unit::Kg | Unit::Ton => {
                ConversionFamily::Weight
            }
            Unit::ToTaste | Unit::Pinch | Unit::Dash => ConversionFamily::Seasoning,
            Unit::Bottle
            | Unit::Can
            | Unit::Clove
            | Unit::Package
            | Unit::Piece
            | Unit::Slice
            | Unit::Whole
            | Unit::Other(_) => ConversionFamily::None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s)
    }
}

impl TryFrom<String> for Unit {
    type Error = UnitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Unit::parse(&s)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Classify a raw unit string into its conversion family (case-insensitive)
pub fn classify(unit: &str) -> ConversionFamily {
    let lower = unit.to_lowercase();

    if VOLUME_CONVERSIONS.iter().any(|(name, _)| *name == lower) {
        return ConversionFamily::Volume;
    }

    if WEIGHT_CONVERSIONS.iter().any(|(name, _)| *name == lower) {
        return ConversionFamily::Weight;
    }

    if SEASONING_UNITS.contains(&lower.as_str()) {
        return ConversionFamily::Seasoning;
    }

    ConversionFamily::None
}
