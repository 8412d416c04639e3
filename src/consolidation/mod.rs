//! Ingredient consolidation module
//!
//! Turns a flat list of cart items into shopping list lines: names are
//! normalized, units classified into conversion families, and compatible
//! quantities merged into a single readable amount.

pub mod converter;
pub mod engine;
pub mod normalize;
pub mod units;

pub use converter::{best_display, ratio_for, round_to_hundredths, to_base, DisplayQuantity};
pub use engine::{consolidate, ConsolidatedIngredient};
pub use normalize::{normalize, MODIFIER_WORDS};
pub use units::{
    classify, ConversionFamily, Unit, UnitError, SEASONING_UNITS, VOLUME_CONVERSIONS,
    WEIGHT_CONVERSIONS,
};
