//! Unit conversion functions
//!
//! Converts quantities into a family's base unit and back into the most
//! readable display unit.

use serde::Serialize;

use super::units::{ConversionFamily, Unit};

/// A quantity expressed in a specific display unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayQuantity {
    pub unit: &'static str,
    pub quantity: f64,
}

/// Ratio of `unit` relative to the family's base unit
pub fn ratio_for(unit: &Unit, family: ConversionFamily) -> Option<f64> {
    family
        .conversions()?
        .iter()
        .find(|(name, _)| *name == unit.as_str())
        .map(|(_, ratio)| *ratio)
}

/// Convert a quantity to the family's base unit
///
/// Units missing from the family table pass through unchanged; earlier
/// classification should make that unreachable.
pub fn to_base(quantity: f64, unit: &Unit, family: ConversionFamily) -> f64 {
    match ratio_for(unit, family) {
        Some(ratio) => quantity * ratio,
        None => {
            tracing::warn!(
                "Unit conversion fallback: '{}' has no {:?} ratio. Keeping {} unconverted.",
                unit,
                family,
                quantity
            );
            quantity
        }
    }
}

/// Pick the coarsest unit in which the total reads as at least 1
///
/// Falls back to the finest unit of the family when even that yields less
/// than 1. Families without a ratio table report the base quantity with an
/// empty unit.
pub fn best_display(total_base_quantity: f64, family: ConversionFamily) -> DisplayQuantity {
    let Some(conversions) = family.conversions() else {
        return DisplayQuantity {
            unit: "",
            quantity: round_to_hundredths(total_base_quantity),
        };
    };

    let mut units: Vec<(&'static str, f64)> = conversions.to_vec();
    units.sort_by(|a, b| b.1.total_cmp(&a.1));

    for &(unit, ratio) in &units {
        let converted = total_base_quantity / ratio;
        if converted >= 1.0 {
            return DisplayQuantity {
                unit,
                quantity: round_to_hundredths(converted),
            };
        }
    }

    // Older lists showed the raw base amount here; this converts it into the
    // finest unit instead, so stored totals below one unit read differently.
    let (unit, ratio) = units[units.len() - 1];
    DisplayQuantity {
        unit,
        quantity: round_to_hundredths(total_base_quantity / ratio),
    }
}

/// Round half-up at the second decimal place
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base_volume() {
        assert_eq!(to_base(2.0, &Unit::Cup, ConversionFamily::Volume), 96.0);
        assert_eq!(to_base(1.0, &Unit::Pint, ConversionFamily::Volume), 96.0);
        assert_eq!(to_base(5.0, &Unit::Milliliter, ConversionFamily::Volume), 1.0);
    }

    #[test]
    fn test_to_base_weight() {
        assert_eq!(to_base(8.0, &Unit::Oz, ConversionFamily::Weight), 226796.0);
        assert_eq!(to_base(2.0, &Unit::Gram, ConversionFamily::Weight), 2000.0);
    }

    #[test]
    fn test_to_base_missing_unit_is_identity() {
        assert_eq!(to_base(3.0, &Unit::Cup, ConversionFamily::Weight), 3.0);
        assert_eq!(to_base(3.0, &Unit::Pinch, ConversionFamily::Seasoning), 3.0);
    }

    #[test]
    fn test_best_display_single_cup_stays_cup() {
        let base = to_base(1.0, &Unit::Cup, ConversionFamily::Volume);
        let display = best_display(base, ConversionFamily::Volume);
        assert_eq!(display, DisplayQuantity { unit: "cup", quantity: 1.0 });
    }

    #[test]
    fn test_best_display_prefers_coarsest_unit() {
        // 4608 teaspoons = 6 gallons
        let display = best_display(4608.0, ConversionFamily::Volume);
        assert_eq!(display, DisplayQuantity { unit: "gallon", quantity: 6.0 });

        let display = best_display(192.0, ConversionFamily::Volume);
        assert_eq!(display, DisplayQuantity { unit: "quart", quantity: 1.0 });

        let display = best_display(453592.0, ConversionFamily::Weight);
        assert_eq!(display, DisplayQuantity { unit: "lb", quantity: 1.0 });
    }

    #[test]
    fn test_best_display_liter_outranks_quart() {
        // liter (202.9) sits between quart and gallon
        let display = best_display(202.9, ConversionFamily::Volume);
        assert_eq!(display, DisplayQuantity { unit: "liter", quantity: 1.0 });

        let display = best_display(200.0, ConversionFamily::Volume);
        assert_eq!(display.unit, "quart");
        assert_eq!(display.quantity, 1.04);
    }

    #[test]
    fn test_best_display_rounds_to_hundredths() {
        // 1 tablespoon + 1 teaspoon = 4 tsp = 1.333 tbsp
        let display = best_display(4.0, ConversionFamily::Volume);
        assert_eq!(display, DisplayQuantity { unit: "tablespoon", quantity: 1.33 });
    }

    #[test]
    fn test_best_display_below_smallest_unit_converts_base_amount() {
        // Below 1 milliliter (0.2 tsp) the finest unit is still used
        let display = best_display(0.1, ConversionFamily::Volume);
        assert_eq!(display, DisplayQuantity { unit: "milliliter", quantity: 0.5 });

        // Two 0.1 ml items: 0.2 ml, not the unconverted 0.04 base teaspoons
        let base = to_base(0.1, &Unit::Milliliter, ConversionFamily::Volume) * 2.0;
        let display = best_display(base, ConversionFamily::Volume);
        assert_eq!(display, DisplayQuantity { unit: "milliliter", quantity: 0.2 });

        let display = best_display(0.5, ConversionFamily::Weight);
        assert_eq!(display, DisplayQuantity { unit: "milligram", quantity: 0.5 });
    }

    #[test]
    fn test_round_to_hundredths_half_up() {
        assert_eq!(round_to_hundredths(1.005 + 1e-12), 1.01);
        assert_eq!(round_to_hundredths(2.5), 2.5);
        assert_eq!(round_to_hundredths(0.125), 0.13);
        assert_eq!(round_to_hundredths(0.124), 0.12);
    }
}
