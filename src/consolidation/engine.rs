//! Shopping list consolidation
//!
//! Groups cart items that refer to the same ingredient and merges their
//! quantities when every item in the group shares a convertible unit family.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::CartItem;

use super::converter::{best_display, to_base};
use super::normalize::normalize;
use super::units::{ConversionFamily, Unit};

/// One shopping list line built from one or more cart items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedIngredient {
    /// Display label: the first item's label, suffixed with
    /// " (multiple units)" when the group could not be merged
    pub base_ingredient: String,
    /// Merged amount; only meaningful when `can_consolidate` is set,
    /// or for a single-item group
    pub total_quantity: f64,
    pub primary_unit: String,
    /// Every contributing cart item, in input order
    pub items: Vec<CartItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_display: Option<String>,
    pub can_consolidate: bool,
}

impl ConsolidatedIngredient {
    /// Human-readable amount for the line
    ///
    /// Groups that could not be merged list each item's own amount.
    pub fn display_quantity(&self) -> String {
        if self.can_consolidate {
            if self.primary_unit == Unit::ToTaste.as_str() {
                return self.primary_unit.clone();
            }
            return format_amount(self.total_quantity, &self.primary_unit);
        }

        self.items
            .iter()
            .map(|item| format_amount(item.quantity, item.unit.as_str()))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

fn format_amount(quantity: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{}", quantity)
    } else {
        format!("{} {}", quantity, unit)
    }
}

/// Consolidate cart items into shopping list lines
///
/// Every input item ends up in exactly one returned group. Groups are
/// sorted by `base_ingredient`, ignoring case first.
pub fn consolidate(items: Vec<CartItem>) -> Vec<ConsolidatedIngredient> {
    let item_count = items.len();
    let groups = group_by_name(items);

    let mut consolidated: Vec<ConsolidatedIngredient> = groups
        .into_values()
        .map(|group| {
            if group.len() == 1 {
                single_item_group(group)
            } else {
                multi_item_group(group)
            }
        })
        .collect();

    consolidated.sort_by(|a, b| compare_labels(&a.base_ingredient, &b.base_ingredient));

    tracing::debug!(
        "Consolidated {} cart items into {} shopping list lines",
        item_count,
        consolidated.len()
    );

    consolidated
}

/// Partition items by normalized name, keeping first-seen group order
fn group_by_name(items: Vec<CartItem>) -> IndexMap<String, Vec<CartItem>> {
    let mut groups: IndexMap<String, Vec<CartItem>> = IndexMap::new();
    for item in items {
        groups
            .entry(normalize(&item.ingredient))
            .or_default()
            .push(item);
    }
    groups
}

fn single_item_group(items: Vec<CartItem>) -> ConsolidatedIngredient {
    let item = &items[0];
    ConsolidatedIngredient {
        base_ingredient: item.ingredient.clone(),
        total_quantity: item.quantity,
        primary_unit: item.unit.to_string(),
        items,
        alternative_display: None,
        can_consolidate: false,
    }
}

/// The first item's family decides for the whole group
fn multi_item_group(items: Vec<CartItem>) -> ConsolidatedIngredient {
    let family = items[0].unit.family();
    let can_consolidate =
        family != ConversionFamily::None && items.iter().all(|item| item.unit.family() == family);

    if !can_consolidate {
        return unmerged_group(items);
    }

    match family {
        ConversionFamily::Seasoning => seasoning_group(items),
        _ => measured_group(items, family),
    }
}

fn seasoning_group(items: Vec<CartItem>) -> ConsolidatedIngredient {
    ConsolidatedIngredient {
        base_ingredient: items[0].ingredient.clone(),
        total_quantity: 1.0,
        primary_unit: Unit::ToTaste.to_string(),
        alternative_display: Some(format!("From {} recipes", items.len())),
        items,
        can_consolidate: true,
    }
}

fn measured_group(items: Vec<CartItem>, family: ConversionFamily) -> ConsolidatedIngredient {
    let total_base: f64 = items
        .iter()
        .map(|item| to_base(item.quantity, &item.unit, family))
        .sum();
    let display = best_display(total_base, family);

    ConsolidatedIngredient {
        base_ingredient: items[0].ingredient.clone(),
        total_quantity: display.quantity,
        primary_unit: display.unit.to_string(),
        alternative_display: Some(format!("{} recipes combined", items.len())),
        items,
        can_consolidate: true,
    }
}

fn unmerged_group(items: Vec<CartItem>) -> ConsolidatedIngredient {
    ConsolidatedIngredient {
        base_ingredient: format!("{} (multiple units)", items[0].ingredient),
        total_quantity: 0.0,
        primary_unit: String::new(),
        alternative_display: Some(format!("{} different measurements", items.len())),
        items,
        can_consolidate: false,
    }
}

/// Accent- and case-folded sort key, so "éclair" sorts beside "eclair"
fn fold_label(label: &str) -> String {
    label
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Ordering on the folded key, then unaccented before accented, then lower
/// case before upper case
fn compare_labels(a: &str, b: &str) -> Ordering {
    fold_label(a)
        .cmp(&fold_label(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(id: i64, ingredient: &str, quantity: f64, unit: &str) -> CartItem {
        CartItem {
            id,
            user_id: "cook".to_string(),
            recipe_id: Some(id * 10),
            recipe_title: Some(format!("Recipe {}", id)),
            ingredient: ingredient.to_string(),
            quantity,
            unit: Unit::parse(unit).unwrap(),
            completed: false,
            added_at: "2025-01-09T12:00:00Z".to_string(),
            updated_at: "2025-01-09 12:00:00".to_string(),
        }
    }

    #[test]
    fn test_volume_merge() {
        let groups = consolidate(vec![
            item(1, "flour", 2.0, "cup"),
            item(2, "flour", 1.0, "pint"),
        ]);

        assert_eq!(groups.len(), 1);
        let flour = &groups[0];
        assert!(flour.can_consolidate);
        assert_eq!(flour.base_ingredient, "flour");
        assert_eq!(flour.primary_unit, "quart");
        assert_eq!(flour.total_quantity, 1.0);
        assert_eq!(flour.alternative_display.as_deref(), Some("2 recipes combined"));
        assert_eq!(flour.items.len(), 2);
        assert_eq!(flour.display_quantity(), "1 quart");
    }

    #[test]
    fn test_weight_merge() {
        let groups = consolidate(vec![
            item(1, "butter", 8.0, "oz"),
            item(2, "butter", 8.0, "oz"),
        ]);

        assert_eq!(groups.len(), 1);
        assert!(groups[0].can_consolidate);
        assert_eq!(groups[0].primary_unit, "lb");
        assert_eq!(groups[0].total_quantity, 1.0);
    }

    #[test]
    fn test_mixed_family_not_merged() {
        let groups = consolidate(vec![
            item(1, "sugar", 1.0, "cup"),
            item(2, "sugar", 200.0, "gram"),
        ]);

        assert_eq!(groups.len(), 1);
        let sugar = &groups[0];
        assert!(!sugar.can_consolidate);
        assert_eq!(sugar.base_ingredient, "sugar (multiple units)");
        assert_eq!(sugar.total_quantity, 0.0);
        assert_eq!(sugar.primary_unit, "");
        assert_eq!(
            sugar.alternative_display.as_deref(),
            Some("2 different measurements")
        );
        let ids: Vec<i64> = sugar.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(sugar.display_quantity(), "1 cup + 200 gram");
    }

    #[test]
    fn test_none_family_never_merged() {
        let groups = consolidate(vec![
            item(1, "garlic", 2.0, "clove"),
            item(2, "garlic", 3.0, "clove"),
        ]);
        assert!(!groups[0].can_consolidate);
        assert_eq!(groups[0].base_ingredient, "garlic (multiple units)");

        let groups = consolidate(vec![
            item(1, "garlic", 1.0, "teaspoon"),
            item(2, "garlic", 3.0, "clove"),
        ]);
        assert!(!groups[0].can_consolidate);
    }

    #[test]
    fn test_seasoning_merge() {
        let groups = consolidate(vec![
            item(1, "salt", 1.0, "to taste"),
            item(2, "salt", 1.0, "to taste"),
        ]);

        assert_eq!(groups.len(), 1);
        let salt = &groups[0];
        assert!(salt.can_consolidate);
        assert_eq!(salt.total_quantity, 1.0);
        assert_eq!(salt.primary_unit, "to taste");
        assert_eq!(salt.alternative_display.as_deref(), Some("From 2 recipes"));
        assert_eq!(salt.display_quantity(), "to taste");
    }

    #[test]
    fn test_seasoning_mixed_members_still_seasoning() {
        let groups = consolidate(vec![
            item(1, "pepper", 1.0, "pinch"),
            item(2, "pepper", 2.0, "dash"),
            item(3, "Pepper", 1.0, "to taste"),
        ]);
        assert!(groups[0].can_consolidate);
        assert_eq!(groups[0].primary_unit, "to taste");
        assert_eq!(groups[0].alternative_display.as_deref(), Some("From 3 recipes"));
    }

    #[test]
    fn test_singleton_passthrough() {
        let groups = consolidate(vec![item(1, "Chicken", 3.0, "lb")]);

        assert_eq!(groups.len(), 1);
        let chicken = &groups[0];
        assert!(!chicken.can_consolidate);
        assert_eq!(chicken.base_ingredient, "Chicken");
        assert_eq!(chicken.total_quantity, 3.0);
        assert_eq!(chicken.primary_unit, "lb");
        assert_eq!(chicken.alternative_display, None);
        assert_eq!(chicken.display_quantity(), "3 lb");
    }

    #[test]
    fn test_singleton_keeps_free_text_unit() {
        let groups = consolidate(vec![item(1, "eggs", 3.0, "Large")]);
        assert_eq!(groups[0].primary_unit, "Large");
    }

    #[test]
    fn test_modifiers_group_together() {
        let groups = consolidate(vec![
            item(1, "Fresh Basil", 1.0, "cup"),
            item(2, "basil", 2.0, "tablespoon"),
        ]);

        assert_eq!(groups.len(), 1);
        // Label comes from the first item, unnormalized
        assert_eq!(groups[0].base_ingredient, "Fresh Basil");
        // 48 + 6 = 54 tsp = 1.125 cup
        assert_eq!(groups[0].primary_unit, "cup");
        assert_eq!(groups[0].total_quantity, 1.13);
    }

    #[test]
    fn test_first_item_decides_family() {
        let groups = consolidate(vec![
            item(1, "milk", 1.0, "cup"),
            item(2, "milk", 1.0, "lb"),
        ]);
        assert!(!groups[0].can_consolidate);
    }

    #[test]
    fn test_variety_words_stay_separate() {
        let groups = consolidate(vec![
            item(1, "red onion", 1.0, "whole"),
            item(2, "onion", 2.0, "whole"),
        ]);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.items.len() == 1));
    }

    #[test]
    fn test_groups_sorted_by_label() {
        let groups = consolidate(vec![
            item(1, "zucchini", 1.0, "whole"),
            item(2, "apple", 1.0, "whole"),
            item(3, "banana", 1.0, "whole"),
        ]);

        let labels: Vec<&str> = groups.iter().map(|g| g.base_ingredient.as_str()).collect();
        assert_eq!(labels, vec!["apple", "banana", "zucchini"]);
    }

    #[test]
    fn test_sort_ignores_case() {
        let groups = consolidate(vec![
            item(1, "Zucchini", 1.0, "whole"),
            item(2, "apple", 1.0, "whole"),
            item(3, "Banana", 1.0, "whole"),
        ]);

        let labels: Vec<&str> = groups.iter().map(|g| g.base_ingredient.as_str()).collect();
        assert_eq!(labels, vec!["apple", "Banana", "Zucchini"]);
    }

    #[test]
    fn test_sort_folds_accents() {
        let groups = consolidate(vec![
            item(1, "flour", 1.0, "whole"),
            item(2, "éclair", 1.0, "whole"),
            item(3, "apple", 1.0, "whole"),
            item(4, "Crème Fraîche", 1.0, "whole"),
            item(5, "açaí", 1.0, "whole"),
        ]);

        let labels: Vec<&str> = groups.iter().map(|g| g.base_ingredient.as_str()).collect();
        assert_eq!(labels, vec!["açaí", "apple", "Crème Fraîche", "éclair", "flour"]);
    }

    #[test]
    fn test_sort_unaccented_before_accented() {
        assert_eq!(compare_labels("eclair", "éclair"), Ordering::Less);
        assert_eq!(compare_labels("Éclair", "eclair"), Ordering::Greater);
        assert_eq!(compare_labels("éclair", "Éclair"), Ordering::Less);
    }

    #[test]
    fn test_empty_input() {
        assert!(consolidate(Vec::new()).is_empty());
    }

    fn arb_item() -> impl Strategy<Value = (String, f64, String)> {
        (
            proptest::sample::select(vec![
                "flour", "Fresh Flour", "sugar", "salt", "red onion", "onion", "Basil", "garlic",
            ]),
            1u32..500,
            proptest::sample::select(vec![
                "cup", "teaspoon", "liter", "gram", "oz", "lb", "to taste", "pinch", "clove",
                "bunch",
            ]),
        )
            .prop_map(|(name, qty, unit)| (name.to_string(), qty as f64 / 4.0, unit.to_string()))
    }

    proptest! {
        #[test]
        fn prop_consolidate_is_a_partition(raw in proptest::collection::vec(arb_item(), 0..30)) {
            let items: Vec<CartItem> = raw
                .iter()
                .enumerate()
                .map(|(i, (name, qty, unit))| item(i as i64, name, *qty, unit))
                .collect();

            let groups = consolidate(items.clone());

            let mut seen: Vec<i64> = groups
                .iter()
                .flat_map(|g| g.items.iter().map(|i| i.id))
                .collect();
            seen.sort_unstable();
            let expected: Vec<i64> = (0..items.len() as i64).collect();
            prop_assert_eq!(seen, expected);

            for group in &groups {
                let key = normalize(&group.items[0].ingredient);
                prop_assert!(group.items.iter().all(|i| normalize(&i.ingredient) == key));

                if group.can_consolidate {
                    let family = group.items[0].unit.family();
                    prop_assert!(family != ConversionFamily::None);
                    prop_assert!(group.items.iter().all(|i| i.unit.family() == family));
                }
            }
        }
    }
}
