//! Pantry Status Tool
//!
//! Provides runtime status information about the pantry service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Shopping cart instructions for AI assistants
pub const CART_INSTRUCTIONS: &str = r#"
# Pantry Shopping Cart Instructions

This guide explains how to plan a shop with the pantry tools.

## Overview

1. **Recipes** hold ordered ingredients, each with a quantity, a unit and a display text
2. **The cart** holds the items you intend to buy, copied from recipes or added by hand
3. **The shopping list** is the cart read back with matching ingredients merged

---

## Filling the Cart

| Task | Tool |
|------|------|
| Copy a recipe's ingredients | `add_recipe_to_cart` |
| Add a single item by hand | `add_cart_item` |
| Re-apply a recipe after editing it | `sync_recipe_in_cart` |

Adding the same recipe twice adds its ingredients twice; the shopping list
then shows the doubled amount.

Hand-added items are recorded under the recipe title "Manual Addition".

---

## Reading the Shopping List

`get_shopping_list` returns every cart item plus a `consolidated` list.
Items are grouped by ingredient name with quantity words, sizes and
preparation words removed, so "2 cups chopped fresh onion" and "large onion"
land in one group.

Each group is one of:

- **Single item**: shown exactly as entered
- **Merged amount**: volume or weight units summed and shown in the largest
  unit that keeps the amount at 1 or more (e.g. 2 cups becomes 1 pint)
- **To taste**: "to taste", "pinch" and "dash" collapse to "to taste"
- **Multiple units**: amounts that cannot be added (e.g. cups and grams, or
  cans) are listed side by side with the note "N different measurements"

Groups are ordered by name. Only unchecked items are included unless
`include_completed` is true.

---

## Units

Volume: teaspoon, tablespoon, fl oz, cup, pint, quart, gallon, milliliter, liter
Weight: milligram, gram, oz, lb, kg, ton
Seasoning: to taste, pinch, dash
Countable: bottle, can, clove, package, piece, slice, whole

Any other unit text is kept as entered and never merged with other units.

---

## Checking Off and Clearing

| Task | Tool |
|------|------|
| Check off or change an item | `update_cart_item` |
| Remove one item | `remove_cart_item` |
| Remove a recipe's items | `remove_recipe_from_cart` |
| Remove checked-off items | `clear_completed_items` |
| Empty the cart | `clear_cart` |

Editing a recipe with `update_recipe` also refreshes its items in the cart.
Items keep their checked-off state when the ingredient text is unchanged
(ignoring case).
"#;

/// Runtime status of the pantry service
#[derive(Debug, Clone, Serialize)]
pub struct PantryStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// User the server acts for
    pub user_id: String,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    user_id: String,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf, user_id: String) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            user_id,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> PantryStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PantryStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            user_id: self.user_id.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/pantry.db"), "alice".into());
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.user_id, "alice");
        assert_eq!(status.process_id, std::process::id());
    }
}
