//! Data models
//!
//! Rust structs representing database entities.

mod cart_item;
mod recipe;
mod user_profile;
pub mod validation;

use rusqlite::types::Type;
use rusqlite::Row;

pub use cart_item::{CartItem, CartItemCreate, CartItemUpdate, MANUAL_ADDITION_TITLE};
pub use recipe::{Difficulty, Recipe, RecipeCreate, RecipeIngredient, RecipeUpdate};
pub use user_profile::{
    DefaultView, MeasurementSystem, Preferences, PreferencesUpdate, UserProfile,
};
pub use validation::ValidationError;

/// Read a TEXT column holding a JSON array of strings
pub(crate) fn json_list(row: &Row, column: &str) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(column)?;
    serde_json::from_str(&raw).map_err(|e| {
        let index = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
    })
}
