//! Pantry Tools module
//!
//! MCP tool implementations for recipes, the shopping cart and preferences.

pub mod profile;
pub mod recipes;
pub mod shopping_cart;
pub mod status;
