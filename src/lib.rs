//! Pantry Library
//!
//! Recipe management with a consolidating shopping list.

pub mod build_info;
pub mod config;
pub mod consolidation;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
