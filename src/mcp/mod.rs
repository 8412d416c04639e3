//! MCP server module
//!
//! Exposes the pantry tools over the Model Context Protocol.

mod server;

pub use server::PantryService;
