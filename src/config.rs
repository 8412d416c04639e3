//! Runtime configuration
//!
//! Read once at startup from environment variables.

use std::env;
use std::path::PathBuf;

use tracing::info;

/// Default user id when `PANTRY_USER_ID` is unset
pub const DEFAULT_USER_ID: &str = "local";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// User the server acts on behalf of
    pub user_id: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_path: database_path(),
            user_id: user_id(),
        }
    }
}

fn user_id() -> String {
    match env::var("PANTRY_USER_ID").map(|v| v.trim().to_string()) {
        Ok(id) if !id.is_empty() => id,
        _ => {
            info!("PANTRY_USER_ID not set, using default: {DEFAULT_USER_ID}");
            DEFAULT_USER_ID.to_string()
        }
    }
}

/// Get the database path from environment or use `data/pantry.db` next to the project
fn database_path() -> PathBuf {
    env::var("PANTRY_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("pantry.db");
            info!("PANTRY_DATABASE_PATH not set, using default: {}", path.display());
            path
        })
}
