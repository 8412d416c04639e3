//! Profile MCP Tools
//!
//! Read and change a user's preferences.

use crate::db::Database;
use crate::models::{PreferencesUpdate, UserProfile};

/// Get the user's profile, falling back to default preferences
pub fn get_profile(db: &Database, user_id: &str) -> Result<UserProfile, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    UserProfile::get_or_default(&conn, user_id).map_err(|e| format!("Failed to get profile: {}", e))
}

/// Apply a partial preference update and save it
pub fn update_profile(
    db: &Database,
    user_id: &str,
    data: PreferencesUpdate,
) -> Result<UserProfile, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let current = UserProfile::get_or_default(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;
    let preferences = data.apply(current.preferences).map_err(|e| e.to_string())?;

    UserProfile::upsert(&conn, user_id, &preferences)
        .map_err(|e| format!("Failed to update profile: {}", e))
}
