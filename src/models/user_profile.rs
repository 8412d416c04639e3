//! User profile model
//!
//! Per-user display and planning preferences.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::json_list;
use super::validation::{ValidationError, MAX_SERVINGS, MIN_SERVINGS};

/// Preferred measurement system
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    Metric,
    #[default]
    Imperial,
}

impl MeasurementSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementSystem::Metric => "metric",
            MeasurementSystem::Imperial => "imperial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Some(MeasurementSystem::Metric),
            "imperial" => Some(MeasurementSystem::Imperial),
            _ => None,
        }
    }
}

/// Preferred recipe list layout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Cards,
    Table,
}

impl DefaultView {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultView::Cards => "cards",
            DefaultView::Table => "table",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cards" => Some(DefaultView::Cards),
            "table" => Some(DefaultView::Table),
            _ => None,
        }
    }
}

/// Stored preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub measurement_system: MeasurementSystem,
    pub default_serving_size: i64,
    pub dietary_restrictions: Vec<String>,
    pub default_view: DefaultView,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            measurement_system: MeasurementSystem::Imperial,
            default_serving_size: 4,
            dietary_restrictions: Vec::new(),
            default_view: DefaultView::Cards,
        }
    }
}

/// A user's profile; one per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub preferences: Preferences,
    /// None until the profile is first saved
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Partial preference update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    pub measurement_system: Option<MeasurementSystem>,
    pub default_serving_size: Option<i64>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub default_view: Option<DefaultView>,
}

impl PreferencesUpdate {
    /// Apply onto existing preferences, validating changed fields
    pub fn apply(self, mut prefs: Preferences) -> Result<Preferences, ValidationError> {
        if let Some(system) = self.measurement_system {
            prefs.measurement_system = system;
        }
        if let Some(size) = self.default_serving_size {
            if !(MIN_SERVINGS..=MAX_SERVINGS).contains(&size) {
                return Err(ValidationError::ServingsOutOfRange);
            }
            prefs.default_serving_size = size;
        }
        if let Some(restrictions) = self.dietary_restrictions {
            prefs.dietary_restrictions = restrictions
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
        }
        if let Some(view) = self.default_view {
            prefs.default_view = view;
        }
        Ok(prefs)
    }
}

impl UserProfile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let system: String = row.get("measurement_system")?;
        let view: String = row.get("default_view")?;
        Ok(Self {
            user_id: row.get("user_id")?,
            preferences: Preferences {
                measurement_system: MeasurementSystem::from_str(&system).unwrap_or_default(),
                default_serving_size: row.get("default_serving_size")?,
                dietary_restrictions: json_list(row, "dietary_restrictions")?,
                default_view: DefaultView::from_str(&view).unwrap_or_default(),
            },
            created_at: Some(row.get("created_at")?),
            updated_at: Some(row.get("updated_at")?),
        })
    }

    /// Stored profile, if the user has saved one
    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stored profile, or defaults for a user who never saved one
    pub fn get_or_default(conn: &Connection, user_id: &str) -> DbResult<Self> {
        Ok(Self::get(conn, user_id)?.unwrap_or_else(|| Self {
            user_id: user_id.to_string(),
            preferences: Preferences::default(),
            created_at: None,
            updated_at: None,
        }))
    }

    /// Insert or replace a user's preferences
    pub fn upsert(conn: &Connection, user_id: &str, prefs: &Preferences) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_profiles
                (user_id, measurement_system, default_serving_size, dietary_restrictions, default_view)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id) DO UPDATE SET
                measurement_system = excluded.measurement_system,
                default_serving_size = excluded.default_serving_size,
                dietary_restrictions = excluded.dietary_restrictions,
                default_view = excluded.default_view,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                prefs.measurement_system.as_str(),
                prefs.default_serving_size,
                serde_json::to_string(&prefs.dietary_restrictions)?,
                prefs.default_view.as_str(),
            ],
        )?;

        Self::get_or_default(conn, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_defaults_then_upsert() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();
        crate::db::migrations::run_migrations(&conn).unwrap();

        let profile = UserProfile::get_or_default(&conn, "alice").unwrap();
        assert_eq!(profile.preferences, Preferences::default());
        assert!(profile.created_at.is_none());

        let update = PreferencesUpdate {
            measurement_system: Some(MeasurementSystem::Metric),
            dietary_restrictions: Some(vec![" vegetarian ".to_string(), "".to_string()]),
            ..Default::default()
        };
        let prefs = update.apply(profile.preferences).unwrap();
        let saved = UserProfile::upsert(&conn, "alice", &prefs).unwrap();
        assert_eq!(saved.preferences.measurement_system, MeasurementSystem::Metric);
        assert_eq!(saved.preferences.dietary_restrictions, vec!["vegetarian"]);
        assert_eq!(saved.preferences.default_serving_size, 4);
        assert!(saved.created_at.is_some());

        let update = PreferencesUpdate {
            default_view: Some(DefaultView::Table),
            ..Default::default()
        };
        let prefs = update.apply(saved.preferences).unwrap();
        let saved = UserProfile::upsert(&conn, "alice", &prefs).unwrap();
        assert_eq!(saved.preferences.default_view, DefaultView::Table);
        assert_eq!(saved.preferences.measurement_system, MeasurementSystem::Metric);
    }

    #[test]
    fn test_serving_size_validation() {
        let update = PreferencesUpdate {
            default_serving_size: Some(0),
            ..Default::default()
        };
        assert_eq!(
            update.apply(Preferences::default()),
            Err(ValidationError::ServingsOutOfRange)
        );
    }
}
