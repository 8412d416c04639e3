//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- RECIPES
        -- instructions and tags are JSON string arrays
        -- ============================================
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            instructions TEXT NOT NULL DEFAULT '[]',
            cook_time INTEGER NOT NULL DEFAULT 0,     -- minutes
            prep_time INTEGER NOT NULL DEFAULT 0,     -- minutes
            servings INTEGER NOT NULL DEFAULT 4,
            tags TEXT NOT NULL DEFAULT '[]',
            image_url TEXT,
            is_public INTEGER NOT NULL DEFAULT 0,     -- boolean
            difficulty TEXT NOT NULL CHECK(difficulty IN ('easy', 'medium', 'hard')) DEFAULT 'easy',

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_user ON recipes(user_id);
        CREATE INDEX idx_recipes_public ON recipes(is_public);
        CREATE INDEX idx_recipes_title ON recipes(title);

        -- ============================================
        -- RECIPE INGREDIENTS
        -- Ordered ingredient lines of a recipe
        -- ============================================
        CREATE TABLE recipe_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,
            display_text TEXT NOT NULL,
            notes TEXT,

            UNIQUE(recipe_id, position)
        );

        CREATE INDEX idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id);

        -- ============================================
        -- SHOPPING CART ITEMS
        -- recipe_id is a soft reference: items outlive deleted recipes
        -- ============================================
        CREATE TABLE shopping_cart_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            recipe_id INTEGER,
            recipe_title TEXT,
            ingredient TEXT NOT NULL,
            quantity REAL NOT NULL CHECK(quantity > 0),
            unit TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,     -- boolean
            added_at TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_cart_user ON shopping_cart_items(user_id);
        CREATE INDEX idx_cart_user_recipe ON shopping_cart_items(user_id, recipe_id);

        -- ============================================
        -- USER PROFILES
        -- ============================================
        CREATE TABLE user_profiles (
            user_id TEXT PRIMARY KEY,
            measurement_system TEXT NOT NULL CHECK(measurement_system IN ('metric', 'imperial')) DEFAULT 'imperial',
            default_serving_size INTEGER NOT NULL DEFAULT 4,
            dietary_restrictions TEXT NOT NULL DEFAULT '[]',
            default_view TEXT NOT NULL CHECK(default_view IN ('cards', 'table')) DEFAULT 'cards',

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
