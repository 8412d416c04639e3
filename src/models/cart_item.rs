//! Shopping cart item model
//!
//! One ingredient line a user intends to buy, optionally traced back to the
//! recipe it was copied from.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::consolidation::Unit;
use crate::db::{DbError, DbResult};

/// Recipe title recorded for items added by hand
pub const MANUAL_ADDITION_TITLE: &str = "Manual Addition";

/// A shopping cart item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub user_id: String,
    pub recipe_id: Option<i64>,
    pub recipe_title: Option<String>,
    pub ingredient: String,
    pub quantity: f64,
    pub unit: Unit,
    pub completed: bool,
    /// UTC insertion time; survives recipe resyncs
    pub added_at: String,
    pub updated_at: String,
}

/// Data for creating a cart item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemCreate {
    pub recipe_id: Option<i64>,
    pub recipe_title: Option<String>,
    pub ingredient: String,
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default)]
    pub completed: bool,
}

/// Data for updating a cart item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub completed: Option<bool>,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
}

impl CartItem {
    /// Create a CartItem from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit: String = row.get("unit")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            recipe_id: row.get("recipe_id")?,
            recipe_title: row.get("recipe_title")?,
            ingredient: row.get("ingredient")?,
            quantity: row.get("quantity")?,
            unit: Unit::parse(&unit).unwrap_or_else(|_| Unit::Other(unit)),
            completed: row.get::<_, i32>("completed")? != 0,
            added_at: row.get("added_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new cart item for a user
    pub fn create(conn: &Connection, user_id: &str, data: &CartItemCreate) -> DbResult<Self> {
        let added_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

        conn.execute(
            r#"
            INSERT INTO shopping_cart_items
                (user_id, recipe_id, recipe_title, ingredient, quantity, unit, completed, added_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                user_id,
                data.recipe_id,
                data.recipe_title,
                data.ingredient,
                data.quantity,
                data.unit.as_str(),
                data.completed as i32,
                added_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a user's cart item by ID
    pub fn get_by_id(conn: &Connection, user_id: &str, id: i64) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM shopping_cart_items WHERE id = ?1 AND user_id = ?2")?;

        let result = stmt.query_row(params![id, user_id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All items in a user's cart, oldest first
    pub fn list_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM shopping_cart_items WHERE user_id = ?1 ORDER BY added_at ASC, id ASC",
        )?;
        let items = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Items in a user's cart that came from one recipe
    pub fn list_for_recipe(conn: &Connection, user_id: &str, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM shopping_cart_items WHERE user_id = ?1 AND recipe_id = ?2 ORDER BY id ASC",
        )?;
        let items = stmt
            .query_map(params![user_id, recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Update a cart item
    pub fn update(
        conn: &Connection,
        user_id: &str,
        id: i64,
        data: &CartItemUpdate,
    ) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(completed) = data.completed {
            updates.push(format!("completed = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(completed as i32));
        }
        if let Some(quantity) = data.quantity {
            updates.push(format!("quantity = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(quantity));
        }
        if let Some(ref unit) = data.unit {
            updates.push(format!("unit = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(unit.as_str().to_string()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, user_id, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE shopping_cart_items SET {} WHERE id = ?{} AND user_id = ?{}",
            updates.join(", "),
            params_vec.len() + 1,
            params_vec.len() + 2
        );

        params_vec.push(Box::new(id));
        params_vec.push(Box::new(user_id.to_string()));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, user_id, id)
    }

    /// Replace the recipe-derived fields of an item, keeping completion and `added_at`
    pub fn refresh_from_recipe(
        conn: &Connection,
        user_id: &str,
        id: i64,
        recipe_title: &str,
        ingredient: &str,
        quantity: f64,
        unit: &Unit,
    ) -> DbResult<()> {
        conn.execute(
            r#"
            UPDATE shopping_cart_items SET
                recipe_title = ?1,
                ingredient = ?2,
                quantity = ?3,
                unit = ?4,
                updated_at = datetime('now')
            WHERE id = ?5 AND user_id = ?6
            "#,
            params![recipe_title, ingredient, quantity, unit.as_str(), id, user_id],
        )?;
        Ok(())
    }

    /// Delete a single item. Returns true if a row was removed.
    pub fn delete(conn: &Connection, user_id: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM shopping_cart_items WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    /// Delete every item that came from a recipe
    pub fn delete_for_recipe(conn: &Connection, user_id: &str, recipe_id: i64) -> DbResult<usize> {
        let rows = conn.execute(
            "DELETE FROM shopping_cart_items WHERE user_id = ?1 AND recipe_id = ?2",
            params![user_id, recipe_id],
        )?;
        Ok(rows)
    }

    /// Delete every checked-off item
    pub fn delete_completed(conn: &Connection, user_id: &str) -> DbResult<usize> {
        let rows = conn.execute(
            "DELETE FROM shopping_cart_items WHERE user_id = ?1 AND completed = 1",
            [user_id],
        )?;
        Ok(rows)
    }

    /// Empty the cart
    pub fn delete_all(conn: &Connection, user_id: &str) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM shopping_cart_items WHERE user_id = ?1", [user_id])?;
        Ok(rows)
    }

    /// Number of items in a user's cart
    pub fn count(conn: &Connection, user_id: &str) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM shopping_cart_items WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    fn manual(ingredient: &str, quantity: f64, unit: Unit) -> CartItemCreate {
        CartItemCreate {
            recipe_id: None,
            recipe_title: Some(MANUAL_ADDITION_TITLE.to_string()),
            ingredient: ingredient.to_string(),
            quantity,
            unit,
            completed: false,
        }
    }

    #[test]
    fn test_create_and_get() {
        let db = setup();
        let conn = db.get_conn().unwrap();

        let item = CartItem::create(&conn, "alice", &manual("milk", 1.0, Unit::Gallon)).unwrap();
        assert_eq!(item.ingredient, "milk");
        assert_eq!(item.unit, Unit::Gallon);
        assert!(!item.completed);
        assert!(item.added_at.ends_with('Z'));

        let fetched = CartItem::get_by_id(&conn, "alice", item.id).unwrap();
        assert_eq!(fetched, Some(item.clone()));

        // Other users cannot see it
        assert_eq!(CartItem::get_by_id(&conn, "bob", item.id).unwrap(), None);
    }

    #[test]
    fn test_free_text_unit_round_trips() {
        let db = setup();
        let conn = db.get_conn().unwrap();

        let unit = Unit::parse("Bunch").unwrap();
        let item = CartItem::create(&conn, "alice", &manual("cilantro", 1.0, unit.clone())).unwrap();
        assert_eq!(item.unit, unit);
    }

    #[test]
    fn test_update_partial() {
        let db = setup();
        let conn = db.get_conn().unwrap();

        let item = CartItem::create(&conn, "alice", &manual("flour", 2.0, Unit::Cup)).unwrap();
        let update = CartItemUpdate {
            completed: Some(true),
            ..Default::default()
        };
        let updated = CartItem::update(&conn, "alice", item.id, &update)
            .unwrap()
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.quantity, 2.0);
        assert_eq!(updated.unit, Unit::Cup);

        let none = CartItem::update(&conn, "bob", item.id, &update).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_bulk_deletes_are_scoped() {
        let db = setup();
        let conn = db.get_conn().unwrap();

        let a = CartItem::create(&conn, "alice", &manual("eggs", 12.0, Unit::Whole)).unwrap();
        CartItem::create(&conn, "alice", &manual("salt", 1.0, Unit::ToTaste)).unwrap();
        CartItem::create(&conn, "bob", &manual("eggs", 6.0, Unit::Whole)).unwrap();

        CartItem::update(
            &conn,
            "alice",
            a.id,
            &CartItemUpdate {
                completed: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(CartItem::delete_completed(&conn, "alice").unwrap(), 1);
        assert_eq!(CartItem::count(&conn, "alice").unwrap(), 1);
        assert_eq!(CartItem::delete_all(&conn, "alice").unwrap(), 1);
        assert_eq!(CartItem::count(&conn, "bob").unwrap(), 1);
    }
}
