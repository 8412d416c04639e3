//! Recipe model
//!
//! Represents a user's recipe with its ordered ingredients and instructions.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::consolidation::Unit;
use crate::db::{DbError, DbResult};
use super::json_list;
use super::validation::{
    validate_image_url, ValidationError, MAX_DESCRIPTION_LEN, MAX_SERVINGS, MAX_TITLE_LEN,
    MIN_INGREDIENT_QUANTITY, MIN_SERVINGS,
};

/// Recipe difficulty
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Parse user input, rejecting unknown values
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::from_str(s).ok_or_else(|| ValidationError::InvalidDifficulty(s.to_string()))
    }
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub quantity: f64,
    pub unit: Unit,
    /// Label shown to the cook and copied into the cart, e.g. "2 cups flour"
    pub display_text: String,
    /// Preparation notes such as "diced"
    pub notes: Option<String>,
}

/// A recipe with ingredients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Vec<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub cook_time: i64,
    pub prep_time: i64,
    pub servings: i64,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub is_public: bool,
    pub difficulty: Difficulty,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub title: String,
    pub description: Option<String>,
    pub instructions: Vec<String>,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub cook_time: i64,
    #[serde(default)]
    pub prep_time: i64,
    #[serde(default = "default_servings")]
    pub servings: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn default_servings() -> i64 {
    4
}

/// Data for updating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<Vec<String>>,
    /// Replaces the full ingredient list when set
    pub ingredients: Option<Vec<RecipeIngredient>>,
    pub cook_time: Option<i64>,
    pub prep_time: Option<i64>,
    pub servings: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub is_public: Option<bool>,
    pub difficulty: Option<Difficulty>,
}

// ============================================================================
// Validation
// ============================================================================

fn clean_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(title.to_string())
}

fn clean_description(description: Option<String>) -> Result<Option<String>, ValidationError> {
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if let Some(ref d) = description {
        if d.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooLong);
        }
    }
    Ok(description)
}

fn check_time(value: i64, field: &'static str) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeTime(field));
    }
    Ok(())
}

fn check_servings(servings: i64) -> Result<(), ValidationError> {
    if !(MIN_SERVINGS..=MAX_SERVINGS).contains(&servings) {
        return Err(ValidationError::ServingsOutOfRange);
    }
    Ok(())
}

fn clean_ingredients(
    ingredients: Vec<RecipeIngredient>,
) -> Result<Vec<RecipeIngredient>, ValidationError> {
    if ingredients.is_empty() {
        return Err(ValidationError::NoIngredients);
    }

    ingredients
        .into_iter()
        .enumerate()
        .map(|(i, ingredient)| {
            let index = i + 1;
            if !ingredient.quantity.is_finite() || ingredient.quantity < MIN_INGREDIENT_QUANTITY {
                return Err(ValidationError::IngredientQuantity { index });
            }
            let display_text = ingredient.display_text.trim().to_string();
            if display_text.is_empty() {
                return Err(ValidationError::IngredientDescription { index });
            }
            Ok(RecipeIngredient {
                quantity: ingredient.quantity,
                unit: ingredient.unit,
                display_text,
                notes: ingredient
                    .notes
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
            })
        })
        .collect()
}

fn clean_instructions(instructions: Vec<String>) -> Result<Vec<String>, ValidationError> {
    if instructions.is_empty() {
        return Err(ValidationError::NoInstructions);
    }
    instructions
        .into_iter()
        .enumerate()
        .map(|(i, step)| {
            let step = step.trim().to_string();
            if step.is_empty() {
                Err(ValidationError::EmptyInstruction(i + 1))
            } else {
                Ok(step)
            }
        })
        .collect()
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}

fn clean_image_url(image_url: Option<String>) -> Result<Option<String>, ValidationError> {
    let image_url = image_url.map(|u| u.trim().to_string());
    if let Some(ref url) = image_url {
        validate_image_url(url)?;
    }
    Ok(image_url.filter(|u| !u.is_empty()))
}

impl RecipeCreate {
    /// Trim and validate user input
    pub fn validated(self) -> Result<Self, ValidationError> {
        check_time(self.cook_time, "Cook time")?;
        check_time(self.prep_time, "Prep time")?;
        check_servings(self.servings)?;

        Ok(Self {
            title: clean_title(&self.title)?,
            description: clean_description(self.description)?,
            ingredients: clean_ingredients(self.ingredients)?,
            instructions: clean_instructions(self.instructions)?,
            tags: clean_tags(self.tags),
            image_url: clean_image_url(self.image_url)?,
            ..self
        })
    }
}

impl RecipeUpdate {
    /// Trim and validate the fields being changed
    pub fn validated(self) -> Result<Self, ValidationError> {
        if let Some(cook_time) = self.cook_time {
            check_time(cook_time, "Cook time")?;
        }
        if let Some(prep_time) = self.prep_time {
            check_time(prep_time, "Prep time")?;
        }
        if let Some(servings) = self.servings {
            check_servings(servings)?;
        }

        Ok(Self {
            title: self.title.as_deref().map(clean_title).transpose()?,
            description: match self.description {
                // An explicit blank clears the description
                Some(d) => Some(clean_description(Some(d))?.unwrap_or_default()),
                None => None,
            },
            instructions: self.instructions.map(clean_instructions).transpose()?,
            ingredients: self.ingredients.map(clean_ingredients).transpose()?,
            tags: self.tags.map(clean_tags),
            image_url: match self.image_url {
                Some(u) => Some(clean_image_url(Some(u))?.unwrap_or_default()),
                None => None,
            },
            ..self
        })
    }
}

// ============================================================================
// Persistence
// ============================================================================

impl Recipe {
    /// Create a Recipe from a database row (ingredients loaded separately)
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let difficulty: String = row.get("difficulty")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            instructions: json_list(row, "instructions")?,
            ingredients: Vec::new(),
            cook_time: row.get("cook_time")?,
            prep_time: row.get("prep_time")?,
            servings: row.get("servings")?,
            tags: json_list(row, "tags")?,
            image_url: row.get("image_url")?,
            is_public: row.get::<_, i32>("is_public")? != 0,
            difficulty: Difficulty::from_str(&difficulty).unwrap_or_default(),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn ingredient_from_row(row: &Row) -> rusqlite::Result<RecipeIngredient> {
        let unit: String = row.get("unit")?;
        Ok(RecipeIngredient {
            quantity: row.get("quantity")?,
            unit: Unit::parse(&unit).unwrap_or_else(|_| Unit::Other(unit)),
            display_text: row.get("display_text")?,
            notes: row.get("notes")?,
        })
    }

    fn load_ingredients(conn: &Connection, recipe_id: i64) -> DbResult<Vec<RecipeIngredient>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY position ASC",
        )?;
        let ingredients = stmt
            .query_map([recipe_id], Self::ingredient_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ingredients)
    }

    fn replace_ingredients(
        conn: &Connection,
        recipe_id: i64,
        ingredients: &[RecipeIngredient],
    ) -> DbResult<()> {
        conn.execute("DELETE FROM recipe_ingredients WHERE recipe_id = ?1", [recipe_id])?;

        let mut stmt = conn.prepare(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, position, quantity, unit, display_text, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )?;
        for (position, ingredient) in ingredients.iter().enumerate() {
            stmt.execute(params![
                recipe_id,
                position as i64,
                ingredient.quantity,
                ingredient.unit.as_str(),
                ingredient.display_text,
                ingredient.notes,
            ])?;
        }
        Ok(())
    }

    /// Insert a new recipe with its ingredients
    ///
    /// Call inside a transaction so the recipe and its ingredient rows land together.
    pub fn create(conn: &Connection, user_id: &str, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipes (user_id, title, description, instructions, cook_time, prep_time,
                                 servings, tags, image_url, is_public, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                user_id,
                data.title,
                data.description,
                serde_json::to_string(&data.instructions)?,
                data.cook_time,
                data.prep_time,
                data.servings,
                serde_json::to_string(&data.tags)?,
                data.image_url,
                data.is_public as i32,
                data.difficulty.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::replace_ingredients(conn, id, &data.ingredients)?;

        Self::get_by_id(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a recipe by ID regardless of owner
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        let mut recipe = match result {
            Ok(recipe) => recipe,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        recipe.ingredients = Self::load_ingredients(conn, id)?;
        Ok(Some(recipe))
    }

    /// Get a recipe owned by the user
    pub fn get_owned(conn: &Connection, user_id: &str, id: i64) -> DbResult<Option<Self>> {
        Ok(Self::get_by_id(conn, id)?.filter(|r| r.user_id == user_id))
    }

    /// Get a recipe the user may read: their own, or anyone's public recipe
    pub fn get_readable(conn: &Connection, user_id: &str, id: i64) -> DbResult<Option<Self>> {
        Ok(Self::get_by_id(conn, id)?.filter(|r| r.user_id == user_id || r.is_public))
    }

    /// List recipes with optional filtering
    #[allow(clippy::too_many_arguments)]
    pub fn list(
        conn: &Connection,
        user_id: &str,
        query: Option<&str>,
        tag: Option<&str>,
        include_public: bool,
        sort_by: &str,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let order = if sort_order.to_lowercase() == "desc" { "DESC" } else { "ASC" };
        let sort_col = match sort_by.to_lowercase().as_str() {
            "created_at" => "created_at",
            "updated_at" => "updated_at",
            _ => "title COLLATE NOCASE",
        };

        let (where_sql, params_vec) = Self::filter_clause(user_id, query, tag, include_public);
        let sql = format!(
            "SELECT * FROM recipes WHERE {} ORDER BY {} {}, id ASC LIMIT ?{} OFFSET ?{}",
            where_sql,
            sort_col,
            order,
            params_vec.len() + 1,
            params_vec.len() + 2
        );

        let mut params_vec = params_vec;
        params_vec.push(Box::new(limit));
        params_vec.push(Box::new(offset));
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let mut recipes = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for recipe in &mut recipes {
            recipe.ingredients = Self::load_ingredients(conn, recipe.id)?;
        }

        Ok(recipes)
    }

    /// Count recipes matching the same filters as `list`
    pub fn count(
        conn: &Connection,
        user_id: &str,
        query: Option<&str>,
        tag: Option<&str>,
        include_public: bool,
    ) -> DbResult<i64> {
        let (where_sql, params_vec) = Self::filter_clause(user_id, query, tag, include_public);
        let sql = format!("SELECT COUNT(*) FROM recipes WHERE {}", where_sql);
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let count: i64 = conn.query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
        Ok(count)
    }

    fn filter_clause(
        user_id: &str,
        query: Option<&str>,
        tag: Option<&str>,
        include_public: bool,
    ) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut clauses = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        params_vec.push(Box::new(user_id.to_string()));
        if include_public {
            clauses.push("(user_id = ?1 OR is_public = 1)".to_string());
        } else {
            clauses.push("user_id = ?1".to_string());
        }

        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            clauses.push(format!("title LIKE ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(format!("%{}%", q)));
        }

        if let Some(t) = tag.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty()) {
            // Tags are stored as a JSON array of strings
            clauses.push(format!("tags LIKE ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(format!("%\"{}\"%", t)));
        }

        (clauses.join(" AND "), params_vec)
    }

    /// Update a recipe owned by the user
    pub fn update(
        conn: &Connection,
        user_id: &str,
        id: i64,
        data: &RecipeUpdate,
    ) -> DbResult<Option<Self>> {
        if Self::get_owned(conn, user_id, id)?.is_none() {
            return Ok(None);
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref title) = data.title {
            updates.push(format!("title = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(title.clone()));
        }
        if let Some(ref description) = data.description {
            updates.push(format!("description = ?{}", params_vec.len() + 1));
            let value: Option<String> = Some(description.clone()).filter(|d| !d.is_empty());
            params_vec.push(Box::new(value));
        }
        if let Some(ref instructions) = data.instructions {
            updates.push(format!("instructions = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serde_json::to_string(instructions)?));
        }
        if let Some(cook_time) = data.cook_time {
            updates.push(format!("cook_time = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(cook_time));
        }
        if let Some(prep_time) = data.prep_time {
            updates.push(format!("prep_time = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(prep_time));
        }
        if let Some(servings) = data.servings {
            updates.push(format!("servings = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(servings));
        }
        if let Some(ref tags) = data.tags {
            updates.push(format!("tags = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serde_json::to_string(tags)?));
        }
        if let Some(ref image_url) = data.image_url {
            updates.push(format!("image_url = ?{}", params_vec.len() + 1));
            let value: Option<String> = Some(image_url.clone()).filter(|u| !u.is_empty());
            params_vec.push(Box::new(value));
        }
        if let Some(is_public) = data.is_public {
            updates.push(format!("is_public = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(is_public as i32));
        }
        if let Some(difficulty) = data.difficulty {
            updates.push(format!("difficulty = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(difficulty.as_str()));
        }

        if let Some(ref ingredients) = data.ingredients {
            Self::replace_ingredients(conn, id, ingredients)?;
        }

        if updates.is_empty() && data.ingredients.is_none() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a recipe owned by the user. Returns false if not found.
    ///
    /// Cart items copied from the recipe are left in place.
    pub fn delete(conn: &Connection, user_id: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM recipes WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
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

    fn ingredient(quantity: f64, unit: Unit, text: &str) -> RecipeIngredient {
        RecipeIngredient {
            quantity,
            unit,
            display_text: text.to_string(),
            notes: None,
        }
    }

    fn pancakes() -> RecipeCreate {
        RecipeCreate {
            title: "  Pancakes ".to_string(),
            description: Some("Fluffy".to_string()),
            instructions: vec!["Mix".to_string(), " Cook ".to_string()],
            ingredients: vec![
                ingredient(2.0, Unit::Cup, "flour"),
                ingredient(1.0, Unit::Cup, "milk"),
            ],
            cook_time: 10,
            prep_time: 5,
            servings: 4,
            tags: vec!["Breakfast".to_string(), " ".to_string(), "breakfast".to_string()],
            image_url: None,
            is_public: false,
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn test_validated_cleans_input() {
        let data = pancakes().validated().unwrap();
        assert_eq!(data.title, "Pancakes");
        assert_eq!(data.instructions, vec!["Mix", "Cook"]);
        assert_eq!(data.tags, vec!["breakfast"]);
    }

    #[test]
    fn test_validated_rejects_bad_input() {
        let mut data = pancakes();
        data.title = "   ".to_string();
        assert_eq!(data.validated().unwrap_err(), ValidationError::TitleRequired);

        let mut data = pancakes();
        data.servings = 21;
        assert_eq!(data.validated().unwrap_err(), ValidationError::ServingsOutOfRange);

        let mut data = pancakes();
        data.ingredients[1].quantity = 0.05;
        assert_eq!(
            data.validated().unwrap_err(),
            ValidationError::IngredientQuantity { index: 2 }
        );

        let mut data = pancakes();
        data.instructions.clear();
        assert_eq!(data.validated().unwrap_err(), ValidationError::NoInstructions);

        let mut data = pancakes();
        data.prep_time = -1;
        assert_eq!(
            data.validated().unwrap_err(),
            ValidationError::NegativeTime("Prep time")
        );
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("Hard"), Ok(Difficulty::Hard));
        assert!(Difficulty::parse("extreme").is_err());
    }

    #[test]
    fn test_create_get_and_ownership() {
        let db = setup();
        let conn = db.get_conn().unwrap();

        let recipe = Recipe::create(&conn, "alice", &pancakes().validated().unwrap()).unwrap();
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].display_text, "flour");
        assert_eq!(recipe.ingredients[0].unit, Unit::Cup);

        assert!(Recipe::get_owned(&conn, "alice", recipe.id).unwrap().is_some());
        assert!(Recipe::get_owned(&conn, "bob", recipe.id).unwrap().is_none());
        assert!(Recipe::get_readable(&conn, "bob", recipe.id).unwrap().is_none());

        let update = RecipeUpdate {
            is_public: Some(true),
            ..Default::default()
        };
        Recipe::update(&conn, "alice", recipe.id, &update).unwrap();
        assert!(Recipe::get_readable(&conn, "bob", recipe.id).unwrap().is_some());

        // Only the owner may edit or delete
        assert!(Recipe::update(&conn, "bob", recipe.id, &update).unwrap().is_none());
        assert!(!Recipe::delete(&conn, "bob", recipe.id).unwrap());
        assert!(Recipe::delete(&conn, "alice", recipe.id).unwrap());
        assert!(Recipe::get_by_id(&conn, recipe.id).unwrap().is_none());
    }

    #[test]
    fn test_update_replaces_ingredients() {
        let db = setup();
        let conn = db.get_conn().unwrap();

        let recipe = Recipe::create(&conn, "alice", &pancakes().validated().unwrap()).unwrap();
        let update = RecipeUpdate {
            title: Some("Buttermilk Pancakes".to_string()),
            ingredients: Some(vec![ingredient(3.0, Unit::Cup, "flour")]),
            ..Default::default()
        };
        let updated = Recipe::update(&conn, "alice", recipe.id, &update)
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Buttermilk Pancakes");
        assert_eq!(updated.ingredients, vec![ingredient(3.0, Unit::Cup, "flour")]);
        assert_eq!(updated.instructions, recipe.instructions);
    }

    #[test]
    fn test_list_filters() {
        let db = setup();
        let conn = db.get_conn().unwrap();

        Recipe::create(&conn, "alice", &pancakes().validated().unwrap()).unwrap();
        let mut soup = pancakes();
        soup.title = "Tomato Soup".to_string();
        soup.tags = vec!["dinner".to_string()];
        soup.is_public = true;
        Recipe::create(&conn, "bob", &soup.validated().unwrap()).unwrap();

        let own = Recipe::list(&conn, "alice", None, None, false, "title", "asc", 50, 0).unwrap();
        assert_eq!(own.len(), 1);

        let all = Recipe::list(&conn, "alice", None, None, true, "title", "asc", 50, 0).unwrap();
        let titles: Vec<&str> = all.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Pancakes", "Tomato Soup"]);

        let dinner = Recipe::list(&conn, "alice", None, Some("Dinner"), true, "title", "asc", 50, 0)
            .unwrap();
        assert_eq!(dinner.len(), 1);
        assert_eq!(dinner[0].title, "Tomato Soup");

        let searched = Recipe::list(&conn, "alice", Some("cake"), None, true, "title", "asc", 50, 0)
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(Recipe::count(&conn, "alice", None, None, true).unwrap(), 2);
    }
}
