//! Recipe MCP Tools
//!
//! Tools for creating, browsing, editing and deleting recipes.

use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

use crate::consolidation::Unit;
use crate::db::{Database, DbResult};
use crate::models::{Difficulty, Recipe, RecipeCreate, RecipeIngredient, RecipeUpdate};

use super::shopping_cart::{sync_recipe_items, SyncCounts};

/// Title of the recipe inserted by create_sample_recipe
pub const SAMPLE_RECIPE_TITLE: &str = "Classic Spaghetti Carbonara";

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub user_id: String,
    pub is_public: bool,
    pub difficulty: Difficulty,
    pub servings: i64,
    pub total_time: i64,
    pub tags: Vec<String>,
    pub ingredient_count: usize,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for update_recipe
#[derive(Debug, Serialize)]
pub struct UpdateRecipeResponse {
    pub recipe: Recipe,
    /// True when items of this recipe in the cart were resynced
    pub cart_updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_sync: Option<SyncCounts>,
}

/// Response for successful delete
#[derive(Debug, Serialize)]
pub struct RecipeDeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Create a new recipe
pub fn create_recipe(db: &Database, user_id: &str, data: RecipeCreate) -> Result<Recipe, String> {
    let data = data.validated().map_err(|e| e.to_string())?;

    let recipe = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let recipe = Recipe::create(&tx, user_id, &data)?;
            tx.commit()?;
            Ok(recipe)
        })
        .map_err(|e| format!("Failed to create recipe: {}", e))?;

    info!(recipe_id = recipe.id, title = %recipe.title, "Created recipe");
    Ok(recipe)
}

/// Get a recipe the user owns, or any public recipe
pub fn get_recipe(db: &Database, user_id: &str, id: i64) -> Result<Option<Recipe>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Recipe::get_readable(&conn, user_id, id).map_err(|e| format!("Failed to get recipe: {}", e))
}

/// List recipes with filtering
#[allow(clippy::too_many_arguments)]
pub fn list_recipes(
    db: &Database,
    user_id: &str,
    query: Option<&str>,
    tag: Option<&str>,
    include_public: bool,
    sort_by: &str,
    sort_order: &str,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::list(
        &conn,
        user_id,
        query,
        tag,
        include_public,
        sort_by,
        sort_order,
        limit,
        offset,
    )
    .map_err(|e| format!("Failed to list recipes: {}", e))?;

    let total = Recipe::count(&conn, user_id, query, tag, include_public)
        .map_err(|e| format!("Failed to count recipes: {}", e))?;

    let summaries = recipes
        .into_iter()
        .map(|recipe| RecipeSummary {
            id: recipe.id,
            total_time: recipe.prep_time + recipe.cook_time,
            ingredient_count: recipe.ingredients.len(),
            title: recipe.title,
            user_id: recipe.user_id,
            is_public: recipe.is_public,
            difficulty: recipe.difficulty,
            servings: recipe.servings,
            tags: recipe.tags,
        })
        .collect();

    Ok(ListRecipesResponse {
        recipes: summaries,
        total,
        limit,
        offset,
    })
}

/// Update a recipe the user owns, then resync its items in the cart
///
/// A failed resync is logged and reported as `cart_updated: false`; the
/// recipe update itself still stands.
pub fn update_recipe(
    db: &Database,
    user_id: &str,
    id: i64,
    data: RecipeUpdate,
) -> Result<Option<UpdateRecipeResponse>, String> {
    let data = data.validated().map_err(|e| e.to_string())?;

    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = apply_update(&mut conn, user_id, id, &data)
        .map_err(|e| format!("Failed to update recipe: {}", e))?;
    let Some(recipe) = updated else {
        return Ok(None);
    };

    let cart_sync = match resync_cart(&mut conn, user_id, &recipe) {
        Ok(counts) => counts,
        Err(e) => {
            warn!(recipe_id = id, error = %e, "Failed to update cart after recipe edit");
            None
        }
    };

    Ok(Some(UpdateRecipeResponse {
        recipe,
        cart_updated: cart_sync.is_some(),
        cart_sync,
    }))
}

fn apply_update(
    conn: &mut Connection,
    user_id: &str,
    id: i64,
    data: &RecipeUpdate,
) -> DbResult<Option<Recipe>> {
    let tx = conn.transaction()?;
    let recipe = Recipe::update(&tx, user_id, id, data)?;
    tx.commit()?;
    Ok(recipe)
}

fn resync_cart(conn: &mut Connection, user_id: &str, recipe: &Recipe) -> DbResult<Option<SyncCounts>> {
    let tx = conn.transaction()?;
    let counts = sync_recipe_items(&tx, user_id, recipe)?;
    tx.commit()?;
    Ok(counts)
}

/// Delete a recipe the user owns
///
/// Cart items copied from the recipe stay in the cart.
pub fn delete_recipe(db: &Database, user_id: &str, id: i64) -> Result<RecipeDeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Recipe::delete(&conn, user_id, id)
        .map_err(|e| format!("Failed to delete recipe: {}", e))?;
    if !deleted {
        return Err(format!("Recipe not found with id: {}", id));
    }

    Ok(RecipeDeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// Insert the Carbonara sample recipe for the user
pub fn create_sample_recipe(db: &Database, user_id: &str) -> Result<Recipe, String> {
    create_recipe(db, user_id, sample_recipe())
}

fn sample_recipe() -> RecipeCreate {
    let ingredient = |quantity: f64, unit: Unit, text: &str, notes: Option<&str>| RecipeIngredient {
        quantity,
        unit,
        display_text: text.to_string(),
        notes: notes.map(str::to_string),
    };

    RecipeCreate {
        title: SAMPLE_RECIPE_TITLE.to_string(),
        description: Some(
            "A traditional Italian pasta dish with eggs, cheese, and pancetta.".to_string(),
        ),
        instructions: [
            "Bring a large pot of salted water to boil",
            "Cook spaghetti according to package directions until al dente",
            "While pasta cooks, heat a large skillet over medium heat",
            "Add pancetta and cook until crispy, about 5 minutes",
            "In a bowl, whisk together eggs, Parmesan cheese, and black pepper",
            "Drain pasta, reserving 1 cup pasta water",
            "Add hot pasta to skillet with pancetta",
            "Remove from heat and quickly stir in egg mixture",
            "Add pasta water as needed to create a creamy sauce",
            "Serve immediately with extra Parmesan",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        ingredients: vec![
            ingredient(1.0, Unit::Lb, "1 lb spaghetti pasta", None),
            ingredient(4.0, Unit::Oz, "4 oz pancetta", Some("diced")),
            ingredient(3.0, Unit::Other("large".to_string()), "3 large eggs", None),
            ingredient(
                1.0,
                Unit::Cup,
                "1 cup grated Parmesan cheese",
                Some("plus extra for serving"),
            ),
        ],
        cook_time: 15,
        prep_time: 10,
        servings: 4,
        tags: ["pasta", "italian", "dinner", "quick"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        image_url: None,
        is_public: false,
        difficulty: Difficulty::Easy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::shopping_cart::{add_recipe_to_cart, get_shopping_list, update_cart_item};

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    #[test]
    fn test_sample_recipe_is_valid() {
        let db = setup();
        let recipe = create_sample_recipe(&db, "alice").unwrap();
        assert_eq!(recipe.title, SAMPLE_RECIPE_TITLE);
        assert_eq!(recipe.ingredients.len(), 4);
        assert_eq!(recipe.instructions.len(), 10);
        assert_eq!(recipe.ingredients[2].unit, Unit::Other("large".to_string()));
        assert_eq!(recipe.tags, vec!["pasta", "italian", "dinner", "quick"]);
    }

    #[test]
    fn test_create_rejects_invalid() {
        let db = setup();
        let mut data = sample_recipe();
        data.servings = 21;
        let err = create_recipe(&db, "alice", data).unwrap_err();
        assert_eq!(err, "Servings must be between 1 and 20");
    }

    #[test]
    fn test_visibility() {
        let db = setup();
        let recipe = create_sample_recipe(&db, "alice").unwrap();

        assert!(get_recipe(&db, "bob", recipe.id).unwrap().is_none());
        assert!(delete_recipe(&db, "bob", recipe.id).is_err());

        let public = RecipeUpdate {
            is_public: Some(true),
            ..Default::default()
        };
        assert!(update_recipe(&db, "bob", recipe.id, public.clone())
            .unwrap()
            .is_none());
        update_recipe(&db, "alice", recipe.id, public).unwrap().unwrap();

        assert!(get_recipe(&db, "bob", recipe.id).unwrap().is_some());

        let listed = list_recipes(&db, "bob", None, Some("Italian"), true, "title", "asc", 50, 0)
            .unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.recipes[0].total_time, 25);

        let own = list_recipes(&db, "bob", None, None, false, "title", "asc", 50, 0).unwrap();
        assert_eq!(own.total, 0);
    }

    #[test]
    fn test_update_resyncs_cart() {
        let db = setup();
        let recipe = create_sample_recipe(&db, "alice").unwrap();

        // Not in the cart yet
        let response = update_recipe(
            &db,
            "alice",
            recipe.id,
            RecipeUpdate {
                servings: Some(6),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert!(!response.cart_updated);

        add_recipe_to_cart(&db, "alice", recipe.id).unwrap();
        let pasta = get_shopping_list(&db, "alice", true)
            .unwrap()
            .items
            .into_iter()
            .find(|i| i.ingredient == "1 lb spaghetti pasta")
            .unwrap();
        update_cart_item(&db, "alice", pasta.id, Some(true), None, None).unwrap();

        let mut ingredients = recipe.ingredients.clone();
        ingredients[0].quantity = 2.0;
        ingredients.truncate(2);

        let response = update_recipe(
            &db,
            "alice",
            recipe.id,
            RecipeUpdate {
                ingredients: Some(ingredients),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert!(response.cart_updated);
        let counts = response.cart_sync.unwrap();
        assert_eq!(counts.updated, 2);
        assert_eq!(counts.removed, 2);
        assert_eq!(counts.preserved_completed, 1);

        let items = get_shopping_list(&db, "alice", true).unwrap().items;
        assert_eq!(items.len(), 2);
        let pasta_after = items.iter().find(|i| i.id == pasta.id).unwrap();
        assert!(pasta_after.completed);
        assert_eq!(pasta_after.quantity, 2.0);
    }

    #[test]
    fn test_delete_keeps_cart_items() {
        let db = setup();
        let recipe = create_sample_recipe(&db, "alice").unwrap();
        add_recipe_to_cart(&db, "alice", recipe.id).unwrap();

        assert!(delete_recipe(&db, "alice", recipe.id).unwrap().success);
        assert!(get_recipe(&db, "alice", recipe.id).unwrap().is_none());
        assert_eq!(get_shopping_list(&db, "alice", true).unwrap().total_items, 4);
    }
}
