//! Shopping Cart MCP Tools
//!
//! Tools for filling, checking off and clearing a user's shopping cart, and
//! for reading it back as a consolidated shopping list.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

use crate::consolidation::{consolidate, ConsolidatedIngredient, Unit};
use crate::db::{Database, DbResult};
use crate::models::validation::validate_quantity;
use crate::models::{
    CartItem, CartItemCreate, CartItemUpdate, Recipe, RecipeIngredient, MANUAL_ADDITION_TITLE,
};

/// Response for get_shopping_list
#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub items: Vec<CartItem>,
    pub consolidated: Vec<ConsolidatedIngredient>,
    pub total_items: usize,
    pub pending_items: usize,
    pub completed_items: usize,
    pub include_completed: bool,
}

/// Response for add_recipe_to_cart
#[derive(Debug, Serialize)]
pub struct AddRecipeToCartResponse {
    pub recipe_id: i64,
    pub recipe_title: String,
    pub items_added: usize,
    pub cart_size: i64,
}

/// Response for tools that delete many items
#[derive(Debug, Serialize)]
pub struct RemoveItemsResponse {
    pub removed: usize,
    pub cart_size: i64,
}

/// Response for remove_cart_item
#[derive(Debug, Serialize)]
pub struct RemoveItemResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Outcome of merging a recipe's current ingredients into the cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    pub updated: usize,
    pub added: usize,
    pub removed: usize,
    pub preserved_completed: usize,
}

/// Response for sync_recipe_in_cart
#[derive(Debug, Serialize)]
pub struct SyncRecipeResponse {
    pub recipe_id: i64,
    #[serde(flatten)]
    pub counts: SyncCounts,
    pub cart_size: i64,
}

// ============================================================================
// Smart merge
// ============================================================================

/// Changes needed to bring a recipe's cart items in line with its ingredients
#[derive(Debug, Default, PartialEq)]
struct SyncPlan<'a> {
    /// Existing item id paired with the ingredient that replaces its contents
    updates: Vec<(i64, &'a RecipeIngredient)>,
    additions: Vec<&'a RecipeIngredient>,
    removals: Vec<i64>,
    preserved_completed: usize,
}

impl SyncPlan<'_> {
    fn counts(&self) -> SyncCounts {
        SyncCounts {
            updated: self.updates.len(),
            added: self.additions.len(),
            removed: self.removals.len(),
            preserved_completed: self.preserved_completed,
        }
    }
}

/// Match existing items to new ingredients by lower-cased label
///
/// When two existing items share a label the later one is the match and the
/// earlier one is removed. Each existing item matches at most one ingredient.
fn plan_sync<'a>(existing: &[CartItem], ingredients: &'a [RecipeIngredient]) -> SyncPlan<'a> {
    let mut by_label: HashMap<String, &CartItem> = HashMap::new();
    for item in existing {
        by_label.insert(item.ingredient.to_lowercase(), item);
    }

    let mut plan = SyncPlan::default();
    let mut matched = Vec::new();

    for ingredient in ingredients {
        match by_label.remove(&ingredient.display_text.to_lowercase()) {
            Some(item) => {
                if item.completed {
                    plan.preserved_completed += 1;
                }
                matched.push(item.id);
                plan.updates.push((item.id, ingredient));
            }
            None => plan.additions.push(ingredient),
        }
    }

    plan.removals = existing
        .iter()
        .map(|item| item.id)
        .filter(|id| !matched.contains(id))
        .collect();

    plan
}

/// Apply the smart merge for one recipe on an open connection
///
/// Returns None when the recipe has no items in the user's cart. Callers
/// should run this inside a transaction.
pub(crate) fn sync_recipe_items(
    conn: &Connection,
    user_id: &str,
    recipe: &Recipe,
) -> DbResult<Option<SyncCounts>> {
    let existing = CartItem::list_for_recipe(conn, user_id, recipe.id)?;
    if existing.is_empty() {
        return Ok(None);
    }

    let plan = plan_sync(&existing, &recipe.ingredients);

    for id in &plan.removals {
        CartItem::delete(conn, user_id, *id)?;
    }
    for (id, ingredient) in &plan.updates {
        CartItem::refresh_from_recipe(
            conn,
            user_id,
            *id,
            &recipe.title,
            &ingredient.display_text,
            ingredient.quantity,
            &ingredient.unit,
        )?;
    }
    for ingredient in &plan.additions {
        CartItem::create(conn, user_id, &recipe_item(recipe, ingredient))?;
    }

    let counts = plan.counts();
    debug!(
        recipe_id = recipe.id,
        updated = counts.updated,
        added = counts.added,
        removed = counts.removed,
        "Synced recipe items in cart"
    );
    Ok(Some(counts))
}

fn recipe_item(recipe: &Recipe, ingredient: &RecipeIngredient) -> CartItemCreate {
    CartItemCreate {
        recipe_id: Some(recipe.id),
        recipe_title: Some(recipe.title.clone()),
        ingredient: ingredient.display_text.clone(),
        quantity: ingredient.quantity,
        unit: ingredient.unit.clone(),
        completed: false,
    }
}

// ============================================================================
// Cart Tools
// ============================================================================

/// Get the cart with its consolidated shopping list
pub fn get_shopping_list(
    db: &Database,
    user_id: &str,
    include_completed: bool,
) -> Result<ShoppingListResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let items = CartItem::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get cart items: {}", e))?;

    let completed_items = items.iter().filter(|i| i.completed).count();
    let to_consolidate: Vec<CartItem> = items
        .iter()
        .filter(|i| include_completed || !i.completed)
        .cloned()
        .collect();

    Ok(ShoppingListResponse {
        total_items: items.len(),
        pending_items: items.len() - completed_items,
        completed_items,
        consolidated: consolidate(to_consolidate),
        items,
        include_completed,
    })
}

/// Copy every ingredient of a recipe into the cart
pub fn add_recipe_to_cart(
    db: &Database,
    user_id: &str,
    recipe_id: i64,
) -> Result<AddRecipeToCartResponse, String> {
    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_readable(&conn, user_id, recipe_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Recipe not found with id: {}", recipe_id))?;

    let tx = conn
        .transaction()
        .map_err(|e| format!("Database error: {}", e))?;
    for ingredient in &recipe.ingredients {
        CartItem::create(&tx, user_id, &recipe_item(&recipe, ingredient))
            .map_err(|e| format!("Failed to add cart item: {}", e))?;
    }
    let cart_size = CartItem::count(&tx, user_id)
        .map_err(|e| format!("Failed to count cart items: {}", e))?;
    tx.commit().map_err(|e| format!("Database error: {}", e))?;

    info!(recipe_id, items = recipe.ingredients.len(), "Added recipe to cart");

    Ok(AddRecipeToCartResponse {
        recipe_id,
        items_added: recipe.ingredients.len(),
        recipe_title: recipe.title,
        cart_size,
    })
}

/// Add a hand-entered item to the cart
pub fn add_cart_item(
    db: &Database,
    user_id: &str,
    ingredient: &str,
    quantity: f64,
    unit: &str,
) -> Result<CartItem, String> {
    let ingredient = ingredient.trim();
    if ingredient.is_empty() {
        return Err("Ingredient is required".to_string());
    }
    validate_quantity(quantity).map_err(|e| e.to_string())?;
    let unit = Unit::parse(unit).map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let data = CartItemCreate {
        recipe_id: None,
        recipe_title: Some(MANUAL_ADDITION_TITLE.to_string()),
        ingredient: ingredient.to_string(),
        quantity,
        unit,
        completed: false,
    };

    CartItem::create(&conn, user_id, &data).map_err(|e| format!("Failed to add cart item: {}", e))
}

/// Check off an item or change its amount
pub fn update_cart_item(
    db: &Database,
    user_id: &str,
    id: i64,
    completed: Option<bool>,
    quantity: Option<f64>,
    unit: Option<&str>,
) -> Result<Option<CartItem>, String> {
    if let Some(quantity) = quantity {
        validate_quantity(quantity).map_err(|e| e.to_string())?;
    }
    let unit = unit
        .map(Unit::parse)
        .transpose()
        .map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let data = CartItemUpdate {
        completed,
        quantity,
        unit,
    };

    CartItem::update(&conn, user_id, id, &data)
        .map_err(|e| format!("Failed to update cart item: {}", e))
}

/// Remove a single item
pub fn remove_cart_item(db: &Database, user_id: &str, id: i64) -> Result<RemoveItemResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = CartItem::delete(&conn, user_id, id)
        .map_err(|e| format!("Failed to delete cart item: {}", e))?;
    if !deleted {
        return Err(format!("Cart item not found with id: {}", id));
    }

    Ok(RemoveItemResponse {
        success: true,
        deleted_id: id,
    })
}

/// Remove every item copied from one recipe
pub fn remove_recipe_from_cart(
    db: &Database,
    user_id: &str,
    recipe_id: i64,
) -> Result<RemoveItemsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = CartItem::delete_for_recipe(&conn, user_id, recipe_id)
        .map_err(|e| format!("Failed to remove recipe items: {}", e))?;
    let cart_size = CartItem::count(&conn, user_id)
        .map_err(|e| format!("Failed to count cart items: {}", e))?;

    Ok(RemoveItemsResponse { removed, cart_size })
}

/// Remove every checked-off item
pub fn clear_completed_items(db: &Database, user_id: &str) -> Result<RemoveItemsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = CartItem::delete_completed(&conn, user_id)
        .map_err(|e| format!("Failed to clear completed items: {}", e))?;
    let cart_size = CartItem::count(&conn, user_id)
        .map_err(|e| format!("Failed to count cart items: {}", e))?;

    Ok(RemoveItemsResponse { removed, cart_size })
}

/// Empty the cart
pub fn clear_cart(db: &Database, user_id: &str) -> Result<RemoveItemsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = CartItem::delete_all(&conn, user_id)
        .map_err(|e| format!("Failed to clear cart: {}", e))?;

    Ok(RemoveItemsResponse {
        removed,
        cart_size: 0,
    })
}

/// Merge a recipe's current ingredients into the items already in the cart
pub fn sync_recipe_in_cart(
    db: &Database,
    user_id: &str,
    recipe_id: i64,
) -> Result<SyncRecipeResponse, String> {
    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_readable(&conn, user_id, recipe_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Recipe not found with id: {}", recipe_id))?;

    let tx = conn
        .transaction()
        .map_err(|e| format!("Database error: {}", e))?;
    let counts = sync_recipe_items(&tx, user_id, &recipe)
        .map_err(|e| format!("Failed to update cart items: {}", e))?
        .ok_or_else(|| format!("Recipe {} has no items in the cart", recipe_id))?;
    let cart_size = CartItem::count(&tx, user_id)
        .map_err(|e| format!("Failed to count cart items: {}", e))?;
    tx.commit().map_err(|e| format!("Database error: {}", e))?;

    Ok(SyncRecipeResponse {
        recipe_id,
        counts,
        cart_size,
    })
}
