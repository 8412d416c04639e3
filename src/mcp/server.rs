//! Pantry MCP Server Implementation
//!
//! Implements the MCP server with all pantry tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::consolidation::Unit;
use crate::db::Database;
use crate::models::{
    DefaultView, Difficulty, MeasurementSystem, PreferencesUpdate, RecipeCreate,
    RecipeIngredient, RecipeUpdate, ValidationError,
};
use crate::tools::profile;
use crate::tools::recipes;
use crate::tools::shopping_cart;
use crate::tools::status::StatusTracker;

/// Pantry MCP Service
#[derive(Clone)]
pub struct PantryService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    /// Every tool call acts on this user's recipes and cart
    user_id: String,
    tool_router: ToolRouter<PantryService>,
}

impl PantryService {
    pub fn new(database_path: PathBuf, database: Database, user_id: String) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, user_id.clone()))),
            database,
            user_id,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(what: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        what, id
    ))]))
}

fn invalid(e: impl std::fmt::Display) -> McpError {
    McpError::invalid_params(e.to_string(), None)
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParams {
    /// Amount, at least 0.1
    pub quantity: f64,
    /// Unit such as "cup", "gram", "pinch", "can"; any other text is kept as-is
    pub unit: String,
    /// Ingredient text shown in the recipe and copied into the cart, e.g. "2 cups flour"
    pub display_text: String,
    /// Preparation notes, e.g. "diced"
    pub notes: Option<String>,
}

fn to_ingredients(params: Vec<IngredientParams>) -> Result<Vec<RecipeIngredient>, ValidationError> {
    params
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let unit = Unit::parse(&p.unit)
                .map_err(|source| ValidationError::IngredientUnit { index: i + 1, source })?;
            Ok(RecipeIngredient {
                quantity: p.quantity,
                unit,
                display_text: p.display_text,
                notes: p.notes,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    /// Recipe title (1-100 characters)
    pub title: String,
    /// Optional description (up to 500 characters)
    pub description: Option<String>,
    /// Ordered steps; at least one
    pub instructions: Vec<String>,
    /// Ordered ingredients; at least one
    pub ingredients: Vec<IngredientParams>,
    /// Cook time in minutes (default 0)
    #[serde(default)]
    pub cook_time: i64,
    /// Prep time in minutes (default 0)
    #[serde(default)]
    pub prep_time: i64,
    /// Servings, 1-20 (default 4)
    #[serde(default = "default_servings")]
    pub servings: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Image URL, or empty
    pub image_url: Option<String>,
    /// Share with other users (default false)
    #[serde(default)]
    pub is_public: bool,
    /// easy, medium or hard (default easy)
    pub difficulty: Option<String>,
}

fn default_servings() -> i64 { 4 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeIdParams {
    /// Recipe ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Search text matched against titles (optional)
    pub query: Option<String>,
    /// Only recipes carrying this tag (optional)
    pub tag: Option<String>,
    /// Also include other users' public recipes (default false)
    #[serde(default)]
    pub include_public: bool,
    /// title, created_at or updated_at (default title)
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// asc or desc (default asc)
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_sort_by() -> String { "title".to_string() }
fn default_sort_order() -> String { "asc".to_string() }
fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    /// Recipe ID
    pub id: i64,
    pub title: Option<String>,
    /// Pass an empty string to clear
    pub description: Option<String>,
    pub instructions: Option<Vec<String>>,
    /// Replaces the whole ingredient list
    pub ingredients: Option<Vec<IngredientParams>>,
    pub cook_time: Option<i64>,
    pub prep_time: Option<i64>,
    pub servings: Option<i64>,
    pub tags: Option<Vec<String>>,
    /// Pass an empty string to clear
    pub image_url: Option<String>,
    pub is_public: Option<bool>,
    pub difficulty: Option<String>,
}

// ============================================================================
// Cart Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetShoppingListParams {
    /// Also merge checked-off items into the consolidated list (default false)
    #[serde(default)]
    pub include_completed: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CartRecipeParams {
    /// Recipe ID
    pub recipe_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddCartItemParams {
    /// Ingredient text, e.g. "whole milk"
    pub ingredient: String,
    /// Amount, greater than 0
    pub quantity: f64,
    /// Unit such as "gallon", "can", "piece"
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateCartItemParams {
    /// Cart item ID
    pub id: i64,
    /// Check off (true) or uncheck (false)
    pub completed: Option<bool>,
    /// New amount, greater than 0
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CartItemIdParams {
    /// Cart item ID
    pub id: i64,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// metric or imperial
    pub measurement_system: Option<String>,
    /// Default servings, 1-20
    pub default_serving_size: Option<i64>,
    /// Replaces the stored list
    pub dietary_restrictions: Option<Vec<String>>,
    /// cards or table
    pub default_view: Option<String>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl PantryService {
    // --- Status ---

    #[tool(description = "Get the current status of the pantry service including build info, database status, and process information")]
    async fn pantry_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions for planning a shop: filling the cart, reading the consolidated shopping list, and checking items off. Call this when unsure how to use the cart tools.")]
    fn cart_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CART_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CART_INSTRUCTIONS)]))
    }

    // --- Recipes ---

    #[tool(description = "Create a recipe with ordered ingredients and instructions")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeCreate {
            title: p.title,
            description: p.description,
            instructions: p.instructions,
            ingredients: to_ingredients(p.ingredients).map_err(invalid)?,
            cook_time: p.cook_time,
            prep_time: p.prep_time,
            servings: p.servings,
            tags: p.tags,
            image_url: p.image_url,
            is_public: p.is_public,
            difficulty: p.difficulty.as_deref().map(Difficulty::parse).transpose().map_err(invalid)?.unwrap_or_default(),
        };
        let result = recipes::create_recipe(&self.database, &self.user_id, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Create the sample recipe 'Classic Spaghetti Carbonara'")]
    fn create_sample_recipe(&self) -> Result<CallToolResult, McpError> {
        let result = recipes::create_sample_recipe(&self.database, &self.user_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a recipe with its ingredients and instructions. Works for your own recipes and for public recipes of other users.")]
    fn get_recipe(&self, Parameters(p): Parameters<RecipeIdParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.database, &self.user_id, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(recipe) => to_json(&recipe),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "List recipes with optional title search, tag filter, public recipes, sorting, and pagination")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(
            &self.database,
            &self.user_id,
            p.query.as_deref(),
            p.tag.as_deref(),
            p.include_public,
            &p.sort_by,
            &p.sort_order,
            p.limit,
            p.offset,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a recipe you own. Only the fields given are changed; ingredients replace the whole list. Items of this recipe already in the cart are refreshed, keeping their checked-off state.")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeUpdate {
            title: p.title,
            description: p.description,
            instructions: p.instructions,
            ingredients: p.ingredients.map(to_ingredients).transpose().map_err(invalid)?,
            cook_time: p.cook_time,
            prep_time: p.prep_time,
            servings: p.servings,
            tags: p.tags,
            image_url: p.image_url,
            is_public: p.is_public,
            difficulty: p.difficulty.as_deref().map(Difficulty::parse).transpose().map_err(invalid)?,
        };
        let result = recipes::update_recipe(&self.database, &self.user_id, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(response) => to_json(&response),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "Delete a recipe you own. Its items stay in the cart.")]
    fn delete_recipe(&self, Parameters(p): Parameters<RecipeIdParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, &self.user_id, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Shopping Cart ---

    #[tool(description = "Get the shopping cart and the consolidated shopping list, with matching ingredients merged and amounts converted to the best unit")]
    fn get_shopping_list(&self, Parameters(p): Parameters<GetShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_cart::get_shopping_list(&self.database, &self.user_id, p.include_completed).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Add every ingredient of a recipe to the cart")]
    fn add_recipe_to_cart(&self, Parameters(p): Parameters<CartRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_cart::add_recipe_to_cart(&self.database, &self.user_id, p.recipe_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Add a single item to the cart by hand")]
    fn add_cart_item(&self, Parameters(p): Parameters<AddCartItemParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_cart::add_cart_item(&self.database, &self.user_id, &p.ingredient, p.quantity, &p.unit).map_err(invalid)?;
        to_json(&result)
    }

    #[tool(description = "Check off a cart item, or change its quantity or unit")]
    fn update_cart_item(&self, Parameters(p): Parameters<UpdateCartItemParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_cart::update_cart_item(&self.database, &self.user_id, p.id, p.completed, p.quantity, p.unit.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(item) => to_json(&item),
            None => not_found("Cart item", p.id),
        }
    }

    #[tool(description = "Remove one item from the cart")]
    fn remove_cart_item(&self, Parameters(p): Parameters<CartItemIdParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_cart::remove_cart_item(&self.database, &self.user_id, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove every cart item that came from a recipe")]
    fn remove_recipe_from_cart(&self, Parameters(p): Parameters<CartRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_cart::remove_recipe_from_cart(&self.database, &self.user_id, p.recipe_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove every checked-off item from the cart")]
    fn clear_completed_items(&self) -> Result<CallToolResult, McpError> {
        let result = shopping_cart::clear_completed_items(&self.database, &self.user_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Empty the cart")]
    fn clear_cart(&self) -> Result<CallToolResult, McpError> {
        let result = shopping_cart::clear_cart(&self.database, &self.user_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Bring a recipe's cart items in line with its current ingredients. Matching items keep their checked-off state; new ingredients are added and dropped ones removed.")]
    fn sync_recipe_in_cart(&self, Parameters(p): Parameters<CartRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_cart::sync_recipe_in_cart(&self.database, &self.user_id, p.recipe_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Profile ---

    #[tool(description = "Get your preferences: measurement system, default serving size, dietary restrictions, default view")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, &self.user_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update your preferences. Only the fields given are changed.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let measurement_system = match p.measurement_system.as_deref() {
            Some(s) => Some(MeasurementSystem::from_str(s).ok_or_else(|| invalid(format!("Unknown measurement system: {}", s)))?),
            None => None,
        };
        let default_view = match p.default_view.as_deref() {
            Some(s) => Some(DefaultView::from_str(s).ok_or_else(|| invalid(format!("Unknown default view: {}", s)))?),
            None => None,
        };
        let data = PreferencesUpdate {
            measurement_system,
            default_serving_size: p.default_serving_size,
            dietary_restrictions: p.dietary_restrictions,
            default_view,
        };
        let result = profile::update_profile(&self.database, &self.user_id, data).map_err(invalid)?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for PantryService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pantry".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Pantry".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Pantry - recipes and a consolidating shopping list. \
                 IMPORTANT: Call cart_instructions before planning a shop. \
                 Recipes: create/get/list/update/delete_recipe, create_sample_recipe. \
                 Cart: add_recipe_to_cart, add_cart_item, update_cart_item, remove_cart_item, \
                 remove_recipe_from_cart, clear_completed_items, clear_cart, sync_recipe_in_cart. \
                 Shopping list: get_shopping_list (merged by ingredient, converted to the best unit). \
                 Profile: get_profile/update_profile. Status: pantry_status."
                    .into(),
            ),
        }
    }
}
