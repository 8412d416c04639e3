//! Data-entry validation
//!
//! Rules applied when recipes, cart items and preferences are created or
//! edited. Records already in the database are assumed valid.

use thiserror::Error;

use crate::consolidation::UnitError;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MIN_SERVINGS: i64 = 1;
pub const MAX_SERVINGS: i64 = 20;
pub const MIN_INGREDIENT_QUANTITY: f64 = 0.1;

/// Validation failure for user-supplied data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Title must be less than 100 characters")]
    TitleTooLong,

    #[error("Description must be less than 500 characters")]
    DescriptionTooLong,

    #[error("{0} must be positive")]
    NegativeTime(&'static str),

    #[error("Difficulty must be easy, medium, or hard (got '{0}')")]
    InvalidDifficulty(String),

    #[error("Servings must be between 1 and 20")]
    ServingsOutOfRange,

    #[error("At least one ingredient is required")]
    NoIngredients,

    #[error("Ingredient {index}: quantity must be at least 0.1")]
    IngredientQuantity { index: usize },

    #[error("Ingredient {index}: description is required")]
    IngredientDescription { index: usize },

    #[error("Ingredient {index}: {source}")]
    IngredientUnit { index: usize, source: UnitError },

    #[error("At least one instruction is required")]
    NoInstructions,

    #[error("Instruction {0} cannot be empty")]
    EmptyInstruction(usize),

    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),

    #[error("Ingredient is required")]
    IngredientRequired,

    #[error("Quantity must be a positive number")]
    QuantityNotPositive,

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Reject zero, negative and non-finite quantities
pub fn validate_quantity(quantity: f64) -> Result<(), ValidationError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ValidationError::QuantityNotPositive);
    }
    Ok(())
}

/// Check that an image URL is empty or an absolute URL
pub fn validate_image_url(image_url: &str) -> Result<(), ValidationError> {
    if image_url.is_empty() {
        return Ok(());
    }
    url::Url::parse(image_url)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidImageUrl(e.to_string()))
}
