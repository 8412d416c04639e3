//! Utility to insert the sample recipe for a user and print its shopping list

use pantry::config::Config;
use pantry::tools::{recipes, shopping_cart};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    println!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = pantry::db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        pantry::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let recipe = recipes::create_sample_recipe(&database, &config.user_id)?;
    println!("Created recipe #{}: {}", recipe.id, recipe.title);

    let added = shopping_cart::add_recipe_to_cart(&database, &config.user_id, recipe.id)?;
    println!("Added {} items (cart now has {})", added.items_added, added.cart_size);

    let list = shopping_cart::get_shopping_list(&database, &config.user_id, false)?;
    println!();
    println!("Shopping list:");
    for group in &list.consolidated {
        match &group.alternative_display {
            Some(hint) => println!("  {} - {} ({})", group.base_ingredient, group.display_quantity(), hint),
            None => println!("  {} - {}", group.base_ingredient, group.display_quantity()),
        }
    }

    Ok(())
}
