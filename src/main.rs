//! Pantry
//!
//! An MCP server for recipes and a consolidating shopping list.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pantry::build_info;
use pantry::config::Config;
use pantry::db;
use pantry::mcp::PantryService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr; stdout carries the MCP protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pantry=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::load();
    info!(path = %config.database_path.display(), user_id = %config.user_id, "Starting MCP server on stdio");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        info!(version, "Database schema ready");
        Ok(())
    })?;

    let service = PantryService::new(config.database_path, database, config.user_id);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
