//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! plateful migrate
//! ```
//!
//! # Environment Variables
//!
//! - `PLATEFUL_DATABASE_URL` - `SQLite` connection string

use plateful_engine::config::EngineConfig;
use plateful_engine::db;

/// Run the engine's embedded migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the pool cannot be
/// created, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env()?;

    tracing::info!("Connecting to engine database...");
    let pool = db::create_pool(&config).await?;

    tracing::info!("Running engine migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Engine migrations complete!");
    Ok(())
}
