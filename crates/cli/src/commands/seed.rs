//! Database seed command: demo businesses and food items.
//!
//! # Usage
//!
//! ```bash
//! plateful seed
//! ```
//!
//! Seeding is intended for fresh development databases; it inserts new
//! rows with generated IDs on every run.

use rust_decimal::Decimal;

use plateful_engine::CatalogService;
use plateful_engine::config::EngineConfig;
use plateful_engine::db;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap_or(Decimal::ZERO)
}

/// Seed the database with demo catalog data.
///
/// # Errors
///
/// Returns an error if configuration is missing or any insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env()?;
    let pool = db::create_pool(&config).await?;
    db::MIGRATOR.run(&pool).await?;

    let catalog = CatalogService::new(pool);

    let noodle_house = catalog
        .register_business(
            "Golden Noodle House",
            "Hand-pulled noodles and dumplings",
            "Chinese",
            None,
        )
        .await?;
    catalog
        .add_food(
            noodle_house.id,
            "Beef Noodle Soup",
            "Braised beef, hand-pulled noodles, rich broth",
            dec("12.50"),
            None,
        )
        .await?;
    catalog
        .add_food(
            noodle_house.id,
            "Pork Dumplings",
            "Eight per serve, pan-fried",
            dec("8.00"),
            None,
        )
        .await?;

    let trattoria = catalog
        .register_business(
            "Trattoria Rossa",
            "Wood-fired pizza and fresh pasta",
            "Italian",
            None,
        )
        .await?;
    catalog
        .add_food(
            trattoria.id,
            "Margherita Pizza",
            "San Marzano tomatoes, fior di latte, basil",
            dec("14.00"),
            None,
        )
        .await?;
    catalog
        .add_food(
            trattoria.id,
            "Tagliatelle al Ragu",
            "Slow-cooked beef and pork ragu",
            dec("16.50"),
            None,
        )
        .await?;

    tracing::info!("Seeded 2 businesses with 4 food items");
    Ok(())
}
