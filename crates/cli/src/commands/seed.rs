//! Catalog seeding command.
//!
//! # Usage
//!
//! ```bash
//! sm-cli seed
//! ```
//!
//! Reads the standard `MARKET_*` environment variables and seeds the
//! catalog tables. Safe to run repeatedly; stages that already contain
//! rows are skipped.

use thiserror::Error;

use stellar_market_backend::config::{ConfigError, MarketConfig};
use stellar_market_backend::services::seeder::{self, SeedError};
use stellar_market_backend::supabase::SupabaseClient;

/// Errors from the seed command.
#[derive(Debug, Error)]
pub enum SeedCommandError {
    /// Configuration was missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The seeding run itself failed.
    #[error("Seeding error: {0}")]
    Seed(#[from] SeedError),
}

/// Seed the catalog with sample data.
pub async fn run() -> Result<(), SeedCommandError> {
    let config = MarketConfig::from_env()?;
    let client = SupabaseClient::service_role(&config)?;

    tracing::info!("Seeding catalog...");
    let summary = seeder::seed_database(&client).await?;

    tracing::info!(
        "Seeding finished: {} categories, {} products, {} images inserted",
        summary.categories.inserted,
        summary.products.inserted,
        summary.images.inserted,
    );
    if summary.categories.skipped && summary.products.skipped && summary.images.skipped {
        tracing::info!("All stages already seeded, nothing to do");
    }

    Ok(())
}
