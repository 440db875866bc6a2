//! Integration tests for catalog seeding against a live service.
//!
//! These tests require:
//! - Valid `MARKET_*` credentials in the environment, pointing at a
//!   disposable development instance (seeding writes real rows)
//!
//! Run with: cargo test -p stellar-market-integration-tests -- --ignored

use stellar_market_backend::config::MarketConfig;
use stellar_market_backend::services::seeder;
use stellar_market_backend::supabase::SupabaseClient;

fn service_role_client() -> SupabaseClient {
    let config = MarketConfig::from_env().expect("Failed to load configuration");
    SupabaseClient::service_role(&config).expect("Failed to build service-role client")
}

#[tokio::test]
#[ignore = "Writes to the configured service instance"]
async fn seeding_twice_inserts_nothing_the_second_time() {
    let client = service_role_client();

    // First run may insert or skip depending on instance state.
    seeder::seed_database(&client)
        .await
        .expect("First seeding run failed");

    let second = seeder::seed_database(&client)
        .await
        .expect("Second seeding run failed");

    assert!(second.categories.skipped);
    assert!(second.products.skipped);
    assert!(second.images.skipped);
    assert_eq!(second.categories.inserted, 0);
    assert_eq!(second.products.inserted, 0);
    assert_eq!(second.images.inserted, 0);
}
