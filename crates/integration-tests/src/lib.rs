//! Integration tests for Stellar Market.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the backend against a development instance of the service
//! cargo run -p stellar-market-backend
//!
//! # Run integration tests (ignored by default)
//! cargo test -p stellar-market-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `backend_http` - HTTP surface of the backend server
//! - `catalog_seeding` - Seeding against a live service instance
//!
//! All tests are `#[ignore]`d: they need a running backend and valid
//! `MARKET_*` credentials in the environment.
