//! Stellar Market backend library.
//!
//! The service layer of the marketplace: configuration, the client for
//! the managed identity/data/storage service, domain models, business
//! services, and the thin HTTP surface. Exposed as a library so the CLI
//! and integration tests can drive the same code the server runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod supabase;
