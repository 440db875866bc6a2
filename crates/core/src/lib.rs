//! StellarMarket Core - Shared domain types.
//!
//! This crate provides the types shared across all StellarMarket components:
//! - `backend` - Service layer talking to the managed identity/data service
//! - `cli` - Command-line tools for seeding and admin operations
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no access
//! to the external service. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, wallet addresses, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
