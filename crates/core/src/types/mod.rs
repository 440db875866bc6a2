//! Core types for StellarMarket.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod wallet;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::{Role, RoleParseError, UserType, UserTypeParseError};
pub use wallet::{StellarAddress, WalletAddressError};
