//! Role and user-type enums.
//!
//! Both are closed sum types with total matches everywhere they are
//! consumed, so an unhandled case is a compile error rather than a silent
//! string fallthrough.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authorization role, independent of [`UserType`].
///
/// A user may hold any subset of these; role rows live in the `user_roles`
/// table, one row per (user, role) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including privileged user management.
    Admin,
    /// May own stores and list products.
    Seller,
    /// Baseline authenticated user.
    User,
}

impl Role {
    /// All roles, in privilege order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Seller, Self::User];

    /// The role name as stored in the `user_roles` table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Seller => "seller",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`Role`] from a string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role {0:?}, expected one of: admin, seller, user")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "seller" => Ok(Self::Seller),
            "user" => Ok(Self::User),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

/// Profile-level classification of how an account uses the marketplace.
///
/// Distinct from [`Role`]: `user_type` lives on the profile row and drives
/// what the account may do commercially (a `Buyer` cannot create a store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Purchases only.
    Buyer,
    /// Sells only.
    Seller,
    /// Both buys and sells.
    Both,
}

impl UserType {
    /// Whether this user type is allowed to own a store.
    #[must_use]
    pub const fn can_sell(self) -> bool {
        match self {
            Self::Buyer => false,
            Self::Seller | Self::Both => true,
        }
    }

    /// The value as stored in the `profiles.user_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`UserType`] from a string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid user type {0:?}, expected one of: buyer, seller, both")]
pub struct UserTypeParseError(pub String);

impl FromStr for UserType {
    type Err = UserTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            "both" => Ok(Self::Both),
            other => Err(UserTypeParseError(other.to_owned())),
        }
    }
}
