//! Role assignment rows.

use serde::{Deserialize, Serialize};

use stellar_market_core::{AccountId, Role};

/// A row in the `user_roles` table: one row per (user, role) pair.
///
/// The same shape serves as the insert payload; the table has no
/// server-generated columns worth reading back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub user_id: AccountId,
    pub role: Role,
}
