//! Profile rows.
//!
//! A profile is the application-level user record, one-to-one with the
//! identity provider's account and sharing its id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stellar_market_core::{AccountId, UserType};

/// A row in the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Equal to the identity provider's account id.
    pub id: AccountId,
    pub user_type: UserType,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `profiles`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: AccountId,
    pub user_type: UserType,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Partial update for a profile. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
}

impl ProfileChanges {
    /// Whether this update would change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.user_type.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn profile_row_deserializes() {
        let profile: Profile = serde_json::from_str(
            r#"{
                "id": "4f8c1c3e-9d3a-4a9e-8a3e-2f1b5c6d7e8f",
                "user_type": "seller",
                "display_name": "Alice",
                "email": "a@x.com",
                "created_at": "2025-01-15T10:00:00Z",
                "updated_at": "2025-01-15T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(profile.user_type, UserType::Seller);
        assert_eq!(profile.display_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn changes_skip_unset_fields() {
        let changes = ProfileChanges {
            user_type: Some(UserType::Both),
            ..ProfileChanges::default()
        };
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json, serde_json::json!({"user_type": "both"}));
    }
}
