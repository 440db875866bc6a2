//! Account and profile bootstrapping.
//!
//! Sign-up is a two-step sequence: register the identity with the external
//! provider, then write the application-level profile row under the same
//! id. The profile write is an upsert, so it is safe whether or not a
//! database trigger on the service side also inserted a row on account
//! creation - the two paths converge on one row.

use serde_json::json;
use tracing::info;

use stellar_market_core::{AccountId, Email, EmailError, UserType};

use crate::models::{NewProfile, Profile, ProfileChanges};
use crate::supabase::{AuthUser, Session, SupabaseClient, SupabaseError};

/// Errors from account and profile operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The email failed structural validation before any call was made.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No password was supplied.
    #[error("password cannot be empty")]
    MissingPassword,

    /// The external service rejected the request or was unreachable.
    #[error(transparent)]
    Service(#[from] SupabaseError),
}

/// Backend seam for account operations.
pub trait AccountsBackend {
    /// Register an identity with the external provider.
    fn register_account(
        &self,
        email: &Email,
        password: &str,
        metadata: serde_json::Value,
    ) -> impl Future<Output = Result<AuthUser, SupabaseError>> + Send;

    /// Write a profile row with merge-duplicates semantics.
    fn upsert_profile(
        &self,
        row: &NewProfile,
    ) -> impl Future<Output = Result<Profile, SupabaseError>> + Send;

    /// Look up a profile by account id; `None` when absent.
    fn profile_by_id(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Profile>, SupabaseError>> + Send;

    /// Patch a profile row, returning the updated row.
    fn update_profile_row(
        &self,
        id: AccountId,
        payload: &serde_json::Value,
    ) -> impl Future<Output = Result<Profile, SupabaseError>> + Send;

    /// Delete a profile row. Deleting an absent row is not an error.
    fn delete_profile_row(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;
}

impl AccountsBackend for SupabaseClient {
    async fn register_account(
        &self,
        email: &Email,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<AuthUser, SupabaseError> {
        self.sign_up(email, password, metadata).await
    }

    async fn upsert_profile(&self, row: &NewProfile) -> Result<Profile, SupabaseError> {
        self.upsert_returning("profiles", row).await
    }

    async fn profile_by_id(&self, id: AccountId) -> Result<Option<Profile>, SupabaseError> {
        self.select_one_match("profiles", &[("id", &id.to_string())])
            .await
    }

    async fn update_profile_row(
        &self,
        id: AccountId,
        payload: &serde_json::Value,
    ) -> Result<Profile, SupabaseError> {
        self.update_match_returning("profiles", &[("id", &id.to_string())], payload)
            .await
    }

    async fn delete_profile_row(&self, id: AccountId) -> Result<(), SupabaseError> {
        self.delete_match("profiles", &[("id", &id.to_string())])
            .await
    }
}

/// Register an account and bootstrap its profile row.
///
/// Input shape is checked locally first (email structure, non-empty
/// password); everything beyond that is delegated to the provider. The
/// profile lands with the same id the provider assigned to the account.
///
/// # Errors
///
/// Returns [`AccountError::InvalidEmail`] or [`AccountError::MissingPassword`]
/// before any network call, and [`AccountError::Service`] if the provider
/// rejects the sign-up or the profile write fails.
pub async fn sign_up<B: AccountsBackend>(
    backend: &B,
    email: &str,
    password: &str,
    display_name: &str,
    user_type: UserType,
) -> Result<Profile, AccountError> {
    let email = Email::parse(email)?;
    if password.is_empty() {
        return Err(AccountError::MissingPassword);
    }

    let metadata = json!({
        "display_name": display_name,
        "user_type": user_type,
    });
    let user = backend.register_account(&email, password, metadata).await?;

    let display_name = Some(display_name.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned);
    let profile = backend
        .upsert_profile(&NewProfile {
            id: user.id,
            user_type,
            display_name,
            email: user.email.or_else(|| Some(email.into_inner())),
        })
        .await?;

    info!(account_id = %profile.id, user_type = %profile.user_type, "account bootstrapped");
    Ok(profile)
}

/// Write a profile row directly, without touching the identity provider.
///
/// Upsert semantics: calling this twice for the same id is not a conflict.
///
/// # Errors
///
/// Returns [`AccountError::Service`] on any backend failure.
pub async fn create_profile<B: AccountsBackend>(
    backend: &B,
    row: NewProfile,
) -> Result<Profile, AccountError> {
    Ok(backend.upsert_profile(&row).await?)
}

/// Fetch a profile by account id.
///
/// Absence is a `None`, never an error; only transport-level failures
/// surface as `Err`.
///
/// # Errors
///
/// Returns [`AccountError::Service`] on transport or API failure.
pub async fn fetch_profile<B: AccountsBackend>(
    backend: &B,
    id: AccountId,
) -> Result<Option<Profile>, AccountError> {
    Ok(backend.profile_by_id(id).await?)
}

/// Apply a partial update to a profile, bumping `updated_at`. An empty
/// change set performs no write and returns the current row.
///
/// # Errors
///
/// Returns [`AccountError::Service`] on any backend failure, including
/// when no such profile exists.
pub async fn update_profile<B: AccountsBackend>(
    backend: &B,
    id: AccountId,
    changes: ProfileChanges,
) -> Result<Profile, AccountError> {
    if changes.is_empty() {
        return backend
            .profile_by_id(id)
            .await?
            .ok_or(AccountError::Service(SupabaseError::NotFound));
    }

    let mut payload = serde_json::to_value(&changes)
        .map_err(|e| AccountError::Service(SupabaseError::Parse(e.to_string())))?;
    if let Some(map) = payload.as_object_mut() {
        map.insert(
            "updated_at".to_string(),
            json!(chrono::Utc::now().to_rfc3339()),
        );
    }
    Ok(backend.update_profile_row(id, &payload).await?)
}

/// Switch how an account uses the marketplace (buyer/seller/both).
///
/// # Errors
///
/// Returns [`AccountError::Service`] on any backend failure.
pub async fn set_user_type<B: AccountsBackend>(
    backend: &B,
    id: AccountId,
    user_type: UserType,
) -> Result<Profile, AccountError> {
    update_profile(
        backend,
        id,
        ProfileChanges {
            user_type: Some(user_type),
            ..ProfileChanges::default()
        },
    )
    .await
}

/// Delete a profile row.
///
/// # Errors
///
/// Returns [`AccountError::Service`] on any backend failure.
pub async fn delete_profile<B: AccountsBackend>(
    backend: &B,
    id: AccountId,
) -> Result<(), AccountError> {
    Ok(backend.delete_profile_row(id).await?)
}

/// Sign in with email and password.
///
/// # Errors
///
/// Returns [`AccountError::InvalidEmail`] for malformed input and
/// [`AccountError::Service`] for provider rejections.
pub async fn sign_in(
    client: &SupabaseClient,
    email: &str,
    password: &str,
) -> Result<Session, AccountError> {
    let email = Email::parse(email)?;
    if password.is_empty() {
        return Err(AccountError::MissingPassword);
    }
    Ok(client.sign_in_with_password(&email, password).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    #[derive(Default)]
    struct FakeBackend {
        profiles: Mutex<HashMap<AccountId, Profile>>,
        reject_sign_up: bool,
    }

    impl FakeBackend {
        fn profile_count(&self) -> usize {
            self.profiles.lock().unwrap().len()
        }
    }

    impl AccountsBackend for FakeBackend {
        async fn register_account(
            &self,
            email: &Email,
            _password: &str,
            _metadata: serde_json::Value,
        ) -> Result<AuthUser, SupabaseError> {
            if self.reject_sign_up {
                return Err(SupabaseError::Api {
                    status: 422,
                    code: None,
                    message: "signup disabled".to_string(),
                });
            }
            Ok(AuthUser {
                id: AccountId::generate(),
                email: Some(email.as_str().to_owned()),
            })
        }

        async fn upsert_profile(&self, row: &NewProfile) -> Result<Profile, SupabaseError> {
            let now = Utc::now();
            let mut profiles = self.profiles.lock().unwrap();
            let profile = profiles
                .entry(row.id)
                .and_modify(|existing| {
                    existing.user_type = row.user_type;
                    existing.display_name.clone_from(&row.display_name);
                    existing.updated_at = now;
                })
                .or_insert_with(|| Profile {
                    id: row.id,
                    user_type: row.user_type,
                    display_name: row.display_name.clone(),
                    email: row.email.clone(),
                    created_at: now,
                    updated_at: now,
                });
            Ok(profile.clone())
        }

        async fn profile_by_id(&self, id: AccountId) -> Result<Option<Profile>, SupabaseError> {
            Ok(self.profiles.lock().unwrap().get(&id).cloned())
        }

        async fn update_profile_row(
            &self,
            id: AccountId,
            payload: &serde_json::Value,
        ) -> Result<Profile, SupabaseError> {
            let mut profiles = self.profiles.lock().unwrap();
            let profile = profiles.get_mut(&id).ok_or(SupabaseError::NotFound)?;
            if let Some(name) = payload.get("display_name").and_then(|v| v.as_str()) {
                profile.display_name = Some(name.to_owned());
            }
            if let Some(ty) = payload.get("user_type").and_then(|v| v.as_str()) {
                profile.user_type = ty.parse().map_err(|_| SupabaseError::Parse(ty.into()))?;
            }
            Ok(profile.clone())
        }

        async fn delete_profile_row(&self, id: AccountId) -> Result<(), SupabaseError> {
            self.profiles.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn sign_up_creates_profile_with_display_name() {
        let backend = FakeBackend::default();

        let profile = sign_up(&backend, "a@x.com", "pw123456", "Alice", UserType::Seller)
            .await
            .unwrap();

        assert_eq!(profile.user_type, UserType::Seller);
        assert_eq!(profile.display_name.as_deref(), Some("Alice"));
        assert_eq!(backend.profile_count(), 1);
    }

    #[tokio::test]
    async fn sign_up_rejects_malformed_email_before_any_call() {
        let backend = FakeBackend::default();

        let err = sign_up(&backend, "not-an-email", "pw123456", "Alice", UserType::Buyer)
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::InvalidEmail(_)));
        assert_eq!(backend.profile_count(), 0);
    }

    #[tokio::test]
    async fn sign_up_rejects_empty_password() {
        let backend = FakeBackend::default();

        let err = sign_up(&backend, "a@x.com", "", "Alice", UserType::Buyer)
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::MissingPassword));
    }

    #[tokio::test]
    async fn sign_up_surfaces_provider_rejection() {
        let backend = FakeBackend {
            reject_sign_up: true,
            ..FakeBackend::default()
        };

        let err = sign_up(&backend, "a@x.com", "pw123456", "Alice", UserType::Both)
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::Service(_)));
        assert_eq!(backend.profile_count(), 0);
    }

    #[tokio::test]
    async fn create_profile_twice_is_idempotent() {
        let backend = FakeBackend::default();
        let id = AccountId::generate();
        let row = NewProfile {
            id,
            user_type: UserType::Buyer,
            display_name: Some("Bob".to_string()),
            email: None,
        };

        create_profile(&backend, row.clone()).await.unwrap();
        create_profile(&backend, row).await.unwrap();

        assert_eq!(backend.profile_count(), 1);
    }

    #[tokio::test]
    async fn fetch_profile_returns_none_for_absent_row() {
        let backend = FakeBackend::default();

        let found = fetch_profile(&backend, AccountId::generate()).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn set_user_type_updates_profile() {
        let backend = FakeBackend::default();
        let profile = sign_up(&backend, "a@x.com", "pw123456", "Alice", UserType::Buyer)
            .await
            .unwrap();

        let updated = set_user_type(&backend, profile.id, UserType::Both)
            .await
            .unwrap();

        assert_eq!(updated.user_type, UserType::Both);
    }

    #[tokio::test]
    async fn empty_update_leaves_profile_unchanged() {
        let backend = FakeBackend::default();
        let profile = sign_up(&backend, "a@x.com", "pw123456", "Alice", UserType::Buyer)
            .await
            .unwrap();

        let updated = update_profile(&backend, profile.id, ProfileChanges::default())
            .await
            .unwrap();

        assert_eq!(updated.display_name, profile.display_name);
        assert_eq!(updated.user_type, profile.user_type);
    }

    #[tokio::test]
    async fn blank_display_name_is_stored_as_null() {
        let backend = FakeBackend::default();

        let profile = sign_up(&backend, "a@x.com", "pw123456", "   ", UserType::Buyer)
            .await
            .unwrap();

        assert!(profile.display_name.is_none());
    }
}
