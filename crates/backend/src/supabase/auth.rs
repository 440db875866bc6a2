//! Identity subsystem calls against the `/auth/v1` surface.
//!
//! Covers the public flows (sign-up, password sign-in, password recovery,
//! PKCE code exchange) and the privileged admin endpoints
//! (update password, delete user). The privileged calls only work on a
//! client built with [`SupabaseClient::service_role`].

use serde::Deserialize;
use serde_json::json;

use stellar_market_core::{AccountId, Email};

use super::{SupabaseClient, SupabaseError};

/// An identity record owned by the external provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    /// Account id; the profile row shares this id.
    pub id: AccountId,
    /// Email the account was registered with.
    pub email: Option<String>,
}

/// An authenticated session.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Bearer token for user-scoped requests.
    pub access_token: String,
    /// Token used to obtain a fresh access token.
    pub refresh_token: String,
    /// The authenticated identity.
    pub user: AuthUser,
}

/// Sign-up responses vary: with email confirmation enabled the provider
/// returns the bare user, otherwise a full session embedding it.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    id: Option<AccountId>,
    email: Option<String>,
    user: Option<AuthUser>,
}

impl SupabaseClient {
    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url())
    }

    /// Register a new identity with the external provider.
    ///
    /// `metadata` is attached to the identity record as user metadata; the
    /// profile row proper is created separately by the accounts service.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Api`] if the provider rejects the
    /// credentials, or another [`SupabaseError`] on transport failure.
    pub async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<AuthUser, SupabaseError> {
        let body = json!({
            "email": email.as_str(),
            "password": password,
            "data": metadata,
        });

        let response = self
            .http
            .post(self.auth_url("signup"))
            .json(&body)
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        let parsed: SignUpResponse = response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))?;

        match parsed {
            SignUpResponse {
                id: Some(id),
                email,
                ..
            } => Ok(AuthUser { id, email }),
            SignUpResponse {
                user: Some(user), ..
            } => Ok(user),
            _ => Err(SupabaseError::Parse(
                "sign-up response carried no user".to_string(),
            )),
        }
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Api`] for bad credentials, or another
    /// [`SupabaseError`] on transport failure.
    pub async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Session, SupabaseError> {
        let body = json!({
            "email": email.as_str(),
            "password": password,
        });

        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&body)
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Ask the provider to send a password-recovery email.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] on any request failure.
    pub async fn reset_password_for_email(
        &self,
        email: &Email,
        redirect_to: &str,
    ) -> Result<(), SupabaseError> {
        let response = self
            .http
            .post(self.auth_url("recover"))
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email.as_str() }))
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Exchange an OAuth authorization code for a session (PKCE flow).
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] if the code is invalid or expired, or on
    /// transport failure.
    pub async fn exchange_code_for_session(&self, code: &str) -> Result<Session, SupabaseError> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "pkce")])
            .json(&json!({ "auth_code": code }))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Privileged: set a new password on an arbitrary account.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] if no such account exists, or
    /// another [`SupabaseError`] on any other failure.
    pub async fn admin_update_user_password(
        &self,
        user: AccountId,
        new_password: &str,
    ) -> Result<(), SupabaseError> {
        let response = self
            .http
            .put(self.auth_url(&format!("admin/users/{user}")))
            .json(&json!({ "password": new_password }))
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Privileged: destroy an identity record.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] if no such account exists, or
    /// another [`SupabaseError`] on any other failure.
    pub async fn admin_delete_user(&self, user: AccountId) -> Result<(), SupabaseError> {
        let response = self
            .http
            .delete(self.auth_url(&format!("admin/users/{user}")))
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_response_parses_bare_user() {
        let parsed: SignUpResponse = serde_json::from_str(
            r#"{"id":"4f8c1c3e-9d3a-4a9e-8a3e-2f1b5c6d7e8f","email":"a@x.com","aud":"authenticated"}"#,
        )
        .unwrap();
        assert!(parsed.id.is_some());
        assert_eq!(parsed.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn sign_up_response_parses_session_shape() {
        let parsed: SignUpResponse = serde_json::from_str(
            r#"{"access_token":"t","user":{"id":"4f8c1c3e-9d3a-4a9e-8a3e-2f1b5c6d7e8f","email":"a@x.com"}}"#,
        )
        .unwrap();
        assert!(parsed.id.is_none());
        assert!(parsed.user.is_some());
    }

    #[test]
    fn session_parses() {
        let session: Session = serde_json::from_str(
            r#"{"access_token":"at","refresh_token":"rt","token_type":"bearer","user":{"id":"4f8c1c3e-9d3a-4a9e-8a3e-2f1b5c6d7e8f","email":null}}"#,
        )
        .unwrap();
        assert_eq!(session.access_token, "at");
        assert!(session.user.email.is_none());
    }
}
