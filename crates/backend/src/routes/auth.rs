//! Auth route handlers: code exchange and password-recovery requests.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::Deserialize;
use tracing::warn;

use stellar_market_core::Email;

use crate::error::Result;
use crate::state::AppState;

/// Query parameters for the OAuth/PKCE callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Authorization code to exchange, absent when the provider redirected
    /// with an error instead.
    pub code: Option<String>,
}

/// `GET /auth/callback` - exchange the authorization code for a session
/// and send the browser back to the frontend.
///
/// A missing code or a failed exchange redirects to the frontend's error
/// page rather than surfacing an API error; the browser is mid-redirect
/// and a JSON body would go nowhere useful.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let base_url = state.config().base_url.trim_end_matches('/').to_owned();

    let Some(code) = params.code else {
        return Redirect::to(&format!("{base_url}/auth/error"));
    };

    match state.db().exchange_code_for_session(&code).await {
        Ok(session) => {
            tracing::info!(user = %session.user.id, "code exchange succeeded");
            Redirect::to(&base_url)
        }
        Err(e) => {
            warn!(error = %e, "code exchange failed");
            Redirect::to(&format!("{base_url}/auth/error"))
        }
    }
}

/// Request body for a password-recovery email.
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

/// `POST /auth/reset-password` - ask the provider to send a recovery
/// email. The redirect target points back at the frontend's
/// password-update page.
pub async fn request_reset(
    State(state): State<AppState>,
    Json(body): Json<ResetRequest>,
) -> Result<StatusCode> {
    let email = Email::parse(&body.email)?;

    let redirect_to = format!(
        "{}/auth/update-password",
        state.config().base_url.trim_end_matches('/')
    );
    state
        .db()
        .reset_password_for_email(&email, &redirect_to)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
