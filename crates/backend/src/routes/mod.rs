//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health               - Health check
//! GET  /auth/callback        - OAuth/PKCE code exchange, then redirect
//! POST /auth/reset-password  - Request a password-recovery email
//! ```
//!
//! The surface is deliberately thin: sign-up, store provisioning and the
//! privileged operations run through the service layer directly (web
//! frontend talks to the provider; operators use the CLI).

pub mod auth;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/reset-password", post(auth::request_reset))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
