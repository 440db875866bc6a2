//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is built, and internal details
//! never reach the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use stellar_market_core::EmailError;

use crate::services::accounts::AccountError;
use crate::services::stores::StoreError;
use crate::supabase::SupabaseError;

/// Application-level error type for the route layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// The external identity/data service failed.
    #[error("Service error: {0}")]
    Service(#[from] SupabaseError),

    /// Account operation failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Malformed email address in a request body.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error is the server's fault and worth a Sentry event.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Service(e)
            | Self::Account(AccountError::Service(e))
            | Self::Store(StoreError::Service(e)) => {
                service_status(e) == StatusCode::BAD_GATEWAY
            }
            _ => false,
        }
    }
}

/// Status for an error coming straight off the external service.
fn service_status(error: &SupabaseError) -> StatusCode {
    match error {
        SupabaseError::NotFound => StatusCode::NOT_FOUND,
        SupabaseError::Conflict(_) => StatusCode::CONFLICT,
        SupabaseError::Api { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Service(e) => service_status(e),
            Self::Account(err) => match err {
                AccountError::InvalidEmail(_) | AccountError::MissingPassword => {
                    StatusCode::BAD_REQUEST
                }
                AccountError::Service(e) => service_status(e),
            },
            Self::Store(err) => match err {
                StoreError::InvalidWalletAddress(_) => StatusCode::BAD_REQUEST,
                StoreError::NoProfile(_) => StatusCode::NOT_FOUND,
                StoreError::BuyerCannotSell => StatusCode::FORBIDDEN,
                StoreError::Service(e) => service_status(e),
            },
            Self::InvalidEmail(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose upstream error details to clients
        let message = if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            "External service error".to_string()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
