//! Client for the managed identity/data/storage service.
//!
//! # Architecture
//!
//! The service exposes three HTTP surfaces under one base URL:
//!
//! - `/rest/v1` - table-style CRUD with equality filters ([`table`])
//! - `/auth/v1` - identity subsystem: sign-up, sessions, privileged user
//!   management ([`auth`])
//! - `/storage/v1` - object storage: upload and public URLs ([`storage`])
//!
//! Two client constructions exist. [`SupabaseClient::anon`] authenticates
//! with the public key and is safe anywhere; [`SupabaseClient::service_role`]
//! carries the privileged key and must only be built in trusted server
//! contexts (the CLI, never the route layer).
//!
//! # Error boundary
//!
//! Every response is translated into a typed [`SupabaseError`] immediately.
//! The service reports failures as JSON bodies with ad-hoc shapes (`code` /
//! `message` from the table API, `error` / `error_description` or `msg`
//! from the identity API); nothing past this module inspects those fields.

mod auth;
mod storage;
mod table;

pub use auth::{AuthUser, Session};

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{ConfigError, MarketConfig};

/// Table API error code for "requested a single row, got zero".
const CODE_NO_ROWS: &str = "PGRST116";

/// SQLSTATE code for a unique constraint violation.
const CODE_UNIQUE_VIOLATION: &str = "23505";

/// Errors that can occur when talking to the managed service.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP transport failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the request.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Service-specific error code, when one was supplied.
        code: Option<String>,
        /// Human-readable message from the service.
        message: String,
    },

    /// A row the request required does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The response body did not have the expected shape.
    #[error("response parse error: {0}")]
    Parse(String),
}

/// Error body shapes returned by the service.
///
/// The table API uses `code`/`message`, the identity API uses either
/// `error`/`error_description` or `code`/`msg` (with a numeric code).
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<serde_json::Value>,
    message: Option<String>,
    msg: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl ErrorBody {
    fn code_str(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    fn message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "(no error details provided)".to_string())
    }
}

/// Map a failed response's parts onto the typed error hierarchy.
fn classify_error(status: u16, code: Option<&str>, message: String) -> SupabaseError {
    match code {
        Some(CODE_NO_ROWS) => SupabaseError::NotFound,
        Some(CODE_UNIQUE_VIOLATION) => SupabaseError::Conflict(message),
        _ if status == 404 => SupabaseError::NotFound,
        _ if status == 409 => SupabaseError::Conflict(message),
        _ => SupabaseError::Api {
            status,
            code: code.map(str::to_owned),
            message,
        },
    }
}

/// Client for one authorization level of the managed service.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    storage_bucket: String,
}

impl SupabaseClient {
    /// Build a client authenticated with the public (anonymous) key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if the key is not a valid
    /// header value or the HTTP client fails to build.
    pub fn anon(config: &MarketConfig) -> Result<Self, ConfigError> {
        Self::with_key(config, &config.anon_key)
    }

    /// Build a client authenticated with the privileged service-role key.
    ///
    /// Only construct this in trusted server contexts. The route layer
    /// never holds one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if the key is not a valid
    /// header value or the HTTP client fails to build.
    pub fn service_role(config: &MarketConfig) -> Result<Self, ConfigError> {
        Self::with_key(config, config.service_role_key.expose_secret())
    }

    fn with_key(config: &MarketConfig, key: &str) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();

        let key_value = HeaderValue::from_str(key).map_err(|e| {
            ConfigError::InvalidEnvVar("api key".to_string(), e.to_string())
        })?;
        headers.insert("apikey", key_value);

        let bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
            ConfigError::InvalidEnvVar("api key".to_string(), e.to_string())
        })?;
        headers.insert("Authorization", bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::InvalidEnvVar("http client".to_string(), e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.service_url.trim_end_matches('/').to_string(),
            storage_bucket: config.storage_bucket.clone(),
        })
    }

    /// The base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The object-storage bucket holding store assets.
    #[must_use]
    pub fn storage_bucket(&self) -> &str {
        &self.storage_bucket
    }

    /// Pass the response through if successful, otherwise translate the
    /// error body into a [`SupabaseError`].
    pub(crate) async fn expect_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SupabaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(classify_error(
            status.as_u16(),
            body.code_str().as_deref(),
            body.message(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_code_maps_to_not_found() {
        let err = classify_error(406, Some("PGRST116"), "0 rows".to_string());
        assert!(matches!(err, SupabaseError::NotFound));
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = classify_error(
            409,
            Some("23505"),
            "duplicate key value violates unique constraint".to_string(),
        );
        assert!(matches!(err, SupabaseError::Conflict(_)));
    }

    #[test]
    fn conflict_status_without_code_maps_to_conflict() {
        let err = classify_error(409, None, "conflict".to_string());
        assert!(matches!(err, SupabaseError::Conflict(_)));
    }

    #[test]
    fn other_failures_keep_status_and_message() {
        let err = classify_error(500, Some("XX000"), "internal".to_string());
        match err {
            SupabaseError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 500);
                assert_eq!(code.as_deref(), Some("XX000"));
                assert_eq!(message, "internal");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn error_body_reads_identity_api_shape() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.message(), "Invalid login credentials");
        assert!(body.code_str().is_none());
    }

    #[test]
    fn error_body_reads_numeric_code() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"code":422,"msg":"Signup requires a valid password"}"#)
                .unwrap();
        assert_eq!(body.code_str().as_deref(), Some("422"));
        assert_eq!(body.message(), "Signup requires a valid password");
    }
}
