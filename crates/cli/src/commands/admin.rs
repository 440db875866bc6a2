//! Privileged user administration commands.
//!
//! # Usage
//!
//! ```bash
//! sm-cli admin reset-password -u <account-id> -p <new-password>
//! sm-cli admin delete-user -u <account-id>
//! sm-cli admin assign-role -u <account-id> -r seller
//! sm-cli admin remove-role -u <account-id> -r seller
//! sm-cli admin roles -u <account-id>
//! ```
//!
//! # Environment Variables
//!
//! Standard `MARKET_*` variables; `MARKET_ADMIN_AUDIT_LOG=true` turns on
//! structured audit events for every operation.

use thiserror::Error;

use stellar_market_backend::config::{ConfigError, MarketConfig};
use stellar_market_backend::services::admin::{AdminOperationError, AdminOps};
use stellar_market_backend::supabase::SupabaseClient;
use stellar_market_core::{AccountId, Role};

/// Errors from the admin commands.
#[derive(Debug, Error)]
pub enum AdminCommandError {
    /// Configuration was missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The user argument was not a UUID.
    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    /// The role argument was not a known role name.
    #[error("Invalid role: {0}. Valid roles: admin, seller, user")]
    InvalidRole(String),

    /// The operation itself failed.
    #[error(transparent)]
    Operation(#[from] AdminOperationError),
}

fn parse_account(user: &str) -> Result<AccountId, AdminCommandError> {
    user.parse()
        .map_err(|_| AdminCommandError::InvalidAccountId(user.to_owned()))
}

fn parse_role(role: &str) -> Result<Role, AdminCommandError> {
    role.parse()
        .map_err(|_| AdminCommandError::InvalidRole(role.to_owned()))
}

fn ops() -> Result<AdminOps<SupabaseClient>, AdminCommandError> {
    let config = MarketConfig::from_env()?;
    let client = SupabaseClient::service_role(&config)?;
    Ok(AdminOps::new(client, config.admin_audit_log))
}

/// Force-set a user's password.
pub async fn reset_password(user: &str, password: &str) -> Result<(), AdminCommandError> {
    let user = parse_account(user)?;
    ops()?.reset_password(user, password).await?;
    tracing::info!("Password reset for {user}");
    Ok(())
}

/// Delete a user's application data and identity record.
pub async fn delete_user(user: &str) -> Result<(), AdminCommandError> {
    let user = parse_account(user)?;
    let deletion = ops()?.delete_user_complete(user).await?;
    tracing::info!(
        "User {user} deleted (data purged: {}, identity deleted: {})",
        deletion.data_purged,
        deletion.identity_deleted,
    );
    Ok(())
}

/// Grant a role; granting an already-held role is a no-op.
pub async fn assign_role(user: &str, role: &str) -> Result<(), AdminCommandError> {
    let user = parse_account(user)?;
    let role = parse_role(role)?;
    ops()?.assign_role(user, role).await?;
    tracing::info!("Role {role} assigned to {user}");
    Ok(())
}

/// Revoke a role; revoking a role the user does not hold still succeeds.
pub async fn remove_role(user: &str, role: &str) -> Result<(), AdminCommandError> {
    let user = parse_account(user)?;
    let role = parse_role(role)?;
    ops()?.remove_role(user, role).await?;
    tracing::info!("Role {role} removed from {user}");
    Ok(())
}

/// List the roles a user holds.
pub async fn list_roles(user: &str) -> Result<(), AdminCommandError> {
    let user = parse_account(user)?;
    let roles = ops()?.get_user_roles(user).await?;
    if roles.is_empty() {
        tracing::info!("User {user} holds no roles");
    } else {
        let names: Vec<&str> = roles.iter().map(|role| role.as_str()).collect();
        tracing::info!("User {user} holds roles: {}", names.join(", "));
    }
    Ok(())
}
