//! Privileged administrative operations.
//!
//! Everything here runs with the service-role client and bypasses row
//! security, so the facade is deliberately narrow: password resets, full
//! user deletion, and role assignment. Each operation tags its errors
//! with the operation name so callers (the CLI, audit logs) can report
//! which privileged action failed.

use tracing::{info, warn};

use stellar_market_core::{AccountId, Role};

use crate::models::UserRole;
use crate::supabase::{SupabaseClient, SupabaseError};

/// Passwords shorter than this are rejected before touching the service.
const MIN_PASSWORD_LENGTH: usize = 8;

/// What went wrong inside an administrative operation.
#[derive(Debug, thiserror::Error)]
pub enum AdminErrorKind {
    /// The request was malformed; nothing was attempted.
    #[error("{0}")]
    InvalidArgument(String),

    /// The external service rejected the request or was unreachable.
    #[error(transparent)]
    Service(#[from] SupabaseError),

    /// User data was purged but the identity record could not be deleted.
    /// The account can no longer log into anything meaningful, but it
    /// still exists in the identity store and needs manual cleanup.
    #[error("user data purged but identity deletion failed: {0}")]
    IdentityOrphaned(SupabaseError),
}

/// A failed administrative operation, tagged with which one it was.
#[derive(Debug, thiserror::Error)]
#[error("admin operation {operation} failed: {kind}")]
pub struct AdminOperationError {
    pub operation: &'static str,
    #[source]
    pub kind: AdminErrorKind,
}

impl AdminOperationError {
    fn new(operation: &'static str, kind: impl Into<AdminErrorKind>) -> Self {
        Self {
            operation,
            kind: kind.into(),
        }
    }
}

/// Outcome of a full user deletion.
///
/// Deletion is a two-step sequence with no compensation: purge the user's
/// application data, then delete the identity record. Both flags are
/// recorded so a partial failure is visible to the caller instead of
/// being collapsed into a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDeletion {
    pub data_purged: bool,
    pub identity_deleted: bool,
}

/// Backend seam for administrative operations.
pub trait AdminBackend {
    /// Set a user's password through the privileged identity API.
    fn set_user_password(
        &self,
        user: AccountId,
        password: &str,
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;

    /// Purge all application data belonging to a user.
    fn purge_user_data(
        &self,
        user: AccountId,
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;

    /// Delete the user's identity record.
    fn delete_identity(
        &self,
        user: AccountId,
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;

    /// Look up one role assignment row; `None` when absent.
    fn role_row(
        &self,
        user: AccountId,
        role: Role,
    ) -> impl Future<Output = Result<Option<UserRole>, SupabaseError>> + Send;

    /// Insert a role assignment row.
    fn insert_role(
        &self,
        row: &UserRole,
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;

    /// Delete a role assignment row, succeeding even when absent.
    fn delete_role(
        &self,
        user: AccountId,
        role: Role,
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;

    /// All roles assigned to a user.
    fn roles_for(
        &self,
        user: AccountId,
    ) -> impl Future<Output = Result<Vec<UserRole>, SupabaseError>> + Send;
}

impl AdminBackend for SupabaseClient {
    async fn set_user_password(
        &self,
        user: AccountId,
        password: &str,
    ) -> Result<(), SupabaseError> {
        self.admin_update_user_password(user, password).await
    }

    async fn purge_user_data(&self, user: AccountId) -> Result<(), SupabaseError> {
        self.rpc(
            "delete_user_data",
            &serde_json::json!({ "user_id_param": user }),
        )
        .await
    }

    async fn delete_identity(&self, user: AccountId) -> Result<(), SupabaseError> {
        self.admin_delete_user(user).await
    }

    async fn role_row(&self, user: AccountId, role: Role) -> Result<Option<UserRole>, SupabaseError> {
        self.select_one_match(
            "user_roles",
            &[("user_id", &user.to_string()), ("role", role.as_str())],
        )
        .await
    }

    async fn insert_role(&self, row: &UserRole) -> Result<(), SupabaseError> {
        self.insert_many("user_roles", std::slice::from_ref(row))
            .await
    }

    async fn delete_role(&self, user: AccountId, role: Role) -> Result<(), SupabaseError> {
        self.delete_match(
            "user_roles",
            &[("user_id", &user.to_string()), ("role", role.as_str())],
        )
        .await
    }

    async fn roles_for(&self, user: AccountId) -> Result<Vec<UserRole>, SupabaseError> {
        self.select_match("user_roles", &[("user_id", &user.to_string())])
            .await
    }
}

/// Administrative operations over a privileged backend.
pub struct AdminOps<B> {
    backend: B,
    audit: bool,
}

impl<B: AdminBackend> AdminOps<B> {
    /// Wrap a privileged backend. When `audit` is set, each operation
    /// emits structured start/success/failure events.
    pub fn new(backend: B, audit: bool) -> Self {
        Self { backend, audit }
    }

    /// Run an operation with audit events around it: one at entry, one
    /// for the outcome.
    async fn audited<T>(
        &self,
        operation: &'static str,
        user: AccountId,
        fut: impl Future<Output = Result<T, AdminOperationError>>,
    ) -> Result<T, AdminOperationError> {
        if self.audit {
            info!(operation, user = %user, "admin operation started");
        }
        match fut.await {
            Ok(value) => {
                if self.audit {
                    info!(operation, user = %user, "admin operation succeeded");
                }
                Ok(value)
            }
            Err(e) => {
                if self.audit {
                    warn!(operation, user = %user, error = %e.kind, "admin operation failed");
                }
                Err(e)
            }
        }
    }

    /// Force-set a user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AdminErrorKind::InvalidArgument`] for passwords shorter
    /// than eight characters, otherwise the service error.
    pub async fn reset_password(
        &self,
        user: AccountId,
        new_password: &str,
    ) -> Result<(), AdminOperationError> {
        const OP: &str = "reset_password";

        self.audited(OP, user, async {
            if new_password.len() < MIN_PASSWORD_LENGTH {
                return Err(AdminOperationError::new(
                    OP,
                    AdminErrorKind::InvalidArgument(format!(
                        "password must be at least {MIN_PASSWORD_LENGTH} characters"
                    )),
                ));
            }

            self.backend
                .set_user_password(user, new_password)
                .await
                .map_err(|e| AdminOperationError::new(OP, e))
        })
        .await
    }

    /// Delete a user entirely: application data first, then the identity
    /// record.
    ///
    /// There is no compensation between the steps. If the data purge
    /// fails nothing has happened; if the identity deletion fails the
    /// data stays gone and the error is [`AdminErrorKind::IdentityOrphaned`],
    /// which names exactly that state.
    ///
    /// # Errors
    ///
    /// Service errors from either step, with the partial-failure case
    /// distinguished as described above.
    pub async fn delete_user_complete(
        &self,
        user: AccountId,
    ) -> Result<UserDeletion, AdminOperationError> {
        const OP: &str = "delete_user_complete";

        self.audited(OP, user, async {
            self.backend
                .purge_user_data(user)
                .await
                .map_err(|e| AdminOperationError::new(OP, e))?;

            if let Err(e) = self.backend.delete_identity(user).await {
                return Err(AdminOperationError::new(
                    OP,
                    AdminErrorKind::IdentityOrphaned(e),
                ));
            }

            Ok(UserDeletion {
                data_purged: true,
                identity_deleted: true,
            })
        })
        .await
    }

    /// Grant a role. Idempotent: granting an already-held role succeeds
    /// without writing, and a concurrent duplicate insert is folded into
    /// success as well.
    ///
    /// # Errors
    ///
    /// Service errors from the lookup or insert.
    pub async fn assign_role(
        &self,
        user: AccountId,
        role: Role,
    ) -> Result<(), AdminOperationError> {
        const OP: &str = "assign_role";

        self.audited(OP, user, async {
            let existing = self
                .backend
                .role_row(user, role)
                .await
                .map_err(|e| AdminOperationError::new(OP, e))?;
            if existing.is_some() {
                return Ok(());
            }

            match self.backend.insert_role(&UserRole { user_id: user, role }).await {
                Ok(()) | Err(SupabaseError::Conflict(_)) => Ok(()),
                Err(e) => Err(AdminOperationError::new(OP, e)),
            }
        })
        .await
    }

    /// Revoke a role. Succeeds whether or not the user held it.
    ///
    /// # Errors
    ///
    /// Service errors from the delete.
    pub async fn remove_role(
        &self,
        user: AccountId,
        role: Role,
    ) -> Result<(), AdminOperationError> {
        const OP: &str = "remove_role";

        self.audited(OP, user, async {
            self.backend
                .delete_role(user, role)
                .await
                .map_err(|e| AdminOperationError::new(OP, e))
        })
        .await
    }

    /// List the roles a user holds.
    ///
    /// # Errors
    ///
    /// Service errors from the lookup.
    pub async fn get_user_roles(&self, user: AccountId) -> Result<Vec<Role>, AdminOperationError> {
        const OP: &str = "get_user_roles";

        self.audited(OP, user, async {
            let rows = self
                .backend
                .roles_for(user)
                .await
                .map_err(|e| AdminOperationError::new(OP, e))?;
            Ok(rows.into_iter().map(|row| row.role).collect())
        })
        .await
    }
}
