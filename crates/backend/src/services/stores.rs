//! Store provisioning.
//!
//! Creating a store is a validate-then-write sequence followed by an
//! optional logo step. The ordering matters: nothing is written until the
//! wallet address parses and the owner's profile allows selling. The logo
//! step is best-effort and its outcome is recorded explicitly in the
//! returned [`StoreProvision`]; a failed upload leaves a perfectly valid
//! store without a logo and is never rolled back.

use tracing::{info, warn};

use stellar_market_core::{AccountId, StellarAddress, StoreId, WalletAddressError};

use crate::models::{LogoUpload, NewStore, Profile, Store, StoreDraft};
use crate::supabase::{SupabaseClient, SupabaseError};

/// Errors from store provisioning.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The wallet address failed validation; nothing was written.
    #[error("invalid wallet address: {0}")]
    InvalidWalletAddress(#[from] WalletAddressError),

    /// The owner has no profile row.
    #[error("no profile found for account {0}")]
    NoProfile(AccountId),

    /// The owner's profile is buyer-only.
    #[error("only sellers can create stores")]
    BuyerCannotSell,

    /// The external service rejected the request or was unreachable.
    #[error(transparent)]
    Service(#[from] SupabaseError),
}

/// How the optional logo step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoOutcome {
    /// Logo uploaded and the store row patched with its public URL.
    Uploaded,
    /// No logo was supplied.
    Skipped,
    /// Upload or patch failed; the store exists without a logo.
    Failed {
        /// Why the step failed, for the caller's logs.
        reason: String,
    },
}

/// Result of a provisioning run: the store row as it now exists, plus the
/// recorded outcome of the logo step.
#[derive(Debug, Clone)]
pub struct StoreProvision {
    pub store: Store,
    pub logo: LogoOutcome,
}

/// Backend seam for store provisioning.
pub trait StoreBackend {
    /// Look up the owner's profile; `None` when absent.
    fn profile_by_id(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Profile>, SupabaseError>> + Send;

    /// Insert the store row, returning the stored representation.
    fn insert_store(
        &self,
        row: &NewStore,
    ) -> impl Future<Output = Result<Store, SupabaseError>> + Send;

    /// Upload a logo asset and return its public URL.
    fn upload_store_logo(
        &self,
        path: &str,
        upload: &LogoUpload,
    ) -> impl Future<Output = Result<String, SupabaseError>> + Send;

    /// Patch the store row with the logo URL, returning the updated row.
    fn set_store_logo(
        &self,
        id: StoreId,
        url: &str,
    ) -> impl Future<Output = Result<Store, SupabaseError>> + Send;
}

impl StoreBackend for SupabaseClient {
    async fn profile_by_id(&self, id: AccountId) -> Result<Option<Profile>, SupabaseError> {
        self.select_one_match("profiles", &[("id", &id.to_string())])
            .await
    }

    async fn insert_store(&self, row: &NewStore) -> Result<Store, SupabaseError> {
        self.insert_returning("stores", row).await
    }

    async fn upload_store_logo(
        &self,
        path: &str,
        upload: &LogoUpload,
    ) -> Result<String, SupabaseError> {
        let bucket = self.storage_bucket().to_owned();
        self.upload_object(
            &bucket,
            path,
            upload.bytes.clone(),
            &upload.content_type,
            true,
        )
        .await?;
        Ok(self.public_object_url(&bucket, path))
    }

    async fn set_store_logo(&self, id: StoreId, url: &str) -> Result<Store, SupabaseError> {
        self.update_match_returning(
            "stores",
            &[("id", &id.to_string())],
            &serde_json::json!({ "logo_url": url }),
        )
        .await
    }
}

/// Deterministic object key for a store's logo.
fn logo_path(store: StoreId, extension: &str) -> String {
    format!("store-logos/{store}-logo.{extension}")
}

/// Provision a store for `owner`.
///
/// Steps, in order: parse the wallet address, load the owner's profile,
/// reject buyer-only profiles, insert the store row, then (if a logo was
/// supplied) upload the asset and patch `logo_url`. The first three steps
/// reject before any write occurs.
///
/// # Errors
///
/// Returns [`StoreError::InvalidWalletAddress`], [`StoreError::NoProfile`]
/// or [`StoreError::BuyerCannotSell`] without writing anything, and
/// [`StoreError::Service`] if the store insert itself fails. A failing
/// logo step is not an error; it is reported via [`LogoOutcome::Failed`].
pub async fn create_store<B: StoreBackend>(
    backend: &B,
    owner: AccountId,
    draft: StoreDraft,
) -> Result<StoreProvision, StoreError> {
    let wallet = StellarAddress::parse(&draft.stellar_wallet_address)?;

    let profile = backend
        .profile_by_id(owner)
        .await?
        .ok_or(StoreError::NoProfile(owner))?;
    if !profile.user_type.can_sell() {
        return Err(StoreError::BuyerCannotSell);
    }

    let store = backend
        .insert_store(&NewStore {
            owner_id: owner,
            name: draft.name,
            description: draft.description,
            stellar_wallet_address: wallet,
        })
        .await?;
    info!(store_id = %store.id, owner = %owner, "store created");

    let Some(upload) = draft.logo else {
        return Ok(StoreProvision {
            store,
            logo: LogoOutcome::Skipped,
        });
    };

    let path = logo_path(store.id, &upload.extension);
    let logo = match backend.upload_store_logo(&path, &upload).await {
        Ok(url) => match backend.set_store_logo(store.id, &url).await {
            Ok(updated) => {
                return Ok(StoreProvision {
                    store: updated,
                    logo: LogoOutcome::Uploaded,
                });
            }
            Err(e) => {
                warn!(store_id = %store.id, error = %e, "logo URL patch failed; store keeps no logo");
                LogoOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        },
        Err(e) => {
            warn!(store_id = %store.id, error = %e, "logo upload failed; store keeps no logo");
            LogoOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    Ok(StoreProvision { store, logo })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;
    use stellar_market_core::UserType;

    fn valid_wallet() -> String {
        format!("G{}", "A".repeat(55))
    }

    #[derive(Default)]
    struct FakeBackend {
        profiles: Mutex<HashMap<AccountId, Profile>>,
        stores: Mutex<Vec<Store>>,
        fail_upload: bool,
    }

    impl FakeBackend {
        fn with_profile(user_type: UserType) -> (Self, AccountId) {
            let backend = Self::default();
            let id = AccountId::generate();
            let now = Utc::now();
            backend.profiles.lock().unwrap().insert(
                id,
                Profile {
                    id,
                    user_type,
                    display_name: None,
                    email: None,
                    created_at: now,
                    updated_at: now,
                },
            );
            (backend, id)
        }

        fn store_count(&self) -> usize {
            self.stores.lock().unwrap().len()
        }
    }

    impl StoreBackend for FakeBackend {
        async fn profile_by_id(&self, id: AccountId) -> Result<Option<Profile>, SupabaseError> {
            Ok(self.profiles.lock().unwrap().get(&id).cloned())
        }

        async fn insert_store(&self, row: &NewStore) -> Result<Store, SupabaseError> {
            let now = Utc::now();
            let store = Store {
                id: StoreId::generate(),
                owner_id: row.owner_id,
                name: row.name.clone(),
                description: row.description.clone(),
                stellar_wallet_address: row.stellar_wallet_address.clone(),
                logo_url: None,
                created_at: now,
                updated_at: now,
            };
            self.stores.lock().unwrap().push(store.clone());
            Ok(store)
        }

        async fn upload_store_logo(
            &self,
            path: &str,
            _upload: &LogoUpload,
        ) -> Result<String, SupabaseError> {
            if self.fail_upload {
                return Err(SupabaseError::Api {
                    status: 503,
                    code: None,
                    message: "storage unavailable".to_string(),
                });
            }
            Ok(format!("https://cdn.example/{path}"))
        }

        async fn set_store_logo(&self, id: StoreId, url: &str) -> Result<Store, SupabaseError> {
            let mut stores = self.stores.lock().unwrap();
            let store = stores
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(SupabaseError::NotFound)?;
            store.logo_url = Some(url.to_owned());
            Ok(store.clone())
        }
    }

    fn draft(wallet: &str, logo: Option<LogoUpload>) -> StoreDraft {
        StoreDraft {
            name: "Shop".to_string(),
            description: None,
            stellar_wallet_address: wallet.to_owned(),
            logo,
        }
    }

    fn png_logo() -> LogoUpload {
        LogoUpload {
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            content_type: "image/png".to_string(),
            extension: "png".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_store_without_logo() {
        let (backend, seller) = FakeBackend::with_profile(UserType::Seller);

        let provision = create_store(&backend, seller, draft(&valid_wallet(), None))
            .await
            .unwrap();

        assert_eq!(provision.logo, LogoOutcome::Skipped);
        assert!(provision.store.logo_url.is_none());
        assert_eq!(backend.store_count(), 1);
    }

    #[tokio::test]
    async fn rejects_bad_wallet_before_any_write() {
        let (backend, seller) = FakeBackend::with_profile(UserType::Seller);

        let err = create_store(&backend, seller, draft("GSHORT", None))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidWalletAddress(_)));
        assert_eq!(backend.store_count(), 0);
    }

    #[tokio::test]
    async fn rejects_buyer_without_writing() {
        let (backend, buyer) = FakeBackend::with_profile(UserType::Buyer);

        let err = create_store(&backend, buyer, draft(&valid_wallet(), None))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::BuyerCannotSell));
        assert_eq!(backend.store_count(), 0);
    }

    #[tokio::test]
    async fn both_type_profile_can_create_store() {
        let (backend, owner) = FakeBackend::with_profile(UserType::Both);

        let provision = create_store(&backend, owner, draft(&valid_wallet(), None))
            .await
            .unwrap();

        assert_eq!(provision.store.owner_id, owner);
    }

    #[tokio::test]
    async fn missing_profile_is_rejected() {
        let backend = FakeBackend::default();
        let nobody = AccountId::generate();

        let err = create_store(&backend, nobody, draft(&valid_wallet(), None))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NoProfile(id) if id == nobody));
        assert_eq!(backend.store_count(), 0);
    }

    #[tokio::test]
    async fn logo_upload_populates_url() {
        let (backend, seller) = FakeBackend::with_profile(UserType::Seller);

        let provision = create_store(&backend, seller, draft(&valid_wallet(), Some(png_logo())))
            .await
            .unwrap();

        assert_eq!(provision.logo, LogoOutcome::Uploaded);
        let url = provision.store.logo_url.unwrap();
        assert!(url.ends_with(&format!("store-logos/{}-logo.png", provision.store.id)));
    }

    #[tokio::test]
    async fn failed_upload_keeps_store_and_reports_outcome() {
        let (mut backend, seller) = FakeBackend::with_profile(UserType::Seller);
        backend.fail_upload = true;

        let provision = create_store(&backend, seller, draft(&valid_wallet(), Some(png_logo())))
            .await
            .unwrap();

        assert!(matches!(provision.logo, LogoOutcome::Failed { .. }));
        assert!(provision.store.logo_url.is_none());
        assert_eq!(backend.store_count(), 1);
    }
}
