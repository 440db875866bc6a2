//! Store rows and provisioning inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stellar_market_core::{AccountId, StellarAddress, StoreId};

/// A row in the `stores` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub owner_id: AccountId,
    pub name: String,
    pub description: Option<String>,
    /// Where the seller receives payment.
    pub stellar_wallet_address: StellarAddress,
    /// Populated after the logo asset lands in object storage.
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `stores`. `logo_url` starts out null and is patched
/// in once the upload succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct NewStore {
    pub owner_id: AccountId,
    pub name: String,
    pub description: Option<String>,
    pub stellar_wallet_address: StellarAddress,
}

/// Caller-supplied input for store creation. The wallet address is still
/// raw here; the provisioner parses it before anything is written.
#[derive(Debug, Clone)]
pub struct StoreDraft {
    pub name: String,
    pub description: Option<String>,
    pub stellar_wallet_address: String,
    pub logo: Option<LogoUpload>,
}

/// A logo asset to upload alongside store creation.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// File extension without the dot, e.g. `png`.
    pub extension: String,
}
