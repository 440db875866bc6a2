//! Row types for the managed data service.
//!
//! Read types mirror the stored row shapes; `New*` types are the insert
//! payloads (no id, no server-maintained columns).

pub mod catalog;
pub mod profile;
pub mod role;
pub mod store;

pub use catalog::{Category, NewCategory, NewProduct, NewProductImage, Product};
pub use profile::{NewProfile, Profile, ProfileChanges};
pub use role::UserRole;
pub use store::{LogoUpload, NewStore, Store, StoreDraft};
