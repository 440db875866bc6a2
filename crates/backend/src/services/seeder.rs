//! Catalog seeding.
//!
//! Populates categories, products, and product images with sample data.
//! The run is idempotent per stage: each stage counts its own table first
//! and skips when rows already exist, so a partially seeded database
//! (categories present, products absent) is recoverable by simply running
//! again.

use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use stellar_market_core::{AccountId, CategoryId};

use crate::models::{Category, NewCategory, NewProduct, NewProductImage, Product};
use crate::supabase::{SupabaseClient, SupabaseError};

/// Rows per insert request, to stay under the service's payload limit.
const SEED_BATCH_SIZE: usize = 10;

/// Placeholder seller for sample products; a real deployment reassigns
/// them to an actual seller account.
const SAMPLE_SELLER_ID: uuid::Uuid = uuid::Uuid::nil();

/// Errors from a seeding run.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// A subcategory or product referenced a category slug that was not
    /// present after the category stage.
    #[error("seed data references unknown category slug {0:?}")]
    MissingCategory(String),

    /// A batch insert failed; remaining batches were not attempted.
    #[error("seeding {table} failed at batch {batch}: {source}")]
    Batch {
        table: &'static str,
        batch: usize,
        source: SupabaseError,
    },

    /// The external service rejected a request or was unreachable.
    #[error(transparent)]
    Service(#[from] SupabaseError),
}

/// Backend seam for the seeder.
pub trait SeedBackend {
    /// Count rows of a table.
    fn count_rows(&self, table: &str) -> impl Future<Output = Result<u64, SupabaseError>> + Send;

    /// Fetch all categories.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, SupabaseError>> + Send;

    /// Insert categories, returning the stored rows (with ids).
    fn insert_categories(
        &self,
        rows: &[NewCategory],
    ) -> impl Future<Output = Result<Vec<Category>, SupabaseError>> + Send;

    /// Insert a batch of products.
    fn insert_products(
        &self,
        rows: &[NewProduct],
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;

    /// Fetch all products.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, SupabaseError>> + Send;

    /// Insert a batch of product images.
    fn insert_product_images(
        &self,
        rows: &[NewProductImage],
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;
}

impl SeedBackend for SupabaseClient {
    async fn count_rows(&self, table: &str) -> Result<u64, SupabaseError> {
        self.count(table).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, SupabaseError> {
        self.select_all("categories").await
    }

    async fn insert_categories(&self, rows: &[NewCategory]) -> Result<Vec<Category>, SupabaseError> {
        self.insert_many_returning("categories", rows).await
    }

    async fn insert_products(&self, rows: &[NewProduct]) -> Result<(), SupabaseError> {
        self.insert_many("products", rows).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, SupabaseError> {
        self.select_all("products").await
    }

    async fn insert_product_images(&self, rows: &[NewProductImage]) -> Result<(), SupabaseError> {
        self.insert_many("product_images", rows).await
    }
}

/// What one stage of a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageOutcome {
    /// Rows inserted by this run.
    pub inserted: u64,
    /// True when the stage found existing rows and did nothing.
    pub skipped: bool,
}

/// Summary of a full seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: StageOutcome,
    pub products: StageOutcome,
    pub images: StageOutcome,
}

/// Seed the catalog tables with sample data.
///
/// Safe to run repeatedly; a second run over a fully seeded database
/// inserts nothing.
///
/// # Errors
///
/// Returns [`SeedError::MissingCategory`] when the sample data references
/// a slug that is not present, [`SeedError::Batch`] when a batched insert
/// fails partway, or [`SeedError::Service`] for other failures.
pub async fn seed_database<B: SeedBackend>(backend: &B) -> Result<SeedSummary, SeedError> {
    let mut summary = SeedSummary::default();

    let categories = seed_categories(backend, &mut summary.categories).await?;
    seed_products(backend, &categories, &mut summary.products).await?;
    seed_product_images(backend, &mut summary.images).await?;

    info!(
        categories = summary.categories.inserted,
        products = summary.products.inserted,
        images = summary.images.inserted,
        "seeding complete"
    );
    Ok(summary)
}

/// Seed the category taxonomy: parents first, then subcategories wired to
/// their parents by slug lookup.
///
/// Returns all categories (existing or freshly inserted) so later stages
/// can resolve slugs either way.
async fn seed_categories<B: SeedBackend>(
    backend: &B,
    outcome: &mut StageOutcome,
) -> Result<Vec<Category>, SeedError> {
    if backend.count_rows("categories").await? > 0 {
        info!("categories already exist, skipping seed");
        outcome.skipped = true;
        return Ok(backend.list_categories().await?);
    }

    let parents = backend.insert_categories(&parent_categories()).await?;

    let subcategories = subcategories(&parents)?;
    let children = backend.insert_categories(&subcategories).await?;

    outcome.inserted = (parents.len() + children.len()) as u64;

    let mut all = parents;
    all.extend(children);
    Ok(all)
}

/// Seed sample products in batches. The first failing batch aborts the
/// rest and surfaces its error.
async fn seed_products<B: SeedBackend>(
    backend: &B,
    categories: &[Category],
    outcome: &mut StageOutcome,
) -> Result<(), SeedError> {
    if backend.count_rows("products").await? > 0 {
        info!("products already exist, skipping seed");
        outcome.skipped = true;
        return Ok(());
    }

    let products = sample_products(categories)?;
    for (i, batch) in products.chunks(SEED_BATCH_SIZE).enumerate() {
        backend
            .insert_products(batch)
            .await
            .map_err(|source| SeedError::Batch {
                table: "products",
                batch: i + 1,
                source,
            })?;
    }

    outcome.inserted = products.len() as u64;
    Ok(())
}

/// Seed 1-3 placeholder images per product, first image primary.
async fn seed_product_images<B: SeedBackend>(
    backend: &B,
    outcome: &mut StageOutcome,
) -> Result<(), SeedError> {
    if backend.count_rows("product_images").await? > 0 {
        info!("product images already exist, skipping seed");
        outcome.skipped = true;
        return Ok(());
    }

    let products = backend.list_products().await?;
    let mut rng = rand::rng();
    let mut images = Vec::new();
    for product in &products {
        let image_count = rng.random_range(1..=3);
        for order in 0..image_count {
            images.push(NewProductImage {
                product_id: product.id,
                url: format!(
                    "https://via.placeholder.com/600x600?text={}",
                    url_encode(&product.title)
                ),
                alt_text: format!("{} image {}", product.title, order + 1),
                display_order: order,
                is_primary: order == 0,
            });
        }
    }

    for (i, batch) in images.chunks(SEED_BATCH_SIZE).enumerate() {
        backend
            .insert_product_images(batch)
            .await
            .map_err(|source| SeedError::Batch {
                table: "product_images",
                batch: i + 1,
                source,
            })?;
    }

    outcome.inserted = images.len() as u64;
    Ok(())
}

/// Minimal percent-encoding for placeholder image URLs.
fn url_encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

fn category(name: &str, slug: &str, description: &str) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        slug: slug.to_string(),
        description: Some(description.to_string()),
        parent_id: None,
    }
}

fn parent_categories() -> Vec<NewCategory> {
    vec![
        category("Clothing", "clothing", "Apparel and wearable items"),
        category("Electronics", "electronics", "Electronic devices and accessories"),
        category("Books", "books", "Printed and digital books"),
        category("Art", "art", "Artwork and creative pieces"),
        category("Virtual Goods", "virtual-goods", "Digital items and virtual assets"),
        category("Collectibles", "collectibles", "Collectible items and memorabilia"),
    ]
}

/// Resolve a category id by slug, failing loudly when the seed data and
/// the table have drifted apart.
fn category_id(categories: &[Category], slug: &str) -> Result<CategoryId, SeedError> {
    categories
        .iter()
        .find(|c| c.slug == slug)
        .map(|c| c.id)
        .ok_or_else(|| SeedError::MissingCategory(slug.to_owned()))
}

fn subcategories(parents: &[Category]) -> Result<Vec<NewCategory>, SeedError> {
    let child = |name: &str,
                 slug: &str,
                 description: &str,
                 parent_slug: &str|
     -> Result<NewCategory, SeedError> {
        Ok(NewCategory {
            name: name.to_string(),
            slug: slug.to_string(),
            description: Some(description.to_string()),
            parent_id: Some(category_id(parents, parent_slug)?),
        })
    };

    Ok(vec![
        child("T-Shirts", "t-shirts", "Short-sleeved casual tops", "clothing")?,
        child("Hoodies", "hoodies", "Sweatshirts with hoods", "clothing")?,
        child("Smartphones", "smartphones", "Mobile phones and accessories", "electronics")?,
        child("Laptops", "laptops", "Portable computers", "electronics")?,
        child("NFTs", "nfts", "Non-fungible tokens", "virtual-goods")?,
        child("Digital Art", "digital-art", "Artwork in digital format", "virtual-goods")?,
    ])
}

fn sample_products(categories: &[Category]) -> Result<Vec<NewProduct>, SeedError> {
    let seller_id = AccountId::new(SAMPLE_SELLER_ID);
    let product = |title: &str,
                   description: &str,
                   price: Decimal,
                   category_slug: &str,
                   stock: u32,
                   slug: &str,
                   featured: bool|
     -> Result<NewProduct, SeedError> {
        Ok(NewProduct {
            title: title.to_string(),
            description: description.to_string(),
            price,
            category: category_id(categories, category_slug)?,
            seller_id,
            stock,
            slug: slug.to_string(),
            featured,
        })
    };

    Ok(vec![
        product(
            "StellarX Logo T-Shirt",
            "Black cotton t-shirt with the StellarX logo printed on the front.",
            Decimal::new(2599, 2),
            "t-shirts",
            50,
            "stellarx-logo-tshirt",
            true,
        )?,
        product(
            "Stellar Network T-Shirt",
            "Navy blue t-shirt featuring the Stellar network constellation design.",
            Decimal::new(2999, 2),
            "t-shirts",
            35,
            "stellar-network-tshirt",
            false,
        )?,
        product(
            "Crypto Enthusiast Hoodie",
            "Warm hoodie with \"Crypto Enthusiast\" embroidered on the chest.",
            Decimal::new(4999, 2),
            "hoodies",
            20,
            "crypto-enthusiast-hoodie",
            true,
        )?,
        product(
            "CryptoPhone X1",
            "Secure smartphone with built-in cryptocurrency wallet and enhanced security features.",
            Decimal::new(89999, 2),
            "smartphones",
            10,
            "cryptophone-x1",
            true,
        )?,
        product(
            "DeveloperBook Pro",
            "High-performance laptop optimized for blockchain development and testing.",
            Decimal::new(149_999, 2),
            "laptops",
            5,
            "developerbook-pro",
            false,
        )?,
        product(
            "Understanding Stellar: A Beginner's Guide",
            "Comprehensive guide to understanding the Stellar blockchain network and its ecosystem.",
            Decimal::new(2499, 2),
            "books",
            100,
            "understanding-stellar-guide",
            true,
        )?,
        product(
            "Galactic Explorer NFT Collection",
            "Limited edition NFT collection featuring space exploration artwork.",
            Decimal::new(19999, 2),
            "nfts",
            10,
            "galactic-explorer-nft",
            true,
        )?,
        product(
            "Abstract Constellation Digital Painting",
            "High-resolution digital painting of an abstract stellar constellation.",
            Decimal::new(4999, 2),
            "digital-art",
            999,
            "abstract-constellation-art",
            false,
        )?,
        product(
            "Handcrafted Stellar Mobile",
            "Handmade hanging mobile featuring stellar and celestial elements.",
            Decimal::new(12999, 2),
            "art",
            3,
            "handcrafted-stellar-mobile",
            true,
        )?,
        product(
            "Limited Edition Stellar Foundation Coin",
            "Physical commemorative coin celebrating the Stellar Foundation, numbered and authenticated.",
            Decimal::new(7999, 2),
            "collectibles",
            15,
            "stellar-foundation-coin",
            true,
        )?,
    ])
}
