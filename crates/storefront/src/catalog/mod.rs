//! Catalog store.
//!
//! The product list lives in memory behind a `RwLock` and is mirrored to a
//! [`KeyValueStorage`] backend under [`CATALOG_KEY`]. On first run the store
//! is seeded from [`seed::default_products`] and the seed is persisted
//! straight away, so later loads return exactly what was written.
//!
//! Writers go through [`CatalogStore::replace`] (or [`CatalogStore::modify`]),
//! which persist first and only then swap the in-memory list. A failed write
//! leaves memory untouched.

pub mod seed;
pub mod storage;

use std::sync::Arc;

use lumina_luxe_core::{Product, ProductError, ProductId, validate_catalog};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

pub use seed::default_products;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

/// Storage key holding the serialized catalog.
pub const CATALOG_KEY: &str = "lumina_products";

/// Errors from catalog persistence.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The new catalog violates a product invariant.
    #[error("invalid catalog: {0}")]
    Invalid(#[from] ProductError),

    /// Serialization failed.
    #[error("failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),
}

/// How [`CatalogStore::load`] obtained its products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// A well-formed catalog was found in storage.
    Persisted,
    /// Nothing usable was stored; the default set was written.
    Seeded,
}

/// Shared, persisted product catalog.
///
/// Cheap to clone; clones share the same list and backend.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogStoreInner>,
}

struct CatalogStoreInner {
    storage: Arc<dyn KeyValueStorage>,
    products: RwLock<Vec<Product>>,
    source: LoadSource,
}

impl CatalogStore {
    /// Load the catalog from `storage`, seeding it on first run.
    ///
    /// Malformed stored data (bad JSON, duplicate ids) is treated as absent
    /// and overwritten by the seed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the backend cannot be read, or if
    /// the seed cannot be written.
    #[instrument(skip(storage))]
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Result<Self, CatalogError> {
        let (products, source) = match storage.read(CATALOG_KEY).await? {
            Some(raw) => match decode(&raw) {
                Ok(products) => (products, LoadSource::Persisted),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored catalog is malformed, reseeding");
                    (seed_storage(storage.as_ref()).await?, LoadSource::Seeded)
                }
            },
            None => (seed_storage(storage.as_ref()).await?, LoadSource::Seeded),
        };

        tracing::info!(products = products.len(), source = ?source, "Catalog loaded");

        Ok(Self {
            inner: Arc::new(CatalogStoreInner {
                storage,
                products: RwLock::new(products),
                source,
            }),
        })
    }

    /// Whether this store was seeded during [`CatalogStore::load`].
    #[must_use]
    pub fn source(&self) -> LoadSource {
        self.inner.source
    }

    /// Snapshot of the current catalog, in display order.
    pub async fn products(&self) -> Vec<Product> {
        self.inner.products.read().await.clone()
    }

    /// Look up a product by id.
    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.inner
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == *id)
            .cloned()
    }

    /// Number of products in the catalog.
    pub async fn len(&self) -> usize {
        self.inner.products.read().await.len()
    }

    /// Whether the catalog is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.products.read().await.is_empty()
    }

    /// Replace the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` for duplicate ids and
    /// `CatalogError::Storage` if persisting fails. In both cases the
    /// in-memory catalog is unchanged.
    #[instrument(skip(self, products), fields(products = products.len()))]
    pub async fn replace(&self, products: Vec<Product>) -> Result<(), CatalogError> {
        let mut current = self.inner.products.write().await;
        self.persist(&products).await?;
        *current = products;
        Ok(())
    }

    /// Apply an edit to a copy of the catalog and commit it atomically.
    ///
    /// The write lock is held across the edit and the write, so concurrent
    /// edits cannot lose each other's changes. If `edit` fails nothing is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns the error from `edit`, or a `CatalogError` converted into `E`
    /// if validation or persistence fails.
    pub async fn modify<T, E, F>(&self, edit: F) -> Result<T, E>
    where
        F: FnOnce(&mut Vec<Product>) -> Result<T, E>,
        E: From<CatalogError>,
    {
        let mut current = self.inner.products.write().await;
        let mut next = current.clone();
        let output = edit(&mut next)?;
        self.persist(&next).await.map_err(E::from)?;
        *current = next;
        Ok(output)
    }

    async fn persist(&self, products: &[Product]) -> Result<(), CatalogError> {
        validate_catalog(products)?;
        let json = serde_json::to_string(products)?;
        self.inner.storage.write(CATALOG_KEY, &json).await?;
        tracing::debug!(products = products.len(), "Catalog persisted");
        Ok(())
    }
}

fn decode(raw: &str) -> Result<Vec<Product>, CatalogError> {
    let products: Vec<Product> = serde_json::from_str(raw)?;
    validate_catalog(&products)?;
    Ok(products)
}

async fn seed_storage(storage: &dyn KeyValueStorage) -> Result<Vec<Product>, CatalogError> {
    let products = default_products();
    let json = serde_json::to_string(&products)?;
    storage.write(CATALOG_KEY, &json).await?;
    Ok(products)
}
