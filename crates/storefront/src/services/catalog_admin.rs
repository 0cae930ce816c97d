//! Operator-side product management.
//!
//! Every operation is a whole-catalog read-modify-write through
//! [`CatalogStore::modify`], so the persisted catalog and the in-memory one
//! never diverge.

use lumina_luxe_core::{Product, ProductDraft, ProductError, ProductId};
use thiserror::Error;
use tracing::instrument;

use crate::catalog::{CatalogError, CatalogStore};

/// Errors from product management.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Submitted product data is invalid.
    #[error("invalid product: {0}")]
    Invalid(#[from] ProductError),

    /// No product has the given id.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// Persisting the catalog failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Product management over the catalog store.
pub struct CatalogAdminService<'a> {
    catalog: &'a CatalogStore,
}

impl<'a> CatalogAdminService<'a> {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(catalog: &'a CatalogStore) -> Self {
        Self { catalog }
    }

    /// Add a product at the end of the catalog under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Invalid` if the draft fails validation and
    /// `AdminError::Catalog` if persisting fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, AdminError> {
        let product = draft.into_product(ProductId::generate())?;
        let created = product.clone();
        self.catalog
            .modify(move |products| {
                products.push(product);
                Ok::<_, AdminError>(())
            })
            .await?;

        tracing::info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// Overwrite a product's fields in place, keeping its id and position.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` for an unknown id, plus the errors of
    /// [`CatalogAdminService::create`].
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update(&self, id: &ProductId, draft: ProductDraft) -> Result<Product, AdminError> {
        let product = draft.into_product(id.clone())?;
        let updated = product.clone();
        self.catalog
            .modify(|products| {
                let slot = products
                    .iter_mut()
                    .find(|p| p.id == *id)
                    .ok_or_else(|| AdminError::NotFound(id.clone()))?;
                *slot = product;
                Ok::<_, AdminError>(())
            })
            .await?;

        tracing::info!("Product updated");
        Ok(updated)
    }

    /// Remove a product from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` for an unknown id and
    /// `AdminError::Catalog` if persisting fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<Product, AdminError> {
        let removed = self
            .catalog
            .modify(|products| {
                let index = products
                    .iter()
                    .position(|p| p.id == *id)
                    .ok_or_else(|| AdminError::NotFound(id.clone()))?;
                Ok::<_, AdminError>(products.remove(index))
            })
            .await?;

        tracing::info!("Product deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lumina_luxe_core::{Category, Yen};

    use super::*;
    use crate::catalog::{CATALOG_KEY, KeyValueStorage, MemoryStorage, default_products};

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: 21_000,
            category: Category::Cosmetics,
            ..ProductDraft::default()
        }
    }

    async fn store() -> (CatalogStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = CatalogStore::load(storage.clone()).await.expect("load");
        (store, storage)
    }

    #[tokio::test]
    async fn test_create_appends_and_persists() {
        let (catalog, storage) = store().await;
        let service = CatalogAdminService::new(&catalog);

        let created = service.create(draft("ムーンライト・バーム")).await.expect("create");

        let products = catalog.products().await;
        assert_eq!(products.last(), Some(&created));
        assert_eq!(created.price, Yen::new(21_000));
        assert_eq!(created.id.as_str().len(), 32);

        let raw = storage.read(CATALOG_KEY).await.expect("read").expect("value");
        assert!(raw.contains("ムーンライト・バーム"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft() {
        let (catalog, _) = store().await;
        let service = CatalogAdminService::new(&catalog);

        let result = service.create(draft("  ")).await;
        assert!(matches!(result, Err(AdminError::Invalid(ProductError::EmptyName))));
        assert_eq!(catalog.products().await, default_products());
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_position() {
        let (catalog, _) = store().await;
        let service = CatalogAdminService::new(&catalog);
        let id = ProductId::new("3");

        let updated = service.update(&id, draft("新しい名前")).await.expect("update");
        assert_eq!(updated.id, id);

        let products = catalog.products().await;
        assert_eq!(products.get(2).map(|p| p.name.as_str()), Some("新しい名前"));
        assert_eq!(products.len(), default_products().len());
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let (catalog, _) = store().await;
        let service = CatalogAdminService::new(&catalog);
        let result = service.update(&ProductId::new("nope"), draft("x")).await;
        assert!(matches!(result, Err(AdminError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let (catalog, _) = store().await;
        let service = CatalogAdminService::new(&catalog);
        let id = ProductId::new("1");

        let removed = service.delete(&id).await.expect("delete");
        assert_eq!(removed.id, id);
        assert!(catalog.get(&id).await.is_none());

        assert!(matches!(
            service.delete(&id).await,
            Err(AdminError::NotFound(_))
        ));
    }
}
